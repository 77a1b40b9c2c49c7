//! Policy commands

use crate::cli::{PolicyCheckArgs, PolicyCommands};
use crate::output;
use anyhow::{Context, Result};
use camino::Utf8Path;
use imgref_core::{ContextLoader, PolicyConfig};
use tracing::debug;

pub fn run(
    cmd: PolicyCommands,
    context_path: Option<&Utf8Path>,
    policy_path: Option<&Utf8Path>,
) -> Result<()> {
    let policy = load_policy(context_path, policy_path)?;
    match cmd {
        PolicyCommands::Validate => {
            output::success("Policy is valid");
            Ok(())
        }
        PolicyCommands::Check(args) => check(&policy, args),
    }
}

/// Load and validate the policy the way image consumers would
fn load_policy(
    context_path: Option<&Utf8Path>,
    policy_path: Option<&Utf8Path>,
) -> Result<PolicyConfig> {
    let loader = ContextLoader::new()?;
    let ctx = match context_path {
        Some(path) => loader.load_context_from(path)?,
        None => loader.load_context()?,
    };
    debug!("System context: {:?}", ctx);

    let policy = loader
        .load_policy(policy_path, &ctx)
        .context("Failed to load signature policy")?;
    policy
        .validate(&super::transports())
        .context("Signature policy is invalid")?;
    Ok(policy)
}

fn check(policy: &PolicyConfig, args: PolicyCheckArgs) -> Result<()> {
    let reference = super::transports()
        .parse_image_name(&args.image)
        .with_context(|| format!("Failed to parse image name '{}'", args.image))?;
    let found = policy.requirements_for(reference.as_ref())?;

    if args.json {
        let info = serde_json::json!({
            "image": args.image,
            "scope": found.scope.to_string(),
            "requirements": found.requirements,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    output::header(&format!("Policy for {}", args.image));
    output::kv("Matched scope", &found.scope.to_string());
    for requirement in found.requirements {
        output::item(&requirement.to_string());
    }

    Ok(())
}
