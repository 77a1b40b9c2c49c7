//! Scopes command

use crate::cli::ScopesArgs;
use crate::output;
use anyhow::{Context, Result};
use imgref_core::transport::ImageReference;

/// Identity first, then namespaces, most specific first
pub fn policy_scopes(reference: &dyn ImageReference) -> Result<Vec<String>> {
    let mut scopes = vec![reference.policy_configuration_identity()?];
    scopes.extend(reference.policy_configuration_namespaces());
    Ok(scopes)
}

pub fn run(args: ScopesArgs) -> Result<()> {
    let reference = super::transports()
        .parse_image_name(&args.image)
        .with_context(|| format!("Failed to parse image name '{}'", args.image))?;
    let scopes = policy_scopes(reference.as_ref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&scopes)?);
        return Ok(());
    }

    output::header(&format!("Policy scopes for {}", args.image));
    for scope in &scopes {
        output::item(scope);
    }

    Ok(())
}
