//! Parse command

use crate::cli::ParseArgs;
use crate::output;
use anyhow::{Context, Result};
use imgref_core::transport::{image_name, ImageReference};
use serde::Serialize;

/// Canonical view of a parsed image name
#[derive(Debug, Serialize)]
pub struct ParsedImage {
    pub transport: String,
    pub image_name: String,
    pub docker_reference: Option<String>,
    pub tag_or_digest: String,
    pub identity: String,
}

impl ParsedImage {
    pub fn from_reference(reference: &dyn ImageReference) -> Result<Self> {
        let named = reference.docker_reference();
        Ok(Self {
            transport: reference.transport().name().to_string(),
            image_name: image_name(reference),
            docker_reference: named.map(|n| n.to_string()),
            tag_or_digest: reference.tag_or_digest()?,
            identity: reference.policy_configuration_identity()?,
        })
    }
}

pub fn run(args: ParseArgs) -> Result<()> {
    let reference = super::transports()
        .parse_image_name(&args.image)
        .with_context(|| format!("Failed to parse image name '{}'", args.image))?;
    let parsed = ParsedImage::from_reference(reference.as_ref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    output::header(&parsed.image_name);
    output::kv("Transport", &parsed.transport);
    if let Some(docker_reference) = &parsed.docker_reference {
        output::kv("Reference", docker_reference);
    }
    output::kv("Tag/Digest", &parsed.tag_or_digest);
    output::kv("Identity", &parsed.identity);

    Ok(())
}
