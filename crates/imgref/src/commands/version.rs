//! Version command

use crate::cli::VersionArgs;
use anyhow::Result;

pub fn run(args: VersionArgs) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let transports = super::transports().names();

    if args.json {
        let info = serde_json::json!({
            "version": version,
            "transports": transports,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("imgref {}", version);
        println!("Transports: {}", transports.join(", "));
    }

    Ok(())
}
