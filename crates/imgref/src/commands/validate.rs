//! Validate-scope command

use crate::cli::ValidateScopeArgs;
use crate::output;
use anyhow::{anyhow, Result};
use imgref_core::Error;

pub fn run(args: ValidateScopeArgs) -> Result<()> {
    let transports = super::transports();
    let transport = transports
        .get(&args.transport)
        .ok_or_else(|| Error::unknown_transport(&args.transport))?;

    let mut failures = 0;
    for scope in &args.scopes {
        match transport.validate_policy_configuration_scope(scope) {
            Ok(()) => output::success(scope),
            Err(e) => {
                failures += 1;
                output::error(&e.to_string());
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!(
            "{} of {} scopes are invalid",
            failures,
            args.scopes.len()
        ));
    }
    Ok(())
}
