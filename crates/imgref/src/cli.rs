//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// imgref - canonical container image references and policy scopes
#[derive(Parser, Debug)]
#[command(name = "imgref")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a system context file (context.yaml)
    #[arg(long, global = true, env = "IMGREF_CONTEXT")]
    pub context: Option<Utf8PathBuf>,

    /// Path to a signature policy file (policy.yaml or policy.json)
    #[arg(long, global = true)]
    pub policy: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Parse an image name into its canonical reference
    Parse(ParseArgs),

    /// List the policy scopes of an image, most specific first
    Scopes(ScopesArgs),

    /// Validate policy configuration scopes for a transport
    ValidateScope(ValidateScopeArgs),

    /// Signature policy inspection
    #[command(subcommand)]
    Policy(PolicyCommands),
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Transport-qualified image name (e.g. docker://busybox)
    pub image: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ScopesArgs {
    /// Transport-qualified image name (e.g. docker://busybox)
    pub image: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ValidateScopeArgs {
    /// Transport name (e.g. docker)
    pub transport: String,

    /// Scopes to validate
    #[arg(required = true)]
    pub scopes: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum PolicyCommands {
    /// Validate the signature policy
    Validate,

    /// Show which policy scope and requirements apply to an image
    Check(PolicyCheckArgs),
}

#[derive(Args, Debug)]
pub struct PolicyCheckArgs {
    /// Transport-qualified image name (e.g. docker://busybox)
    pub image: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate_scope_args() {
        let cli = Cli::try_parse_from([
            "imgref",
            "validate-scope",
            "docker",
            "docker.io",
            "docker.io/library",
        ])
        .unwrap();
        match cli.command {
            Commands::ValidateScope(args) => {
                assert_eq!(args.transport, "docker");
                assert_eq!(args.scopes, vec!["docker.io", "docker.io/library"]);
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "imgref",
            "-vv",
            "policy",
            "check",
            "docker://busybox",
            "--policy",
            "/tmp/policy.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.policy, Some(Utf8PathBuf::from("/tmp/policy.yaml")));
    }
}
