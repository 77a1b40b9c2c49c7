//! Hierarchical configuration loader with precedence
//!
//! Loads the system context from multiple sources with the following
//! precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (`<config dir>/imgref/context.yaml`)
//! 3. Environment variables (IMGREF_* prefix)
//! 4. CLI flags (handled by caller)
//!
//! The signature policy is resolved the same way: an explicit path, then the
//! context's `signature-policy-path`, then `policy.yaml`/`policy.json` in the
//! config directory, then the embedded default policy.

use super::SystemContext;
use crate::error::{Error, Result};
use crate::policy::PolicyConfig;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const CONTEXT_FILE: &str = "context.yaml";
const POLICY_FILES: &[&str] = &["policy.yaml", "policy.json"];

/// Configuration hierarchy loader
#[derive(Debug, Clone)]
pub struct ContextLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl ContextLoader {
    /// Create a loader rooted at the standard config directory
    pub fn new() -> Result<Self> {
        let config_dir = Self::default_config_dir()?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// The directory this loader reads from
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Get the standard config directory (`<config dir>/imgref`)
    fn default_config_dir() -> Result<Utf8PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::invalid_config("Could not determine config directory"))?;
        let base = Utf8PathBuf::from_path_buf(base)
            .map_err(|p| Error::invalid_config(format!("Non UTF-8 config directory: {}", p.display())))?;
        Ok(base.join("imgref"))
    }

    /// Load the system context with hierarchical precedence
    pub fn load_context(&self) -> Result<SystemContext> {
        let mut ctx = Self::load_embedded::<SystemContext>("context-defaults.yaml")?;

        let user_path = self.config_dir.join(CONTEXT_FILE);
        if user_path.exists() {
            debug!("Loading system context from {}", user_path);
            ctx = ctx.merge(load_yaml_file(&user_path)?);
        }

        Self::apply_env_overrides(ctx)
    }

    /// Load the system context, layering an explicit file over the defaults
    pub fn load_context_from(&self, path: &Utf8Path) -> Result<SystemContext> {
        if !path.exists() {
            return Err(Error::config_not_found(path.as_str()));
        }
        let ctx = Self::load_embedded::<SystemContext>("context-defaults.yaml")?
            .merge(load_yaml_file(path)?);
        Self::apply_env_overrides(ctx)
    }

    /// Load the signature policy
    pub fn load_policy(
        &self,
        explicit: Option<&Utf8Path>,
        ctx: &SystemContext,
    ) -> Result<PolicyConfig> {
        if let Some(path) = explicit.or(ctx.signature_policy_path.as_deref()) {
            if !path.exists() {
                return Err(Error::config_not_found(path.as_str()));
            }
            return PolicyConfig::from_file(path);
        }

        for name in POLICY_FILES {
            let path = self.config_dir.join(name);
            if path.exists() {
                return PolicyConfig::from_file(&path);
            }
        }

        debug!("No policy file found, using embedded default policy");
        Self::load_embedded::<PolicyConfig>("default-policy.yaml")
    }

    /// Load an embedded configuration file
    fn load_embedded<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut ctx: SystemContext) -> Result<SystemContext> {
        if let Ok(val) = env::var("IMGREF_REGISTRIES_DIR") {
            ctx.registries_dir_path = Some(Utf8PathBuf::from(val));
        }

        if let Ok(val) = env::var("IMGREF_CERT_DIR") {
            ctx.docker_cert_path = Some(Utf8PathBuf::from(val));
        }

        if let Ok(val) = env::var("IMGREF_AUTH_FILE") {
            ctx.docker_auth_file = Some(Utf8PathBuf::from(val));
        }

        if let Ok(val) = env::var("IMGREF_INSECURE_SKIP_TLS_VERIFY") {
            ctx.docker_insecure_skip_tls_verify = Some(val.parse().map_err(|_| {
                Error::invalid_config("IMGREF_INSECURE_SKIP_TLS_VERIFY must be true or false")
            })?);
        }

        if let Ok(val) = env::var("IMGREF_USER_AGENT") {
            ctx.user_agent = Some(val);
        }

        if let Ok(val) = env::var("IMGREF_POLICY_PATH") {
            ctx.signature_policy_path = Some(Utf8PathBuf::from(val));
        }

        Ok(ctx)
    }
}

/// Load a YAML file and parse it
fn load_yaml_file<T: DeserializeOwned>(path: &Utf8Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    serde_yaml_ng::from_str(&content)
        .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyRequirement;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_VARS: &[&str] = &[
        "IMGREF_REGISTRIES_DIR",
        "IMGREF_CERT_DIR",
        "IMGREF_AUTH_FILE",
        "IMGREF_INSECURE_SKIP_TLS_VERIFY",
        "IMGREF_USER_AGENT",
        "IMGREF_POLICY_PATH",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    fn create_temp_loader() -> (ContextLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        let loader = ContextLoader::with_dir(config_dir);
        (loader, temp_dir)
    }

    #[test]
    #[serial]
    fn test_load_context_defaults() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        let ctx = loader.load_context().unwrap();
        assert_eq!(ctx.docker_insecure_skip_tls_verify, Some(false));
        assert!(ctx.user_agent.as_deref().unwrap().starts_with("imgref/"));
    }

    #[test]
    #[serial]
    fn test_load_context_from_user_file() {
        clear_env();
        let (loader, _temp) = create_temp_loader();

        let config_content = r#"
docker-cert-path: /etc/imgref/certs.d
user-agent: custom-agent
"#;
        fs::write(loader.config_dir().join(CONTEXT_FILE), config_content).unwrap();

        let ctx = loader.load_context().unwrap();
        assert_eq!(
            ctx.docker_cert_path,
            Some(Utf8PathBuf::from("/etc/imgref/certs.d"))
        );
        assert_eq!(ctx.user_agent.as_deref(), Some("custom-agent"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_win() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(
            loader.config_dir().join(CONTEXT_FILE),
            "user-agent: from-file\n",
        )
        .unwrap();

        env::set_var("IMGREF_USER_AGENT", "from-env");
        env::set_var("IMGREF_INSECURE_SKIP_TLS_VERIFY", "true");
        let ctx = loader.load_context().unwrap();
        clear_env();

        assert_eq!(ctx.user_agent.as_deref(), Some("from-env"));
        assert_eq!(ctx.docker_insecure_skip_tls_verify, Some(true));
    }

    #[test]
    #[serial]
    fn test_env_can_disable_tls_skip_from_file() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(
            loader.config_dir().join(CONTEXT_FILE),
            "docker-insecure-skip-tls-verify: true\n",
        )
        .unwrap();

        assert_eq!(
            loader.load_context().unwrap().docker_insecure_skip_tls_verify,
            Some(true)
        );

        env::set_var("IMGREF_INSECURE_SKIP_TLS_VERIFY", "false");
        let ctx = loader.load_context().unwrap();
        clear_env();

        assert_eq!(ctx.docker_insecure_skip_tls_verify, Some(false));
    }

    #[test]
    #[serial]
    fn test_invalid_bool_override() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        env::set_var("IMGREF_INSECURE_SKIP_TLS_VERIFY", "sometimes");
        let result = loader.load_context();
        clear_env();

        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    #[serial]
    fn test_load_context_from_missing_file() {
        clear_env();
        let (loader, temp) = create_temp_loader();
        let missing = Utf8PathBuf::from_path_buf(temp.path().join("nope.yaml")).unwrap();
        assert!(matches!(
            loader.load_context_from(&missing),
            Err(Error::ConfigNotFound { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_load_policy_embedded_default() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        let policy = loader
            .load_policy(None, &SystemContext::default())
            .unwrap();
        assert_eq!(policy.default, vec![PolicyRequirement::InsecureAcceptAnything]);
        assert!(policy.transports.is_empty());
    }

    #[test]
    #[serial]
    fn test_load_policy_from_config_dir() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(
            loader.config_dir().join("policy.yaml"),
            "default:\n  - type: reject\n",
        )
        .unwrap();

        let policy = loader
            .load_policy(None, &SystemContext::default())
            .unwrap();
        assert_eq!(policy.default, vec![PolicyRequirement::Reject]);
    }

    #[test]
    #[serial]
    fn test_load_policy_explicit_missing() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        let result = loader.load_policy(
            Some(Utf8Path::new("/this/doesnt/exist/policy.json")),
            &SystemContext::default(),
        );
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }
}
