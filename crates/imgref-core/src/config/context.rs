//! System context passed through the image handle factories

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Settings that influence how image handles reach a registry.
///
/// Transports treat this as opaque configuration; creating a handle never
/// performs I/O on these paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SystemContext {
    /// Directory with per-registry configuration
    #[serde(default)]
    pub registries_dir_path: Option<Utf8PathBuf>,

    /// Directory with per-registry client certificates (`<dir>/<host>/`)
    #[serde(default)]
    pub docker_cert_path: Option<Utf8PathBuf>,

    /// Registry credentials file
    #[serde(default)]
    pub docker_auth_file: Option<Utf8PathBuf>,

    /// Skip TLS verification when talking to registries; unset means verify
    #[serde(default)]
    pub docker_insecure_skip_tls_verify: Option<bool>,

    /// User agent sent to registries
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Signature policy file
    #[serde(default)]
    pub signature_policy_path: Option<Utf8PathBuf>,
}

impl SystemContext {
    /// Certificate directory for a registry host, if a base directory is set
    pub fn cert_dir_for(&self, host: &str) -> Option<Utf8PathBuf> {
        self.docker_cert_path.as_deref().map(|dir| dir.join(host))
    }

    /// Override the registries directory
    pub fn with_registries_dir(mut self, dir: impl AsRef<Utf8Path>) -> Self {
        self.registries_dir_path = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Override the signature policy path
    pub fn with_policy_path(mut self, path: impl AsRef<Utf8Path>) -> Self {
        self.signature_policy_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overlay `other` onto `self`: set fields in `other` win
    pub fn merge(self, other: SystemContext) -> SystemContext {
        SystemContext {
            registries_dir_path: other.registries_dir_path.or(self.registries_dir_path),
            docker_cert_path: other.docker_cert_path.or(self.docker_cert_path),
            docker_auth_file: other.docker_auth_file.or(self.docker_auth_file),
            docker_insecure_skip_tls_verify: other
                .docker_insecure_skip_tls_verify
                .or(self.docker_insecure_skip_tls_verify),
            user_agent: other.user_agent.or(self.user_agent),
            signature_policy_path: other.signature_policy_path.or(self.signature_policy_path),
        }
    }
}
