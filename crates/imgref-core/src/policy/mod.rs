//! Signature policy configuration and scope lookup
//!
//! A policy maps transports to scopes, and scopes to lists of requirements.
//! Lookup probes a reference's scopes from most to least specific and stops
//! at the first configured one.

mod requirement;

pub use requirement::PolicyRequirement;

use crate::error::{Error, Result};
use crate::registry::TransportRegistry;
use crate::transport::ImageReference;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use tracing::{debug, trace, warn};

/// Requirements keyed by scope; the empty scope is the transport default
pub type PolicyTransportScopes = BTreeMap<String, Vec<PolicyRequirement>>;

/// Complete signature policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Requirements for images no transport scope matches
    #[serde(default)]
    pub default: Vec<PolicyRequirement>,

    /// Per-transport scopes
    #[serde(default)]
    pub transports: BTreeMap<String, PolicyTransportScopes>,
}

/// Which scope of a policy matched an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedScope {
    /// The full identity, tag or digest included
    Identity(String),
    /// A repository, namespace or registry scope
    Namespace(String),
    /// The transport's `""` scope
    TransportDefault,
    /// The policy-wide default
    Default,
}

impl fmt::Display for MatchedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchedScope::Identity(scope) | MatchedScope::Namespace(scope) => f.write_str(scope),
            MatchedScope::TransportDefault => f.write_str("<transport default>"),
            MatchedScope::Default => f.write_str("<default>"),
        }
    }
}

/// Result of a policy lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyMatch<'a> {
    pub scope: MatchedScope,
    pub requirements: &'a [PolicyRequirement],
}

impl PolicyConfig {
    /// Load a policy from a file; `.json` files are parsed as JSON, anything
    /// else as YAML
    pub fn from_file(path: &Utf8Path) -> Result<Self> {
        debug!("Loading signature policy from {}", path);
        let content = fs::read_to_string(path)?;
        if path.extension() == Some("json") {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Parse a YAML policy
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Parse a JSON policy
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Check the policy against the known transports
    pub fn validate(&self, registry: &TransportRegistry) -> Result<()> {
        if self.default.is_empty() {
            return Err(Error::invalid_config("Default policy is missing"));
        }

        for (transport_name, scopes) in &self.transports {
            let transport = registry.get(transport_name);
            if transport.is_none() {
                warn!(
                    "Skipping scope validation for unknown transport '{}'",
                    transport_name
                );
            }

            for (scope, requirements) in scopes {
                if requirements.is_empty() {
                    return Err(Error::invalid_config(format!(
                        "No policy requirements for {} scope '{}'",
                        transport_name, scope
                    )));
                }
                if let (Some(transport), false) = (transport, scope.is_empty()) {
                    transport.validate_policy_configuration_scope(scope)?;
                }
            }
        }

        Ok(())
    }

    /// Find the requirements that apply to `reference`, most specific scope
    /// first
    pub fn requirements_for(&self, reference: &dyn ImageReference) -> Result<PolicyMatch<'_>> {
        let transport_name = reference.transport().name();

        if let Some(scopes) = self.transports.get(transport_name) {
            let identity = reference.policy_configuration_identity()?;
            trace!("Probing identity scope '{}'", identity);
            if let Some(requirements) = scopes.get(&identity) {
                return Ok(PolicyMatch {
                    scope: MatchedScope::Identity(identity),
                    requirements,
                });
            }

            for namespace in reference.policy_configuration_namespaces() {
                trace!("Probing namespace scope '{}'", namespace);
                if let Some(requirements) = scopes.get(&namespace) {
                    return Ok(PolicyMatch {
                        scope: MatchedScope::Namespace(namespace),
                        requirements,
                    });
                }
            }

            if let Some(requirements) = scopes.get("") {
                return Ok(PolicyMatch {
                    scope: MatchedScope::TransportDefault,
                    requirements,
                });
            }
        }

        Ok(PolicyMatch {
            scope: MatchedScope::Default,
            requirements: &self.default,
        })
    }
}
