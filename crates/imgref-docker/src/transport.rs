//! The `docker` transport

use crate::reference::parse_reference;
use imgref_core::named::{self, Digest, NAME_TOTAL_LENGTH_MAX};
use imgref_core::transport::{ImageReference, ImageTransport};
use imgref_core::{Error, Result};

/// Name of the docker registry transport
pub const TRANSPORT_NAME: &str = "docker";

/// Stateless handle for the docker registry transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DockerTransport;

/// The process-wide docker transport
pub static TRANSPORT: DockerTransport = DockerTransport;

impl ImageTransport for DockerTransport {
    fn name(&self) -> &'static str {
        TRANSPORT_NAME
    }

    fn parse_reference(&self, reference: &str) -> Result<Box<dyn ImageReference>> {
        parse_reference(reference)
    }

    /// Accepts `host`, `host/ns...`, `host/ns/repo`, `host/ns/repo:tag`
    /// and `host/ns/repo@digest`.
    fn validate_policy_configuration_scope(&self, scope: &str) -> Result<()> {
        if scope.is_empty() {
            return Err(Error::invalid_scope(scope, "scope must not be empty"));
        }

        let name = match scope.split_once('@') {
            Some((name, digest)) => {
                Digest::parse(digest).map_err(|e| match e {
                    Error::MalformedReference { reason, .. } => Error::invalid_scope(scope, reason),
                    other => other,
                })?;
                name
            }
            None => match scope.rsplit_once('/') {
                Some((parent, last)) => match last.split_once(':') {
                    Some((repo, tag)) => {
                        if !named::is_valid_tag(tag) {
                            return Err(Error::invalid_scope(scope, format!("invalid tag '{tag}'")));
                        }
                        // Slice off ":tag" from the scope itself.
                        &scope[..parent.len() + 1 + repo.len()]
                    }
                    None => scope,
                },
                // A bare registry host; a ':' here is a port.
                None => scope,
            },
        };

        validate_scope_name(scope, name)
    }
}

/// Check a scope's name part: a registry host followed by zero or more
/// lowercase path components.
fn validate_scope_name(scope: &str, name: &str) -> Result<()> {
    if name.len() > NAME_TOTAL_LENGTH_MAX {
        return Err(Error::invalid_scope(
            scope,
            format!("repository name must not be more than {NAME_TOTAL_LENGTH_MAX} characters"),
        ));
    }

    let mut components = name.split('/');
    let host = components.next().unwrap_or_default();
    if !named::is_valid_domain(host) {
        return Err(Error::invalid_scope(scope, format!("invalid registry host '{host}'")));
    }

    for component in components {
        if named::is_valid_path_component(component) {
            continue;
        }
        let reason = if named::is_valid_path_component(&component.to_lowercase()) {
            "repository name must be lowercase".to_string()
        } else {
            format!("invalid repository path component '{component}'")
        };
        return Err(Error::invalid_scope(scope, reason));
    }

    Ok(())
}
