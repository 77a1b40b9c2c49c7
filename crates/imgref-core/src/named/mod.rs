//! Registry reference grammar
//!
//! Parses strings such as `busybox`, `example.com:5000/ns/foo:bar` or
//! `busybox@sha256:...` into a [`NamedReference`]: a normalized repository
//! name (always carrying a registry host) plus an optional tag and an
//! optional digest. The grammar allows a tag and a digest at the same time;
//! deciding what that means is left to the transports.

mod digest;
mod regexp;

pub use digest::Digest;

use crate::error::{Error, Result};
use std::fmt;

/// Registry host used when a name does not carry one
pub const DEFAULT_DOMAIN: &str = "docker.io";

/// Legacy host rewritten to [`DEFAULT_DOMAIN`]
pub const LEGACY_DEFAULT_DOMAIN: &str = "index.docker.io";

/// Namespace of single-component repositories on [`DEFAULT_DOMAIN`]
pub const OFFICIAL_REPO_PREFIX: &str = "library/";

/// Maximum length of a repository name, registry host included
pub const NAME_TOTAL_LENGTH_MAX: usize = 255;

/// The capabilities transports need from a parsed reference.
///
/// Any value exposing a normalized name and an optional tag and digest can
/// be handed to a transport, whether it came from [`NamedReference::parse`]
/// or from somewhere else entirely (e.g. a registry listing).
pub trait Named: fmt::Debug + Send + Sync {
    /// Fully-qualified repository name, e.g. `docker.io/library/busybox`
    fn name(&self) -> &str;

    /// Tag, if any
    fn tag(&self) -> Option<&str>;

    /// Digest, if any
    fn digest(&self) -> Option<&Digest>;

    /// Whether a non-empty tag is present
    fn has_tag(&self) -> bool {
        self.tag().is_some_and(|t| !t.is_empty())
    }

    /// Whether a digest is present
    fn has_digest(&self) -> bool {
        self.digest().is_some()
    }

    /// Short name as users usually write it, e.g. `busybox` for
    /// `docker.io/library/busybox`
    fn familiar_name(&self) -> String {
        familiarize(self.name())
    }

    /// Familiar string form: familiar name plus `:tag` and/or `@digest`
    fn familiar_string(&self) -> String {
        let mut out = self.familiar_name();
        if let Some(tag) = self.tag() {
            out.push(':');
            out.push_str(tag);
        }
        if let Some(digest) = self.digest() {
            out.push('@');
            out.push_str(&digest.to_string());
        }
        out
    }
}

/// A parsed, normalized registry reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedReference {
    name: String,
    tag: Option<String>,
    digest: Option<Digest>,
}

impl NamedReference {
    /// Parse and normalize a reference string
    pub fn parse(s: &str) -> Result<Self> {
        let Some(caps) = regexp::REFERENCE.captures(s) else {
            let reason = if s.is_empty() {
                "repository name must have at least one component"
            } else if regexp::REFERENCE.is_match(&s.to_lowercase()) {
                "repository name must be lowercase"
            } else {
                "invalid reference format"
            };
            return Err(Error::malformed_reference(s, reason));
        };

        let raw_name = &caps[1];
        if raw_name.len() > NAME_TOTAL_LENGTH_MAX {
            return Err(Error::malformed_reference(
                s,
                format!("repository name must not be more than {NAME_TOTAL_LENGTH_MAX} characters"),
            ));
        }

        let (domain, remainder) = split_docker_domain(raw_name);
        let name = format!("{domain}/{remainder}");
        if regexp::ANCHORED_IDENTIFIER.is_match(&familiarize(&name)) {
            return Err(Error::malformed_reference(
                s,
                "cannot specify 64-byte hexadecimal strings",
            ));
        }

        let digest = caps
            .get(3)
            .map(|m| Digest::parse(m.as_str()))
            .transpose()?;

        Ok(Self {
            name,
            tag: caps.get(2).map(|m| m.as_str().to_string()),
            digest,
        })
    }

    /// Copy any [`Named`] value into an owned reference
    pub fn from_named(named: &dyn Named) -> Self {
        Self {
            name: named.name().to_string(),
            tag: named.tag().filter(|t| !t.is_empty()).map(str::to_string),
            digest: named.digest().cloned(),
        }
    }

    /// Replace the tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Drop the tag, keeping name and digest
    pub fn without_tag(mut self) -> Self {
        self.tag = None;
        self
    }

    /// Drop tag and digest, keeping only the name
    pub fn trim(&self) -> Self {
        Self {
            name: self.name.clone(),
            tag: None,
            digest: None,
        }
    }

    /// Registry host, e.g. `docker.io`
    pub fn domain(&self) -> &str {
        split_domain(&self.name).0
    }

    /// Repository path below the host, e.g. `library/busybox`
    pub fn path(&self) -> &str {
        split_domain(&self.name).1
    }
}

impl Named for NamedReference {
    fn name(&self) -> &str {
        &self.name
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    fn digest(&self) -> Option<&Digest> {
        self.digest.as_ref()
    }
}

impl fmt::Display for NamedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.familiar_string())
    }
}

impl std::str::FromStr for NamedReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Whether `s` is a syntactically valid registry host (optionally with port)
pub fn is_valid_domain(s: &str) -> bool {
    regexp::ANCHORED_DOMAIN.is_match(s)
}

/// Whether `s` is a single valid repository path component
pub fn is_valid_path_component(s: &str) -> bool {
    regexp::ANCHORED_PATH_COMPONENT.is_match(s)
}

/// Whether `s` is a valid tag
pub fn is_valid_tag(s: &str) -> bool {
    regexp::ANCHORED_TAG.is_match(s)
}

/// Split a user-supplied name into registry host and remainder, applying
/// the docker.io defaults.
fn split_docker_domain(name: &str) -> (String, String) {
    let (mut domain, mut remainder) = match name.split_once('/') {
        Some((first, rest)) if looks_like_domain(name) => (first.to_string(), rest.to_string()),
        _ => (DEFAULT_DOMAIN.to_string(), name.to_string()),
    };

    if domain == LEGACY_DEFAULT_DOMAIN {
        domain = DEFAULT_DOMAIN.to_string();
    }
    if domain == DEFAULT_DOMAIN && !remainder.contains('/') {
        remainder = format!("{OFFICIAL_REPO_PREFIX}{remainder}");
    }
    (domain, remainder)
}

/// Split a normalized name at the first `/`
fn split_domain(name: &str) -> (&str, &str) {
    name.split_once('/').unwrap_or(("", name))
}

fn familiarize(name: &str) -> String {
    let (domain, remainder) = split_domain(name);
    if domain != DEFAULT_DOMAIN {
        return name.to_string();
    }
    match remainder.strip_prefix(OFFICIAL_REPO_PREFIX) {
        Some(short) if !short.contains('/') => short.to_string(),
        // The host must stay when the next component would be read as one.
        _ if looks_like_domain(remainder) => name.to_string(),
        _ => remainder.to_string(),
    }
}

/// Whether the first component of a multi-component name would be taken
/// as a registry host by [`split_docker_domain`]
fn looks_like_domain(name: &str) -> bool {
    match name.split_once('/') {
        Some((first, _)) => {
            first.contains(['.', ':']) || first == "localhost" || first.to_lowercase() != first
        }
        None => false,
    }
}
