//! Canonical docker references
//!
//! A [`DockerReference`] wraps a registry reference that carries exactly one
//! of a tag or a digest. There are two ways to build one, with deliberately
//! different strictness:
//!
//! - [`DockerReference::parse`] takes a `//`-prefixed string and resolves the
//!   grammar's loose ends itself: a digest wins over a tag (the tag is
//!   dropped), and a reference with neither gets the `latest` tag.
//! - [`DockerReference::new`] takes an already parsed reference and rejects
//!   both of those cases instead of guessing.

use crate::client::{DockerImage, DockerImageDestination, DockerImageSource};
use crate::policy_scope::{docker_reference_identity, docker_reference_namespaces};
use crate::transport::TRANSPORT;
use imgref_core::named::{Named, NamedReference};
use imgref_core::transport::{Image, ImageDestination, ImageReference, ImageSource, ImageTransport};
use imgref_core::{Error, Result, SystemContext};
use std::fmt;
use tracing::debug;

/// Marker every docker reference string starts with
pub const REFERENCE_PREFIX: &str = "//";

/// Tag used when a reference string names neither a tag nor a digest
pub const DEFAULT_TAG: &str = "latest";

/// A registry reference with exactly one of a tag or a digest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DockerReference {
    named: NamedReference,
}

impl DockerReference {
    /// Parse a `//`-prefixed reference string, e.g. `//busybox:latest`
    pub fn parse(reference: &str) -> Result<Self> {
        let rest = reference.strip_prefix(REFERENCE_PREFIX).ok_or_else(|| {
            Error::malformed_reference(
                reference,
                format!("docker reference must start with '{REFERENCE_PREFIX}'"),
            )
        })?;

        let named = NamedReference::parse(rest).map_err(|e| match e {
            Error::MalformedReference { reason, .. } => Error::malformed_reference(reference, reason),
            other => other,
        })?;

        // Digest is authoritative; a tag next to it is dropped, not rejected.
        let named = if named.has_digest() {
            if named.has_tag() {
                debug!("Dropping tag from '{}', digest takes precedence", rest);
            }
            named.without_tag()
        } else if named.has_tag() {
            named
        } else {
            debug!("No tag or digest in '{}', defaulting to '{}'", rest, DEFAULT_TAG);
            named.with_tag(DEFAULT_TAG)
        };

        Self::new(&named)
    }

    /// Wrap an already parsed reference.
    ///
    /// Fails with `AmbiguousReference` unless exactly one of a tag or a
    /// digest is present; no defaults are applied.
    pub fn new(named: &dyn Named) -> Result<Self> {
        match (named.has_tag(), named.has_digest()) {
            (true, true) => Err(Error::ambiguous_reference(
                named.familiar_string(),
                "references with both a tag and digest are not supported",
            )),
            (false, false) => Err(Error::ambiguous_reference(
                named.familiar_string(),
                "reference has neither a tag nor a digest",
            )),
            _ => Ok(Self {
                named: NamedReference::from_named(named),
            }),
        }
    }

    /// Wrap a reference without checking the tag/digest invariant
    #[cfg(test)]
    pub(crate) fn from_named_unchecked(named: NamedReference) -> Self {
        Self { named }
    }

    /// The wrapped registry reference
    pub fn named(&self) -> &NamedReference {
        &self.named
    }

    /// Familiar string form without the transport prefix, e.g. `busybox:latest`
    pub fn docker_reference_string(&self) -> String {
        self.named.familiar_string()
    }

    /// The tag, or the digest rendered as `algorithm:hex`
    pub fn tag_or_digest(&self) -> Result<String> {
        if let Some(digest) = self.named.digest() {
            return Ok(digest.to_string());
        }
        if let Some(tag) = self.named.tag().filter(|t| !t.is_empty()) {
            return Ok(tag.to_string());
        }
        Err(Error::invalid_reference_state(self.named.familiar_string()))
    }
}

impl fmt::Display for DockerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", REFERENCE_PREFIX, self.named)
    }
}

impl std::str::FromStr for DockerReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl ImageReference for DockerReference {
    fn transport(&self) -> &'static dyn ImageTransport {
        &TRANSPORT
    }

    fn string_within_transport(&self) -> String {
        self.to_string()
    }

    fn docker_reference(&self) -> Option<&NamedReference> {
        Some(&self.named)
    }

    fn tag_or_digest(&self) -> Result<String> {
        DockerReference::tag_or_digest(self)
    }

    fn policy_configuration_identity(&self) -> Result<String> {
        docker_reference_identity(&self.named)
    }

    fn policy_configuration_namespaces(&self) -> Vec<String> {
        docker_reference_namespaces(&self.named)
    }

    fn new_image(&self, ctx: &SystemContext) -> Result<Box<dyn Image>> {
        Ok(Box::new(DockerImage::open(self.clone(), ctx)?))
    }

    fn new_image_source(&self, ctx: &SystemContext) -> Result<Box<dyn ImageSource>> {
        Ok(Box::new(DockerImageSource::open(self.clone(), ctx)?))
    }

    fn new_image_destination(&self, ctx: &SystemContext) -> Result<Box<dyn ImageDestination>> {
        Ok(Box::new(DockerImageDestination::open(self.clone(), ctx)?))
    }
}

/// Parse a `//`-prefixed docker reference string
pub fn parse_reference(reference: &str) -> Result<Box<dyn ImageReference>> {
    Ok(Box::new(DockerReference::parse(reference)?))
}

/// Wrap an already parsed registry reference
pub fn new_reference(named: &dyn Named) -> Result<Box<dyn ImageReference>> {
    Ok(Box::new(DockerReference::new(named)?))
}
