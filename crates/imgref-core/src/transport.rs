//! Transport, reference and image handle traits
//!
//! A transport names a way of reaching images (e.g. `docker`). It parses
//! its own reference strings into [`ImageReference`] values, which in turn
//! expose the identity and namespace scopes the policy engine probes, and
//! act as factories for image, image source and image destination handles.

use crate::config::SystemContext;
use crate::error::Result;
use crate::named::NamedReference;

/// A way of reaching images, e.g. a container registry
pub trait ImageTransport: Send + Sync {
    /// Transport name, e.g. `docker`
    fn name(&self) -> &'static str;

    /// Parse a reference string in this transport's syntax
    fn parse_reference(&self, reference: &str) -> Result<Box<dyn ImageReference>>;

    /// Check that a scope may appear in a policy configuration for this
    /// transport. Returns an `InvalidScope` error if it cannot match any
    /// reference.
    fn validate_policy_configuration_scope(&self, scope: &str) -> Result<()>;
}

/// A reference to an image within a specific transport
pub trait ImageReference: std::fmt::Debug + Send + Sync {
    /// The transport this reference belongs to
    fn transport(&self) -> &'static dyn ImageTransport;

    /// Reference string in the transport's own syntax; parsing it again with
    /// [`ImageTransport::parse_reference`] yields an equal reference
    fn string_within_transport(&self) -> String;

    /// The underlying registry reference, if the transport has one
    fn docker_reference(&self) -> Option<&NamedReference>;

    /// The tag, or the digest as `algorithm:hex`
    fn tag_or_digest(&self) -> Result<String>;

    /// Most specific policy scope, including the tag or digest
    fn policy_configuration_identity(&self) -> Result<String>;

    /// Progressively broader policy scopes, most specific first
    fn policy_configuration_namespaces(&self) -> Vec<String>;

    /// Create an image handle
    fn new_image(&self, ctx: &SystemContext) -> Result<Box<dyn Image>>;

    /// Create a handle for reading the image
    fn new_image_source(&self, ctx: &SystemContext) -> Result<Box<dyn ImageSource>>;

    /// Create a handle for writing the image
    fn new_image_destination(&self, ctx: &SystemContext) -> Result<Box<dyn ImageDestination>>;
}

/// A resolved image
pub trait Image: Send {
    /// Reference the handle was created from
    fn reference(&self) -> &dyn ImageReference;

    /// Release resources held by the handle
    fn close(self: Box<Self>) -> Result<()>;
}

/// Read side of an image
pub trait ImageSource: Send {
    /// Reference the handle was created from
    fn reference(&self) -> &dyn ImageReference;

    /// Release resources held by the handle
    fn close(self: Box<Self>) -> Result<()>;
}

/// Write side of an image
pub trait ImageDestination: Send {
    /// Reference the handle was created from
    fn reference(&self) -> &dyn ImageReference;

    /// Release resources held by the handle
    fn close(self: Box<Self>) -> Result<()>;
}

/// `transport:reference` form of an image name, e.g. `docker://busybox:latest`
pub fn image_name(reference: &dyn ImageReference) -> String {
    format!(
        "{}:{}",
        reference.transport().name(),
        reference.string_within_transport()
    )
}
