//! Docker registry transport for imgref
//!
//! This crate provides:
//! - Canonical docker references with exactly one of a tag or a digest
//! - Parsing of `//`-prefixed reference strings with registry defaults
//! - Policy identity and namespace scopes, most specific first
//! - Validation of policy configuration scopes
//! - Image, image source and image destination handles
//!
//! # Example
//!
//! ```
//! use imgref_core::ImageReference;
//! use imgref_docker::DockerReference;
//!
//! let reference = DockerReference::parse("//busybox").unwrap();
//! assert_eq!(reference.docker_reference_string(), "busybox:latest");
//! assert_eq!(
//!     reference.policy_configuration_identity().unwrap(),
//!     "docker.io/library/busybox:latest"
//! );
//! assert_eq!(
//!     reference.policy_configuration_namespaces(),
//!     vec!["docker.io/library/busybox", "docker.io/library", "docker.io"]
//! );
//! ```

pub mod client;
pub mod policy_scope;
pub mod reference;
pub mod transport;

pub use client::{DockerImage, DockerImageDestination, DockerImageSource, RegistryEndpoint};
pub use policy_scope::{docker_reference_identity, docker_reference_namespaces};
pub use reference::{new_reference, parse_reference, DockerReference, DEFAULT_TAG, REFERENCE_PREFIX};
pub use transport::{DockerTransport, TRANSPORT, TRANSPORT_NAME};

/// Version of the imgref-docker crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
