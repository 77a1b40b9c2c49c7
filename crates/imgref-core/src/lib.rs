//! # imgref-core
//!
//! Core library for imgref providing:
//! - The registry reference grammar ([`named`])
//! - Transport, reference and image handle traits
//! - System context loading (embedded defaults, user file, `IMGREF_*` overrides)
//! - Signature policy configuration and most-specific-first scope lookup

pub mod config;
pub mod error;
pub mod named;
pub mod policy;
pub mod registry;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use config::{ContextLoader, SystemContext};
pub use error::{Error, Result};
pub use named::{Digest, Named, NamedReference};
pub use policy::{MatchedScope, PolicyConfig, PolicyMatch, PolicyRequirement};
pub use registry::TransportRegistry;
pub use transport::{image_name, Image, ImageDestination, ImageReference, ImageSource, ImageTransport};
