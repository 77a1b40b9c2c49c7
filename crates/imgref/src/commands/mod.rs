//! Command implementations

pub mod parse;
pub mod policy;
pub mod scopes;
pub mod validate;
pub mod version;

use imgref_core::TransportRegistry;

/// Registry of every transport this binary understands
pub fn transports() -> TransportRegistry {
    TransportRegistry::new().with(&imgref_docker::TRANSPORT)
}
