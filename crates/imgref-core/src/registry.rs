//! Lookup of transports by name

use crate::error::{Error, Result};
use crate::transport::{ImageReference, ImageTransport};
use std::collections::BTreeMap;
use tracing::debug;

/// Known transports, keyed by name
#[derive(Default)]
pub struct TransportRegistry {
    transports: BTreeMap<&'static str, &'static dyn ImageTransport>,
}

impl TransportRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transport, replacing any previous one with the same name
    pub fn with(mut self, transport: &'static dyn ImageTransport) -> Self {
        self.register(transport);
        self
    }

    /// Register a transport, replacing any previous one with the same name
    pub fn register(&mut self, transport: &'static dyn ImageTransport) {
        self.transports.insert(transport.name(), transport);
    }

    /// Look up a transport
    pub fn get(&self, name: &str) -> Option<&'static dyn ImageTransport> {
        self.transports.get(name).copied()
    }

    /// Registered transport names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        self.transports.keys().copied().collect()
    }

    /// Parse a transport-qualified image name such as `docker://busybox`
    pub fn parse_image_name(&self, image_name: &str) -> Result<Box<dyn ImageReference>> {
        let (name, reference) = image_name.split_once(':').ok_or_else(|| {
            Error::malformed_reference(image_name, "expected transport:reference")
        })?;

        let transport = self
            .get(name)
            .ok_or_else(|| Error::unknown_transport(name))?;

        debug!("Parsing '{}' with transport '{}'", reference, name);
        transport.parse_reference(reference)
    }
}

impl std::fmt::Debug for TransportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportRegistry")
            .field("transports", &self.names())
            .finish()
    }
}
