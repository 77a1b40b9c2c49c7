//! A minimal transport for exercising the policy and registry code

use crate::config::SystemContext;
use crate::error::{Error, Result};
use crate::named::NamedReference;
use crate::transport::{Image, ImageDestination, ImageReference, ImageSource, ImageTransport};

pub struct FakeTransport;

pub static FAKE_TRANSPORT: FakeTransport = FakeTransport;

impl FakeTransport {
    pub fn reference(name: &str) -> Box<dyn ImageReference> {
        Box::new(FakeReference {
            name: name.to_string(),
        })
    }
}

impl ImageTransport for FakeTransport {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn parse_reference(&self, reference: &str) -> Result<Box<dyn ImageReference>> {
        if reference.is_empty() {
            return Err(Error::malformed_reference(reference, "empty"));
        }
        Ok(Self::reference(reference))
    }

    fn validate_policy_configuration_scope(&self, scope: &str) -> Result<()> {
        if scope.to_lowercase() != scope {
            return Err(Error::invalid_scope(scope, "uppercase"));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct FakeReference {
    name: String,
}

impl ImageReference for FakeReference {
    fn transport(&self) -> &'static dyn ImageTransport {
        &FAKE_TRANSPORT
    }

    fn string_within_transport(&self) -> String {
        self.name.clone()
    }

    fn docker_reference(&self) -> Option<&NamedReference> {
        None
    }

    fn tag_or_digest(&self) -> Result<String> {
        Ok("latest".to_string())
    }

    fn policy_configuration_identity(&self) -> Result<String> {
        Ok(format!("{}:latest", self.name))
    }

    fn policy_configuration_namespaces(&self) -> Vec<String> {
        let mut name = self.name.as_str();
        let mut out = vec![name.to_string()];
        while let Some((parent, _)) = name.rsplit_once('/') {
            out.push(parent.to_string());
            name = parent;
        }
        out
    }

    fn new_image(&self, _ctx: &SystemContext) -> Result<Box<dyn Image>> {
        Err(Error::invalid_config("fake transport has no images"))
    }

    fn new_image_source(&self, _ctx: &SystemContext) -> Result<Box<dyn ImageSource>> {
        Err(Error::invalid_config("fake transport has no images"))
    }

    fn new_image_destination(&self, _ctx: &SystemContext) -> Result<Box<dyn ImageDestination>> {
        Err(Error::invalid_config("fake transport has no images"))
    }
}
