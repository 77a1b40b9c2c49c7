//! Image, image source and image destination handles for registries
//!
//! Handles are created from a [`DockerReference`] and a [`SystemContext`].
//! Creating one only resolves where and how the registry would be reached;
//! no connection is made until a caller actually transfers data, which is
//! outside this crate.

use crate::reference::DockerReference;
use camino::Utf8PathBuf;
use imgref_core::named::DEFAULT_DOMAIN;
use imgref_core::transport::{Image, ImageDestination, ImageReference, ImageSource};
use imgref_core::{Result, SystemContext};
use tracing::debug;

/// API host serving the default registry
pub const DOCKER_HUB_API_HOST: &str = "registry-1.docker.io";

/// Where and how a registry is reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEndpoint {
    /// Registry host as it appears in references
    pub host: String,
    /// Host actually serving the registry API
    pub api_host: String,
    /// Skip TLS verification
    pub insecure_skip_tls_verify: bool,
    /// Per-registry configuration directory
    pub registries_dir: Option<Utf8PathBuf>,
    /// Client certificate directory for this host
    pub cert_dir: Option<Utf8PathBuf>,
    /// Credentials file
    pub auth_file: Option<Utf8PathBuf>,
    /// User agent for registry requests
    pub user_agent: String,
}

impl RegistryEndpoint {
    /// Resolve the endpoint for `reference` under `ctx`
    pub fn resolve(reference: &DockerReference, ctx: &SystemContext) -> Self {
        let host = reference.named().domain().to_string();
        let api_host = if host == DEFAULT_DOMAIN {
            DOCKER_HUB_API_HOST.to_string()
        } else {
            host.clone()
        };

        Self {
            registries_dir: ctx.registries_dir_path.clone(),
            cert_dir: ctx.cert_dir_for(&host),
            auth_file: ctx.docker_auth_file.clone(),
            insecure_skip_tls_verify: ctx.docker_insecure_skip_tls_verify.unwrap_or(false),
            user_agent: ctx
                .user_agent
                .clone()
                .unwrap_or_else(|| format!("imgref/{}", env!("CARGO_PKG_VERSION"))),
            host,
            api_host,
        }
    }

    /// Base URL of the registry v2 API
    pub fn base_url(&self) -> String {
        format!("https://{}/v2/", self.api_host)
    }
}

/// State shared by all handle kinds
#[derive(Debug)]
struct RegistryConnection {
    reference: DockerReference,
    endpoint: RegistryEndpoint,
}

impl RegistryConnection {
    fn open(reference: DockerReference, ctx: &SystemContext, kind: &str) -> Result<Self> {
        let endpoint = RegistryEndpoint::resolve(&reference, ctx);
        debug!(
            "Opening {} for {} via {}",
            kind,
            reference,
            endpoint.base_url()
        );
        Ok(Self {
            reference,
            endpoint,
        })
    }

    fn close(self, kind: &str) -> Result<()> {
        debug!("Closing {} for {}", kind, self.reference);
        Ok(())
    }
}

/// A registry image
#[derive(Debug)]
pub struct DockerImage {
    conn: RegistryConnection,
}

impl DockerImage {
    /// Create the handle
    pub fn open(reference: DockerReference, ctx: &SystemContext) -> Result<Self> {
        Ok(Self {
            conn: RegistryConnection::open(reference, ctx, "image")?,
        })
    }

    /// Registry endpoint the image is served from
    pub fn endpoint(&self) -> &RegistryEndpoint {
        &self.conn.endpoint
    }
}

impl Image for DockerImage {
    fn reference(&self) -> &dyn ImageReference {
        &self.conn.reference
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.conn.close("image")
    }
}

/// Read side of a registry image
#[derive(Debug)]
pub struct DockerImageSource {
    conn: RegistryConnection,
}

impl DockerImageSource {
    /// Create the handle
    pub fn open(reference: DockerReference, ctx: &SystemContext) -> Result<Self> {
        Ok(Self {
            conn: RegistryConnection::open(reference, ctx, "image source")?,
        })
    }

    /// Registry endpoint the image is read from
    pub fn endpoint(&self) -> &RegistryEndpoint {
        &self.conn.endpoint
    }
}

impl ImageSource for DockerImageSource {
    fn reference(&self) -> &dyn ImageReference {
        &self.conn.reference
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.conn.close("image source")
    }
}

/// Write side of a registry image
#[derive(Debug)]
pub struct DockerImageDestination {
    conn: RegistryConnection,
}

impl DockerImageDestination {
    /// Create the handle
    pub fn open(reference: DockerReference, ctx: &SystemContext) -> Result<Self> {
        Ok(Self {
            conn: RegistryConnection::open(reference, ctx, "image destination")?,
        })
    }

    /// Registry endpoint the image is written to
    pub fn endpoint(&self) -> &RegistryEndpoint {
        &self.conn.endpoint
    }
}

impl ImageDestination for DockerImageDestination {
    fn reference(&self) -> &dyn ImageReference {
        &self.conn.reference
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.conn.close("image destination")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SystemContext {
        SystemContext {
            registries_dir_path: Some(Utf8PathBuf::from("/this/doesnt/exist")),
            docker_cert_path: Some(Utf8PathBuf::from("/etc/imgref/certs.d")),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_for_docker_hub() {
        let reference = DockerReference::parse("//busybox").unwrap();
        let endpoint = RegistryEndpoint::resolve(&reference, &context());

        assert_eq!(endpoint.host, "docker.io");
        assert_eq!(endpoint.api_host, DOCKER_HUB_API_HOST);
        assert_eq!(endpoint.base_url(), "https://registry-1.docker.io/v2/");
        assert_eq!(
            endpoint.cert_dir,
            Some(Utf8PathBuf::from("/etc/imgref/certs.d/docker.io"))
        );
        assert!(endpoint.user_agent.starts_with("imgref/"));
        assert!(!endpoint.insecure_skip_tls_verify);
        assert_eq!(
            endpoint.registries_dir,
            Some(Utf8PathBuf::from("/this/doesnt/exist"))
        );
    }

    #[test]
    fn test_endpoint_for_private_registry() {
        let reference = DockerReference::parse("//example.com:5000/ns/foo:bar").unwrap();
        let ctx = SystemContext {
            docker_insecure_skip_tls_verify: Some(true),
            user_agent: Some("custom".to_string()),
            ..Default::default()
        };
        let endpoint = RegistryEndpoint::resolve(&reference, &ctx);

        assert_eq!(endpoint.api_host, "example.com:5000");
        assert!(endpoint.insecure_skip_tls_verify);
        assert_eq!(endpoint.cert_dir, None);
        assert_eq!(endpoint.registries_dir, None);
        assert_eq!(endpoint.user_agent, "custom");
    }

    #[test]
    fn test_handles_open_and_close() {
        let reference = DockerReference::parse("//busybox").unwrap();

        let image = DockerImage::open(reference.clone(), &context()).unwrap();
        assert_eq!(image.endpoint().host, "docker.io");
        let image: Box<dyn Image> = Box::new(image);
        assert_eq!(image.reference().string_within_transport(), "//busybox:latest");
        image.close().unwrap();

        let source: Box<dyn ImageSource> =
            Box::new(DockerImageSource::open(reference.clone(), &context()).unwrap());
        source.close().unwrap();

        let destination: Box<dyn ImageDestination> =
            Box::new(DockerImageDestination::open(reference, &context()).unwrap());
        destination.close().unwrap();
    }
}
