//! Policy scopes derived from a registry reference
//!
//! The identity is the most specific scope; namespaces walk up the
//! repository path one `/` component at a time, ending with the bare
//! registry host.

use imgref_core::named::Named;
use imgref_core::{Error, Result};

/// Full name plus `:tag` or `@digest`, e.g. `docker.io/library/busybox:latest`
pub fn docker_reference_identity(named: &dyn Named) -> Result<String> {
    let mut identity = named.name().to_string();
    match (named.tag(), named.digest()) {
        (Some(_), Some(_)) => {
            return Err(Error::ambiguous_reference(
                named.familiar_string(),
                "reference has both a tag and a digest",
            ))
        }
        (Some(tag), None) => {
            identity.push(':');
            identity.push_str(tag);
        }
        (None, Some(digest)) => {
            identity.push('@');
            identity.push_str(&digest.to_string());
        }
        (None, None) => return Err(Error::invalid_reference_state(named.familiar_string())),
    }
    Ok(identity)
}

/// Repository, namespaces and registry host, most specific first
pub fn docker_reference_namespaces(named: &dyn Named) -> Vec<String> {
    let mut name = named.name();
    let mut namespaces = vec![name.to_string()];
    while let Some((parent, _)) = name.rsplit_once('/') {
        namespaces.push(parent.to_string());
        name = parent;
    }
    namespaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgref_core::NamedReference;

    const HEX: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn named(s: &str) -> NamedReference {
        NamedReference::parse(s).unwrap()
    }

    #[test]
    fn test_identity() {
        let cases = vec![
            ("busybox:latest", "docker.io/library/busybox:latest".to_string()),
            (
                "example.com:5000/ns/foo:bar",
                "example.com:5000/ns/foo:bar".to_string(),
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(docker_reference_identity(&named(input)).unwrap(), expected);
        }

        let digested = named(&format!("busybox@sha256:{HEX}"));
        assert_eq!(
            docker_reference_identity(&digested).unwrap(),
            format!("docker.io/library/busybox@sha256:{HEX}")
        );
    }

    #[test]
    fn test_identity_requires_exactly_one_of_tag_and_digest() {
        assert!(matches!(
            docker_reference_identity(&named("busybox")),
            Err(Error::InvalidReferenceState { .. })
        ));
        assert!(matches!(
            docker_reference_identity(&named(&format!("busybox:latest@sha256:{HEX}"))),
            Err(Error::AmbiguousReference { .. })
        ));
    }

    #[test]
    fn test_namespaces() {
        assert_eq!(
            docker_reference_namespaces(&named("busybox:latest")),
            vec!["docker.io/library/busybox", "docker.io/library", "docker.io"]
        );
        assert_eq!(
            docker_reference_namespaces(&named("example.com:5000/a/b/c:tag")),
            vec![
                "example.com:5000/a/b/c",
                "example.com:5000/a/b",
                "example.com:5000/a",
                "example.com:5000",
            ]
        );
        assert_eq!(
            docker_reference_namespaces(&named("localhost/foo")),
            vec!["localhost/foo", "localhost"]
        );
    }
}
