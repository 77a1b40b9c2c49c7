//! Regular expressions for the registry reference grammar
//!
//! The grammar, informally:
//!
//! ```text
//! reference  := name [ ":" tag ] [ "@" digest ]
//! name       := [ domain "/" ] path-component [ "/" path-component ]*
//! domain     := domain-component [ "." domain-component ]* [ ":" port ]
//! tag        := [\w][\w.-]{0,127}
//! digest     := algorithm ":" hex
//! ```

use regex::Regex;
use std::sync::LazyLock;

const ALPHA_NUMERIC: &str = r"[a-z0-9]+";
const SEPARATOR: &str = r"(?:[._]|__|[-]+)";
const DOMAIN_COMPONENT: &str = r"(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])";
const PORT: &str = r"[0-9]+";
const TAG: &str = r"[\w][\w.-]{0,127}";
const DIGEST: &str = r"[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*[:][[:xdigit:]]{32,}";

fn path_component() -> String {
    format!("{ALPHA_NUMERIC}(?:{SEPARATOR}{ALPHA_NUMERIC})*")
}

fn domain() -> String {
    format!(r"{DOMAIN_COMPONENT}(?:\.{DOMAIN_COMPONENT})*(?::{PORT})?")
}

fn name() -> String {
    let path = path_component();
    format!("(?:{}/)?{path}(?:/{path})*", domain())
}

fn anchored(expr: &str) -> Regex {
    Regex::new(&format!("^{expr}$")).expect("reference grammar regex is valid")
}

/// Full reference with capture groups for name (1), tag (2) and digest (3)
pub(crate) static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| anchored(&format!("({})(?::({TAG}))?(?:@({DIGEST}))?", name())));

pub(crate) static ANCHORED_DOMAIN: LazyLock<Regex> = LazyLock::new(|| anchored(&domain()));

pub(crate) static ANCHORED_PATH_COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| anchored(&path_component()));

pub(crate) static ANCHORED_TAG: LazyLock<Regex> = LazyLock::new(|| anchored(TAG));

/// 64 lowercase hex characters, the shape of an image ID
pub(crate) static ANCHORED_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| anchored("[a-f0-9]{64}"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_captures() {
        let caps = REFERENCE
            .captures("example.com:5000/ns/foo:bar")
            .expect("should match");
        assert_eq!(&caps[1], "example.com:5000/ns/foo");
        assert_eq!(caps.get(2).map(|m| m.as_str()), Some("bar"));
        assert!(caps.get(3).is_none());
    }

    #[test]
    fn test_reference_rejects_uppercase_path() {
        assert!(!REFERENCE.is_match("UPPERCASEISINVALID"));
        assert!(REFERENCE.is_match("uppercaseisinvalid"));
    }

    #[test]
    fn test_anchored_pieces() {
        assert!(ANCHORED_DOMAIN.is_match("localhost:5000"));
        assert!(ANCHORED_DOMAIN.is_match("docker.io"));
        assert!(!ANCHORED_DOMAIN.is_match("-docker.io"));
        assert!(ANCHORED_PATH_COMPONENT.is_match("my_repo-name.v2"));
        assert!(!ANCHORED_PATH_COMPONENT.is_match("Library"));
        assert!(ANCHORED_TAG.is_match("notLatest"));
        assert!(!ANCHORED_TAG.is_match(".hidden"));
    }
}
