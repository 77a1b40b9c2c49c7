//! Content digests (`algorithm:hex`)

use crate::error::{Error, Result};
use std::fmt;

/// Supported digest algorithms and the length of their hex encoding
const ALGORITHMS: &[(&str, usize)] = &[("sha256", 64), ("sha384", 96), ("sha512", 128)];

/// A validated content digest such as `sha256:0123...`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: String,
    hex: String,
}

impl Digest {
    /// Parse and validate a digest string
    pub fn parse(s: &str) -> Result<Self> {
        let (algorithm, hex) = s
            .split_once(':')
            .ok_or_else(|| Error::malformed_reference(s, "invalid digest format"))?;

        let expected_len = ALGORITHMS
            .iter()
            .find(|(name, _)| *name == algorithm)
            .map(|(_, len)| *len)
            .ok_or_else(|| {
                Error::malformed_reference(s, format!("unsupported digest algorithm: {algorithm}"))
            })?;

        if hex.len() != expected_len {
            return Err(Error::malformed_reference(
                s,
                format!("invalid {algorithm} digest length: expected {expected_len}, got {}", hex.len()),
            ));
        }
        if !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(Error::malformed_reference(
                s,
                "digest must be lowercase hexadecimal",
            ));
        }

        Ok(Self {
            algorithm: algorithm.to_string(),
            hex: hex.to_string(),
        })
    }

    /// Digest algorithm, e.g. `sha256`
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Hex-encoded payload
    pub fn hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

impl std::str::FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
