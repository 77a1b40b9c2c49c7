//! Error types for imgref-core

use thiserror::Error;

/// Result type alias using imgref-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for imgref
#[derive(Error, Debug)]
pub enum Error {
    /// Reference string failed transport-prefix or grammar parsing
    #[error("Invalid image reference '{input}': {reason}")]
    MalformedReference { input: String, reason: String },

    /// An already-parsed reference carries zero or both of tag and digest
    #[error("Ambiguous image reference '{reference}': {reason}")]
    AmbiguousReference { reference: String, reason: String },

    /// A canonical reference carries neither a tag nor a digest
    #[error("Internal inconsistency: reference '{reference}' has neither a tag nor a digest")]
    InvalidReferenceState { reference: String },

    /// Policy scope string matches no reference shape
    #[error("Invalid policy scope '{scope}': {reason}")]
    InvalidScope { scope: String, reason: String },

    /// No transport registered under this name
    #[error("Unknown transport: {name}")]
    UnknownTransport { name: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed reference error
    pub fn malformed_reference(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedReference {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an ambiguous reference error
    pub fn ambiguous_reference(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AmbiguousReference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid reference state error
    pub fn invalid_reference_state(reference: impl Into<String>) -> Self {
        Self::InvalidReferenceState {
            reference: reference.into(),
        }
    }

    /// Create an invalid scope error
    pub fn invalid_scope(scope: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidScope {
            scope: scope.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown transport error
    pub fn unknown_transport(name: impl Into<String>) -> Self {
        Self::UnknownTransport { name: name.into() }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
