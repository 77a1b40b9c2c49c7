//! Policy requirement values

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single requirement an image must satisfy.
///
/// These are configuration values only; evaluating signatures is the
/// caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PolicyRequirement {
    /// Accept the image without any checks
    InsecureAcceptAnything,
    /// Reject the image
    Reject,
    /// Require a signature made by one of the given keys
    SignedBy {
        key_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_path: Option<Utf8PathBuf>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_data: Option<String>,
    },
}

impl fmt::Display for PolicyRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyRequirement::InsecureAcceptAnything => f.write_str("insecureAcceptAnything"),
            PolicyRequirement::Reject => f.write_str("reject"),
            PolicyRequirement::SignedBy {
                key_type, key_path, ..
            } => match key_path {
                Some(path) => write!(f, "signedBy ({} at {})", key_type, path),
                None => write!(f, "signedBy ({}, inline key)", key_type),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_by_round_trips_field_names() {
        let req: PolicyRequirement = serde_json::from_str(
            r#"{"type": "signedBy", "keyType": "GPGKeys", "keyPath": "/keys/a.gpg"}"#,
        )
        .unwrap();
        assert_eq!(
            req,
            PolicyRequirement::SignedBy {
                key_type: "GPGKeys".to_string(),
                key_path: Some(Utf8PathBuf::from("/keys/a.gpg")),
                key_data: None,
            }
        );
        assert_eq!(req.to_string(), "signedBy (GPGKeys at /keys/a.gpg)");

        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"keyType\""));
        assert!(!json.contains("keyData"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<PolicyRequirement, _> =
            serde_json::from_str(r#"{"type": "trustEverybody"}"#);
        assert!(result.is_err());
    }
}
