// Wire models for the bridge's JSON API
//
// The pairing endpoint answers with a one-element array whose item carries
// either a `success` or an `error` object. Fields use `#[serde(default)]`
// and flattened catch-alls liberally because bridge firmwares disagree
// about field presence.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Error;

/// Wire error type for "link button not pressed".
pub const LINK_BUTTON_NOT_PRESSED: u16 = 101;

/// One element of the pairing reply array from `POST {base}/api/`.
///
/// ```json
/// [{"success": {"username": "..."}}]
/// [{"error": {"type": 101, "address": "", "description": "link button not pressed"}}]
/// ```
#[derive(Debug, Deserialize)]
pub struct PairingReply {
    #[serde(default)]
    pub success: Option<PairingSuccess>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// Success payload of a pairing reply: the newly issued credential.
#[derive(Debug, Deserialize)]
pub struct PairingSuccess {
    pub username: String,
    /// Catch-all for undocumented fields (e.g. `clientkey` on newer firmware).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structured error payload from the bridge API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub kind: u16,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
}

impl ApiError {
    /// Translate the wire error into the crate error, distinguishing the
    /// link-button rejection from every other kind.
    pub fn into_error(self) -> Error {
        if self.kind == LINK_BUTTON_NOT_PRESSED {
            Error::NotArmed
        } else {
            Error::CredentialCreation {
                kind: self.kind,
                description: self.description,
            }
        }
    }
}

/// Credential-scoped config from `GET {base}/api/{username}/config`,
/// modeled only as far as validation needs: the whitelist is present iff
/// the queried credential was accepted.
#[derive(Debug, Deserialize)]
pub struct AuthorizedConfig {
    #[serde(default)]
    pub whitelist: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Unauthenticated descriptor from `GET {base}/api/config`.
///
/// Available without a credential; used by hinted discovery to confirm
/// that a known address still answers as the expected bridge.
#[derive(Debug, Deserialize)]
pub struct BridgeDescriptor {
    #[serde(default)]
    pub bridgeid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub swversion: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One record from the vendor discovery portal.
///
/// ```json
/// [{"id": "001788fffe23a581", "internalipaddress": "10.0.0.5"}]
/// ```
#[derive(Debug, Deserialize)]
pub struct PortalRecord {
    pub id: String,
    pub internalipaddress: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn pairing_success_parses() {
        let replies: Vec<PairingReply> =
            serde_json::from_str(r#"[{"success": {"username": "userY"}}]"#).unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].success.as_ref().unwrap().username, "userY");
        assert!(replies[0].error.is_none());
    }

    #[test]
    fn pairing_error_101_translates_to_not_armed() {
        let replies: Vec<PairingReply> = serde_json::from_str(
            r#"[{"error": {"type": 101, "address": "", "description": "link button not pressed"}}]"#,
        )
        .unwrap();
        let err = replies
            .into_iter()
            .next()
            .and_then(|r| r.error)
            .map(ApiError::into_error)
            .unwrap();
        assert!(matches!(err, Error::NotArmed));
    }

    #[test]
    fn pairing_error_other_translates_to_creation_error() {
        let err = ApiError {
            kind: 7,
            description: "invalid value".into(),
            address: String::new(),
        }
        .into_error();
        match err {
            Error::CredentialCreation { kind, description } => {
                assert_eq!(kind, 7);
                assert_eq!(description, "invalid value");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
