// Credential protocol client
//
// Two realizations of the same contract: `RestBridge` works on raw JSON
// values, `TypedBridge` goes through the typed wire models. Callers must
// not be able to tell them apart -- both short-circuit validation when no
// credential is held, and both surface wire error 101 as `Error::NotArmed`.

pub mod rest;
pub mod typed;

use serde_json::Value;

use crate::address::BridgeAddress;
use crate::error::Error;

pub use rest::RestBridge;
pub use typed::TypedBridge;

/// Outcome of a credential validation against a bridge.
#[derive(Debug, Clone)]
pub struct Validation {
    /// `true` iff the bridge's reply shows the credential on its whitelist.
    pub authorized: bool,
    /// The raw reply payload; persisted by the store on success.
    pub raw: Value,
}

impl Validation {
    /// An unauthorized result with no payload (no credential to check).
    pub fn unauthorized() -> Self {
        Self {
            authorized: false,
            raw: Value::Null,
        }
    }
}

/// Capability to validate and create credentials on one bridge.
///
/// Network I/O only; no local state. Implementations must propagate
/// transport failures as `Error::Transport` rather than treating them
/// as "unauthorized".
#[allow(async_fn_in_trait)]
pub trait BridgeProtocol {
    /// Read the credential-scoped config endpoint and report whether the
    /// address's credential is authorized. Addresses holding no credential
    /// resolve to unauthorized without network I/O.
    async fn validate_credential(&self, addr: &BridgeAddress) -> Result<Validation, Error>;

    /// Request a new credential for `device_type`. The link button must
    /// have been pressed on the bridge; wire error 101 surfaces as
    /// `Error::NotArmed`, other rejections as `Error::CredentialCreation`.
    async fn create_credential(
        &self,
        addr: &BridgeAddress,
        device_type: &str,
    ) -> Result<String, Error>;

    /// Remove a credential from the bridge's whitelist.
    async fn delete_credential(
        &self,
        _addr: &BridgeAddress,
        _username: &str,
    ) -> Result<(), Error> {
        Err(Error::Unsupported("credential deletion"))
    }
}

/// Authorization rule shared by both realizations: the reply is an object
/// carrying a `whitelist` key iff the queried credential was accepted.
/// Rejections come back as an error array instead.
pub(crate) fn interpret_validation(raw: Value) -> Validation {
    let authorized = raw.as_object().is_some_and(|o| o.contains_key("whitelist"));
    Validation { authorized, raw }
}
