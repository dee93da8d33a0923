// Bridge address value type
//
// One value per bridge: reachable base URL, the credential identifier this
// client holds on it (if any), and the raw config payload captured by the
// last successful validation. An empty base means "currently unreachable" --
// a legal state, not an error.

use serde_json::Value;
use url::Url;

/// A bridge's network location plus this client's credential on it.
///
/// Immutable value type; mutation goes through the consuming `with_*`
/// builders so a half-updated address never escapes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeAddress {
    base: String,
    username: Option<String>,
    config: Option<Value>,
}

impl BridgeAddress {
    /// Create an address from a base URL string and optional credential.
    ///
    /// An empty base is accepted and means "unreachable".
    pub fn new(base: impl Into<String>, username: Option<String>) -> Self {
        Self {
            base: base.into(),
            username,
            config: None,
        }
    }

    /// An unreachable marker: empty base, credential retained.
    pub fn unreachable(username: Option<String>) -> Self {
        Self::new(String::new(), username)
    }

    /// Replace the credential identifier.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Attach the raw payload of a successful validation.
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    /// The base URL string; empty when the bridge is unreachable.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The credential identifier, if one is held.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The raw validation payload, if this address was validated this run.
    pub fn config(&self) -> Option<&Value> {
        self.config.as_ref()
    }

    /// `true` when the base is non-empty.
    pub fn is_reachable(&self) -> bool {
        !self.base.is_empty()
    }

    /// Network location (host) portion of the base, if parseable.
    pub fn host(&self) -> Option<String> {
        if self.base.is_empty() {
            return None;
        }
        let url = Url::parse(&self.base).ok()?;
        url.host_str().map(String::from)
    }

    /// `{base}/api/{username}/config` -- the credential-scoped config
    /// endpoint. `None` when the base is empty or no credential is held.
    pub fn validate_endpoint(&self) -> Option<Url> {
        if self.base.is_empty() {
            return None;
        }
        let username = self.username.as_deref()?;
        let base = self.base.trim_end_matches('/');
        Url::parse(&format!("{base}/api/{username}/config")).ok()
    }

    /// `{base}/api/` -- the unauthenticated pairing endpoint.
    /// `None` when the base is empty.
    pub fn create_endpoint(&self) -> Option<Url> {
        if self.base.is_empty() {
            return None;
        }
        let base = self.base.trim_end_matches('/');
        Url::parse(&format!("{base}/api/")).ok()
    }
}
