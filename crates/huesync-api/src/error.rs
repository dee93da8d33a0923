use thiserror::Error;

/// Top-level error type for the `huesync-api` crate.
///
/// Covers every failure mode across the protocol surfaces: transport,
/// credential validation/creation, and discovery. `huesync-core` maps
/// these into its own error type for callers.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Operation requires a reachable address but the base is empty.
    #[error("Bridge is unreachable (no known address)")]
    Unreachable,

    // ── Pairing ─────────────────────────────────────────────────────
    /// The bridge rejected credential creation because its link button
    /// was not pressed within the pairing window (wire error type 101).
    #[error("Link button not pressed within the pairing window")]
    NotArmed,

    /// Any other credential-creation rejection from the bridge.
    #[error("Credential creation rejected (type {kind}): {description}")]
    CredentialCreation { kind: u16, description: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Protocol ────────────────────────────────────────────────────
    /// Operation defined by the protocol but not implemented here.
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl Error {
    /// Returns `true` if this is a per-bridge pairing rejection the
    /// reconciliation loop recovers from locally.
    pub fn is_pairing_rejection(&self) -> bool {
        matches!(self, Self::NotArmed | Self::CredentialCreation { .. })
    }

    /// Returns `true` if this is a transient transport failure worth
    /// retrying on a later run.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
