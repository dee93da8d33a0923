//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use huesync_core::CoreError;

/// Exit codes for scripting.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const REGISTRY: i32 = 3;
    pub const CONNECTION: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Registry ─────────────────────────────────────────────────────

    #[error("Bridge registry at {path} is corrupt")]
    #[diagnostic(
        code(huesync::registry_corrupt),
        help(
            "The file could not be parsed as JSON. Inspect or move it aside;\n\
             huesync rebuilds an empty registry on the next sync."
        )
    )]
    RegistryCorrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Registry storage failed at {path}")]
    #[diagnostic(
        code(huesync::storage),
        help("Check that the directory exists and is writable.")
    )]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ── Network ──────────────────────────────────────────────────────

    #[error("Could not reach the discovery service or bridge")]
    #[diagnostic(
        code(huesync::connection),
        help(
            "Check the network connection and that the bridge is powered on.\n\
             Try: huesync sync -vv for request-level detail."
        )
    )]
    Connection {
        #[source]
        source: huesync_api::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(huesync::api))]
    Api(huesync_api::Error),

    // ── Local I/O ────────────────────────────────────────────────────

    #[error("IO error: {0}")]
    #[diagnostic(code(huesync::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Stable exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RegistryCorrupt { .. } | Self::Storage { .. } => exit_code::REGISTRY,
            Self::Connection { .. } => exit_code::CONNECTION,
            Self::Api(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// Classify a protocol error: transient transport failures get the
    /// connection diagnostic, everything else passes through.
    pub fn from_api(err: huesync_api::Error) -> Self {
        if err.is_transient() {
            Self::Connection { source: err }
        } else {
            Self::Api(err)
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RegistryCorrupt { path, source } => Self::RegistryCorrupt {
                path: path.display().to_string(),
                source,
            },
            CoreError::Storage { path, source } => Self::Storage {
                path: path.display().to_string(),
                source,
            },
            CoreError::Api(api) => Self::from_api(api),
        }
    }
}
