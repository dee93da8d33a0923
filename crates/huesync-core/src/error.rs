use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for `huesync-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The registry file exists but could not be parsed. Fatal: aborts
    /// before any network activity so a corrupt file is never clobbered.
    #[error("bridge registry at {path} is corrupt: {source}")]
    RegistryCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the registry file failed.
    #[error("registry storage failed at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Protocol-level failure surfaced from `huesync-api`.
    #[error(transparent)]
    Api(#[from] huesync_api::Error),
}
