// Persisted bridge registry
//
// JSON file mapping serial number to device record:
//
// ```json
// { "AB12": { "ipaddress": "http://10.0.0.5/",
//             "whitelist": { "userX": { "name": "app#host" } } } }
// ```
//
// Fields this tool does not understand are carried through flattened
// catch-alls so load/save round-trips losslessly.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CoreError;

/// One whitelist descriptor: the device type a credential was registered
/// under, plus whatever else the bridge stored about it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WhitelistEntry {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WhitelistEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// One device record, keyed by bridge serial number.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RegistryEntry {
    /// Last successfully resolved network location; null when the bridge
    /// was not found in the most recent reconciliation.
    #[serde(default)]
    pub ipaddress: Option<String>,

    /// Registered clients: credential identifier -> descriptor. Supports
    /// multiple clients per bridge; this tool only ever touches the entry
    /// matching its own device type.
    #[serde(default)]
    pub whitelist: BTreeMap<String, WhitelistEntry>,

    /// Catch-all for fields other tools may have written.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The persisted mapping from serial number to device record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Registry {
    pub entries: BTreeMap<String, RegistryEntry>,
}

impl Registry {
    /// Load the registry from `path`.
    ///
    /// A missing file is an empty registry, not an error. A malformed
    /// file is `CoreError::RegistryCorrupt` -- callers must abort before
    /// any network activity rather than risk clobbering it.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no registry at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CoreError::Storage {
                    path: path.to_owned(),
                    source: e,
                });
            }
        };
        serde_json::from_str(&contents).map_err(|e| CoreError::RegistryCorrupt {
            path: path.to_owned(),
            source: e,
        })
    }

    /// Write the registry to `path` durably: the content goes to a
    /// sibling temp file first, then an atomic rename replaces the old
    /// file, so a crash mid-write never leaves a half-merged registry.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let storage = |source| CoreError::Storage {
            path: path.to_owned(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(storage)?;
            }
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| storage(io::Error::other(e)))?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json).map_err(storage)?;
        fs::rename(&tmp, path).map_err(storage)?;
        Ok(())
    }
}
