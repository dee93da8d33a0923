// Registry store: scoped acquisition over the persisted registry
//
// `open()` loads the registry and projects it into the per-device-type
// resolved set; the returned session merges the (possibly mutated) set
// back and persists on release. Release is exactly-once by construction:
// both `commit` and `abort` consume the session.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use huesync_api::BridgeAddress;

use crate::device_type::DeviceType;
use crate::error::CoreError;
use crate::registry::{Registry, WhitelistEntry};

/// The in-memory, per-session mapping from serial number to address.
pub type ResolvedSet = HashMap<String, BridgeAddress>;

/// Handle to the persisted registry file.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry and project it for `device_type`.
    ///
    /// For each serial, the one whitelist entry whose label equals the
    /// device-type identifier supplies the credential; a record with no
    /// matching entry projects as an empty-base stub with no credential
    /// (a placeholder, not an omission).
    pub fn open(&self, device_type: &DeviceType) -> Result<RegistrySession, CoreError> {
        let registry = Registry::load(&self.path)?;

        let mut resolved = ResolvedSet::new();
        for (serial, entry) in &registry.entries {
            let mut matching = entry
                .whitelist
                .iter()
                .filter(|(_, w)| w.name == device_type.as_str());

            let addr = match matching.next() {
                Some((username, _)) => {
                    if matching.next().is_some() {
                        warn!(
                            "bridge {serial} has multiple credentials labeled {device_type}; \
                             using the first"
                        );
                    }
                    BridgeAddress::new(
                        entry.ipaddress.clone().unwrap_or_default(),
                        Some(username.clone()),
                    )
                }
                None => BridgeAddress::unreachable(None),
            };
            resolved.insert(serial.clone(), addr);
        }

        debug!(
            "opened registry with {} record(s), {} holding a credential for {device_type}",
            resolved.len(),
            resolved.values().filter(|a| a.username().is_some()).count()
        );

        Ok(RegistrySession {
            path: self.path.clone(),
            registry,
            device_type: device_type.clone(),
            resolved,
        })
    }
}

/// One open session against the registry.
///
/// Yields the projected resolved set for mutation; `commit` merges it
/// back and writes the file out. Consuming `self` makes "release runs
/// exactly once" a move-checked property.
pub struct RegistrySession {
    path: PathBuf,
    registry: Registry,
    device_type: DeviceType,
    resolved: ResolvedSet,
}

impl RegistrySession {
    pub fn resolved(&self) -> &ResolvedSet {
        &self.resolved
    }

    pub fn resolved_mut(&mut self) -> &mut ResolvedSet {
        &mut self.resolved
    }

    /// Merge the resolved set into the registry and persist it.
    ///
    /// Per resolved address:
    /// - carries a validation payload: the record's address is updated and
    ///   this device type's whitelist entry upserted (stale credentials
    ///   under the same label are dropped -- at most one entry may carry
    ///   this client's device type);
    /// - empty base (unreachable/unresolved): the stored address is
    ///   nulled, the whitelist left alone;
    /// - reachable but never validated this run: the record is untouched.
    ///
    /// Whitelist entries labeled with *other* device types are never
    /// modified. Save errors propagate; nothing is swallowed.
    pub fn commit(mut self) -> Result<(), CoreError> {
        for (serial, addr) in &self.resolved {
            if addr.config().is_some() {
                let entry = self.registry.entries.entry(serial.clone()).or_default();
                entry.ipaddress = Some(addr.base().to_owned());
                if let Some(username) = addr.username() {
                    entry.whitelist.retain(|existing, w| {
                        existing.as_str() == username || w.name != self.device_type.as_str()
                    });
                    entry
                        .whitelist
                        .entry(username.to_owned())
                        .or_insert_with(|| WhitelistEntry::new(self.device_type.as_str()));
                }
            } else if !addr.is_reachable() {
                if let Some(entry) = self.registry.entries.get_mut(serial) {
                    entry.ipaddress = None;
                }
            }
        }
        self.registry.save(&self.path)
    }

    /// Persist the registry without merging the resolved set.
    ///
    /// Used when the reconciliation body failed before producing a
    /// trustworthy resolved set: merging a half-mutated working copy
    /// would null addresses the run never examined, but the session
    /// still persists exactly once on every exit path.
    pub fn abort(self) -> Result<(), CoreError> {
        self.registry.save(&self.path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn seeded(dir: &tempfile::TempDir, content: &serde_json::Value) -> RegistryStore {
        let path = dir.path().join("bridges.json");
        std::fs::write(&path, serde_json::to_string_pretty(content).unwrap()).unwrap();
        RegistryStore::new(path)
    }

    fn device_type() -> DeviceType {
        DeviceType::new("app", "host")
    }

    #[test]
    fn projection_selects_matching_credential() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded(
            &dir,
            &json!({
                "AB12": {
                    "ipaddress": "http://10.0.0.5/",
                    "whitelist": {
                        "userX": { "name": "app#host" },
                        "userZ": { "name": "other#client" }
                    }
                }
            }),
        );

        let session = store.open(&device_type()).unwrap();
        let addr = &session.resolved()["AB12"];
        assert_eq!(addr.base(), "http://10.0.0.5/");
        assert_eq!(addr.username(), Some("userX"));
    }

    #[test]
    fn projection_without_matching_credential_is_a_stub() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded(
            &dir,
            &json!({
                "AB12": {
                    "ipaddress": "http://10.0.0.5/",
                    "whitelist": { "userZ": { "name": "other#client" } }
                }
            }),
        );

        let session = store.open(&device_type()).unwrap();
        let addr = &session.resolved()["AB12"];
        assert!(!addr.is_reachable());
        assert_eq!(addr.username(), None);
    }

    #[test]
    fn commit_updates_address_and_upserts_own_entry_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded(
            &dir,
            &json!({
                "AB12": {
                    "ipaddress": "http://10.0.0.5/",
                    "whitelist": { "userZ": { "name": "other#client" } }
                }
            }),
        );

        let mut session = store.open(&device_type()).unwrap();
        session.resolved_mut().insert(
            "AB12".into(),
            BridgeAddress::new("http://10.0.0.7/", Some("userY".into()))
                .with_config(json!({ "whitelist": {} })),
        );
        session.commit().unwrap();

        let registry = Registry::load(store.path()).unwrap();
        let entry = &registry.entries["AB12"];
        assert_eq!(entry.ipaddress.as_deref(), Some("http://10.0.0.7/"));
        assert_eq!(entry.whitelist["userY"].name, "app#host");
        // Foreign credential untouched.
        assert_eq!(entry.whitelist["userZ"].name, "other#client");
    }

    #[test]
    fn commit_drops_stale_credential_under_same_label() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded(
            &dir,
            &json!({
                "AB12": {
                    "ipaddress": "http://10.0.0.5/",
                    "whitelist": { "oldUser": { "name": "app#host" } }
                }
            }),
        );

        let mut session = store.open(&device_type()).unwrap();
        session.resolved_mut().insert(
            "AB12".into(),
            BridgeAddress::new("http://10.0.0.5/", Some("newUser".into()))
                .with_config(json!({ "whitelist": {} })),
        );
        session.commit().unwrap();

        let registry = Registry::load(store.path()).unwrap();
        let entry = &registry.entries["AB12"];
        // Exactly one credential may carry this client's label.
        assert!(!entry.whitelist.contains_key("oldUser"));
        assert_eq!(entry.whitelist["newUser"].name, "app#host");
    }

    #[test]
    fn commit_nulls_address_of_unreachable_stub() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded(
            &dir,
            &json!({
                "AB12": {
                    "ipaddress": "http://10.0.0.5/",
                    "whitelist": { "userX": { "name": "app#host" } }
                }
            }),
        );

        let mut session = store.open(&device_type()).unwrap();
        session.resolved_mut().insert(
            "AB12".into(),
            BridgeAddress::unreachable(Some("userX".into())),
        );
        session.commit().unwrap();

        let registry = Registry::load(store.path()).unwrap();
        let entry = &registry.entries["AB12"];
        assert_eq!(entry.ipaddress, None);
        // Credential kept.
        assert_eq!(entry.whitelist["userX"].name, "app#host");
    }

    #[test]
    fn abort_persists_without_merging() {
        let dir = tempfile::tempdir().unwrap();
        let content = json!({
            "AB12": {
                "ipaddress": "http://10.0.0.5/",
                "whitelist": { "userX": { "name": "app#host" } }
            }
        });
        let store = seeded(&dir, &content);

        let mut session = store.open(&device_type()).unwrap();
        // Body mutated the working copy, then failed.
        session.resolved_mut().insert(
            "AB12".into(),
            BridgeAddress::unreachable(Some("userX".into())),
        );
        session.abort().unwrap();

        let reread: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(reread, content);
    }
}
