// Reconciliation engine
//
// Merges three sources -- the persisted registry, live discovery, and the
// credential protocol -- into one consistent resolved set, driving the
// interactive pairing flow where a credential is missing or rejected.
//
// Strictly sequential: discovery first, then validation/pairing bridge by
// bridge. Pairing is serialized on purpose -- it needs one human action
// per bridge.

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use huesync_api::{BridgeAddress, BridgeProtocol, Discovery, Error as ApiError, Prompter};

use crate::device_type::DeviceType;
use crate::error::CoreError;
use crate::store::{RegistryStore, ResolvedSet};

/// The bridge enforces a ~30 second window after the link button press;
/// the prompt wait mirrors it.
const PAIRING_WINDOW: Duration = Duration::from_secs(30);

/// Orchestrates one reconciliation run over injected collaborators.
///
/// Collaborators are owned, constructor-injected capabilities -- one
/// engine, one set of instances, never shared defaults.
pub struct Reconciler<D, B, P> {
    store: RegistryStore,
    device_type: DeviceType,
    discovery: D,
    bridge: B,
    prompter: P,
    pairing_window: Duration,
}

impl<D: Discovery, B: BridgeProtocol, P: Prompter> Reconciler<D, B, P> {
    pub fn new(
        store: RegistryStore,
        device_type: DeviceType,
        discovery: D,
        bridge: B,
        prompter: P,
    ) -> Self {
        Self {
            store,
            device_type,
            discovery,
            bridge,
            prompter,
            pairing_window: PAIRING_WINDOW,
        }
    }

    /// Override the pairing window (tests use a short one).
    pub fn with_pairing_window(mut self, window: Duration) -> Self {
        self.pairing_window = window;
        self
    }

    /// Run one reconciliation: discover, validate, pair where needed,
    /// commit, and return the resolved set.
    ///
    /// Serials found by discovery always override prior state; prior
    /// serials missing from discovery come back as unreachable markers
    /// (empty base, credential retained). Serials whose pairing failed
    /// this run are excluded from the returned set but persist as
    /// unreachable stubs.
    pub async fn reconcile(&self) -> Result<ResolvedSet, CoreError> {
        let mut session = self.store.open(&self.device_type)?;
        let prior = session.resolved().clone();

        // Collaborator contract: a non-empty prior map restricts the
        // scan; an empty one requests a full-network scan.
        let discovered = match self.discovery.find_bridges(&prior).await {
            Ok(found) => found,
            Err(e) => {
                // The session still persists exactly once -- unmerged, so
                // a failed scan cannot null addresses it never examined.
                session.abort()?;
                return Err(e.into());
            }
        };
        info!("discovery returned {} bridge(s)", discovered.len());

        // Re-attach prior credentials to freshly discovered addresses;
        // discovery never returns credential info. Serials new to the
        // registry proceed without one.
        let mut candidates: Vec<(String, BridgeAddress)> = discovered
            .into_iter()
            .map(|(serial, base)| {
                let username = prior
                    .get(&serial)
                    .and_then(|a| a.username().map(String::from));
                (serial, BridgeAddress::new(base, username))
            })
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0)); // reproducible within a run

        let mut paired = ResolvedSet::new();
        let mut failed: Vec<String> = Vec::new();
        for (serial, addr) in candidates {
            match self.resolve_one(&serial, addr).await {
                Some(resolved) => {
                    paired.insert(serial, resolved);
                }
                None => failed.push(serial),
            }
        }

        // Unreachable markers for every prior serial, then discovered
        // results merged over them -- discovery always wins ties.
        let mut resolved: ResolvedSet = prior
            .iter()
            .map(|(serial, addr)| {
                (
                    serial.clone(),
                    BridgeAddress::unreachable(addr.username().map(String::from)),
                )
            })
            .collect();
        resolved.extend(paired);

        *session.resolved_mut() = resolved.clone();
        session.commit()?;

        for serial in &failed {
            resolved.remove(serial);
        }
        Ok(resolved)
    }

    /// Validate one discovered address, pairing if necessary.
    ///
    /// Returns `None` when the bridge is excluded from this run: pairing
    /// rejected, window elapsed, or a per-bridge transport failure (the
    /// bridge is retried on a later run; the run itself continues).
    async fn resolve_one(&self, serial: &str, addr: BridgeAddress) -> Option<BridgeAddress> {
        let validation = match self.bridge.validate_credential(&addr).await {
            Ok(validation) => validation,
            Err(e) => {
                warn!("validation of bridge {serial} failed: {e}");
                return None;
            }
        };
        if validation.authorized {
            debug!("bridge {serial} already authorized");
            return Some(addr.with_config(validation.raw));
        }

        info!("bridge {serial} holds no valid credential, starting pairing");
        if timeout(self.pairing_window, self.prompter.prompt_for_button())
            .await
            .is_err()
        {
            warn!("pairing window for bridge {serial} elapsed");
            self.prompter.notify_not_pressed();
            return None;
        }

        let username = match self
            .bridge
            .create_credential(&addr, self.device_type.as_str())
            .await
        {
            Ok(username) => username,
            Err(ApiError::NotArmed) => {
                self.prompter.notify_not_pressed();
                return None;
            }
            Err(e) => {
                warn!("pairing bridge {serial} failed: {e}");
                return None;
            }
        };

        // A naked create-success is not trusted: re-validate to capture
        // the canonical "now authorized" payload.
        let addr = addr.with_username(username);
        match self.bridge.validate_credential(&addr).await {
            Ok(validation) if validation.authorized => {
                info!("bridge {serial} paired");
                Some(addr.with_config(validation.raw))
            }
            Ok(_) => {
                warn!("bridge {serial} rejected its freshly created credential");
                None
            }
            Err(e) => {
                warn!("re-validation of bridge {serial} failed: {e}");
                None
            }
        }
    }
}
