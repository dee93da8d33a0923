// Local-network bridge discovery
//
// External collaborator boundary: given an optional hint of previously
// known bridges, produce the serial -> base-URL mapping of bridges
// reachable right now. Never returns credential information.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::address::BridgeAddress;
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::wire::{BridgeDescriptor, PortalRecord};

/// Vendor discovery portal for full-network scans.
pub const DISCOVERY_PORTAL: &str = "https://discovery.meethue.com/";

/// Capability to find bridges currently reachable on the network.
///
/// The hint asymmetry is part of the contract: an empty hint requests an
/// unfiltered full scan, a non-empty hint restricts the scan to the
/// hinted serials (probing known addresses first).
#[allow(async_fn_in_trait)]
pub trait Discovery {
    async fn find_bridges(
        &self,
        hint: &HashMap<String, BridgeAddress>,
    ) -> Result<HashMap<String, String>, Error>;
}

/// Default discovery: N-UPnP portal scan plus hinted-address probing.
///
/// Hinted serials are confirmed by reading the unauthenticated
/// `{base}/api/config` descriptor and matching its `bridgeid` against the
/// serial (case-insensitively). Hinted serials whose probe fails fall
/// back to one portal scan, still restricted to the hinted set.
pub struct NupnpDiscovery {
    http: reqwest::Client,
    portal: String,
}

impl NupnpDiscovery {
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            portal: DISCOVERY_PORTAL.to_owned(),
        })
    }

    /// Override the portal URL (tests point this at a mock server).
    pub fn with_portal(mut self, portal: impl Into<String>) -> Self {
        self.portal = portal.into();
        self
    }

    async fn portal_scan(&self) -> Result<Vec<PortalRecord>, Error> {
        debug!("GET {}", self.portal);
        let resp = self
            .http
            .get(&self.portal)
            .send()
            .await
            .map_err(Error::Transport)?;
        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Read the unauthenticated descriptor at a known address, returning
    /// its bridge id if the address still answers as a bridge.
    async fn probe(&self, base: &str) -> Option<String> {
        let url = format!("{}/api/config", base.trim_end_matches('/'));
        debug!("GET {}", url);
        let resp = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!("probe of {url} failed: {e}");
                return None;
            }
        };
        match resp.json::<BridgeDescriptor>().await {
            Ok(descriptor) => descriptor.bridgeid,
            Err(e) => {
                debug!("probe of {url} returned a non-bridge body: {e}");
                None
            }
        }
    }
}

impl Discovery for NupnpDiscovery {
    async fn find_bridges(
        &self,
        hint: &HashMap<String, BridgeAddress>,
    ) -> Result<HashMap<String, String>, Error> {
        if hint.is_empty() {
            // Full scan: every bridge the portal knows about.
            let records = self.portal_scan().await?;
            return Ok(records
                .into_iter()
                .map(|r| {
                    (
                        r.id.to_uppercase(),
                        format!("http://{}/", r.internalipaddress),
                    )
                })
                .collect());
        }

        let mut found = HashMap::new();
        let mut unconfirmed = Vec::new();

        for (serial, addr) in hint {
            if addr.is_reachable() {
                if let Some(id) = self.probe(addr.base()).await {
                    if id.eq_ignore_ascii_case(serial) {
                        found.insert(serial.clone(), addr.base().to_owned());
                        continue;
                    }
                    warn!(
                        "address {} answered as bridge {id}, expected {serial}",
                        addr.base()
                    );
                }
            }
            unconfirmed.push(serial.clone());
        }

        if !unconfirmed.is_empty() {
            // Restricted fallback: one portal scan, matched against the
            // hinted serials that did not answer at their known address.
            // Confirmed probes stand even if the portal is unreachable.
            match self.portal_scan().await {
                Ok(records) => {
                    for record in records {
                        let matched = unconfirmed
                            .iter()
                            .find(|sn| sn.eq_ignore_ascii_case(&record.id));
                        if let Some(serial) = matched {
                            found.insert(
                                serial.clone(),
                                format!("http://{}/", record.internalipaddress),
                            );
                        }
                    }
                }
                Err(e) => warn!("portal fallback scan failed: {e}"),
            }
        }

        Ok(found)
    }
}
