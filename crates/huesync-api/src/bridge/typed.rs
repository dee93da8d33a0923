// Typed bridge realization
//
// Same operations as `RestBridge`, but the bodies go through the typed
// wire models. The typed error payload is translated into the shared
// error shape (101 -> NotArmed) before any caller sees it, so behavior
// is indistinguishable from the raw realization.

use serde_json::Value;
use tracing::debug;

use crate::address::BridgeAddress;
use crate::bridge::{BridgeProtocol, Validation};
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::wire::{AuthorizedConfig, PairingReply};

/// Credential protocol client built on the typed wire models.
pub struct TypedBridge {
    http: reqwest::Client,
}

impl TypedBridge {
    /// Create a client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// Create a client from a pre-built `reqwest::Client`.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn fetch_json(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

impl BridgeProtocol for TypedBridge {
    async fn validate_credential(&self, addr: &BridgeAddress) -> Result<Validation, Error> {
        if !addr.is_reachable() {
            return Err(Error::Unreachable);
        }
        let Some(url) = addr.validate_endpoint() else {
            return Ok(Validation::unauthorized());
        };

        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let raw = self.fetch_json(resp).await?;

        // A rejection comes back as an error array, which does not fit the
        // config model -- that is exactly the unauthorized case.
        let authorized = serde_json::from_value::<AuthorizedConfig>(raw.clone())
            .is_ok_and(|cfg| cfg.whitelist.is_some());
        Ok(Validation { authorized, raw })
    }

    async fn create_credential(
        &self,
        addr: &BridgeAddress,
        device_type: &str,
    ) -> Result<String, Error> {
        let url = addr.create_endpoint().ok_or(Error::Unreachable)?;

        debug!("POST {} devicetype={}", url, device_type);
        let body = serde_json::json!({ "devicetype": device_type });
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;
        let raw = self.fetch_json(resp).await?;

        let replies: Vec<PairingReply> =
            serde_json::from_value(raw.clone()).map_err(|e| Error::Deserialization {
                message: format!("pairing reply did not match wire model: {e}"),
                body: raw.to_string(),
            })?;
        let reply = replies.into_iter().next().ok_or_else(|| Error::Deserialization {
            message: "expected a one-element pairing reply array".into(),
            body: raw.to_string(),
        })?;

        if let Some(success) = reply.success {
            return Ok(success.username);
        }
        match reply.error {
            Some(err) => Err(err.into_error()),
            None => Err(Error::Deserialization {
                message: "pairing reply carries neither success nor error".into(),
                body: raw.to_string(),
            }),
        }
    }
}
