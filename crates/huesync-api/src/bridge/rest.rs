// Raw-HTTP bridge realization
//
// Talks to the bridge with plain reqwest calls and interprets the JSON
// bodies as untyped `serde_json::Value`.

use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::address::BridgeAddress;
use crate::bridge::{BridgeProtocol, Validation, interpret_validation};
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::wire::LINK_BUTTON_NOT_PRESSED;

/// Credential protocol client built directly on `reqwest`.
pub struct RestBridge {
    http: reqwest::Client,
}

impl RestBridge {
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

impl BridgeProtocol for RestBridge {
    async fn validate_credential(&self, addr: &BridgeAddress) -> Result<Validation, Error> {
        if !addr.is_reachable() {
            return Err(Error::Unreachable);
        }
        let Some(url) = addr.validate_endpoint() else {
            // No credential held -- nothing to validate.
            return Ok(Validation::unauthorized());
        };

        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let raw = self.fetch_json(resp).await?;
        Ok(interpret_validation(raw))
    }

    async fn create_credential(
        &self,
        addr: &BridgeAddress,
        device_type: &str,
    ) -> Result<String, Error> {
        let url: Url = addr.create_endpoint().ok_or(Error::Unreachable)?;

        debug!("POST {} devicetype={}", url, device_type);
        let body = json!({ "devicetype": device_type });
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;
        let raw = self.fetch_json(resp).await?;

        // The reply is a one-element array holding success or error.
        let item = raw
            .as_array()
            .and_then(|a| a.first())
            .ok_or_else(|| Error::Deserialization {
                message: "expected a one-element pairing reply array".into(),
                body: raw.to_string(),
            })?;

        if let Some(username) = item.pointer("/success/username").and_then(Value::as_str) {
            return Ok(username.to_owned());
        }

        if let Some(err) = item.get("error") {
            let kind = err
                .get("type")
                .and_then(Value::as_u64)
                .and_then(|k| u16::try_from(k).ok())
                .unwrap_or_default();
            if kind == LINK_BUTTON_NOT_PRESSED {
                return Err(Error::NotArmed);
            }
            let description = err
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            return Err(Error::CredentialCreation { kind, description });
        }

        Err(Error::Deserialization {
            message: "pairing reply carries neither success nor error".into(),
            body: raw.to_string(),
        })
    }
}
