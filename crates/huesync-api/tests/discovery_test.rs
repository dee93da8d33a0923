// Integration tests for `NupnpDiscovery` using wiremock.
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use huesync_api::{BridgeAddress, Discovery, NupnpDiscovery, TransportConfig};

const SERIAL: &str = "001788FFFE23A581";

fn discovery(portal: &MockServer) -> NupnpDiscovery {
    NupnpDiscovery::new(&TransportConfig::default())
        .unwrap()
        .with_portal(portal.uri())
}

#[tokio::test]
async fn empty_hint_runs_full_portal_scan() {
    let portal = MockServer::start().await;

    let body = json!([
        { "id": "001788fffe23a581", "internalipaddress": "10.0.0.5" },
        { "id": "001788fffe99b772", "internalipaddress": "10.0.0.9" },
    ]);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&portal)
        .await;

    let found = discovery(&portal)
        .find_bridges(&HashMap::new())
        .await
        .unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found[SERIAL], "http://10.0.0.5/");
    assert_eq!(found["001788FFFE99B772"], "http://10.0.0.9/");
}

#[tokio::test]
async fn hinted_serial_confirmed_at_known_address() {
    let portal = MockServer::start().await;
    let bridge = MockServer::start().await;

    // The known address still answers as the expected bridge, so the
    // portal must not be consulted at all.
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bridgeid": "001788fffe23a581",
            "name": "Philips hue",
        })))
        .mount(&bridge)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&portal)
        .await;

    let hint = HashMap::from([(
        SERIAL.to_owned(),
        BridgeAddress::new(bridge.uri(), Some("userX".into())),
    )]);

    let found = discovery(&portal).find_bridges(&hint).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[SERIAL], bridge.uri());
}

#[tokio::test]
async fn hinted_serial_without_address_falls_back_to_portal() {
    let portal = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "001788fffe23a581", "internalipaddress": "10.0.0.7" },
            { "id": "001788fffe99b772", "internalipaddress": "10.0.0.9" },
        ])))
        .expect(1)
        .mount(&portal)
        .await;

    // Unreachable stub: empty base, credential retained.
    let hint = HashMap::from([(
        SERIAL.to_owned(),
        BridgeAddress::unreachable(Some("userX".into())),
    )]);

    let found = discovery(&portal).find_bridges(&hint).await.unwrap();

    // The fallback scan is restricted to hinted serials; the second
    // portal record must not leak into the result.
    assert_eq!(found.len(), 1);
    assert_eq!(found[SERIAL], "http://10.0.0.7/");
}

#[tokio::test]
async fn hinted_serial_missing_everywhere_is_omitted() {
    let portal = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&portal)
        .await;

    let hint = HashMap::from([(
        SERIAL.to_owned(),
        BridgeAddress::unreachable(Some("userX".into())),
    )]);

    let found = discovery(&portal).find_bridges(&hint).await.unwrap();
    assert!(found.is_empty());
}
