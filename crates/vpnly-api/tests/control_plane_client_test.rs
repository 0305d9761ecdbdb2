#![allow(clippy::unwrap_used)]
// Integration tests for `ControlPlaneClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vpnly_api::{ControlPlaneClient, Credentials, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ControlPlaneClient) {
    let server = MockServer::start().await;
    let client = ControlPlaneClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn vpn_body(id: &str, peer: &str) -> serde_json::Value {
    json!({
        "id": id,
        "state": "available",
        "labels": [{ "key": "Name", "value": "hq-link" }],
        "customerGatewayId": peer,
        "gatewayIp": "198.51.100.7",
        "tunnels": [{
            "state": "UP",
            "insideCidr": "169.254.0.0/30",
            "outsideIp": "203.0.113.5",
            "preSharedKey": "abc123",
            "lastStatusChange": "2026-01-02T03:04:05Z"
        }],
        "ike": {
            "version": "ikev2",
            "encryptionAlgorithm": "AES256",
            "authenticationAlgorithm": "SHA2-256",
            "dhGroup": 14,
            "lifetimeSeconds": 28800
        }
    })
}

// ── VPN connections ─────────────────────────────────────────────────

#[tokio::test]
async fn test_list_vpn_connections_preserves_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/vpn-connections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [vpn_body("vpn-b", "cgw-1"), vpn_body("vpn-a", "cgw-2")]
        })))
        .mount(&server)
        .await;

    let vpns = client.list_vpn_connections().await.unwrap();

    let ids: Vec<_> = vpns.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["vpn-b", "vpn-a"]);
    assert_eq!(vpns[0].tunnels[0].pre_shared_key, "abc123");
    assert_eq!(vpns[0].ike.dh_group, 14);
    assert!(vpns[0].transit_gateway_id.is_none());
}

#[tokio::test]
async fn test_get_vpn_connection() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/vpn-connections/vpn-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": vpn_body("vpn-1", "cgw-9") })),
        )
        .mount(&server)
        .await;

    let vpn = client.get_vpn_connection("vpn-1").await.unwrap();
    assert_eq!(vpn.customer_gateway_id, "cgw-9");
    assert_eq!(vpn.labels[0].value, "hq-link");
}

#[tokio::test]
async fn test_get_vpn_connection_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/vpn-connections/vpn-gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": "InvalidVpnConnectionID.NotFound", "message": "gone" }
        })))
        .mount(&server)
        .await;

    let result = client.get_vpn_connection("vpn-gone").await;
    assert!(
        matches!(result, Err(ref e) if e.is_not_found()),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_associate_customer_gateway_sends_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/vpn-connections/vpn-1/customer-gateway"))
        .and(body_json(json!({ "customerGatewayId": "cgw-2" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.associate_customer_gateway("vpn-1", "cgw-2").await.unwrap();
}

#[tokio::test]
async fn test_ids_are_percent_encoded() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/vpn-connections/a%2Fb"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": vpn_body("a/b", "cgw-1") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let vpn = client.get_vpn_connection("a/b").await.unwrap();
    assert_eq!(vpn.id, "a/b");
}

// ── Customer gateways ───────────────────────────────────────────────

#[tokio::test]
async fn test_create_customer_gateway_returns_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/customer-gateways"))
        .and(body_json(json!({
            "ipAddress": "10.0.0.3",
            "bgpAsn": 65010,
            "type": "ipsec.1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "data": { "id": "cgw-new" } })))
        .mount(&server)
        .await;

    let id = client.create_customer_gateway("10.0.0.3", 65010).await.unwrap();
    assert_eq!(id, "cgw-new");
}

#[tokio::test]
async fn test_create_customer_gateway_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/customer-gateways"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": { "code": "InvalidParameterValue", "message": "bgpAsn out of range" }
        })))
        .mount(&server)
        .await;

    let result = client.create_customer_gateway("10.0.0.3", 0).await;
    match result {
        Err(Error::Rejected {
            status,
            code,
            message,
        }) => {
            assert_eq!(status, 422);
            assert_eq!(code.as_deref(), Some("InvalidParameterValue"));
            assert_eq!(message, "bgpAsn out of range");
        }
        other => panic!("expected Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_label_resource() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/labels"))
        .and(body_json(json!({
            "resourceId": "cgw-new",
            "key": "Name",
            "value": "site-c"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;

    client.label_resource("cgw-new", "site-c").await.unwrap();
}

#[tokio::test]
async fn test_list_vpcs() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/vpcs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "vpc-1", "state": "available", "cidrBlock": "10.10.0.0/16" }]
        })))
        .mount(&server)
        .await;

    let vpcs = client.list_vpcs().await.unwrap();
    assert_eq!(vpcs.len(), 1);
    assert_eq!(vpcs[0].cidr_block.as_deref(), Some("10.10.0.0/16"));
}

// ── Error classification ────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/customer-gateways"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_customer_gateways().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication, got: {result:?}"
    );
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/customer-gateways"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client.list_customer_gateways().await.unwrap_err();
    assert!(err.is_transient());
    assert!(matches!(err, Error::Api { status: 503, ref message } if message == "maintenance"));
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/vpcs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_vpcs().await;
    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body == "not json"),
        "expected Deserialization, got: {result:?}"
    );
}

// ── Authentication headers ──────────────────────────────────────────

#[tokio::test]
async fn test_credentials_sent_as_headers() {
    let server = MockServer::start().await;
    let creds = Credentials::new(
        "AKIDEXAMPLE",
        SecretString::from("s3cr3t".to_owned()),
        "eu-central-1",
    );
    let client = ControlPlaneClient::new(
        Url::parse(&server.uri()).unwrap(),
        &creds,
        &TransportConfig::default(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/vpcs"))
        .and(header("x-access-key-id", "AKIDEXAMPLE"))
        .and(header("x-access-key-secret", "s3cr3t"))
        .and(header("x-region", "eu-central-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let vpcs = client.list_vpcs().await.unwrap();
    assert!(vpcs.is_empty());
}
