// Control-plane response and request types
//
// Wire models for the site-to-site VPN control plane. Successful responses
// are wrapped in `ApiResponse<T>`; failures carry `ApiErrorBody`. Optional
// fields use `#[serde(default)]` because providers omit them freely.

use serde::{Deserialize, Deserializer, Serialize};

// ── Envelope ─────────────────────────────────────────────────────────

/// Success envelope: `{ "data": ... }`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Failure body: `{ "error": { "code": "...", "message": "..." } }`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Labels ───────────────────────────────────────────────────────────

/// A key/value tag attached to a remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    pub value: String,
}

// ── VPN connections ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpnConnectionResponse {
    pub id: String,
    /// `pending`, `available`, `deleting`, or `deleted`.
    pub state: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub customer_gateway_id: String,
    pub gateway_ip: String,
    #[serde(default)]
    pub transit_gateway_id: Option<String>,
    #[serde(default)]
    pub tunnels: Vec<TunnelResponse>,
    pub ike: IkeResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunnelResponse {
    /// `UP`, `DOWN`, or anything else (treated as unknown).
    #[serde(default)]
    pub state: Option<String>,
    pub inside_cidr: String,
    pub outside_ip: String,
    pub pre_shared_key: String,
    #[serde(default)]
    pub status_message: Option<String>,
    /// RFC 3339 timestamp of the last telemetry state change.
    #[serde(default)]
    pub last_status_change: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IkeResponse {
    pub version: String,
    pub encryption_algorithm: String,
    pub authentication_algorithm: String,
    pub dh_group: u32,
    pub lifetime_seconds: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociateCustomerGatewayRequest<'a> {
    pub customer_gateway_id: &'a str,
}

// ── Customer gateways ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerGatewayResponse {
    pub id: String,
    pub ip_address: String,
    /// Providers disagree on whether this is a number or a string.
    #[serde(deserialize_with = "number_or_string")]
    pub bgp_asn: u64,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerGatewayRequest<'a> {
    pub ip_address: &'a str,
    pub bgp_asn: u64,
    #[serde(rename = "type")]
    pub gateway_type: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResource {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelResourceRequest<'a> {
    pub resource_id: &'a str,
    pub key: &'a str,
    pub value: &'a str,
}

// ── VPCs ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcResponse {
    pub id: String,
    pub state: String,
    #[serde(default)]
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

// ── Helpers ──────────────────────────────────────────────────────────

fn number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bgp_asn_accepts_string_and_number() {
        let from_str: CustomerGatewayResponse = serde_json::from_value(json!({
            "id": "cgw-1", "ipAddress": "10.0.0.1", "bgpAsn": "65000"
        }))
        .unwrap();
        let from_num: CustomerGatewayResponse = serde_json::from_value(json!({
            "id": "cgw-1", "ipAddress": "10.0.0.1", "bgpAsn": 65000
        }))
        .unwrap();
        assert_eq!(from_str.bgp_asn, 65000);
        assert_eq!(from_num.bgp_asn, 65000);
        assert!(from_str.labels.is_empty());
    }

    #[test]
    fn create_request_serializes_type_field() {
        let body = serde_json::to_value(CreateCustomerGatewayRequest {
            ip_address: "10.0.0.1",
            bgp_asn: 65000,
            gateway_type: "ipsec.1",
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "ipAddress": "10.0.0.1", "bgpAsn": 65000, "type": "ipsec.1" })
        );
    }
}
