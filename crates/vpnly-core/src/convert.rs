// ── API-to-domain type conversions ──
//
// Bridges raw `vpnly_api::models` responses into `vpnly_core::model`
// types: resolves display names from labels, parses state strings and
// timestamps, and wraps secrets.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use vpnly_api::labels::NAME_LABEL;
use vpnly_api::models::{
    CustomerGatewayResponse, IkeResponse, Label, TunnelResponse, VpcResponse,
    VpnConnectionResponse,
};

use crate::error::{CoreError, UnavailableKind};
use crate::model::{
    CustomerGateway, IkeSettings, ResourceId, Tunnel, TunnelState, UNNAMED, Vpc, VpnConnection,
    VpnState,
};

// ── Helpers ────────────────────────────────────────────────────────

/// First `Name` label wins; no label yields the `unnamed` sentinel.
pub(crate) fn display_name(labels: &[Label]) -> String {
    labels
        .iter()
        .find(|l| l.key == NAME_LABEL)
        .map_or_else(|| UNNAMED.to_owned(), |l| l.value.clone())
}

fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

// ── VPN connections ────────────────────────────────────────────────

impl TryFrom<VpnConnectionResponse> for VpnConnection {
    type Error = CoreError;

    fn try_from(raw: VpnConnectionResponse) -> Result<Self, Self::Error> {
        let state = raw
            .state
            .parse::<VpnState>()
            .map_err(|_| CoreError::GatewayUnavailable {
                kind: UnavailableKind::Service,
                reason: format!(
                    "unexpected state '{}' for VPN connection {}",
                    raw.state, raw.id
                ),
            })?;

        Ok(Self {
            display_name: display_name(&raw.labels),
            id: ResourceId::from(raw.id),
            state,
            peer_gateway_id: ResourceId::from(raw.customer_gateway_id),
            gateway_ip: raw.gateway_ip,
            transit_gateway_id: raw.transit_gateway_id.map(ResourceId::from),
            tunnels: raw.tunnels.into_iter().map(Tunnel::from).collect(),
            ike: IkeSettings::from(raw.ike),
        })
    }
}

impl From<TunnelResponse> for Tunnel {
    fn from(raw: TunnelResponse) -> Self {
        Self {
            state: TunnelState::from_provider(raw.state.as_deref()),
            inside_cidr: raw.inside_cidr,
            outside_ip: raw.outside_ip,
            pre_shared_key: SecretString::from(raw.pre_shared_key),
            status_message: raw.status_message.filter(|m| !m.is_empty()),
            last_status_change: parse_datetime(raw.last_status_change.as_deref()),
        }
    }
}

impl From<IkeResponse> for IkeSettings {
    fn from(raw: IkeResponse) -> Self {
        Self {
            version: raw.version,
            encryption_algorithm: raw.encryption_algorithm,
            authentication_algorithm: raw.authentication_algorithm,
            dh_group: raw.dh_group,
            lifetime_seconds: raw.lifetime_seconds,
        }
    }
}

// ── Customer gateways ──────────────────────────────────────────────

impl From<CustomerGatewayResponse> for CustomerGateway {
    fn from(raw: CustomerGatewayResponse) -> Self {
        Self {
            name: display_name(&raw.labels),
            id: ResourceId::from(raw.id),
            ip_address: raw.ip_address,
            bgp_asn: raw.bgp_asn,
        }
    }
}

// ── VPCs ───────────────────────────────────────────────────────────

impl From<VpcResponse> for Vpc {
    fn from(raw: VpcResponse) -> Self {
        Self {
            display_name: display_name(&raw.labels),
            id: ResourceId::from(raw.id),
            state: raw.state,
            cidr_block: raw.cidr_block,
        }
    }
}
