// ── VPN connection domain types ──

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;
use strum::{Display, EnumString};

use super::id::ResourceId;

/// Provisioning state of a VPN connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VpnState {
    Pending,
    Available,
    Deleting,
    Deleted,
}

/// Telemetry state of a single tunnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TunnelState {
    Up,
    Down,
    #[default]
    Unknown,
}

impl TunnelState {
    /// Providers report `UP`/`DOWN` in any case, or omit the field.
    /// Anything else is `Unknown`.
    pub fn from_provider(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("up") => Self::Up,
            Some(s) if s.eq_ignore_ascii_case("down") => Self::Down,
            _ => Self::Unknown,
        }
    }
}

/// One encrypted path within a VPN connection.
///
/// The pre-shared key never appears in `Debug` output and is skipped when
/// the tunnel is serialized; callers that must show it read it explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct Tunnel {
    pub state: TunnelState,
    pub inside_cidr: String,
    pub outside_ip: String,
    #[serde(skip_serializing)]
    pub pre_shared_key: SecretString,
    pub status_message: Option<String>,
    pub last_status_change: Option<DateTime<Utc>>,
}

/// IKE negotiation parameters, fixed once the connection exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IkeSettings {
    pub version: String,
    pub encryption_algorithm: String,
    pub authentication_algorithm: String,
    pub dh_group: u32,
    pub lifetime_seconds: u64,
}

/// The canonical VPN connection type.
#[derive(Debug, Clone, Serialize)]
pub struct VpnConnection {
    pub id: ResourceId,
    pub state: VpnState,
    pub display_name: String,
    pub peer_gateway_id: ResourceId,
    pub gateway_ip: String,
    pub transit_gateway_id: Option<ResourceId>,
    /// Provider response order. Usually one or two entries.
    pub tunnels: Vec<Tunnel>,
    pub ike: IkeSettings,
}

impl VpnConnection {
    /// The tunnel used for summaries and profile pushes.
    pub fn primary_tunnel(&self) -> Option<&Tunnel> {
        self.tunnels.first()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tunnel_state_is_lenient() {
        assert_eq!(TunnelState::from_provider(Some("UP")), TunnelState::Up);
        assert_eq!(TunnelState::from_provider(Some("down")), TunnelState::Down);
        assert_eq!(TunnelState::from_provider(Some("IMPAIRED")), TunnelState::Unknown);
        assert_eq!(TunnelState::from_provider(None), TunnelState::Unknown);
    }

    #[test]
    fn vpn_state_parses_any_case() {
        assert_eq!("Available".parse::<VpnState>().unwrap(), VpnState::Available);
        assert_eq!(VpnState::Deleting.to_string(), "deleting");
        assert!("rebooting".parse::<VpnState>().is_err());
    }
}
