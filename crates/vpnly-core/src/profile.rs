// ── IPsec profile compiler ──

use crate::error::CoreError;
use crate::model::{IpsecProfile, VpnConnection};

/// Build the push snapshot for `connection` from its first tunnel.
///
/// Further tunnels are ignored. A connection without tunnels cannot be
/// pushed and yields `NoTunnelData`.
pub fn compile(connection: &VpnConnection) -> Result<IpsecProfile, CoreError> {
    let tunnel = connection
        .primary_tunnel()
        .ok_or_else(|| CoreError::NoTunnelData {
            vpn_id: connection.id.to_string(),
        })?;

    Ok(IpsecProfile {
        vpn_connection_id: connection.id.clone(),
        peer_gateway_id: connection.peer_gateway_id.clone(),
        tunnel_inside_cidr: tunnel.inside_cidr.clone(),
        pre_shared_key: tunnel.pre_shared_key.clone(),
        tunnel_outside_ip: tunnel.outside_ip.clone(),
    })
}

/// Downstream consumer of pushed profiles. Receives each snapshot by value.
pub trait ProfileSink {
    fn push(&self, profile: IpsecProfile) -> Result<(), CoreError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{IkeSettings, ResourceId, Tunnel, TunnelState, VpnState};
    use pretty_assertions::assert_eq;
    use secrecy::{ExposeSecret, SecretString};
    use serde_json::json;

    fn tunnel(cidr: &str, outside: &str, psk: &str) -> Tunnel {
        Tunnel {
            state: TunnelState::Up,
            inside_cidr: cidr.into(),
            outside_ip: outside.into(),
            pre_shared_key: SecretString::from(psk.to_owned()),
            status_message: None,
            last_status_change: None,
        }
    }

    fn connection(tunnels: Vec<Tunnel>) -> VpnConnection {
        VpnConnection {
            id: ResourceId::new("vpn-1"),
            state: VpnState::Available,
            display_name: "hq".into(),
            peer_gateway_id: ResourceId::new("cgw-2"),
            gateway_ip: "198.51.100.7".into(),
            transit_gateway_id: None,
            tunnels,
            ike: IkeSettings {
                version: "ikev2".into(),
                encryption_algorithm: "AES256".into(),
                authentication_algorithm: "SHA2-256".into(),
                dh_group: 14,
                lifetime_seconds: 28800,
            },
        }
    }

    #[test]
    fn no_tunnels_is_refused() {
        let err = compile(&connection(vec![])).unwrap_err();
        assert!(matches!(err, CoreError::NoTunnelData { ref vpn_id } if vpn_id == "vpn-1"));
    }

    #[test]
    fn uses_first_tunnel_only() {
        let profile = compile(&connection(vec![
            tunnel("169.254.0.0/30", "203.0.113.5", "abc123"),
            tunnel("169.254.1.0/30", "203.0.113.6", "other"),
        ]))
        .unwrap();
        assert_eq!(profile.tunnel_inside_cidr, "169.254.0.0/30");
        assert_eq!(profile.tunnel_outside_ip, "203.0.113.5");
        assert_eq!(profile.pre_shared_key.expose_secret(), "abc123");
        assert_eq!(profile.peer_gateway_id.as_str(), "cgw-2");
    }

    #[test]
    fn serialized_profile_carries_key_but_debug_does_not() {
        let profile = compile(&connection(vec![tunnel("169.254.0.0/30", "203.0.113.5", "abc123")]))
            .unwrap();
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({
                "vpnConnectionId": "vpn-1",
                "peerGatewayId": "cgw-2",
                "tunnelInsideCidr": "169.254.0.0/30",
                "preSharedKey": "abc123",
                "tunnelOutsideIp": "203.0.113.5"
            })
        );
        assert!(!format!("{profile:?}").contains("abc123"));
    }
}
