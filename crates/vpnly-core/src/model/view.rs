// ── Denormalized connection view ──
//
// A VPN connection joined with its peer gateway as resolved at fetch time.
// Views are immutable; a refresh replaces the whole value.

use std::sync::Arc;

use serde::Serialize;

use super::gateway::{CustomerGateway, PeerAddress};
use super::id::ResourceId;
use super::vpn::VpnConnection;
use super::UNNAMED;

/// The peer gateway side of a [`ConnectionView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPeer {
    pub id: ResourceId,
    pub address: PeerAddress,
    pub name: String,
}

impl ResolvedPeer {
    pub fn from_gateway(gateway: &CustomerGateway) -> Self {
        Self {
            id: gateway.id.clone(),
            address: PeerAddress::Known(gateway.ip_address.clone()),
            name: gateway.name.clone(),
        }
    }

    /// The referenced gateway could not be found anywhere.
    pub fn unknown(id: ResourceId) -> Self {
        Self {
            id,
            address: PeerAddress::Unknown,
            name: UNNAMED.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionView {
    pub connection: Arc<VpnConnection>,
    pub peer: ResolvedPeer,
}

impl ConnectionView {
    pub fn new(connection: Arc<VpnConnection>, peer: ResolvedPeer) -> Self {
        Self { connection, peer }
    }

    pub fn id(&self) -> &ResourceId {
        &self.connection.id
    }
}
