// ── Customer (peer) gateway domain types ──

use std::fmt;

use serde::{Serialize, Serializer};

use super::id::ResourceId;

/// An on-premises endpoint registered with the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerGateway {
    pub id: ResourceId,
    pub ip_address: String,
    pub bgp_asn: u64,
    /// From the `Name` label, or [`UNNAMED`](super::UNNAMED).
    pub name: String,
}

/// Resolved address of a connection's peer gateway.
///
/// `Unknown` is shown as `unknown`, never as an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerAddress {
    Known(String),
    Unknown,
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(addr) => f.write_str(addr),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for PeerAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
