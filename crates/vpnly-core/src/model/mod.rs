// ── Domain model ──
//
// Canonical, display-ready representations of the control-plane resources.
// Built from `vpnly_api::models` in `convert`; consumers (CLI, shell) depend
// only on these types.

pub mod gateway;
pub mod id;
pub mod profile;
pub mod vpc;
pub mod view;
pub mod vpn;

// ── Re-exports ──────────────────────────────────────────────────────

pub use gateway::{CustomerGateway, PeerAddress};
pub use id::ResourceId;
pub use profile::IpsecProfile;
pub use vpc::Vpc;
pub use view::{ConnectionView, ResolvedPeer};
pub use vpn::{IkeSettings, Tunnel, TunnelState, VpnConnection, VpnState};

/// Display name used when a resource carries no `Name` label.
pub const UNNAMED: &str = "unnamed";
