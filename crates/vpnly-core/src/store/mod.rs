// ── Session caches ──
//
// The VPN Directory and the Customer Gateway Registry, both built on an
// ordered `EntityCollection`. Every cache update is an explicit
// invalidate-and-reload or a ticketed point fetch; nothing is patched from
// mutation inputs.

pub(crate) mod collection;
pub mod directory;
pub mod registry;
pub(crate) mod ticket;

pub use directory::{Fetched, VpnDirectory};
pub use collection::Snapshot;
pub use registry::GatewayRegistry;

use crate::model::{CustomerGateway, ResourceId, VpnConnection};

/// Entities stored in an `EntityCollection`, keyed by their provider id.
pub(crate) trait Keyed {
    fn key(&self) -> &ResourceId;
}

impl Keyed for VpnConnection {
    fn key(&self) -> &ResourceId {
        &self.id
    }
}

impl Keyed for CustomerGateway {
    fn key(&self) -> &ResourceId {
        &self.id
    }
}
