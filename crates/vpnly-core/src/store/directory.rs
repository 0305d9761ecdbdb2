// ── VPN Directory ──
//
// Cache of VPN connections keyed by id, in provider order. Detail is never
// trusted from the list: selecting a connection and refreshing it after a
// mutation both re-fetch it, and only the most recently dispatched fetch
// for an id may update the cache.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use super::collection::{EntityCollection, Snapshot};
use super::ticket::{FetchTickets, TicketKey};
use crate::error::CoreError;
use crate::gateway::ResourceGateway;
use crate::model::{ResourceId, VpnConnection};

/// Outcome of a ticketed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    /// The response was the latest for its key and has been applied.
    Current(T),
    /// A newer fetch for the same key was dispatched; this response was dropped.
    Superseded,
}

impl<T> Fetched<T> {
    pub fn current(self) -> Option<T> {
        match self {
            Self::Current(value) => Some(value),
            Self::Superseded => None,
        }
    }
}

pub struct VpnDirectory {
    entries: EntityCollection<VpnConnection>,
    tickets: FetchTickets,
    /// Ticket sequence of the last point fetch applied per id.
    applied: DashMap<ResourceId, u64>,
}

impl VpnDirectory {
    pub fn new() -> Self {
        Self {
            entries: EntityCollection::new(),
            tickets: FetchTickets::new(),
            applied: DashMap::new(),
        }
    }

    pub fn get(&self, id: &ResourceId) -> Option<Arc<VpnConnection>> {
        self.entries.get(id.as_str())
    }

    /// All cached connections in provider order.
    pub fn connections(&self) -> Snapshot<VpnConnection> {
        self.entries.snapshot()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invalidate and reload the whole directory from `listVpnConnections`.
    ///
    /// On failure the previous contents stay in place. Entries re-fetched
    /// individually after this reload was dispatched are kept over the
    /// (older) list copy.
    pub async fn reload<G: ResourceGateway>(
        &self,
        gateway: &G,
    ) -> Result<Fetched<usize>, CoreError> {
        let ticket = self.tickets.issue(TicketKey::All);
        debug!(seq = ticket.seq(), "reloading vpn directory");

        let listed = gateway.list_vpn_connections().await?;
        let count = listed.len();

        let applied = self.tickets.apply_if_current(&ticket, || {
            let items = listed
                .into_iter()
                .map(|conn| {
                    let fresher = self
                        .applied
                        .get(&conn.id)
                        .filter(|seq| **seq > ticket.seq())
                        .and_then(|_| self.entries.get(conn.id.as_str()));
                    fresher.unwrap_or_else(|| Arc::new(conn))
                })
                .collect();
            self.entries.replace_all(items);
        });

        if applied {
            debug!(count, "vpn directory reloaded");
            Ok(Fetched::Current(count))
        } else {
            warn!("discarding superseded vpn directory listing");
            Ok(Fetched::Superseded)
        }
    }

    /// Fetch one connection for display. Never served from the list cache.
    pub async fn select_connection<G: ResourceGateway>(
        &self,
        gateway: &G,
        id: &ResourceId,
    ) -> Result<Fetched<Arc<VpnConnection>>, CoreError> {
        self.fetch_one(gateway, id).await
    }

    /// Re-fetch one connection after a mutation this session issued. This
    /// is the only path by which a mutation's effect reaches the cache.
    pub async fn refresh_after_mutation<G: ResourceGateway>(
        &self,
        gateway: &G,
        id: &ResourceId,
    ) -> Result<Fetched<Arc<VpnConnection>>, CoreError> {
        self.fetch_one(gateway, id).await
    }

    async fn fetch_one<G: ResourceGateway>(
        &self,
        gateway: &G,
        id: &ResourceId,
    ) -> Result<Fetched<Arc<VpnConnection>>, CoreError> {
        let ticket = self.tickets.issue(TicketKey::One(id.clone()));
        debug!(%id, seq = ticket.seq(), "fetching vpn connection");

        match gateway.get_vpn_connection(id).await {
            Ok(conn) => {
                let conn = Arc::new(conn);
                let applied = self.tickets.apply_if_current(&ticket, || {
                    self.entries.upsert(Arc::clone(&conn));
                    self.applied.insert(id.clone(), ticket.seq());
                });
                if applied {
                    Ok(Fetched::Current(conn))
                } else {
                    warn!(%id, seq = ticket.seq(), "discarding superseded vpn connection response");
                    Ok(Fetched::Superseded)
                }
            }
            Err(err) if !self.tickets.is_current(&ticket) => {
                debug!(%id, error = %err, "ignoring failure of superseded fetch");
                Ok(Fetched::Superseded)
            }
            Err(err) if err.is_not_found() => {
                warn!(%id, "vpn connection no longer exists, reloading directory");
                if let Err(reload_err) = self.reload(gateway).await {
                    warn!(error = %reload_err, "directory reload after not-found failed");
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}

impl Default for VpnDirectory {
    fn default() -> Self {
        Self::new()
    }
}
