// ── Customer Gateway Registry ──
//
// Cache of peer gateways plus the create-and-register flow. Creation is a
// two-step remote mutation (create, then label) followed by an
// unconditional reload; at most one create runs at a time.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::collection::{EntityCollection, Snapshot};
use super::directory::Fetched;
use super::ticket::{FetchTickets, TicketKey};
use crate::error::{CoreError, DegradedStage};
use crate::gateway::ResourceGateway;
use crate::model::{CustomerGateway, ResolvedPeer, ResourceId};
use crate::validate::{validate_gateway_input, validate_name};

const CREATE_GATEWAY: &str = "create gateway";
const LABEL_GATEWAY: &str = "label gateway";

pub struct GatewayRegistry {
    entries: EntityCollection<CustomerGateway>,
    tickets: FetchTickets,
    create_guard: Mutex<()>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self {
            entries: EntityCollection::new(),
            tickets: FetchTickets::new(),
            create_guard: Mutex::new(()),
        }
    }

    pub fn get(&self, id: &ResourceId) -> Option<Arc<CustomerGateway>> {
        self.entries.get(id.as_str())
    }

    /// All cached gateways in provider order.
    pub fn gateways(&self) -> Snapshot<CustomerGateway> {
        self.entries.snapshot()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a create is currently in flight.
    pub fn is_creating(&self) -> bool {
        self.create_guard.try_lock().is_err()
    }

    /// Invalidate and reload the registry from `listCustomerGateways`.
    pub async fn reload<G: ResourceGateway>(
        &self,
        gateway: &G,
    ) -> Result<Fetched<usize>, CoreError> {
        let ticket = self.tickets.issue(TicketKey::All);
        debug!(seq = ticket.seq(), "reloading gateway registry");

        let listed = gateway.list_customer_gateways().await?;
        let count = listed.len();

        let applied = self.tickets.apply_if_current(&ticket, || {
            self.entries
                .replace_all(listed.into_iter().map(Arc::new).collect());
        });

        if applied {
            debug!(count, "gateway registry reloaded");
            Ok(Fetched::Current(count))
        } else {
            warn!("discarding superseded gateway listing");
            Ok(Fetched::Superseded)
        }
    }

    /// Resolve a peer gateway for display. Never fails.
    ///
    /// Served from the cache when present, otherwise fetched once and
    /// cached. If the gateway cannot be found the address is `Unknown`; a
    /// `NotFound` also reloads the registry, since the cache is out of date.
    pub async fn resolve_peer<G: ResourceGateway>(
        &self,
        gateway: &G,
        id: &ResourceId,
    ) -> ResolvedPeer {
        if let Some(cached) = self.get(id) {
            return ResolvedPeer::from_gateway(&cached);
        }

        debug!(%id, "peer gateway not cached, fetching");
        match gateway.get_customer_gateway(id).await {
            Ok(found) => {
                let found = Arc::new(found);
                self.entries.upsert(Arc::clone(&found));
                ResolvedPeer::from_gateway(&found)
            }
            Err(err) if err.is_not_found() => {
                warn!(%id, "peer gateway no longer exists, reloading registry");
                if let Err(reload_err) = self.reload(gateway).await {
                    warn!(error = %reload_err, "registry reload after not-found failed");
                }
                self.get(id).map_or_else(
                    || ResolvedPeer::unknown(id.clone()),
                    |cached| ResolvedPeer::from_gateway(&cached),
                )
            }
            Err(err) => {
                warn!(%id, error = %err, "peer gateway unresolved");
                ResolvedPeer::unknown(id.clone())
            }
        }
    }

    /// Validate, create, label, then reload.
    ///
    /// Returns the new gateway id. A failed label step yields
    /// `Degraded { stage: Label }` carrying the id: the gateway exists but
    /// reads as unnamed. A failed reload after a complete create yields
    /// `Degraded { stage: Refresh }`.
    pub async fn create<G: ResourceGateway>(
        &self,
        gateway: &G,
        ip: &str,
        asn: &str,
        name: &str,
    ) -> Result<ResourceId, CoreError> {
        let input = validate_gateway_input(ip, asn, name)?;

        let Ok(_in_flight) = self.create_guard.try_lock() else {
            return Err(CoreError::OperationInProgress {
                operation: CREATE_GATEWAY.into(),
            });
        };

        let id = gateway.create_customer_gateway(input.ip, input.asn).await?;
        info!(%id, ip = %input.ip, asn = input.asn, "customer gateway created");

        let labelled = gateway.label_resource(&id, &input.name).await;
        if let Err(err) = &labelled {
            warn!(%id, error = %err, "customer gateway created without a name");
        }

        let reloaded = self.reload(gateway).await;

        match (labelled, reloaded) {
            (Err(err), _) => Err(CoreError::degraded(
                CREATE_GATEWAY,
                &id,
                DegradedStage::Label,
                &err,
            )),
            (Ok(()), Err(err)) => Err(CoreError::degraded(
                CREATE_GATEWAY,
                &id,
                DegradedStage::Refresh,
                &err,
            )),
            (Ok(()), Ok(_)) => Ok(id),
        }
    }

    /// Attach (or fix) a gateway's name, then reload.
    pub async fn label<G: ResourceGateway>(
        &self,
        gateway: &G,
        id: &ResourceId,
        name: &str,
    ) -> Result<(), CoreError> {
        let name = validate_name(name)?;

        if let Err(err) = gateway.label_resource(id, &name).await {
            if err.is_not_found() {
                warn!(%id, "gateway no longer exists, reloading registry");
                if let Err(reload_err) = self.reload(gateway).await {
                    warn!(error = %reload_err, "registry reload after not-found failed");
                }
            }
            return Err(err);
        }
        info!(%id, "customer gateway labelled");

        self.reload(gateway)
            .await
            .map_err(|err| CoreError::degraded(LABEL_GATEWAY, id, DegradedStage::Refresh, &err))?;
        Ok(())
    }
}

impl Default for GatewayRegistry {
    fn default() -> Self {
        Self::new()
    }
}
