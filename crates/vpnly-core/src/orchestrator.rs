// ── Orchestrator ──
//
// The operator-facing action set. Each action may issue several gateway
// calls in sequence but reports one outcome. Remote state is observed only
// at load, at selection and right after a mutation issued here.

use std::sync::Arc;

use tracing::{info, warn};
use vpnly_api::{ControlPlaneClient, Credentials, TlsMode, TransportConfig};

use crate::config::{SessionConfig, TlsVerification};
use crate::error::{CoreError, DegradedStage};
use crate::gateway::ResourceGateway;
use crate::model::{ConnectionView, IpsecProfile, ResourceId, Vpc};
use crate::profile::{ProfileSink, compile};
use crate::selection::SelectionState;
use crate::session::{LoadState, Session};

const REASSOCIATE_GATEWAY: &str = "reassociate gateway";

/// Cache sizes after a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub connections: usize,
    pub gateways: usize,
}

/// Drives a [`Session`] against a [`ResourceGateway`].
///
/// Cheaply cloneable; clones share the gateway. Sessions are passed per
/// call, so one orchestrator can serve several independent sessions.
pub struct Orchestrator<G> {
    gateway: Arc<G>,
}

impl<G> Clone for Orchestrator<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl Orchestrator<ControlPlaneClient> {
    /// Build an orchestrator talking HTTP to the configured control plane.
    pub fn from_config(config: &SessionConfig) -> Result<Self, CoreError> {
        let credentials = Credentials::new(
            config.credentials.key_id.clone(),
            config.credentials.secret.clone(),
            config.region.clone(),
        );
        let transport = TransportConfig {
            tls: tls_to_transport(&config.tls),
            timeout: config.timeout,
        };
        let client = ControlPlaneClient::new(config.endpoint.clone(), &credentials, &transport)?;
        Ok(Self::new(client))
    }
}

impl<G: ResourceGateway> Orchestrator<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Load the VPN Directory and the Gateway Registry in parallel.
    ///
    /// The session is `Ready` only once both have loaded.
    pub async fn load_all(&self, session: &Session) -> Result<LoadSummary, CoreError> {
        session.set_load_state(LoadState::Loading);
        let gateway = self.gateway.as_ref();

        let (vpns, gateways) = tokio::join!(
            session.directory().reload(gateway),
            session.registry().reload(gateway),
        );

        match (vpns, gateways) {
            (Ok(_), Ok(_)) => {
                let summary = LoadSummary {
                    connections: session.directory().len(),
                    gateways: session.registry().len(),
                };
                info!(
                    connections = summary.connections,
                    gateways = summary.gateways,
                    "session ready"
                );
                session.set_load_state(LoadState::Ready);
                Ok(summary)
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = %err, "initial load failed");
                session.set_load_state(LoadState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    /// Invalidate and reload both caches, then re-fetch whatever is
    /// currently selected so its view matches the fresh caches.
    pub async fn reload(&self, session: &Session) -> Result<LoadSummary, CoreError> {
        let summary = self.load_all(session).await?;
        let snapshot = session.selection().current();
        if let Some(id) = snapshot.state.selected_id() {
            self.load_view(session, id, snapshot.generation).await?;
        }
        Ok(summary)
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Select a connection and fetch its current state.
    ///
    /// Returns `None` if a later selection superseded this one before the
    /// fetch resolved; the session then reflects only the later one.
    pub async fn select_vpn(
        &self,
        session: &Session,
        id: &ResourceId,
    ) -> Result<Option<Arc<ConnectionView>>, CoreError> {
        let generation = session.selection().begin_select(id);
        self.load_view(session, id, generation).await
    }

    /// Expand detail for `id` (re-fetching it), or collapse it if it is
    /// already expanded. Returns the resulting state.
    pub async fn toggle_detail(
        &self,
        session: &Session,
        id: &ResourceId,
    ) -> Result<SelectionState, CoreError> {
        let (state, generation) = session.selection().begin_toggle(id);
        if !state.is_expanded() {
            return Ok(state);
        }

        match self.load_view(session, id, generation).await {
            Ok(_) => Ok(session.selection().state()),
            Err(err) => {
                if !err.is_not_found() {
                    session.selection().revert_expand(generation);
                }
                Err(err)
            }
        }
    }

    async fn load_view(
        &self,
        session: &Session,
        id: &ResourceId,
        generation: u64,
    ) -> Result<Option<Arc<ConnectionView>>, CoreError> {
        let gateway = self.gateway.as_ref();

        let fetched = match session.directory().select_connection(gateway, id).await {
            Ok(fetched) => fetched,
            Err(err) => {
                if err.is_not_found() {
                    session.selection().clear(generation);
                }
                return Err(err);
            }
        };
        let Some(connection) = fetched.current() else {
            return Ok(None);
        };

        let peer = session
            .registry()
            .resolve_peer(gateway, &connection.peer_gateway_id)
            .await;
        let view = Arc::new(ConnectionView::new(connection, peer));

        if session.selection().apply_view(generation, Arc::clone(&view)) {
            Ok(Some(view))
        } else {
            warn!(%id, "discarding view for superseded selection");
            Ok(None)
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Point `vpn_id` at `gateway_id`, then re-fetch the connection.
    ///
    /// The cache is never patched from the request. If the association
    /// fails nothing local changes (beyond a full reload on `NotFound`). If
    /// it succeeds but the re-fetch fails, the result is
    /// `Degraded { stage: Refresh }`: retry the refresh, not the association.
    pub async fn reassociate_gateway(
        &self,
        session: &Session,
        vpn_id: &ResourceId,
        gateway_id: &ResourceId,
    ) -> Result<Option<Arc<ConnectionView>>, CoreError> {
        let gateway = self.gateway.as_ref();

        if let Err(err) = gateway.associate_customer_gateway(vpn_id, gateway_id).await {
            if err.is_not_found() {
                warn!(%vpn_id, %gateway_id, "association target no longer exists, reloading");
                let (vpns, gateways) = tokio::join!(
                    session.directory().reload(gateway),
                    session.registry().reload(gateway),
                );
                for failed in [vpns.err(), gateways.err()].into_iter().flatten() {
                    warn!(error = %failed, "reload after not-found failed");
                }
            }
            return Err(err);
        }
        info!(%vpn_id, %gateway_id, "customer gateway associated");

        let refreshed = session
            .directory()
            .refresh_after_mutation(gateway, vpn_id)
            .await
            .map_err(|err| {
                CoreError::degraded(REASSOCIATE_GATEWAY, vpn_id, DegradedStage::Refresh, &err)
            })?;
        let Some(connection) = refreshed.current() else {
            return Ok(None);
        };

        let peer = session
            .registry()
            .resolve_peer(gateway, &connection.peer_gateway_id)
            .await;
        let view = Arc::new(ConnectionView::new(connection, peer));
        session.selection().refresh_view(Arc::clone(&view));
        Ok(Some(view))
    }

    /// Validate and register a new customer gateway. See
    /// [`GatewayRegistry::create`](crate::store::GatewayRegistry::create).
    pub async fn create_gateway(
        &self,
        session: &Session,
        ip: &str,
        asn: &str,
        name: &str,
    ) -> Result<ResourceId, CoreError> {
        session
            .registry()
            .create(self.gateway.as_ref(), ip, asn, name)
            .await
    }

    /// Attach a name to an existing gateway, typically one left unnamed by
    /// a `Degraded { stage: Label }` create.
    pub async fn label_gateway(
        &self,
        session: &Session,
        id: &ResourceId,
        name: &str,
    ) -> Result<(), CoreError> {
        session
            .registry()
            .label(self.gateway.as_ref(), id, name)
            .await
    }

    // ── Push ─────────────────────────────────────────────────────────

    /// Compile the selected connection's profile and hand it to `sink`.
    ///
    /// Reads the connection as last fetched for the selection, never the
    /// list copy. Returns the pushed snapshot.
    #[allow(clippy::unused_self)]
    pub fn push_profile(
        &self,
        session: &Session,
        sink: &impl ProfileSink,
    ) -> Result<IpsecProfile, CoreError> {
        let snapshot = session.selection().current();
        let id = snapshot
            .state
            .selected_id()
            .ok_or(CoreError::NothingSelected)?;
        let view = snapshot
            .view
            .filter(|view| view.id() == id)
            .ok_or_else(|| CoreError::SelectionNotFetched {
                vpn_id: id.to_string(),
            })?;

        let profile = compile(&view.connection)?;
        sink.push(profile.clone())?;
        info!(vpn_id = %id, "ipsec profile pushed");
        Ok(profile)
    }

    // ── Read-through ─────────────────────────────────────────────────

    /// List VPCs. Not cached.
    pub async fn list_vpcs(&self) -> Result<Vec<Vpc>, CoreError> {
        self.gateway.list_vpcs().await
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
