//! VPN configuration orchestrator between `vpnly-api` and operator surfaces.
//!
//! This crate fetches, caches, cross-references and mutates three related
//! remote resources (VPN connections, customer gateways and their tunnels)
//! and keeps one operator session's view consistent with the control plane:
//!
//! - **[`Orchestrator`]** exposes the operator actions: load, select,
//!   toggle detail, re-associate a gateway, create or label a gateway, push
//!   an IPsec profile.
//!
//! - **[`Session`]** owns the per-operator state: the [`VpnDirectory`], the
//!   [`GatewayRegistry`] and the [`Selection`] state machine.
//!
//! - **[`ResourceGateway`]** is the seam to the control plane, implemented
//!   for [`vpnly_api::ControlPlaneClient`].
//!
//! Caches are only ever replaced by fresh reads (full reloads or ticketed
//! point fetches); a response superseded by a newer fetch for the same
//! resource is dropped.

pub mod config;
pub mod convert;
pub mod error;
pub mod gateway;
pub mod model;
pub mod orchestrator;
pub mod profile;
pub mod selection;
pub mod session;
pub mod store;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AccessKey, SessionConfig, TlsVerification};
pub use error::{CoreError, DegradedStage, UnavailableKind};
pub use gateway::ResourceGateway;
pub use orchestrator::{LoadSummary, Orchestrator};
pub use profile::{ProfileSink, compile};
pub use selection::{Selection, SelectionSnapshot, SelectionState};
pub use session::{LoadState, Session};
pub use store::{Fetched, GatewayRegistry, VpnDirectory};
pub use validate::{GatewayInput, InputField, ValidationError, validate_gateway_input};

pub use model::{
    ConnectionView, CustomerGateway, IkeSettings, IpsecProfile, PeerAddress, ResolvedPeer,
    ResourceId, Tunnel, TunnelState, UNNAMED, Vpc, VpnConnection, VpnState,
};
