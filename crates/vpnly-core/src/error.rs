// ── Core error types ──
//
// Operator-facing errors from vpnly-core. Consumers never see HTTP status
// codes or JSON parse failures directly; `From<vpnly_api::Error>` folds
// transport failures into the taxonomy below.

use strum::Display;
use thiserror::Error;

use crate::validate::ValidationError;

/// Why the control plane could not be reached or refused to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum UnavailableKind {
    /// Credentials were refused.
    Auth,
    /// The request or the connection timed out.
    Timeout,
    /// DNS, TCP or TLS failure before a response arrived.
    Connection,
    /// The provider answered with a server error or an unreadable body.
    Service,
}

/// Which follow-up step of a multi-step action did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DegradedStage {
    /// The gateway exists remotely but its name label was not attached.
    Label,
    /// The mutation was applied but the cached view could not be refreshed.
    Refresh,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Gateway errors ───────────────────────────────────────────────
    #[error("Control plane unavailable ({kind}): {reason}")]
    GatewayUnavailable { kind: UnavailableKind, reason: String },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Input rejected{}: {reason}", field.as_deref().map(|f| format!(" ({f})")).unwrap_or_default())]
    ValidationRejected {
        /// The offending input field, or the provider's error code.
        field: Option<String>,
        reason: String,
    },

    // ── Action preconditions ─────────────────────────────────────────
    #[error("Another {operation} is already in progress")]
    OperationInProgress { operation: String },

    #[error("VPN connection {vpn_id} has no tunnels to build a profile from")]
    NoTunnelData { vpn_id: String },

    #[error("No VPN connection is selected")]
    NothingSelected,

    /// The selection exists but its fetch has not completed successfully.
    #[error("VPN connection {vpn_id} has not been fetched since it was selected")]
    SelectionNotFetched { vpn_id: String },

    // ── Partial success ──────────────────────────────────────────────
    /// The primary mutation went through; a follow-up step did not.
    #[error("{action} on {resource_id} partially completed ({stage} step failed): {reason}")]
    Degraded {
        action: String,
        resource_id: String,
        stage: DegradedStage,
        reason: String,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Rewrite a generic not-found into one naming the entity that was addressed.
    pub(crate) fn for_entity(self, entity_type: &str, identifier: &str) -> Self {
        match self {
            Self::NotFound { .. } => Self::NotFound {
                entity_type: entity_type.to_owned(),
                identifier: identifier.to_owned(),
            },
            other => other,
        }
    }

    pub(crate) fn degraded(
        action: &str,
        resource_id: impl ToString,
        stage: DegradedStage,
        cause: &CoreError,
    ) -> Self {
        Self::Degraded {
            action: action.to_owned(),
            resource_id: resource_id.to_string(),
            stage,
            reason: cause.to_string(),
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        CoreError::ValidationRejected {
            field: Some(err.field().to_string()),
            reason: err.to_string(),
        }
    }
}

impl From<vpnly_api::Error> for CoreError {
    fn from(err: vpnly_api::Error) -> Self {
        match err {
            vpnly_api::Error::Authentication { message } => CoreError::GatewayUnavailable {
                kind: UnavailableKind::Auth,
                reason: message,
            },
            vpnly_api::Error::Transport(ref e) => {
                let kind = if e.is_timeout() {
                    UnavailableKind::Timeout
                } else if e.is_connect() {
                    UnavailableKind::Connection
                } else {
                    UnavailableKind::Service
                };
                CoreError::GatewayUnavailable {
                    kind,
                    reason: e.to_string(),
                }
            }
            vpnly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            vpnly_api::Error::Timeout { timeout_secs } => CoreError::GatewayUnavailable {
                kind: UnavailableKind::Timeout,
                reason: format!("no response within {timeout_secs}s"),
            },
            vpnly_api::Error::Tls(msg) => CoreError::GatewayUnavailable {
                kind: UnavailableKind::Connection,
                reason: format!("TLS error: {msg}"),
            },
            vpnly_api::Error::NotFound { resource } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: resource,
            },
            vpnly_api::Error::Rejected { code, message, .. } => CoreError::ValidationRejected {
                field: code,
                reason: message,
            },
            vpnly_api::Error::Api { status, message } => CoreError::GatewayUnavailable {
                kind: UnavailableKind::Service,
                reason: format!("HTTP {status}: {message}"),
            },
            vpnly_api::Error::Deserialization { message, body: _ } => {
                CoreError::GatewayUnavailable {
                    kind: UnavailableKind::Service,
                    reason: format!("unexpected response: {message}"),
                }
            }
        }
    }
}
