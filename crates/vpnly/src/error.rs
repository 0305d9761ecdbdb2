//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and one process exit code per error class.

use miette::Diagnostic;
use thiserror::Error;

use vpnly_config::ConfigError;
use vpnly_core::{CoreError, DegradedStage, UnavailableKind};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const DEGRADED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the control plane: {reason}")]
    #[diagnostic(
        code(vpnly::connection_failed),
        help(
            "Check the endpoint URL and your network path to it.\n\
             For lab endpoints with self-signed certificates, use --insecure (-k)\n\
             or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Control plane unavailable: {reason}")]
    #[diagnostic(
        code(vpnly::service_unavailable),
        help("The provider answered with an error. Retry shortly; nothing was changed locally.")
    )]
    ServiceUnavailable { reason: String },

    #[error("Request timed out: {reason}")]
    #[diagnostic(
        code(vpnly::timeout),
        help("Increase the timeout with --timeout or check control plane responsiveness.")
    )]
    Timeout { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {reason}")]
    #[diagnostic(
        code(vpnly::auth_failed),
        help(
            "Verify the access key id and secret for this profile.\n\
             Store a new secret with: vpnly config set-secret"
        )
    )]
    AuthFailed { reason: String },

    #[error("No access key secret configured for profile '{profile}'")]
    #[diagnostic(
        code(vpnly::no_credentials),
        help(
            "Configure credentials with: vpnly config init\n\
             Or set the VPNLY_SECRET_ACCESS_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(vpnly::not_found),
        help("Run: vpnly {list_command} to see what exists now")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Another {operation} is already in progress")]
    #[diagnostic(
        code(vpnly::in_progress),
        help("Wait for it to finish, then reload to see its result.")
    )]
    InProgress { operation: String },

    #[error("VPN connection '{vpn_id}' has no tunnels")]
    #[diagnostic(
        code(vpnly::no_tunnel_data),
        help("The provider has not provisioned tunnels yet. Check again once the connection is available.")
    )]
    NoTunnelData { vpn_id: String },

    // ── Partial success ──────────────────────────────────────────────
    #[error("{action} on '{resource_id}' only partially completed: {reason}")]
    #[diagnostic(code(vpnly::degraded), help("{hint}"))]
    Degraded {
        action: String,
        resource_id: String,
        reason: String,
        hint: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vpnly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(vpnly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: vpnly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No control plane configured")]
    #[diagnostic(
        code(vpnly::no_config),
        help(
            "Create a profile with: vpnly config init\n\
             Expected at: {path}\n\
             Or pass --endpoint, --region and --access-key-id."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(vpnly::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Prompt failed: {0}")]
    #[diagnostic(code(vpnly::interactive))]
    Prompt(String),

    // ── Internal ─────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(vpnly::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(vpnly::serialization))]
    Serialization(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::ServiceUnavailable { .. } => {
                exit_code::CONNECTION
            }
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::InProgress { .. } => exit_code::CONFLICT,
            Self::Degraded { .. } => exit_code::DEGRADED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

fn list_command_for(entity_type: &str) -> &'static str {
    match entity_type {
        "Customer gateway" => "gateways list",
        _ => "vpn list",
    }
}

fn degraded_hint(stage: DegradedStage, resource_id: &str) -> String {
    match stage {
        DegradedStage::Label => format!(
            "The gateway exists but is unnamed. Retry only the name with:\n  \
             vpnly gateways label {resource_id} <name>"
        ),
        DegradedStage::Refresh => format!(
            "The change was applied; the displayed state may be stale. Refresh with:\n  \
             vpnly vpn show {resource_id}"
        ),
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::GatewayUnavailable { kind, reason } => match kind {
                UnavailableKind::Auth => CliError::AuthFailed { reason },
                UnavailableKind::Timeout => CliError::Timeout { reason },
                UnavailableKind::Connection => CliError::ConnectionFailed { reason },
                UnavailableKind::Service => CliError::ServiceUnavailable { reason },
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command_for(&entity_type).into(),
                resource_type: entity_type,
                identifier,
            },

            CoreError::ValidationRejected { field, reason } => CliError::Validation {
                field: field.unwrap_or_else(|| "input".into()),
                reason,
            },

            CoreError::OperationInProgress { operation } => CliError::InProgress { operation },

            CoreError::NoTunnelData { vpn_id } => CliError::NoTunnelData { vpn_id },

            CoreError::NothingSelected => CliError::Validation {
                field: "selection".into(),
                reason: "no VPN connection is selected".into(),
            },

            CoreError::SelectionNotFetched { vpn_id } => CliError::Validation {
                field: "selection".into(),
                reason: format!("{vpn_id} has not been fetched yet; select it again"),
            },

            CoreError::Degraded {
                action,
                resource_id,
                stage,
                reason,
            } => CliError::Degraded {
                hint: degraded_hint(stage, &resource_id),
                action,
                resource_id,
                reason,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(see: vpnly config profiles)".into(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
