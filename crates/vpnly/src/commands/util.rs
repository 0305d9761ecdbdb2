//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use vpnly_core::{Orchestrator, ResourceGateway, ResourceId};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

/// Build an orchestrator for the active profile and flag overrides.
pub fn connect(global: &GlobalOpts) -> Result<Orchestrator<impl ResourceGateway>, CliError> {
    let session_config = config::resolve_session_config(global)?;
    tracing::debug!(
        endpoint = %session_config.endpoint,
        region = %session_config.region,
        "connecting to control plane"
    );
    Ok(Orchestrator::from_config(&session_config)?)
}

/// Parse a positional resource id, rejecting blanks.
pub fn parse_id(raw: &str, field: &str) -> Result<ResourceId, CliError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(ResourceId::new(trimmed))
}

/// Await `fut` behind a stderr spinner when attached to a terminal.
pub async fn with_spinner<F: Future>(message: &str, global: &GlobalOpts, fut: F) -> F::Output {
    if global.quiet || !std::io::stderr().is_terminal() {
        return fut.await;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(80));

    let out = fut.await;
    spinner.finish_and_clear();
    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_trims_and_rejects_blank() {
        assert!(matches!(parse_id("  vpn-1 ", "vpn-id"), Ok(ref id) if id.as_str() == "vpn-1"));
        assert!(matches!(
            parse_id("   ", "vpn-id"),
            Err(CliError::Validation { ref field, .. }) if field == "vpn-id"
        ));
    }
}
