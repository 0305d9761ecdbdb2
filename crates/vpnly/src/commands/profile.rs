//! IPsec profile delivery.
//!
//! The on-premises router consumes the compiled profile as a JSON document,
//! written either to stdout or to a file it watches.

use std::io::Write;
use std::path::PathBuf;

use vpnly_core::{CoreError, IpsecProfile, ProfileSink, Session};

use crate::cli::{GlobalOpts, OutputFormat, ProfileArgs, ProfileCommand};
use crate::error::CliError;
use crate::output;

use super::util;

/// Writes each pushed profile as one JSON document.
pub struct JsonSink {
    target: Option<PathBuf>,
    compact: bool,
}

impl JsonSink {
    /// `target` of `None` means stdout.
    pub fn new(target: Option<PathBuf>, format: &OutputFormat) -> Self {
        Self {
            target,
            compact: matches!(format, OutputFormat::JsonCompact),
        }
    }

    pub fn describe(&self) -> String {
        self.target
            .as_ref()
            .map_or_else(|| "stdout".into(), |p| p.display().to_string())
    }
}

impl ProfileSink for JsonSink {
    fn push(&self, profile: IpsecProfile) -> Result<(), CoreError> {
        let rendered = if self.compact {
            serde_json::to_string(&profile)
        } else {
            serde_json::to_string_pretty(&profile)
        }
        .map_err(|e| CoreError::Internal(format!("failed to encode profile: {e}")))?;

        let written = match self.target {
            Some(ref path) => std::fs::write(path, format!("{rendered}\n")),
            None => writeln!(std::io::stdout().lock(), "{rendered}"),
        };
        written.map_err(|e| {
            CoreError::Internal(format!("failed to write profile to {}: {e}", self.describe()))
        })
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ProfileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ProfileCommand::Push { vpn_id, file } => {
            let vpn_id = util::parse_id(&vpn_id, "vpn-id")?;
            let sink = JsonSink::new(file, &global.output);

            let orchestrator = util::connect(global)?;
            let session = Session::new();
            util::with_spinner(
                "Fetching VPN connection",
                global,
                orchestrator.select_vpn(&session, &vpn_id),
            )
            .await?;

            orchestrator.push_profile(&session, &sink)?;
            output::print_status(
                &format!("✓ IPsec profile for {vpn_id} written to {}", sink.describe()),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use vpnly_core::ResourceId;

    use super::*;

    fn profile() -> IpsecProfile {
        IpsecProfile {
            vpn_connection_id: ResourceId::new("vpn-1"),
            peer_gateway_id: ResourceId::new("cgw-1"),
            tunnel_inside_cidr: "169.254.0.0/30".into(),
            pre_shared_key: SecretString::from("abc123".to_owned()),
            tunnel_outside_ip: "203.0.113.5".into(),
        }
    }

    #[test]
    fn file_sink_writes_consumer_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let sink = JsonSink::new(Some(path.clone()), &OutputFormat::Table);

        sink.push(profile()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["vpnConnectionId"], "vpn-1");
        assert_eq!(written["peerGatewayId"], "cgw-1");
        assert_eq!(written["tunnelInsideCidr"], "169.254.0.0/30");
        assert_eq!(written["preSharedKey"], "abc123");
        assert_eq!(written["tunnelOutsideIp"], "203.0.113.5");
    }

    #[test]
    fn unwritable_target_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonSink::new(
            Some(dir.path().join("missing").join("profile.json")),
            &OutputFormat::Json,
        );
        assert!(matches!(sink.push(profile()), Err(CoreError::Internal(_))));
    }
}
