//! VPN connection command handlers.

use std::fmt::Write as _;

use secrecy::ExposeSecret;
use serde::Serialize;
use tabled::Tabled;

use vpnly_core::{
    ConnectionView, IkeSettings, Orchestrator, PeerAddress, ResolvedPeer, ResourceGateway,
    ResourceId, Session, TunnelState, VpnConnection, VpnState,
};

use crate::cli::{GlobalOpts, VpnArgs, VpnCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Serializable shapes ─────────────────────────────────────────────

#[derive(Serialize)]
struct VpnSummary {
    id: ResourceId,
    name: String,
    state: VpnState,
    peer_gateway_id: ResourceId,
    peer_name: String,
    peer_address: PeerAddress,
    tunnels: usize,
    tunnels_up: usize,
}

impl VpnSummary {
    /// Summarize a cached connection, resolving its peer from the cached registry only.
    fn from_cached(vpn: &VpnConnection, session: &Session) -> Self {
        let peer = session.registry().get(&vpn.peer_gateway_id).map_or_else(
            || ResolvedPeer::unknown(vpn.peer_gateway_id.clone()),
            |gw| ResolvedPeer::from_gateway(&gw),
        );
        Self {
            id: vpn.id.clone(),
            name: vpn.display_name.clone(),
            state: vpn.state,
            peer_gateway_id: peer.id,
            peer_name: peer.name,
            peer_address: peer.address,
            tunnels: vpn.tunnels.len(),
            tunnels_up: vpn
                .tunnels
                .iter()
                .filter(|t| t.state == TunnelState::Up)
                .count(),
        }
    }
}

#[derive(Serialize)]
struct TunnelDetail {
    state: TunnelState,
    inside_cidr: String,
    outside_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pre_shared_key: Option<String>,
    status_message: Option<String>,
    last_status_change: Option<String>,
}

#[derive(Serialize)]
struct VpnDetail<'a> {
    id: &'a ResourceId,
    name: &'a str,
    state: VpnState,
    gateway_ip: &'a str,
    transit_gateway_id: Option<&'a ResourceId>,
    peer: &'a ResolvedPeer,
    tunnels: Vec<TunnelDetail>,
    ike: &'a IkeSettings,
}

impl<'a> VpnDetail<'a> {
    /// Pre-shared keys are only included when `show_secrets` is set.
    fn new(view: &'a ConnectionView, show_secrets: bool) -> Self {
        let vpn = &view.connection;
        Self {
            id: &vpn.id,
            name: &vpn.display_name,
            state: vpn.state,
            gateway_ip: &vpn.gateway_ip,
            transit_gateway_id: vpn.transit_gateway_id.as_ref(),
            peer: &view.peer,
            tunnels: vpn
                .tunnels
                .iter()
                .map(|t| TunnelDetail {
                    state: t.state,
                    inside_cidr: t.inside_cidr.clone(),
                    outside_ip: t.outside_ip.clone(),
                    pre_shared_key: show_secrets
                        .then(|| t.pre_shared_key.expose_secret().to_owned()),
                    status_message: t.status_message.clone(),
                    last_status_change: t
                        .last_status_change
                        .map(|ts| ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
                })
                .collect(),
            ike: &vpn.ike,
        }
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct VpnRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Peer Gateway")]
    peer: String,
    #[tabled(rename = "Peer Address")]
    address: String,
    #[tabled(rename = "Tunnels")]
    tunnels: String,
}

fn vpn_row(s: &VpnSummary, color: bool) -> VpnRow {
    VpnRow {
        id: s.id.to_string(),
        name: s.name.clone(),
        state: s.state.to_string(),
        peer: format!("{} ({})", s.peer_gateway_id, s.peer_name),
        address: match s.peer_address {
            PeerAddress::Known(ref addr) => addr.clone(),
            PeerAddress::Unknown => output::muted("unknown", color),
        },
        tunnels: format!("{}/{} up", s.tunnels_up, s.tunnels),
    }
}

// ── Detail rendering ────────────────────────────────────────────────

/// Multi-line detail text for table output.
fn format_detail(detail: &VpnDetail<'_>, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:              {}", detail.id);
    let _ = writeln!(out, "Name:            {}", detail.name);
    let _ = writeln!(out, "State:           {}", detail.state);
    let _ = writeln!(out, "Gateway IP:      {}", detail.gateway_ip);
    if let Some(tgw) = detail.transit_gateway_id {
        let _ = writeln!(out, "Transit Gateway: {tgw}");
    }
    let address = match detail.peer.address {
        PeerAddress::Known(ref addr) => addr.clone(),
        PeerAddress::Unknown => output::muted("unknown", color),
    };
    let _ = writeln!(
        out,
        "Peer Gateway:    {} ({}) at {address}",
        detail.peer.id, detail.peer.name
    );

    let ike = detail.ike;
    let _ = writeln!(out);
    let _ = writeln!(out, "IKE:");
    let _ = writeln!(out, "  Version:       {}", ike.version);
    let _ = writeln!(out, "  Encryption:    {}", ike.encryption_algorithm);
    let _ = writeln!(out, "  Integrity:     {}", ike.authentication_algorithm);
    let _ = writeln!(out, "  DH Group:      {}", ike.dh_group);
    let _ = writeln!(out, "  Lifetime:      {}s", ike.lifetime_seconds);

    let _ = writeln!(out);
    if detail.tunnels.is_empty() {
        let _ = write!(out, "Tunnels:         {}", output::muted("none", color));
        return out;
    }
    let _ = writeln!(out, "Tunnels:");
    for (i, t) in detail.tunnels.iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{i}] {} {} -> {}",
            output::tunnel_state(t.state, color),
            t.inside_cidr,
            t.outside_ip
        );
        if let Some(ref psk) = t.pre_shared_key {
            let _ = writeln!(out, "      PSK:     {psk}");
        }
        if let Some(ref msg) = t.status_message {
            let _ = writeln!(out, "      Status:  {msg}");
        }
        if let Some(ref ts) = t.last_status_change {
            let _ = writeln!(out, "      Changed: {ts}");
        }
    }
    out.trim_end().to_owned()
}

/// Render a connection view in the selected output format.
pub fn render_view(
    view: &ConnectionView,
    show_secrets: bool,
    global: &GlobalOpts,
) -> Result<String, CliError> {
    let color = output::should_color(&global.color);
    let detail = VpnDetail::new(view, show_secrets);
    output::render_single(
        &global.output,
        &detail,
        |d| format_detail(d, color),
        |d| d.id.to_string(),
    )
}

/// Render the cached VPN Directory as a list.
pub fn render_directory(session: &Session, global: &GlobalOpts) -> Result<String, CliError> {
    let color = output::should_color(&global.color);
    let summaries: Vec<VpnSummary> = session
        .directory()
        .connections()
        .iter()
        .map(|vpn| VpnSummary::from_cached(vpn, session))
        .collect();
    output::render_list(
        &global.output,
        &summaries,
        |s| vpn_row(s, color),
        |s| s.id.to_string(),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: VpnArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        VpnCommand::List => {
            let orchestrator = util::connect(global)?;
            let session = Session::new();
            util::with_spinner(
                "Loading VPN connections",
                global,
                orchestrator.load_all(&session),
            )
            .await?;
            let out = render_directory(&session, global)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VpnCommand::Show { id, show_secrets } => {
            let id = util::parse_id(&id, "vpn-id")?;
            let orchestrator = util::connect(global)?;
            let session = Session::new();
            let view = show(&orchestrator, &session, &id, global).await?;
            let out = render_view(&view, show_secrets, global)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VpnCommand::Associate { vpn_id, gateway_id } => {
            let vpn_id = util::parse_id(&vpn_id, "vpn-id")?;
            let gateway_id = util::parse_id(&gateway_id, "gateway-id")?;
            let orchestrator = util::connect(global)?;
            let session = Session::new();

            let view = util::with_spinner(
                "Re-associating customer gateway",
                global,
                orchestrator.reassociate_gateway(&session, &vpn_id, &gateway_id),
            )
            .await?
            .ok_or_else(|| CliError::Internal(format!("refresh of {vpn_id} was superseded")))?;

            output::print_status(
                &format!("✓ {vpn_id} now points at {gateway_id}"),
                global.quiet,
            );
            let out = render_view(&view, false, global)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Select `id` with detail expanded and return the fetched view.
async fn show<G: ResourceGateway>(
    orchestrator: &Orchestrator<G>,
    session: &Session,
    id: &ResourceId,
    global: &GlobalOpts,
) -> Result<std::sync::Arc<ConnectionView>, CliError> {
    util::with_spinner(
        "Fetching VPN connection",
        global,
        orchestrator.toggle_detail(session, id),
    )
    .await?;
    session
        .view()
        .ok_or_else(|| CliError::Internal(format!("no view loaded for {id}")))
}
