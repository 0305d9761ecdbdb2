//! Customer gateway command handlers.

use tabled::Tabled;

use vpnly_core::validate::validate_name;
use vpnly_core::{CoreError, CustomerGateway, Session, UNNAMED, validate_gateway_input};

use crate::cli::{GatewaysArgs, GatewaysCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct GatewayRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP Address")]
    ip: String,
    #[tabled(rename = "BGP ASN")]
    asn: u64,
}

fn gateway_row(g: &CustomerGateway, color: bool) -> GatewayRow {
    GatewayRow {
        id: g.id.to_string(),
        name: if g.name == UNNAMED {
            output::muted(UNNAMED, color)
        } else {
            g.name.clone()
        },
        ip: g.ip_address.clone(),
        asn: g.bgp_asn,
    }
}

/// Render the cached Gateway Registry as a list.
pub fn render_registry(session: &Session, global: &GlobalOpts) -> Result<String, CliError> {
    let color = output::should_color(&global.color);
    let gateways = session.registry().gateways();
    output::render_list(
        &global.output,
        gateways.as_slice(),
        |g| gateway_row(g, color),
        |g| g.id.to_string(),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: GatewaysArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        GatewaysCommand::List => {
            let orchestrator = util::connect(global)?;
            let session = Session::new();
            util::with_spinner(
                "Loading customer gateways",
                global,
                session.registry().reload(orchestrator.gateway()),
            )
            .await?;
            let out = render_registry(&session, global)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GatewaysCommand::Create { ip, asn, name } => {
            // Reject bad input before touching config or the network.
            validate_gateway_input(&ip, &asn, &name).map_err(CoreError::from)?;

            let orchestrator = util::connect(global)?;
            let session = Session::new();
            let id = util::with_spinner(
                "Creating customer gateway",
                global,
                orchestrator.create_gateway(&session, &ip, &asn, &name),
            )
            .await?;

            output::print_status(
                &format!("✓ Created customer gateway {id} ({})", name.trim()),
                global.quiet,
            );
            output::print_output(id.as_str(), global.quiet);
            Ok(())
        }

        GatewaysCommand::Label { id, name } => {
            let id = util::parse_id(&id, "gateway-id")?;
            let name = validate_name(&name).map_err(CoreError::from)?;

            let orchestrator = util::connect(global)?;
            let session = Session::new();
            util::with_spinner(
                "Labelling customer gateway",
                global,
                orchestrator.label_gateway(&session, &id, &name),
            )
            .await?;

            output::print_status(&format!("✓ Named {id} '{name}'"), global.quiet);
            Ok(())
        }
    }
}
