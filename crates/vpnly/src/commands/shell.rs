//! Interactive session.
//!
//! Holds one `Session` across actions so selection, detail expansion and
//! both caches persist between steps, the way an operator console would.

use std::io::IsTerminal;
use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};

use vpnly_core::{
    CoreError, DegradedStage, Orchestrator, ResourceGateway, ResourceId, SelectionState, Session,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::profile::JsonSink;
use super::{gateways, util, vpn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ListConnections,
    ListGateways,
    Select,
    ToggleDetail,
    Reassociate,
    CreateGateway,
    LabelGateway,
    PushProfile,
    Reload,
    Quit,
}

const ACTIONS: [Action; 10] = [
    Action::ListConnections,
    Action::ListGateways,
    Action::Select,
    Action::ToggleDetail,
    Action::Reassociate,
    Action::CreateGateway,
    Action::LabelGateway,
    Action::PushProfile,
    Action::Reload,
    Action::Quit,
];

impl Action {
    fn label(self) -> &'static str {
        match self {
            Self::ListConnections => "List VPN connections",
            Self::ListGateways => "List customer gateways",
            Self::Select => "Select a connection",
            Self::ToggleDetail => "Toggle detail for the selection",
            Self::Reassociate => "Re-associate the selection's gateway",
            Self::CreateGateway => "Create a customer gateway",
            Self::LabelGateway => "Name a customer gateway",
            Self::PushProfile => "Push the selection's IPsec profile",
            Self::Reload => "Reload everything",
            Self::Quit => "Quit",
        }
    }
}

fn describe_selection(state: &SelectionState) -> String {
    match state {
        SelectionState::Idle => "none".into(),
        SelectionState::Selected(id) => id.to_string(),
        SelectionState::DetailExpanded(id) => format!("{id} (detail)"),
    }
}

fn report(err: CliError) {
    eprintln!("{:?}", miette::Report::new(err));
}

// ── Entry point ─────────────────────────────────────────────────────

pub async fn run(global: &GlobalOpts) -> Result<(), CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "shell".into(),
            reason: "requires an interactive terminal".into(),
        });
    }

    let orchestrator = util::connect(global)?;
    let session = Session::new();
    util::with_spinner("Loading", global, orchestrator.load_all(&session)).await?;

    let labels: Vec<&str> = ACTIONS.iter().map(|a| a.label()).collect();
    loop {
        eprintln!(
            "\n[{}] {} connections, {} gateways, selected: {}",
            session.load_state(),
            session.directory().len(),
            session.registry().len(),
            describe_selection(&session.selection().state())
        );

        let choice = Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(util::prompt_err)?;
        let Some(action) = ACTIONS.get(choice).copied() else {
            continue;
        };
        if action == Action::Quit {
            return Ok(());
        }

        if let Err(err) = step(action, &orchestrator, &session, global).await {
            report(err);
        }
    }
}

async fn step<G: ResourceGateway>(
    action: Action,
    orchestrator: &Orchestrator<G>,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match action {
        Action::ListConnections => {
            output::print_output(&vpn::render_directory(session, global)?, global.quiet);
        }
        Action::ListGateways => {
            output::print_output(&gateways::render_registry(session, global)?, global.quiet);
        }
        Action::Select => {
            let Some(id) = pick_connection(session)? else {
                return Ok(());
            };
            if let Some(view) = orchestrator.select_vpn(session, &id).await? {
                output::print_output(&vpn::render_view(&view, false, global)?, global.quiet);
            }
        }
        Action::ToggleDetail => {
            let id = selected(session)?;
            let state = orchestrator.toggle_detail(session, &id).await?;
            match (state.is_expanded(), session.view()) {
                (true, Some(view)) => {
                    output::print_output(&vpn::render_view(&view, false, global)?, global.quiet);
                }
                _ => output::print_status(&format!("Detail for {id} collapsed"), global.quiet),
            }
        }
        Action::Reassociate => reassociate(orchestrator, session, global).await?,
        Action::CreateGateway => create_gateway(orchestrator, session, global).await?,
        Action::LabelGateway => {
            let Some(id) = pick_gateway(session, "Gateway to name")? else {
                return Ok(());
            };
            let name = prompt_text("Name")?;
            orchestrator.label_gateway(session, &id, &name).await?;
            output::print_status(&format!("✓ Named {id} '{}'", name.trim()), global.quiet);
        }
        Action::PushProfile => {
            let path = prompt_text("Write to file (empty for stdout)")?;
            let target = (!path.trim().is_empty()).then(|| PathBuf::from(path.trim()));
            let sink = JsonSink::new(target, &global.output);
            let profile = orchestrator.push_profile(session, &sink)?;
            output::print_status(
                &format!(
                    "✓ IPsec profile for {} written to {}",
                    profile.vpn_connection_id,
                    sink.describe()
                ),
                global.quiet,
            );
        }
        Action::Reload => {
            let summary =
                util::with_spinner("Reloading", global, orchestrator.reload(session)).await?;
            output::print_status(
                &format!(
                    "✓ Reloaded {} connections and {} gateways",
                    summary.connections, summary.gateways
                ),
                global.quiet,
            );
        }
        Action::Quit => {}
    }
    Ok(())
}

// ── Multi-step actions ──────────────────────────────────────────────

async fn reassociate<G: ResourceGateway>(
    orchestrator: &Orchestrator<G>,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let vpn_id = selected(session)?;
    let Some(gateway_id) = pick_gateway(session, "New customer gateway")? else {
        return Ok(());
    };

    let confirmed = Confirm::new()
        .with_prompt(format!("Point {vpn_id} at {gateway_id}?"))
        .default(false)
        .interact()
        .map_err(util::prompt_err)?;
    if !confirmed {
        return Ok(());
    }

    let view = orchestrator
        .reassociate_gateway(session, &vpn_id, &gateway_id)
        .await?;
    output::print_status(&format!("✓ {vpn_id} now points at {gateway_id}"), global.quiet);
    if let Some(view) = view {
        output::print_output(&vpn::render_view(&view, false, global)?, global.quiet);
    }
    Ok(())
}

async fn create_gateway<G: ResourceGateway>(
    orchestrator: &Orchestrator<G>,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ip = prompt_text("IPv4 address")?;
    let asn = prompt_text("BGP ASN")?;
    let name = prompt_text("Name")?;

    match orchestrator.create_gateway(session, &ip, &asn, &name).await {
        Ok(id) => {
            output::print_status(&format!("✓ Created customer gateway {id}"), global.quiet);
            Ok(())
        }
        Err(CoreError::Degraded {
            stage: DegradedStage::Label,
            resource_id,
            reason,
            ..
        }) => {
            eprintln!("Gateway {resource_id} was created but could not be named: {reason}");
            let retry = Confirm::new()
                .with_prompt("Retry naming it now?")
                .default(true)
                .interact()
                .map_err(util::prompt_err)?;
            if retry {
                let id = ResourceId::new(resource_id);
                orchestrator.label_gateway(session, &id, &name).await?;
                output::print_status(&format!("✓ Named {id} '{}'", name.trim()), global.quiet);
            }
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

// ── Prompts ─────────────────────────────────────────────────────────

fn selected(session: &Session) -> Result<ResourceId, CliError> {
    session
        .selection()
        .state()
        .selected_id()
        .cloned()
        .ok_or_else(|| CoreError::NothingSelected.into())
}

fn prompt_text(prompt: &str) -> Result<String, CliError> {
    Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(util::prompt_err)
}

fn pick_connection(session: &Session) -> Result<Option<ResourceId>, CliError> {
    let connections = session.directory().connections();
    if connections.is_empty() {
        eprintln!("No VPN connections loaded.");
        return Ok(None);
    }
    let items: Vec<String> = connections
        .iter()
        .map(|v| format!("{}  {}", v.id, v.display_name))
        .collect();
    let choice = Select::new()
        .with_prompt("VPN connection")
        .items(&items)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    Ok(connections.get(choice).map(|v| v.id.clone()))
}

fn pick_gateway(session: &Session, prompt: &str) -> Result<Option<ResourceId>, CliError> {
    let registry = session.registry().gateways();
    if registry.is_empty() {
        eprintln!("No customer gateways loaded.");
        return Ok(None);
    }
    let items: Vec<String> = registry
        .iter()
        .map(|g| format!("{}  {}  {}", g.id, g.name, g.ip_address))
        .collect();
    let choice = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    Ok(registry.get(choice).map(|g| g.id.clone()))
}
