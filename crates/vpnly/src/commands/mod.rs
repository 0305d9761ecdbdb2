//! Command dispatch: bridges CLI args -> orchestrator actions -> output formatting.

pub mod config_cmd;
pub mod gateways;
pub mod profile;
pub mod shell;
pub mod util;
pub mod vpcs;
pub mod vpn;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a control-plane-bound command to the appropriate handler.
///
/// Handlers connect on their own so that local input validation can fail
/// before any configuration or network access.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Vpn(args) => vpn::handle(args, global).await,
        Command::Gateways(args) => gateways::handle(args, global).await,
        Command::Profile(args) => profile::handle(args, global).await,
        Command::Vpcs(args) => vpcs::handle(args, global).await,
        Command::Shell => shell::run(global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
