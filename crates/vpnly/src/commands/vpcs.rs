//! VPC command handlers.

use tabled::Tabled;

use vpnly_core::Vpc;

use crate::cli::{GlobalOpts, VpcsArgs, VpcsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct VpcRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "CIDR")]
    cidr: String,
}

impl From<&Vpc> for VpcRow {
    fn from(v: &Vpc) -> Self {
        Self {
            id: v.id.to_string(),
            name: v.display_name.clone(),
            state: v.state.clone(),
            cidr: v.cidr_block.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

pub async fn handle(args: VpcsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        VpcsCommand::List => {
            let orchestrator = util::connect(global)?;
            let vpcs = util::with_spinner("Listing VPCs", global, orchestrator.list_vpcs()).await?;
            let out = output::render_list(&global.output, &vpcs, |v| VpcRow::from(v), |v| {
                v.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
