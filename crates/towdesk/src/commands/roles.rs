//! Role command handlers.

use tabled::Tabled;
use towdesk_core::Dashboard;

use crate::cli::{GlobalOpts, RolesArgs, RolesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "Role")]
    id: String,
}

pub async fn handle(
    dashboard: &Dashboard,
    args: RolesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RolesCommand::List => {
            let roles = dashboard.users().service().fetch_roles().await?;
            let out = output::render_list(
                &global.output,
                &roles,
                |id| RoleRow { id: id.clone() },
                String::clone,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
