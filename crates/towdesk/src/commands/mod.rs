//! Command dispatch: bridges CLI args -> dashboard stores -> output.

pub mod auth;
pub mod config_cmd;
pub mod insurers;
pub mod roles;
pub mod tow_requests;
pub mod towing;
pub mod users;
pub mod util;

use towdesk_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Users(args) => users::handle(dashboard, args, global).await,
        Command::Roles(args) => roles::handle(dashboard, args, global).await,
        Command::TowRequests(args) => tow_requests::handle(dashboard, args, global).await,
        Command::Insurers(args) => insurers::handle(dashboard, args, global).await,
        Command::Towing(args) => towing::handle(dashboard, args, global).await,
        Command::Auth(args) => auth::handle(dashboard, args, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "local command routed to backend dispatch".into(),
        )),
    }
}
