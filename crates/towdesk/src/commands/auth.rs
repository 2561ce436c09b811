//! Identity provider command handlers.

use towdesk_core::Dashboard;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    dashboard: &Dashboard,
    args: AuthArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AuthCommand::ResetPassword { email } => {
            dashboard.send_password_reset_email(&email).await?;
            output::note(&format!("Password reset email sent to {email}"), global.quiet);
            Ok(())
        }
    }
}
