//! User command handlers.

use tabled::Tabled;
use towdesk_core::{Dashboard, EntityService, User};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Verified")]
    verified: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.full_name.clone(),
            email: u.email.clone(),
            role: u.role.to_string(),
            verified: if u.is_verified { "yes" } else { "no" }.into(),
        }
    }
}

fn detail(u: &User) -> String {
    output::detail_lines(&[
        ("ID", u.id.clone()),
        ("Name", u.full_name.clone()),
        ("Email", u.email.clone()),
        ("Role", u.role.to_string()),
        ("Verified", u.is_verified.to_string()),
        ("Theme", util::or_blank(u.theme.as_ref())),
        ("Created", util::or_blank(u.created_at.as_ref())),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let users = dashboard.users();
    match args.command {
        UsersCommand::List => {
            util::with_spinner("Fetching users", global, users.fetch_all()).await?;
            let snap = users.snapshot();
            let out = output::render_list(
                &global.output,
                &snap.items,
                |u| UserRow::from(u),
                |u| u.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Get { id } => {
            let user = users
                .service()
                .fetch_by_id(&id)
                .await?
                .ok_or_else(|| CliError::not_found("user", &id, "users list"))?;
            let out = output::render_single(&global.output, &user, detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
