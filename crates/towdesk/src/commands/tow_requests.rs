//! Tow request command handlers.

use tabled::Tabled;
use towdesk_core::{Dashboard, EntityService, TowRequest};

use crate::cli::{GlobalOpts, TowRequestsArgs, TowRequestsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TowRequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Operator")]
    operator: String,
    #[tabled(rename = "ETA (min)")]
    eta: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl TowRequestRow {
    fn new(r: &TowRequest, color: bool) -> Self {
        Self {
            id: r.id.clone(),
            user: r.user_id.clone(),
            vehicle: r.vehicle_type.clone(),
            status: output::paint_status(&util::or_blank(r.status.as_ref()), color),
            operator: util::or_blank(r.matched_operator_id.as_ref()),
            eta: util::or_blank(r.eta_minutes.as_ref()),
            created: r
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

fn detail(r: &TowRequest) -> String {
    output::detail_lines(&[
        ("ID", r.id.clone()),
        ("User", r.user_id.clone()),
        ("Vehicle", r.vehicle_type.clone()),
        ("Status", util::or_blank(r.status.as_ref())),
        (
            "Location",
            r.location
                .map(|p| format!("{:.5}, {:.5}", p.latitude, p.longitude))
                .unwrap_or_default(),
        ),
        ("Operator", util::or_blank(r.matched_operator_id.as_ref())),
        ("ETA (min)", util::or_blank(r.eta_minutes.as_ref())),
        ("Priority", util::or_blank(r.priority_score.as_ref())),
        ("Notes", util::or_blank(r.notes.as_ref())),
        ("Created", util::or_blank(r.created_at.as_ref())),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: TowRequestsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let requests = dashboard.tow_requests();
    match args.command {
        TowRequestsCommand::List => {
            util::with_spinner("Fetching tow requests", global, requests.fetch_all()).await?;
            let snap = requests.snapshot();
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &snap.items,
                |r| TowRequestRow::new(r, color),
                |r| r.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TowRequestsCommand::Get { id } => {
            let request = requests
                .service()
                .fetch_by_id(&id)
                .await?
                .ok_or_else(|| CliError::not_found("tow request", &id, "tow-requests list"))?;
            let out = output::render_single(&global.output, &request, detail, |r| r.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
