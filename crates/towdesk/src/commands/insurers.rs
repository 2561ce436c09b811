//! Insurance company command handlers.

use tabled::Tabled;
use towdesk_core::{
    Dashboard, EntityService, InsuranceCompany, InsuranceCompanyForm, InsuranceCompanyPatch,
};

use crate::cli::{GlobalOpts, InsurersArgs, InsurersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct InsurerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Company")]
    name: String,
    #[tabled(rename = "Contact")]
    email: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Claims")]
    claims: usize,
}

impl From<&InsuranceCompany> for InsurerRow {
    fn from(c: &InsuranceCompany) -> Self {
        Self {
            id: c.id.clone(),
            name: c.company_name.clone(),
            email: c.contact_email.clone(),
            region: util::or_blank(c.region.as_ref()),
            claims: c.active_claims.len(),
        }
    }
}

fn detail(c: &InsuranceCompany) -> String {
    output::detail_lines(&[
        ("ID", c.id.clone()),
        ("Company", c.company_name.clone()),
        ("Contact", c.contact_email.clone()),
        ("User", c.user_id.clone()),
        ("Region", util::or_blank(c.region.as_ref())),
        ("Claims", c.active_claims.join(", ")),
        ("Created", util::or_blank(c.created_at.as_ref())),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: InsurersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let companies = dashboard.insurance_companies();
    match args.command {
        InsurersCommand::List => {
            util::with_spinner("Fetching companies", global, companies.fetch_all()).await?;
            let snap = companies.snapshot();
            let out = output::render_list(
                &global.output,
                &snap.items,
                |c| InsurerRow::from(c),
                |c| c.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InsurersCommand::Get { id } => {
            let company = companies
                .service()
                .fetch_by_id(&id)
                .await?
                .ok_or_else(|| CliError::not_found("insurance company", &id, "insurers list"))?;
            let out = output::render_single(&global.output, &company, detail, |c| c.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InsurersCommand::Create {
            name,
            email,
            user_id,
            claims,
            region,
        } => {
            let draft = InsuranceCompanyForm {
                company_name: name,
                contact_email: email,
                user_id,
                active_claims: claims,
                region: region.unwrap_or_default(),
            }
            .validate()?;
            let id = companies.add(draft).await?;
            output::note("Insurance company created", global.quiet);
            output::print_output(&id, global.quiet);
            Ok(())
        }

        InsurersCommand::Update {
            id,
            name,
            email,
            user_id,
            claims,
            region,
        } => {
            let patch = InsuranceCompanyPatch {
                company_name: name,
                contact_email: email,
                user_id,
                active_claims: claims,
                region,
            }
            .validated()?;
            companies.update(&id, patch).await?;
            output::note("Insurance company updated", global.quiet);
            Ok(())
        }

        InsurersCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete insurance company '{id}'?"),
                "insurers delete",
                global,
            )? {
                return Ok(());
            }
            companies.delete(&id).await?;
            output::note("Insurance company deleted", global.quiet);
            Ok(())
        }
    }
}
