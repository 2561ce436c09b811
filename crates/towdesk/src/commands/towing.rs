//! Towing company command handlers.

use tabled::Tabled;
use towdesk_core::{Dashboard, EntityService, TowingCompany, TowingCompanyForm, TowingCompanyPatch};

use crate::cli::{GlobalOpts, TowingArgs, TowingCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct TowingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Region")]
    region: String,
}

impl From<&TowingCompany> for TowingRow {
    fn from(c: &TowingCompany) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            phone: c.phone_number.clone(),
            email: c.email.clone(),
            region: util::or_blank(c.region.as_ref()),
        }
    }
}

fn detail(c: &TowingCompany) -> String {
    output::detail_lines(&[
        ("ID", c.id.clone()),
        ("Name", c.name.clone()),
        ("Email", c.email.clone()),
        ("Phone", c.phone_number.clone()),
        ("Address", util::or_blank(c.address.as_ref())),
        ("Region", util::or_blank(c.region.as_ref())),
        ("About", util::or_blank(c.description.as_ref())),
    ])
}

pub async fn handle(
    dashboard: &Dashboard,
    args: TowingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let companies = dashboard.towing_companies();
    match args.command {
        TowingCommand::List => {
            util::with_spinner("Fetching towing companies", global, companies.fetch_all())
                .await?;
            let snap = companies.snapshot();
            let out = output::render_list(
                &global.output,
                &snap.items,
                |c| TowingRow::from(c),
                |c| c.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TowingCommand::Get { id } => {
            let company = companies
                .service()
                .fetch_by_id(&id)
                .await?
                .ok_or_else(|| CliError::not_found("towing company", &id, "towing list"))?;
            let out = output::render_single(&global.output, &company, detail, |c| c.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TowingCommand::Create {
            name,
            email,
            phone,
            address,
            description,
            region,
        } => {
            let draft = TowingCompanyForm {
                name,
                email,
                phone_number: phone,
                address: address.unwrap_or_default(),
                description: description.unwrap_or_default(),
                region: region.unwrap_or_default(),
            }
            .validate()?;
            let id = companies.add(draft).await?;
            output::note("Towing company created", global.quiet);
            output::print_output(&id, global.quiet);
            Ok(())
        }

        TowingCommand::Update {
            id,
            name,
            email,
            phone,
            address,
            description,
            region,
        } => {
            let patch = TowingCompanyPatch {
                name,
                email,
                phone_number: phone,
                address,
                description,
                region,
            }
            .validated()?;
            companies.update(&id, patch).await?;
            output::note("Towing company updated", global.quiet);
            Ok(())
        }

        TowingCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete towing company '{id}'?"),
                "towing delete",
                global,
            )? {
                return Ok(());
            }
            companies.delete(&id).await?;
            output::note("Towing company deleted", global.quiet);
            Ok(())
        }
    }
}
