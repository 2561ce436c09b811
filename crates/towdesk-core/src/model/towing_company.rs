// ── Towing company domain types ──

use serde::{Deserialize, Serialize};
use towdesk_api::Fields;

use super::{ApplyPatch, FieldWriter, Identified, merge, merge_opt, null_as_default};

/// A towing operator (`towing_companies` collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowingCompany {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl Identified for TowingCompany {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Produced by [`TowingCompanyForm::validate`](crate::form::TowingCompanyForm::validate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TowingCompanyDraft {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
}

impl TowingCompanyDraft {
    pub(crate) fn into_fields(self) -> Fields {
        FieldWriter::new()
            .set("name", self.name)
            .set("email", self.email)
            .set("phoneNumber", self.phone_number)
            .set_opt("address", self.address)
            .set_opt("description", self.description)
            .set_opt("region", self.region)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TowingCompanyPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
}

impl ApplyPatch<TowingCompany> for TowingCompanyPatch {
    fn apply_to(&self, target: &mut TowingCompany) {
        merge(&mut target.name, self.name.as_ref());
        merge(&mut target.email, self.email.as_ref());
        merge(&mut target.phone_number, self.phone_number.as_ref());
        merge_opt(&mut target.address, self.address.as_ref());
        merge_opt(&mut target.description, self.description.as_ref());
        merge_opt(&mut target.region, self.region.as_ref());
    }

    fn to_fields(&self) -> Fields {
        FieldWriter::new()
            .set_opt("name", self.name.clone())
            .set_opt("email", self.email.clone())
            .set_opt("phoneNumber", self.phone_number.clone())
            .set_opt("address", self.address.clone())
            .set_opt("description", self.description.clone())
            .set_opt("region", self.region.clone())
            .finish()
    }
}
