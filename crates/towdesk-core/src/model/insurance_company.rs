// ── Insurance company domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use towdesk_api::Fields;

use super::{ApplyPatch, FieldWriter, Identified, merge, merge_opt, null_as_default};

/// An insurer partnered with the platform (`insurance_company`
/// collection). `user_id` points at the insurer's account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceCompany {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    /// Claim ids; duplicates are not rejected.
    #[serde(default, deserialize_with = "null_as_default")]
    pub active_claims: Vec<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for InsuranceCompany {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsuranceCompanyDraft {
    pub company_name: String,
    pub contact_email: String,
    pub user_id: String,
    pub active_claims: Vec<String>,
    pub region: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl InsuranceCompanyDraft {
    pub(crate) fn into_fields(self, now: DateTime<Utc>) -> Fields {
        FieldWriter::new()
            .set("companyName", self.company_name)
            .set("contactEmail", self.contact_email)
            .set("userId", self.user_id)
            .set("activeClaims", self.active_claims)
            .set_opt("region", self.region)
            .set("createdAt", self.created_at.unwrap_or(now))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsuranceCompanyPatch {
    pub company_name: Option<String>,
    pub contact_email: Option<String>,
    pub user_id: Option<String>,
    pub active_claims: Option<Vec<String>>,
    pub region: Option<String>,
}

impl ApplyPatch<InsuranceCompany> for InsuranceCompanyPatch {
    fn apply_to(&self, target: &mut InsuranceCompany) {
        merge(&mut target.company_name, self.company_name.as_ref());
        merge(&mut target.contact_email, self.contact_email.as_ref());
        merge(&mut target.user_id, self.user_id.as_ref());
        merge(&mut target.active_claims, self.active_claims.as_ref());
        merge_opt(&mut target.region, self.region.as_ref());
    }

    fn to_fields(&self) -> Fields {
        FieldWriter::new()
            .set_opt("companyName", self.company_name.clone())
            .set_opt("contactEmail", self.contact_email.clone())
            .set_opt("userId", self.user_id.clone())
            .set_opt("activeClaims", self.active_claims.clone())
            .set_opt("region", self.region.clone())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_keeps_untouched_fields() {
        let mut company = InsuranceCompany {
            id: "c123".into(),
            company_name: "Acme Tow".into(),
            contact_email: "a@acme.com".into(),
            user_id: "u1".into(),
            active_claims: vec!["cl-1".into()],
            region: Some("NW".into()),
            created_at: None,
        };
        let before = company.clone();

        InsuranceCompanyPatch {
            region: Some("SW".into()),
            ..InsuranceCompanyPatch::default()
        }
        .apply_to(&mut company);

        assert_eq!(company.region.as_deref(), Some("SW"));
        assert_eq!(
            InsuranceCompany {
                region: before.region.clone(),
                ..company
            },
            before
        );
    }
}
