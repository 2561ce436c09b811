// ── Form input validation ──
//
// Raw form records as a front end collects them (every input a string),
// checked at the boundary and turned into typed drafts. Services and
// stores never validate on their own.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{
    InsuranceCompanyDraft, InsuranceCompanyPatch, TowingCompanyDraft, TowingCompanyPatch,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TowingCompanyForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub description: String,
    pub region: String,
}

impl TowingCompanyForm {
    /// Name, email and phone number are required; email must look like an
    /// address. Blank optional inputs become `None`.
    pub fn validate(self) -> Result<TowingCompanyDraft, CoreError> {
        Ok(TowingCompanyDraft {
            name: required("name", &self.name)?,
            email: email("email", &self.email)?,
            phone_number: required("phoneNumber", &self.phone_number)?,
            address: optional(&self.address),
            description: optional(&self.description),
            region: optional(&self.region),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsuranceCompanyForm {
    pub company_name: String,
    pub contact_email: String,
    pub user_id: String,
    pub active_claims: Vec<String>,
    pub region: String,
}

impl InsuranceCompanyForm {
    pub fn validate(self) -> Result<InsuranceCompanyDraft, CoreError> {
        Ok(InsuranceCompanyDraft {
            company_name: required("companyName", &self.company_name)?,
            contact_email: email("contactEmail", &self.contact_email)?,
            user_id: required("userId", &self.user_id)?,
            active_claims: self
                .active_claims
                .iter()
                .filter_map(|claim| optional(claim))
                .collect(),
            region: optional(&self.region),
            created_at: None,
        })
    }
}

// ── Edit forms ───────────────────────────────────────────────────────
//
// An edit only carries the fields being changed, but a required field
// cannot be blanked and an email must stay well-formed.

impl TowingCompanyPatch {
    pub fn validated(self) -> Result<Self, CoreError> {
        Ok(Self {
            name: self.name.map(|v| required("name", &v)).transpose()?,
            email: self.email.map(|v| email("email", &v)).transpose()?,
            phone_number: self
                .phone_number
                .map(|v| required("phoneNumber", &v))
                .transpose()?,
            ..self
        })
    }
}

impl InsuranceCompanyPatch {
    pub fn validated(self) -> Result<Self, CoreError> {
        Ok(Self {
            company_name: self
                .company_name
                .map(|v| required("companyName", &v))
                .transpose()?,
            contact_email: self
                .contact_email
                .map(|v| email("contactEmail", &v))
                .transpose()?,
            user_id: self.user_id.map(|v| required("userId", &v)).transpose()?,
            ..self
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::validation(field, "is required"));
    }
    Ok(value.to_owned())
}

fn email(field: &'static str, value: &str) -> Result<String, CoreError> {
    let value = required(field, value)?;
    if !value.contains('@') {
        return Err(CoreError::validation(field, "must be an email address"));
    }
    Ok(value)
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn towing() -> TowingCompanyForm {
        TowingCompanyForm {
            name: " Acme Tow ".into(),
            email: "dispatch@acmetow.test".into(),
            phone_number: "555-0100".into(),
            region: "NW".into(),
            ..TowingCompanyForm::default()
        }
    }

    #[test]
    fn towing_form_trims_and_drops_blanks() {
        let draft = towing().validate().unwrap();
        assert_eq!(draft.name, "Acme Tow");
        assert_eq!(draft.address, None);
        assert_eq!(draft.region.as_deref(), Some("NW"));
    }

    #[test]
    fn towing_form_requires_phone() {
        let err = TowingCompanyForm {
            phone_number: "   ".into(),
            ..towing()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation {
                field: "phoneNumber",
                reason: "is required".into(),
            }
        );
    }

    #[test]
    fn insurance_form_rejects_bad_email() {
        let err = InsuranceCompanyForm {
            company_name: "Acme Insurance".into(),
            contact_email: "claims.acme.test".into(),
            user_id: "u1".into(),
            ..InsuranceCompanyForm::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { field: "contactEmail", .. }));
    }

    #[test]
    fn insurance_form_requires_user() {
        let err = InsuranceCompanyForm {
            company_name: "Acme Insurance".into(),
            contact_email: "claims@acme.test".into(),
            ..InsuranceCompanyForm::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { field: "userId", .. }));
    }

    #[test]
    fn patch_cannot_blank_required_field() {
        let err = TowingCompanyPatch {
            name: Some(String::new()),
            ..TowingCompanyPatch::default()
        }
        .validated()
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { field: "name", .. }));

        let ok = TowingCompanyPatch {
            region: Some("SW".into()),
            ..TowingCompanyPatch::default()
        }
        .validated()
        .unwrap();
        assert_eq!(ok.region.as_deref(), Some("SW"));
    }
}
