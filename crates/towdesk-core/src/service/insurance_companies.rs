use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use towdesk_api::{Document, DocumentStore};

use super::{EntityService, INSURANCE_COMPANIES, decode_all};
use crate::error::CoreError;
use crate::model::{ApplyPatch, InsuranceCompany, InsuranceCompanyDraft, InsuranceCompanyPatch};

/// Access to `insurance_company`.
pub struct InsuranceCompanyService {
    store: Arc<dyn DocumentStore>,
}

impl InsuranceCompanyService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EntityService for InsuranceCompanyService {
    type Entity = InsuranceCompany;
    type Draft = InsuranceCompanyDraft;
    type Patch = InsuranceCompanyPatch;

    const LABEL: &'static str = "insurance companies";

    async fn fetch_all(&self) -> Result<Vec<InsuranceCompany>, CoreError> {
        let docs = self
            .store
            .list_all(INSURANCE_COMPANIES)
            .await
            .map_err(|e| CoreError::service("Failed to fetch companies", &e))?;
        decode_all(&docs, Document::decode, "Failed to fetch companies")
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<InsuranceCompany>, CoreError> {
        let doc = self
            .store
            .get_by_id(INSURANCE_COMPANIES, id)
            .await
            .map_err(|e| CoreError::service("Failed to fetch company", &e))?;
        doc.map(|d| d.decode())
            .transpose()
            .map_err(|e| CoreError::service("Failed to fetch company", &e))
    }

    async fn create(&self, draft: InsuranceCompanyDraft) -> Result<String, CoreError> {
        self.store
            .create(INSURANCE_COMPANIES, draft.into_fields(Utc::now()))
            .await
            .map_err(|e| CoreError::service("Failed to add company", &e))
    }

    async fn update(&self, id: &str, patch: &InsuranceCompanyPatch) -> Result<(), CoreError> {
        self.store
            .update_partial(INSURANCE_COMPANIES, id, patch.to_fields())
            .await
            .map_err(|e| CoreError::service("Failed to update company", &e))
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.store
            .delete_by_id(INSURANCE_COMPANIES, id)
            .await
            .map_err(|e| CoreError::service("Failed to delete company", &e))
    }
}
