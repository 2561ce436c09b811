use std::sync::Arc;

use async_trait::async_trait;
use towdesk_api::{Document, DocumentStore};

use super::{EntityService, TOWING_COMPANIES, decode_all};
use crate::error::CoreError;
use crate::model::{ApplyPatch, TowingCompany, TowingCompanyDraft, TowingCompanyPatch};

/// Access to `towing_companies`.
pub struct TowingCompanyService {
    store: Arc<dyn DocumentStore>,
}

impl TowingCompanyService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EntityService for TowingCompanyService {
    type Entity = TowingCompany;
    type Draft = TowingCompanyDraft;
    type Patch = TowingCompanyPatch;

    const LABEL: &'static str = "towing companies";

    async fn fetch_all(&self) -> Result<Vec<TowingCompany>, CoreError> {
        let docs = self
            .store
            .list_all(TOWING_COMPANIES)
            .await
            .map_err(|e| CoreError::service("Failed to fetch towing companies", &e))?;
        decode_all(&docs, Document::decode, "Failed to fetch towing companies")
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<TowingCompany>, CoreError> {
        let doc = self
            .store
            .get_by_id(TOWING_COMPANIES, id)
            .await
            .map_err(|e| CoreError::service("Failed to fetch towing company", &e))?;
        doc.map(|d| d.decode())
            .transpose()
            .map_err(|e| CoreError::service("Failed to fetch towing company", &e))
    }

    async fn create(&self, draft: TowingCompanyDraft) -> Result<String, CoreError> {
        self.store
            .create(TOWING_COMPANIES, draft.into_fields())
            .await
            .map_err(|e| CoreError::service("Failed to add towing company", &e))
    }

    async fn update(&self, id: &str, patch: &TowingCompanyPatch) -> Result<(), CoreError> {
        self.store
            .update_partial(TOWING_COMPANIES, id, patch.to_fields())
            .await
            .map_err(|e| CoreError::service("Failed to update towing company", &e))
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.store
            .delete_by_id(TOWING_COMPANIES, id)
            .await
            .map_err(|e| CoreError::service("Failed to delete towing company", &e))
    }
}
