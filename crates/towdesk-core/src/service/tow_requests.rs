use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use towdesk_api::{Document, DocumentStore};

use super::{EntityService, TOW_REQUESTS, decode_all};
use crate::error::CoreError;
use crate::model::{ApplyPatch, TowRequest, TowRequestDraft, TowRequestPatch};

/// Access to `tow_requests`.
pub struct TowRequestService {
    store: Arc<dyn DocumentStore>,
}

impl TowRequestService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EntityService for TowRequestService {
    type Entity = TowRequest;
    type Draft = TowRequestDraft;
    type Patch = TowRequestPatch;

    const LABEL: &'static str = "tow requests";

    async fn fetch_all(&self) -> Result<Vec<TowRequest>, CoreError> {
        let docs = self
            .store
            .list_all(TOW_REQUESTS)
            .await
            .map_err(|e| CoreError::service("Failed to fetch all tow requests", &e))?;
        decode_all(&docs, Document::decode, "Failed to fetch all tow requests")
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<TowRequest>, CoreError> {
        let doc = self
            .store
            .get_by_id(TOW_REQUESTS, id)
            .await
            .map_err(|e| CoreError::service("Failed to fetch tow request", &e))?;
        doc.map(|d| d.decode())
            .transpose()
            .map_err(|e| CoreError::service("Failed to fetch tow request", &e))
    }

    async fn create(&self, draft: TowRequestDraft) -> Result<String, CoreError> {
        self.store
            .create(TOW_REQUESTS, draft.into_fields(Utc::now()))
            .await
            .map_err(|e| CoreError::service("Failed to create tow request", &e))
    }

    async fn update(&self, id: &str, patch: &TowRequestPatch) -> Result<(), CoreError> {
        self.store
            .update_partial(TOW_REQUESTS, id, patch.to_fields())
            .await
            .map_err(|e| CoreError::service("Failed to update tow request", &e))
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.store
            .delete_by_id(TOW_REQUESTS, id)
            .await
            .map_err(|e| CoreError::service("Failed to delete tow request", &e))
    }
}
