// ── Dashboard facade ──
//
// Owns the one document-store handle of the process, the four entity
// stores wired to it, and the identity provider. Front ends build one
// `Dashboard` and pass it around; there are no global stores.

use std::sync::Arc;

use async_trait::async_trait;
use towdesk_api::{DocumentStore, FirestoreClient, IdentityClient};
use tracing::{debug, info};

use crate::config::BackendConfig;
use crate::error::CoreError;
use crate::service::{
    InsuranceCompanyService, TowRequestService, TowingCompanyService, UserService,
};
use crate::store::EntityStore;

/// Account operations delegated to the hosted identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Rejections carry the provider's own message for display.
    async fn send_password_reset_email(&self, email: &str) -> Result<(), CoreError>;
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn send_password_reset_email(&self, email: &str) -> Result<(), CoreError> {
        IdentityClient::send_password_reset_email(self, email)
            .await
            .map_err(CoreError::from)
    }
}

/// Central facade over every entity store.
pub struct Dashboard {
    store: Arc<dyn DocumentStore>,
    identity: Option<Arc<dyn IdentityProvider>>,
    users: EntityStore<UserService>,
    tow_requests: EntityStore<TowRequestService>,
    insurance_companies: EntityStore<InsuranceCompanyService>,
    towing_companies: EntityStore<TowingCompanyService>,
}

impl Dashboard {
    /// Build the Firestore and identity clients described by `config`.
    pub fn connect(config: &BackendConfig) -> Result<Self, CoreError> {
        if config.project_id.trim().is_empty() {
            return Err(CoreError::Config {
                message: "no project id configured".into(),
            });
        }
        let transport = config.transport();
        let firestore = FirestoreClient::new(
            &config.endpoint,
            config.project_id.clone(),
            config.database.clone(),
            config.api_key.clone(),
            &transport,
        )?;
        let identity = IdentityClient::new(&config.endpoint, config.api_key.clone(), &transport)?;

        info!(
            project = %config.project_id,
            database = %config.database,
            emulator = config.endpoint.is_emulator(),
            "dashboard connected"
        );
        Ok(Self::with_store(Arc::new(firestore), Some(Arc::new(identity))))
    }

    /// Wire everything to an arbitrary store (e.g. an in-memory one).
    pub fn with_store(
        store: Arc<dyn DocumentStore>,
        identity: Option<Arc<dyn IdentityProvider>>,
    ) -> Self {
        debug!("building entity stores");
        Self {
            users: EntityStore::new(UserService::new(Arc::clone(&store))),
            tow_requests: EntityStore::new(TowRequestService::new(Arc::clone(&store))),
            insurance_companies: EntityStore::new(InsuranceCompanyService::new(Arc::clone(
                &store,
            ))),
            towing_companies: EntityStore::new(TowingCompanyService::new(Arc::clone(&store))),
            store,
            identity,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn document_store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn users(&self) -> &EntityStore<UserService> {
        &self.users
    }

    pub fn tow_requests(&self) -> &EntityStore<TowRequestService> {
        &self.tow_requests
    }

    pub fn insurance_companies(&self) -> &EntityStore<InsuranceCompanyService> {
        &self.insurance_companies
    }

    pub fn towing_companies(&self) -> &EntityStore<TowingCompanyService> {
        &self.towing_companies
    }

    // ── Identity ─────────────────────────────────────────────────────

    pub async fn send_password_reset_email(&self, email: &str) -> Result<(), CoreError> {
        let identity = self.identity.as_ref().ok_or_else(|| CoreError::Config {
            message: "no identity provider configured".into(),
        })?;
        identity.send_password_reset_email(email).await
    }
}
