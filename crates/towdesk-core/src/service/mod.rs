// ── Entity access services ──
//
// One service per collection. Each turns generic document-store results
// into typed records, applies creation defaults, and collapses every
// failure into a short entity-specific `CoreError::Service` after logging
// the original cause.

mod insurance_companies;
mod tow_requests;
mod towing_companies;
mod users;

use async_trait::async_trait;
use towdesk_api::Document;

use crate::error::CoreError;
use crate::model::{ApplyPatch, Identified};

pub use insurance_companies::InsuranceCompanyService;
pub use tow_requests::TowRequestService;
pub use towing_companies::TowingCompanyService;
pub use users::UserService;

// ── Collection names ─────────────────────────────────────────────────

pub const USERS: &str = "users";
pub const ROLES: &str = "roles";
pub const INSURANCE_COMPANIES: &str = "insurance_company";
pub const TOW_REQUESTS: &str = "tow_requests";
pub const TOWING_COMPANIES: &str = "towing_companies";

/// The operations every entity service offers.
///
/// [`EntityStore`](crate::store::EntityStore) is generic over this trait,
/// so any implementation (including test doubles) can back a store.
#[async_trait]
pub trait EntityService: Send + Sync + 'static {
    type Entity: Identified + Clone + Send + Sync + 'static;
    /// Creation payload. Has no id field: ids are store-assigned.
    type Draft: Send + 'static;
    /// Partial update; only set fields are written.
    type Patch: ApplyPatch<Self::Entity> + Send + Sync + 'static;

    /// Plural noun for messages ("tow requests").
    const LABEL: &'static str;

    /// Every record, in the order the store returned them.
    async fn fetch_all(&self) -> Result<Vec<Self::Entity>, CoreError>;

    /// `Ok(None)` when the record does not exist.
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Self::Entity>, CoreError>;

    /// Store the draft with defaults applied; returns the new id.
    async fn create(&self, draft: Self::Draft) -> Result<String, CoreError>;

    async fn update(&self, id: &str, patch: &Self::Patch) -> Result<(), CoreError>;

    /// Idempotent: deleting an absent record succeeds.
    async fn delete(&self, id: &str) -> Result<(), CoreError>;
}

/// Decode a listing, failing the whole batch on the first bad document.
pub(crate) fn decode_all<T>(
    docs: &[Document],
    decode: impl Fn(&Document) -> Result<T, serde_json::Error>,
    message: &str,
) -> Result<Vec<T>, CoreError> {
    docs.iter()
        .map(|doc| {
            decode(doc).map_err(|e| {
                CoreError::service(message, &format_args!("document {}: {e}", doc.id))
            })
        })
        .collect()
}
