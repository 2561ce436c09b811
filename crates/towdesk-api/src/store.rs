// ── Document store abstraction ──
//
// The one seam every entity service talks to. Implementations must keep
// the contract below regardless of backend.

use async_trait::async_trait;
use tracing::warn;

use crate::error::StoreError;
use crate::value::{Document, Fields};

/// Capability surface over a document-oriented database.
///
/// Contract shared by every implementation:
///
/// - `list_all` returns every document of a collection; order is whatever
///   the backend yields and callers must not rely on it.
/// - `get_by_id` returns `Ok(None)` for an absent document.
/// - `create` assigns the id; an `id` key in `fields` is dropped.
/// - `update_partial` merges the given top-level fields and leaves every
///   other field untouched. Updating an absent document is a write failure.
/// - `delete_by_id` is idempotent: deleting an absent id succeeds.
/// - Timestamps in returned documents are native [`Value::Timestamp`]s at
///   every nesting depth.
///
/// [`Value::Timestamp`]: crate::Value::Timestamp
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    async fn update_partial(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Remove a caller-supplied `id` from a write payload.
///
/// Document ids are owned by the store; a stray `id` field would otherwise
/// be persisted as data and shadow the real id on the next read.
pub(crate) fn strip_caller_id(collection: &str, fields: &mut Fields) {
    if let Some(id) = fields.remove("id") {
        warn!(collection, ?id, "ignoring caller-supplied id field on write");
    }
}
