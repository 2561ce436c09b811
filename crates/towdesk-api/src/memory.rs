// ── In-memory document store ──
//
// DashMap-backed implementation of `DocumentStore` for tests, demos and
// offline use. Behaves like the remote store: ids are assigned on create,
// updates merge, deletes are idempotent.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{DocumentStore, strip_caller_id};
use crate::value::{Document, Fields};

/// Auto-generated ids use the same length as the hosted backend's.
const AUTO_ID_LEN: usize = 20;

/// Documents keyed by collection, then by id.
#[derive(Default)]
pub struct InMemoryStore {
    collections: DashMap<String, BTreeMap<String, Fields>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a document under a known id, replacing any existing one.
    ///
    /// Seeding path for fixtures (role documents, demo data); the
    /// [`DocumentStore::create`] path never accepts an id.
    pub fn insert(&self, collection: &str, id: &str, fields: Fields) {
        self.collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), fields);
    }

    /// Number of documents currently in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |docs| docs.len())
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn next_id() -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(AUTO_ID_LEN);
        id
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let docs = self.collections.get(collection).map_or_else(Vec::new, |docs| {
            docs.iter()
                .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                .collect()
        });
        debug!(collection, count = docs.len(), "listed documents");
        Ok(docs)
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id).cloned())
            .map(|fields| Document::new(id, fields)))
    }

    async fn create(&self, collection: &str, mut fields: Fields) -> Result<String, StoreError> {
        strip_caller_id(collection, &mut fields);
        let id = Self::next_id();
        self.insert(collection, &id, fields);
        debug!(collection, %id, "created document");
        Ok(id)
    }

    async fn update_partial(
        &self,
        collection: &str,
        id: &str,
        mut fields: Fields,
    ) -> Result<(), StoreError> {
        strip_caller_id(collection, &mut fields);
        let mut docs = self.collections.entry(collection.to_owned()).or_default();
        let Some(existing) = docs.get_mut(id) else {
            return Err(StoreError::write(
                collection,
                "update_partial",
                &format_args!("no document with id '{id}'"),
            ));
        };
        existing.extend(fields);
        debug!(collection, id, "merged document fields");
        Ok(())
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        if let Some(mut docs) = self.collections.get_mut(collection) {
            docs.remove(id);
        }
        debug!(collection, id, "deleted document");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn company() -> Fields {
        Fields::from([
            ("companyName".to_owned(), Value::from("Acme Tow")),
            ("region".to_owned(), Value::from("NW")),
        ])
    }

    #[tokio::test]
    async fn create_assigns_fresh_id_and_drops_caller_id() {
        let store = InMemoryStore::new();
        let mut fields = company();
        fields.insert("id".into(), "x".into());

        let id = store.create("insurance_company", fields).await.unwrap();
        assert_ne!(id, "x");
        assert_eq!(id.len(), AUTO_ID_LEN);

        let doc = store.get_by_id("insurance_company", &id).await.unwrap().unwrap();
        assert!(doc.get("id").is_none());
        assert!(store.get_by_id("insurance_company", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = InMemoryStore::new();
        let id = store.create("insurance_company", company()).await.unwrap();

        store
            .update_partial(
                "insurance_company",
                &id,
                Fields::from([("region".to_owned(), Value::from("SW"))]),
            )
            .await
            .unwrap();

        let doc = store.get_by_id("insurance_company", &id).await.unwrap().unwrap();
        assert_eq!(doc.get("region"), Some(&Value::from("SW")));
        assert_eq!(doc.get("companyName"), Some(&Value::from("Acme Tow")));
    }

    #[tokio::test]
    async fn update_of_missing_document_fails() {
        let store = InMemoryStore::new();
        let err = store
            .update_partial("insurance_company", "nope", company())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed { .. }));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryStore::new();
        store.delete_by_id("insurance_company", "ghost").await.unwrap();
        store.delete_by_id("insurance_company", "ghost").await.unwrap();

        let id = store.create("insurance_company", company()).await.unwrap();
        store.delete_by_id("insurance_company", &id).await.unwrap();
        store.delete_by_id("insurance_company", &id).await.unwrap();
        assert!(store.is_empty("insurance_company"));
    }

    #[tokio::test]
    async fn list_unknown_collection_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.list_all("nothing").await.unwrap().is_empty());
    }
}
