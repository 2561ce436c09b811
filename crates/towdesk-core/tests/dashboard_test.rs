#![allow(clippy::unwrap_used)]
// End-to-end behavior of the dashboard over the in-memory store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use towdesk_api::{
    Document, DocumentRef, DocumentStore, Fields, InMemoryStore, StoreError, Value,
};

use towdesk_core::{
    CoreError, Dashboard, EntityService, IdentityProvider, InsuranceCompanyForm,
    InsuranceCompanyPatch, Role, TowingCompanyForm, TowingCompanyPatch, UserDraft,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn dashboard() -> (Arc<InMemoryStore>, Dashboard) {
    let store = Arc::new(InMemoryStore::new());
    let dashboard = Dashboard::with_store(store.clone(), None);
    (store, dashboard)
}

fn acme_form() -> InsuranceCompanyForm {
    InsuranceCompanyForm {
        company_name: "Acme Tow".into(),
        contact_email: "a@acme.com".into(),
        user_id: "u1".into(),
        active_claims: Vec::new(),
        region: "NW".into(),
    }
}

/// A store where every operation fails.
struct BrokenStore;

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::read(collection, "list_all", &"connection reset"))
    }

    async fn get_by_id(&self, collection: &str, _id: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::read(collection, "get_by_id", &"connection reset"))
    }

    async fn create(&self, collection: &str, _fields: Fields) -> Result<String, StoreError> {
        Err(StoreError::write(collection, "create", &"connection reset"))
    }

    async fn update_partial(
        &self,
        collection: &str,
        _id: &str,
        _fields: Fields,
    ) -> Result<(), StoreError> {
        Err(StoreError::write(collection, "update_partial", &"connection reset"))
    }

    async fn delete_by_id(&self, collection: &str, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::write(collection, "delete_by_id", &"connection reset"))
    }
}

#[derive(Default)]
struct RecordingIdentity {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl IdentityProvider for RecordingIdentity {
    async fn send_password_reset_email(&self, email: &str) -> Result<(), CoreError> {
        if !email.ends_with("@acme.test") {
            return Err(CoreError::Identity {
                message: "EMAIL_NOT_FOUND".into(),
            });
        }
        self.sent.lock().unwrap().push(email.to_owned());
        Ok(())
    }
}

// ── Insurance company lifecycle ─────────────────────────────────────

#[tokio::test]
async fn add_then_fetch_keeps_submitted_fields() {
    let (_store, dash) = dashboard();
    let companies = dash.insurance_companies();

    let id = companies.add(acme_form().validate().unwrap()).await.unwrap();

    let snap = companies.snapshot();
    let company = snap.items.iter().find(|c| c.id == id).unwrap();
    assert_eq!(company.company_name, "Acme Tow");
    assert_eq!(company.contact_email, "a@acme.com");
    assert_eq!(company.user_id, "u1");
    assert!(company.active_claims.is_empty());
    assert_eq!(company.region.as_deref(), Some("NW"));
    assert!(company.created_at.is_some());
}

#[tokio::test]
async fn update_region_leaves_other_fields() {
    let (_store, dash) = dashboard();
    let companies = dash.insurance_companies();
    let id = companies.add(acme_form().validate().unwrap()).await.unwrap();
    let before = companies.service().fetch_by_id(&id).await.unwrap().unwrap();

    companies
        .update(
            &id,
            InsuranceCompanyPatch {
                region: Some("SW".into()),
                ..InsuranceCompanyPatch::default()
            },
        )
        .await
        .unwrap();

    let after = companies.service().fetch_by_id(&id).await.unwrap().unwrap();
    assert_eq!(after.region.as_deref(), Some("SW"));
    assert_eq!(after.company_name, "Acme Tow");
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(companies.snapshot().items, vec![after]);
}

#[tokio::test]
async fn delete_then_get_is_none_and_repeat_delete_succeeds() {
    let (_store, dash) = dashboard();
    let companies = dash.insurance_companies();
    let id = companies.add(acme_form().validate().unwrap()).await.unwrap();

    companies.delete(&id).await.unwrap();
    companies.delete(&id).await.unwrap();

    assert!(companies.service().fetch_by_id(&id).await.unwrap().is_none());
    assert!(companies.snapshot().items.is_empty());
    assert_eq!(companies.snapshot().error, None);
}

// ── Towing companies ────────────────────────────────────────────────

#[tokio::test]
async fn towing_company_round_trip() {
    let (store, dash) = dashboard();
    let towing = dash.towing_companies();

    let draft = TowingCompanyForm {
        name: "Acme Tow".into(),
        email: "dispatch@acmetow.test".into(),
        phone_number: "555-0100".into(),
        ..TowingCompanyForm::default()
    }
    .validate()
    .unwrap();
    let id = towing.add(draft).await.unwrap();
    assert_eq!(store.len("towing_companies"), 1);

    let patch = TowingCompanyPatch {
        phone_number: Some("555-0199".into()),
        ..TowingCompanyPatch::default()
    }
    .validated()
    .unwrap();
    towing.update(&id, patch).await.unwrap();

    let company = towing.service().fetch_by_id(&id).await.unwrap().unwrap();
    assert_eq!(company.phone_number, "555-0199");
    assert_eq!(company.name, "Acme Tow");
}

// ── Users ───────────────────────────────────────────────────────────

#[tokio::test]
async fn users_list_with_resolved_role_references() {
    let (store, dash) = dashboard();
    store.insert(
        "roles",
        "insurer",
        Fields::from([("name".to_owned(), Value::from("insurer"))]),
    );
    store.insert(
        "users",
        "u1",
        Fields::from([
            ("fullName".to_owned(), Value::from("Dana Reyes")),
            ("role".to_owned(), DocumentRef::new("roles", "insurer").into()),
        ]),
    );

    dash.users().fetch_all().await.unwrap();

    let snap = dash.users().snapshot();
    assert_eq!(snap.items.len(), 1);
    let Role::Resolved { id, data } = &snap.items[0].role else {
        panic!("role should be resolved, got {:?}", snap.items[0].role);
    };
    assert_eq!(id, "insurer");
    assert_eq!(data.get("name").and_then(|v| v.as_str()), Some("insurer"));
}

#[tokio::test]
async fn user_profile_defaults() {
    let (store, dash) = dashboard();

    let id = dash
        .users()
        .add(UserDraft {
            full_name: "Pat Kim".into(),
            email: "pat@acme.test".into(),
            ..UserDraft::default()
        })
        .await
        .unwrap();

    let raw = store.get_by_id("users", &id).await.unwrap().unwrap();
    assert_eq!(raw.get("role"), Some(&Value::from("user")));
    assert_eq!(raw.get("theme"), Some(&Value::from("light")));
    assert!(raw.get("createdAt").and_then(Value::as_timestamp).is_some());
}

#[tokio::test]
async fn null_fields_do_not_fail_collection_reads() {
    let (store, dash) = dashboard();
    store.insert("users", "u1", Fields::from([("fullName".to_owned(), Value::Null)]));
    store.insert(
        "users",
        "u2",
        Fields::from([("fullName".to_owned(), Value::from("Dana Reyes"))]),
    );
    store.insert(
        "insurance_company",
        "c1",
        Fields::from([
            ("companyName".to_owned(), Value::from("Acme Tow")),
            ("activeClaims".to_owned(), Value::Null),
        ]),
    );

    dash.users().fetch_all().await.unwrap();
    let names: Vec<String> = dash
        .users()
        .snapshot()
        .items
        .iter()
        .map(|u| u.full_name.clone())
        .collect();
    assert_eq!(names, vec![String::new(), "Dana Reyes".to_owned()]);

    dash.insurance_companies().fetch_all().await.unwrap();
    let snap = dash.insurance_companies().snapshot();
    assert_eq!(snap.items.len(), 1);
    assert!(snap.items[0].active_claims.is_empty());
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn store_failures_surface_entity_messages() {
    let dash = Dashboard::with_store(Arc::new(BrokenStore), None);

    let err = dash.tow_requests().fetch_all().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch all tow requests");
    assert_eq!(
        dash.tow_requests().snapshot().error.as_deref(),
        Some("Failed to fetch all tow requests")
    );

    let err = dash
        .insurance_companies()
        .add(acme_form().validate().unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to add company");
}

// ── Identity ────────────────────────────────────────────────────────

#[tokio::test]
async fn password_reset_goes_through_identity_provider() {
    let identity = Arc::new(RecordingIdentity::default());
    let provider: Arc<dyn IdentityProvider> = identity.clone();
    let dash = Dashboard::with_store(Arc::new(InMemoryStore::new()), Some(provider));

    dash.send_password_reset_email("ops@acme.test").await.unwrap();
    let err = dash
        .send_password_reset_email("nobody@elsewhere.test")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "EMAIL_NOT_FOUND");
    assert_eq!(*identity.sent.lock().unwrap(), vec!["ops@acme.test".to_owned()]);
}

#[tokio::test]
async fn password_reset_without_provider_is_config_error() {
    let (_store, dash) = dashboard();
    let err = dash.send_password_reset_email("ops@acme.test").await.unwrap_err();
    assert!(matches!(err, CoreError::Config { .. }));
}
