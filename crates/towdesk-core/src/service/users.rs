use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::future::try_join_all;
use towdesk_api::DocumentStore;
use towdesk_api::value::fields_to_json;
use tracing::debug;

use super::{EntityService, ROLES, USERS, decode_all};
use crate::error::CoreError;
use crate::model::{ApplyPatch, Role, User, UserDraft, UserPatch};

/// Access to `users`, with role-reference resolution.
pub struct UserService {
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Ids of every document in `roles`. Nothing else about a role
    /// document is consumed.
    pub async fn fetch_roles(&self) -> Result<Vec<String>, CoreError> {
        let docs = self
            .store
            .list_all(ROLES)
            .await
            .map_err(|e| CoreError::service("Failed to fetch roles", &e))?;
        Ok(docs.into_iter().map(|doc| doc.id).collect())
    }

    /// Replace a role reference with the referenced document's data.
    /// A dangling reference is an error, not a silent fallback.
    async fn resolve_role(&self, role: Role) -> Result<Role, CoreError> {
        let Role::Reference(target) = role else {
            return Ok(role);
        };
        debug!(role = %target, "resolving role reference");

        match self.store.get_by_id(&target.collection, &target.id).await {
            Ok(Some(doc)) => Ok(Role::Resolved {
                data: fields_to_json(&doc.fields),
                id: doc.id,
            }),
            Ok(None) => Err(CoreError::service(
                "Failed to resolve user role",
                &format_args!("referenced document {target} does not exist"),
            )),
            Err(e) => Err(CoreError::service("Failed to resolve user role", &e)),
        }
    }

    async fn resolve_user(&self, mut user: User) -> Result<User, CoreError> {
        user.role = self.resolve_role(std::mem::take(&mut user.role)).await?;
        Ok(user)
    }
}

#[async_trait]
impl EntityService for UserService {
    type Entity = User;
    type Draft = UserDraft;
    type Patch = UserPatch;

    const LABEL: &'static str = "users";

    /// All users with every role reference resolved. Resolutions run
    /// concurrently; any single failure fails the whole call.
    async fn fetch_all(&self) -> Result<Vec<User>, CoreError> {
        let docs = self
            .store
            .list_all(USERS)
            .await
            .map_err(|e| CoreError::service("Failed to fetch users", &e))?;
        let users = decode_all(&docs, User::from_document, "Failed to fetch users")?;

        try_join_all(users.into_iter().map(|user| self.resolve_user(user))).await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<User>, CoreError> {
        let doc = self
            .store
            .get_by_id(USERS, id)
            .await
            .map_err(|e| CoreError::service("Failed to fetch user", &e))?;
        let Some(doc) = doc else {
            return Ok(None);
        };
        let user = User::from_document(&doc)
            .map_err(|e| CoreError::service("Failed to fetch user", &e))?;
        self.resolve_user(user).await.map(Some)
    }

    async fn create(&self, draft: UserDraft) -> Result<String, CoreError> {
        self.store
            .create(USERS, draft.into_fields(Utc::now()))
            .await
            .map_err(|e| CoreError::service("Failed to create user profile", &e))
    }

    async fn update(&self, id: &str, patch: &UserPatch) -> Result<(), CoreError> {
        self.store
            .update_partial(USERS, id, patch.to_fields())
            .await
            .map_err(|e| CoreError::service("Failed to update user profile", &e))
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.store
            .delete_by_id(USERS, id)
            .await
            .map_err(|e| CoreError::service("Failed to delete user", &e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use towdesk_api::{DocumentRef, Fields, InMemoryStore, Value};

    use crate::model::RoleKind;

    fn seeded() -> (Arc<InMemoryStore>, UserService) {
        let store = Arc::new(InMemoryStore::new());
        store.insert(
            ROLES,
            "insurer",
            Fields::from([("name".to_owned(), Value::from("insurer"))]),
        );
        store.insert(ROLES, "admin", Fields::new());
        let service = UserService::new(store.clone());
        (store, service)
    }

    fn user_fields(name: &str, role: Value) -> Fields {
        Fields::from([
            ("fullName".to_owned(), Value::from(name)),
            ("email".to_owned(), Value::from(format!("{name}@acme.test"))),
            ("role".to_owned(), role),
            ("isVerified".to_owned(), Value::from(false)),
        ])
    }

    #[tokio::test]
    async fn reference_roles_are_resolved_to_document_data() {
        let (store, service) = seeded();
        store.insert(
            USERS,
            "u1",
            user_fields("dana", DocumentRef::new(ROLES, "insurer").into()),
        );
        store.insert(USERS, "u2", user_fields("sam", Value::from("civilian")));

        let users = service.fetch_all().await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(
            users[0].role,
            Role::Resolved {
                id: "insurer".into(),
                data: json!({"name": "insurer"}).as_object().cloned().unwrap(),
            }
        );
        assert_eq!(users[0].role.kind(), Some(RoleKind::Insurer));
        assert_eq!(users[1].role, Role::Named("civilian".into()));
    }

    #[tokio::test]
    async fn dangling_reference_fails_fetch_all() {
        let (store, service) = seeded();
        store.insert(USERS, "u1", user_fields("dana", Value::from("admin")));
        store.insert(
            USERS,
            "u2",
            user_fields("ghost", DocumentRef::new(ROLES, "deleted-role").into()),
        );

        let err = service.fetch_all().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to resolve user role");
    }

    #[tokio::test]
    async fn create_applies_profile_defaults() {
        let (_store, service) = seeded();
        let id = service
            .create(UserDraft {
                full_name: "Pat".into(),
                email: "pat@acme.test".into(),
                ..UserDraft::default()
            })
            .await
            .unwrap();

        let user = service.fetch_by_id(&id).await.unwrap().unwrap();
        assert_eq!(user.role, Role::Named("user".into()));
        assert_eq!(user.theme.as_deref(), Some("light"));
        assert!(user.created_at.is_some());
    }

    #[tokio::test]
    async fn fetch_roles_returns_document_ids() {
        let (_store, service) = seeded();
        let mut roles = service.fetch_roles().await.unwrap();
        roles.sort();
        assert_eq!(roles, vec!["admin".to_owned(), "insurer".to_owned()]);
    }
}
