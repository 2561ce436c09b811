//! Data-access and state layer between `towdesk-api` and front ends.
//!
//! - **[`Dashboard`]**: facade owning the shared [`DocumentStore`] handle,
//!   one [`EntityStore`] per entity, and the identity provider.
//!   [`Dashboard::connect`] builds Firestore-backed clients from a
//!   [`BackendConfig`]; [`Dashboard::with_store`] accepts any store.
//!
//! - **Services** ([`service`]): one per collection, implementing
//!   [`EntityService`]. They decode documents into typed records, apply
//!   creation defaults, resolve user role references, and wrap failures in
//!   short entity-specific messages.
//!
//! - **[`EntityStore<S>`]**: observable `{items, loading, error}` built on
//!   a `tokio::sync::watch` channel. Actions flip `loading` synchronously
//!   when called and return the outcome; [`StateStream`] exposes changes.
//!
//! - **Forms** ([`form`]): boundary validation producing typed drafts.
//!
//! [`DocumentStore`]: towdesk_api::DocumentStore

pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod model;
pub mod service;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::BackendConfig;
pub use dashboard::{Dashboard, IdentityProvider};
pub use error::CoreError;
pub use form::{InsuranceCompanyForm, TowingCompanyForm};
pub use service::{
    EntityService, InsuranceCompanyService, TowRequestService, TowingCompanyService, UserService,
};
pub use store::{EntityState, EntityStore, StateStream};

pub use model::{
    InsuranceCompany, InsuranceCompanyDraft, InsuranceCompanyPatch, MaybeKnown, Role, RoleKind,
    TowRequest, TowRequestDraft, TowRequestPatch, TowStatus, TowingCompany, TowingCompanyDraft,
    TowingCompanyPatch, User, UserDraft, UserPatch,
};
