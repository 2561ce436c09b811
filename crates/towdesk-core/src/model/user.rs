// ── User domain types ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use strum::{Display, EnumString};
use towdesk_api::{Document, DocumentRef, Fields, Value};

use super::{ApplyPatch, FieldWriter, Identified, merge, merge_opt, null_as_default};

pub const DEFAULT_ROLE: &str = "user";
pub const DEFAULT_THEME: &str = "light";

/// Role names the platform knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoleKind {
    Civilian,
    Insurer,
    Responder,
    TowOperator,
    Admin,
}

/// The `role` field of a user document.
///
/// Stored either inline as a role name or as a reference to a document in
/// `roles`. [`UserService`](crate::service::UserService) turns references
/// into [`Role::Resolved`] before handing users out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Role {
    Named(String),
    Reference(DocumentRef),
    Resolved { id: String, data: Map<String, Json> },
}

impl Default for Role {
    fn default() -> Self {
        Self::Named(DEFAULT_ROLE.to_owned())
    }
}

impl Role {
    /// Interpret a raw `role` field. Only an absent field takes the default
    /// role; other scalars keep their raw JSON text as the name.
    pub fn from_field(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(name)) => Self::Named(name.clone()),
            Some(Value::Reference(r)) => Self::Reference(r.clone()),
            Some(Value::Map(fields)) => Self::Resolved {
                id: String::new(),
                data: towdesk_api::value::fields_to_json(fields),
            },
            Some(other) => Self::Named(other.to_json().to_string()),
            None => Self::default(),
        }
    }

    /// Role name: the inline string, or the resolved document's `name`
    /// field (falling back to its id).
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Reference(_) => None,
            Self::Resolved { id, data } => data.get("name").and_then(Json::as_str).or(Some(id)),
        }
    }

    /// `None` for names outside [`RoleKind`]; the raw name stays available
    /// through [`Role::name`].
    pub fn kind(&self) -> Option<RoleKind> {
        self.name().and_then(|n| n.parse().ok())
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference(r) => write!(f, "-> {r}"),
            other => f.write_str(other.name().unwrap_or_default()),
        }
    }
}

/// A platform account profile (`users` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Decoded separately: references and inline names share one field.
    #[serde(skip_deserializing)]
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn from_document(doc: &Document) -> Result<Self, serde_json::Error> {
        let mut user: Self = doc.decode()?;
        user.role = Role::from_field(doc.get("role"));
        Ok(user)
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// New user profile. `role`, `theme` and `created_at` are defaulted by the
/// service when left empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDraft {
    pub full_name: String,
    pub email: String,
    pub role: Option<String>,
    pub is_verified: bool,
    pub theme: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl UserDraft {
    pub(crate) fn into_fields(self, now: DateTime<Utc>) -> Fields {
        FieldWriter::new()
            .set("fullName", self.full_name)
            .set("email", self.email)
            .set("role", self.role.unwrap_or_else(|| DEFAULT_ROLE.to_owned()))
            .set("isVerified", self.is_verified)
            .set("theme", self.theme.unwrap_or_else(|| DEFAULT_THEME.to_owned()))
            .set("createdAt", self.created_at.unwrap_or(now))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub is_verified: Option<bool>,
    pub theme: Option<String>,
}

impl ApplyPatch<User> for UserPatch {
    fn apply_to(&self, target: &mut User) {
        merge(&mut target.full_name, self.full_name.as_ref());
        merge(&mut target.email, self.email.as_ref());
        if let Some(role) = &self.role {
            target.role = Role::Named(role.clone());
        }
        merge(&mut target.is_verified, self.is_verified.as_ref());
        merge_opt(&mut target.theme, self.theme.as_ref());
    }

    fn to_fields(&self) -> Fields {
        FieldWriter::new()
            .set_opt("fullName", self.full_name.clone())
            .set_opt("email", self.email.clone())
            .set_opt("role", self.role.clone())
            .set_opt("isVerified", self.is_verified)
            .set_opt("theme", self.theme.clone())
            .finish()
    }
}
