// ── Domain model ──
//
// Typed records for every collection the dashboard touches, together with
// their write-side shapes: a `*Draft` for creation (no id field exists) and
// a `*Patch` of optional fields for partial updates.

pub mod insurance_company;
pub mod tow_request;
pub mod towing_company;
pub mod user;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use towdesk_api::{Fields, Value};

pub use insurance_company::{InsuranceCompany, InsuranceCompanyDraft, InsuranceCompanyPatch};
pub use tow_request::{TowRequest, TowRequestDraft, TowRequestPatch, TowStatus};
pub use towing_company::{TowingCompany, TowingCompanyDraft, TowingCompanyPatch};
pub use user::{Role, RoleKind, User, UserDraft, UserPatch};

/// A record carrying its store-assigned id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// A partial update that can be merged into a local copy of its entity.
pub trait ApplyPatch<T> {
    /// Overwrite the fields of `target` that this patch sets.
    fn apply_to(&self, target: &mut T);

    /// Field map holding only the fields this patch sets.
    fn to_fields(&self) -> Fields;
}

/// An enumerated field value that tolerates strings outside the enum.
///
/// Unknown values are preserved verbatim so they survive a read/write
/// round trip, but callers branching on the enum see them as unrecognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaybeKnown<T> {
    Known(T),
    Unrecognized(String),
}

impl<T> MaybeKnown<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unrecognized(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for MaybeKnown<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => v.fmt(f),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl<T> From<T> for MaybeKnown<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

/// Builder for write payloads: only fields that are actually set end up
/// in the map.
#[derive(Debug, Default)]
pub(crate) struct FieldWriter {
    fields: Fields,
}

impl FieldWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_owned(), value.into());
        self
    }

    pub(crate) fn set_opt<V: Into<Value>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(name, v),
            None => self,
        }
    }

    pub(crate) fn finish(self) -> Fields {
        self.fields
    }
}

/// Read a stored `null` as the field's default, the same as an absent key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Clone `src` into `dst` when set.
pub(crate) fn merge<T: Clone>(dst: &mut T, src: Option<&T>) {
    if let Some(v) = src {
        dst.clone_from(v);
    }
}

/// Like [`merge`], for optional target fields.
pub(crate) fn merge_opt<T: Clone>(dst: &mut Option<T>, src: Option<&T>) {
    if let Some(v) = src {
        *dst = Some(v.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_skips_unset_fields() {
        let fields = FieldWriter::new()
            .set("name", "Acme Tow")
            .set_opt("region", None::<String>)
            .set_opt("phoneNumber", Some("555-0100"))
            .finish();
        assert_eq!(fields.len(), 2);
        assert!(!fields.contains_key("region"));
    }
}
