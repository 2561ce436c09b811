// ── Tow request domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use towdesk_api::{Fields, GeoPoint, Value};

use super::{ApplyPatch, FieldWriter, Identified, MaybeKnown, merge, merge_opt, null_as_default};

/// Lifecycle of a tow request. Transitions are not enforced: any status
/// may be written at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TowStatus {
    Requested,
    Matched,
    EnRoute,
    Completed,
}

/// A roadside assistance request (`tow_requests` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vehicle_type: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub status: Option<MaybeKnown<TowStatus>>,
    #[serde(default)]
    pub matched_operator_id: Option<String>,
    #[serde(default)]
    pub eta_minutes: Option<u32>,
    /// Carried as-is; nothing ranks on it.
    #[serde(default)]
    pub priority_score: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for TowRequest {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TowRequestDraft {
    pub user_id: String,
    pub vehicle_type: String,
    pub location: Option<GeoPoint>,
    pub status: Option<TowStatus>,
    pub matched_operator_id: Option<String>,
    pub eta_minutes: Option<u32>,
    pub priority_score: Option<f64>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TowRequestDraft {
    pub(crate) fn into_fields(self, now: DateTime<Utc>) -> Fields {
        FieldWriter::new()
            .set("userId", self.user_id)
            .set("vehicleType", self.vehicle_type)
            .set_opt("location", self.location)
            .set(
                "status",
                self.status.unwrap_or(TowStatus::Requested).to_string(),
            )
            .set_opt("matchedOperatorId", self.matched_operator_id)
            .set_opt("etaMinutes", self.eta_minutes)
            .set_opt("priorityScore", self.priority_score)
            .set_opt("notes", self.notes)
            .set("createdAt", self.created_at.unwrap_or(now))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TowRequestPatch {
    pub vehicle_type: Option<String>,
    pub location: Option<GeoPoint>,
    pub status: Option<TowStatus>,
    pub matched_operator_id: Option<String>,
    pub eta_minutes: Option<u32>,
    pub priority_score: Option<f64>,
    pub notes: Option<String>,
}

impl ApplyPatch<TowRequest> for TowRequestPatch {
    fn apply_to(&self, target: &mut TowRequest) {
        merge(&mut target.vehicle_type, self.vehicle_type.as_ref());
        merge_opt(&mut target.location, self.location.as_ref());
        if let Some(status) = self.status {
            target.status = Some(status.into());
        }
        merge_opt(&mut target.matched_operator_id, self.matched_operator_id.as_ref());
        merge_opt(&mut target.eta_minutes, self.eta_minutes.as_ref());
        merge_opt(&mut target.priority_score, self.priority_score.as_ref());
        merge_opt(&mut target.notes, self.notes.as_ref());
    }

    fn to_fields(&self) -> Fields {
        FieldWriter::new()
            .set_opt("vehicleType", self.vehicle_type.clone())
            .set_opt("location", self.location)
            .set_opt("status", self.status.map(|s| Value::from(s.to_string())))
            .set_opt("matchedOperatorId", self.matched_operator_id.clone())
            .set_opt("etaMinutes", self.eta_minutes)
            .set_opt("priorityScore", self.priority_score)
            .set_opt("notes", self.notes.clone())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use towdesk_api::Document;

    #[test]
    fn unknown_status_survives_decoding() {
        let doc = Document::new(
            "t1",
            Fields::from([
                ("userId".to_owned(), Value::from("u1")),
                ("status".to_owned(), Value::from("towing_abroad")),
                ("etaMinutes".to_owned(), Value::Integer(15)),
            ]),
        );
        let req: TowRequest = doc.decode().unwrap();
        assert_eq!(
            req.status,
            Some(MaybeKnown::Unrecognized("towing_abroad".into()))
        );
        assert_eq!(req.eta_minutes, Some(15));
    }

    #[test]
    fn known_status_decodes_to_enum() {
        let doc = Document::new(
            "t2",
            Fields::from([
                ("status".to_owned(), Value::from("en_route")),
                ("location".to_owned(), GeoPoint::new(47.6, -122.3).into()),
            ]),
        );
        let req: TowRequest = doc.decode().unwrap();
        assert_eq!(req.status, Some(MaybeKnown::Known(TowStatus::EnRoute)));
        assert!(req.location.is_some());
    }

    #[test]
    fn patch_touches_only_set_fields() {
        let patch = TowRequestPatch {
            status: Some(TowStatus::Matched),
            matched_operator_id: Some("op-7".into()),
            ..TowRequestPatch::default()
        };
        let fields = patch.to_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["status"], Value::from("matched"));
    }
}
