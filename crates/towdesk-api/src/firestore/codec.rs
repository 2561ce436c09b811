// Firestore REST value encoding.
//
// Every wire value is a single-key object naming its kind
// (`{"stringValue": "x"}`, `{"mapValue": {"fields": {...}}}`). Decoding is
// where timestamp normalization happens: `timestampValue` becomes a native
// `DateTime<Utc>` at any depth, inside maps and arrays alike.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value as Json, json};

use crate::error::Error;
use crate::value::{DocumentRef, Fields, GeoPoint, Value};

/// Decode a Firestore `fields` object.
pub(crate) fn decode_fields(raw: &Map<String, Json>) -> Result<Fields, Error> {
    raw.iter()
        .map(|(name, value)| Ok((name.clone(), decode_value(value)?)))
        .collect()
}

/// Decode a single Firestore value object.
pub(crate) fn decode_value(raw: &Json) -> Result<Value, Error> {
    let Some((kind, inner)) = raw.as_object().and_then(|obj| obj.iter().next()) else {
        return Err(malformed("expected a single-key value object", raw));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| malformed("booleanValue is not a bool", raw)),
        // int64 travels as a decimal string to survive JSON number precision.
        "integerValue" => match inner {
            Json::String(s) => s
                .parse()
                .map(Value::Integer)
                .map_err(|_| malformed("integerValue is not an int64", raw)),
            Json::Number(n) => n
                .as_i64()
                .map(Value::Integer)
                .ok_or_else(|| malformed("integerValue is not an int64", raw)),
            _ => Err(malformed("integerValue has unexpected type", raw)),
        },
        "doubleValue" => match inner {
            Json::Number(n) => n
                .as_f64()
                .map(Value::Double)
                .ok_or_else(|| malformed("doubleValue is not a number", raw)),
            Json::String(s) => match s.as_str() {
                "NaN" => Ok(Value::Double(f64::NAN)),
                "Infinity" => Ok(Value::Double(f64::INFINITY)),
                "-Infinity" => Ok(Value::Double(f64::NEG_INFINITY)),
                _ => Err(malformed("doubleValue is not a number", raw)),
            },
            _ => Err(malformed("doubleValue has unexpected type", raw)),
        },
        "stringValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_owned()))
            .ok_or_else(|| malformed("stringValue is not a string", raw)),
        "timestampValue" => inner
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|ts| Value::Timestamp(ts.with_timezone(&Utc)))
            .ok_or_else(|| malformed("timestampValue is not RFC 3339", raw)),
        "geoPointValue" => {
            // Zero coordinates are omitted on the wire.
            let coord = |name: &str| inner.get(name).and_then(Json::as_f64).unwrap_or(0.0);
            Ok(Value::GeoPoint(GeoPoint::new(
                coord("latitude"),
                coord("longitude"),
            )))
        }
        "referenceValue" => inner
            .as_str()
            .and_then(parse_reference)
            .map(Value::Reference)
            .ok_or_else(|| malformed("referenceValue is not a document name", raw)),
        "arrayValue" => {
            let values = inner.get("values").and_then(Json::as_array);
            values
                .map_or_else(|| Ok(Vec::new()), |vs| vs.iter().map(decode_value).collect())
                .map(Value::Array)
        }
        "mapValue" => {
            let fields = inner.get("fields").and_then(Json::as_object);
            fields
                .map_or_else(|| Ok(Fields::new()), decode_fields)
                .map(Value::Map)
        }
        other => Err(malformed(&format!("unsupported value kind '{other}'"), raw)),
    }
}

/// Encode a field map as a Firestore `fields` object.
///
/// `documents_root` is the full resource prefix
/// (`projects/{p}/databases/{d}/documents`) needed for references.
pub(crate) fn encode_fields(fields: &Fields, documents_root: &str) -> Json {
    Json::Object(
        fields
            .iter()
            .map(|(name, value)| (name.clone(), encode_value(value, documents_root)))
            .collect(),
    )
}

pub(crate) fn encode_value(value: &Value, documents_root: &str) -> Json {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Integer(i) => json!({ "integerValue": i.to_string() }),
        Value::Double(d) if d.is_nan() => json!({ "doubleValue": "NaN" }),
        Value::Double(d) if d.is_infinite() => {
            json!({ "doubleValue": if *d > 0.0 { "Infinity" } else { "-Infinity" } })
        }
        Value::Double(d) => json!({ "doubleValue": d }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Timestamp(ts) => {
            json!({ "timestampValue": ts.to_rfc3339_opts(SecondsFormat::AutoSi, true) })
        }
        Value::GeoPoint(p) => {
            json!({ "geoPointValue": { "latitude": p.latitude, "longitude": p.longitude } })
        }
        Value::Reference(r) => {
            json!({ "referenceValue": format!("{documents_root}/{}", r.path()) })
        }
        Value::Array(items) => {
            let values: Vec<Json> = items
                .iter()
                .map(|v| encode_value(v, documents_root))
                .collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Map(fields) => {
            json!({ "mapValue": { "fields": encode_fields(fields, documents_root) } })
        }
    }
}

/// Parse a full document resource name into a [`DocumentRef`].
///
/// `projects/p/databases/(default)/documents/roles/admin` -> `roles` / `admin`.
pub(crate) fn parse_reference(name: &str) -> Option<DocumentRef> {
    let (_, path) = name.split_once("/documents/")?;
    DocumentRef::parse_path(path)
}

/// The trailing id segment of a document resource name.
pub(crate) fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Quote a field name for `updateMask.fieldPaths` when it is not a simple
/// identifier.
pub(crate) fn field_path(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        name.to_owned()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

fn malformed(message: &str, raw: &Json) -> Error {
    Error::Deserialization {
        message: message.to_owned(),
        body: raw.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ROOT: &str = "projects/demo/databases/(default)/documents";

    #[test]
    fn timestamps_normalize_at_every_depth() {
        let raw = json!({
            "createdAt": { "timestampValue": "2024-06-15T10:30:00Z" },
            "history": { "arrayValue": { "values": [
                { "mapValue": { "fields": {
                    "at": { "timestampValue": "2024-06-15T11:00:00.250Z" },
                    "legs": { "arrayValue": { "values": [
                        { "timestampValue": "2024-06-15T12:00:00+02:00" }
                    ] } }
                } } }
            ] } }
        });

        let fields = decode_fields(raw.as_object().unwrap()).unwrap();
        assert_eq!(
            fields["createdAt"],
            Value::Timestamp(Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap())
        );

        let Value::Array(history) = &fields["history"] else {
            panic!("history should be an array");
        };
        let Value::Map(entry) = &history[0] else {
            panic!("history entry should be a map");
        };
        assert!(matches!(entry["at"], Value::Timestamp(_)));
        let Value::Array(legs) = &entry["legs"] else {
            panic!("legs should be an array");
        };
        assert_eq!(
            legs[0],
            Value::Timestamp(Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn decode_scalars_and_references() {
        let raw = json!({
            "eta": { "integerValue": "12" },
            "score": { "doubleValue": 0.75 },
            "verified": { "booleanValue": true },
            "notes": { "nullValue": null },
            "role": { "referenceValue": format!("{ROOT}/roles/insurer") },
            "location": { "geoPointValue": { "latitude": 45.5 } },
            "claims": { "arrayValue": {} },
            "meta": { "mapValue": {} }
        });
        let fields = decode_fields(raw.as_object().unwrap()).unwrap();

        assert_eq!(fields["eta"], Value::Integer(12));
        assert_eq!(fields["score"], Value::Double(0.75));
        assert_eq!(fields["verified"], Value::Bool(true));
        assert_eq!(fields["notes"], Value::Null);
        assert_eq!(
            fields["role"],
            Value::Reference(DocumentRef::new("roles", "insurer"))
        );
        assert_eq!(fields["location"], Value::GeoPoint(GeoPoint::new(45.5, 0.0)));
        assert_eq!(fields["claims"], Value::Array(Vec::new()));
        assert_eq!(fields["meta"], Value::Map(Fields::new()));
    }

    #[test]
    fn unsupported_kind_is_an_error() {
        let err = decode_value(&json!({ "bytesValue": "AAEC" })).unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }

    #[test]
    fn encode_uses_wire_shapes() {
        let fields = Fields::from([
            ("eta".to_owned(), Value::Integer(7)),
            ("role".to_owned(), DocumentRef::new("roles", "admin").into()),
            ("claims".to_owned(), Value::from(vec!["cl-1"])),
        ]);
        let encoded = encode_fields(&fields, ROOT);
        assert_eq!(encoded["eta"], json!({ "integerValue": "7" }));
        assert_eq!(
            encoded["role"],
            json!({ "referenceValue": format!("{ROOT}/roles/admin") })
        );
        assert_eq!(
            encoded["claims"],
            json!({ "arrayValue": { "values": [{ "stringValue": "cl-1" }] } })
        );
    }

    #[test]
    fn field_paths_are_quoted_when_needed() {
        assert_eq!(field_path("companyName"), "companyName");
        assert_eq!(field_path("_private"), "_private");
        assert_eq!(field_path("contact-email"), "`contact-email`");
        assert_eq!(field_path("9lives"), "`9lives`");
    }

    #[test]
    fn document_id_is_last_segment() {
        assert_eq!(document_id(&format!("{ROOT}/insurance_company/c123")), "c123");
    }
}
