// ── Document value model ──
//
// Backend-neutral representation of document fields. Every adapter
// decodes into these types, so timestamps reach callers as native
// `DateTime<Utc>` values no matter how the backend encodes them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as Json};

/// Field name -> value map of a single document (or nested map).
pub type Fields = BTreeMap<String, Value>;

/// Latitude/longitude pair, stored natively by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Pointer to another document: collection path + document id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    pub collection: String,
    pub id: String,
}

impl DocumentRef {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Parse a relative document path (`"roles/admin"`,
    /// `"companies/c1/drivers/d9"`). The last segment is the id.
    pub fn parse_path(path: &str) -> Option<Self> {
        let (collection, id) = path.trim_matches('/').rsplit_once('/')?;
        if collection.is_empty() || id.is_empty() {
            return None;
        }
        Some(Self::new(collection, id))
    }

    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.id)
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    GeoPoint(GeoPoint),
    Reference(DocumentRef),
    Array(Vec<Value>),
    Map(Fields),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&DocumentRef> {
        match self {
            Self::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Plain JSON view used for typed decoding.
    ///
    /// Timestamps become RFC 3339 strings (which `chrono` deserializes back
    /// into `DateTime<Utc>`), geo points become `{latitude, longitude}`
    /// objects, references become their relative path.
    pub fn to_json(&self) -> Json {
        match self {
            Self::Null => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Integer(i) => Json::Number(Number::from(*i)),
            Self::Double(d) => Number::from_f64(*d).map_or(Json::Null, Json::Number),
            Self::String(s) => Json::String(s.clone()),
            Self::Timestamp(ts) => Json::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::GeoPoint(p) => {
                let mut obj = Map::new();
                obj.insert("latitude".into(), Self::Double(p.latitude).to_json());
                obj.insert("longitude".into(), Self::Double(p.longitude).to_json());
                Json::Object(obj)
            }
            Self::Reference(r) => Json::String(r.path()),
            Self::Array(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(fields) => Json::Object(fields_to_json(fields)),
        }
    }

    /// Lift plain JSON into a value. No type sniffing: strings stay strings.
    pub fn from_json(json: Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Double(n.as_f64().unwrap_or(f64::NAN)), Self::Integer),
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::Array(items.into_iter().map(Self::from_json).collect()),
            Json::Object(obj) => Self::Map(
                obj.into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Timestamp(ts)
    }
}

impl From<GeoPoint> for Value {
    fn from(p: GeoPoint) -> Self {
        Self::GeoPoint(p)
    }
}

impl From<DocumentRef> for Value {
    fn from(r: DocumentRef) -> Self {
        Self::Reference(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Convert a field map into a JSON object via [`Value::to_json`].
pub fn fields_to_json(fields: &Fields) -> Map<String, Json> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect()
}

/// A document as returned by a store: store-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// JSON object of the fields with the store id attached as `"id"`.
    ///
    /// The store id always wins over an `id` field stored in the document.
    pub fn to_json(&self) -> Json {
        let mut obj = fields_to_json(&self.fields);
        obj.insert("id".into(), Json::String(self.id.clone()));
        Json::Object(obj)
    }

    /// Decode into a typed record through [`Document::to_json`].
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn parse_nested_reference_path() {
        let r = DocumentRef::parse_path("companies/c1/drivers/d9").unwrap();
        assert_eq!(r.collection, "companies/c1/drivers");
        assert_eq!(r.id, "d9");
        assert!(DocumentRef::parse_path("roles").is_none());
    }

    #[test]
    fn document_json_attaches_store_id() {
        let mut fields = Fields::new();
        fields.insert("id".into(), "spoofed".into());
        fields.insert("name".into(), "Acme".into());
        let doc = Document::new("c123", fields);

        let json = doc.to_json();
        assert_eq!(json["id"], "c123");
        assert_eq!(json["name"], "Acme");
    }

    #[test]
    fn timestamps_render_as_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let value = Value::Map(Fields::from([(
            "history".to_owned(),
            Value::Array(vec![Value::Timestamp(ts)]),
        )]));
        assert_eq!(value.to_json(), json!({"history": ["2024-06-15T10:30:00Z"]}));
    }

    #[test]
    fn decode_typed_record() {
        #[derive(Deserialize)]
        struct Row {
            id: String,
            at: DateTime<Utc>,
            spot: GeoPoint,
        }

        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let doc = Document::new(
            "r1",
            Fields::from([
                ("at".to_owned(), Value::Timestamp(ts)),
                ("spot".to_owned(), GeoPoint::new(45.5, -122.6).into()),
            ]),
        );
        let row: Row = doc.decode().unwrap();
        assert_eq!(row.id, "r1");
        assert_eq!(row.at, ts);
        assert!((row.spot.latitude - 45.5).abs() < f64::EPSILON);
    }

    #[test]
    fn from_json_keeps_integers() {
        let v = Value::from_json(json!({"n": 3, "x": 1.5, "tags": ["a"]}));
        let Value::Map(fields) = v else {
            panic!("expected map");
        };
        assert_eq!(fields["n"], Value::Integer(3));
        assert_eq!(fields["x"], Value::Double(1.5));
        assert_eq!(fields["tags"], Value::Array(vec!["a".into()]));
    }
}
