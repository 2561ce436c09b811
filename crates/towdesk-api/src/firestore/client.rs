// Hand-crafted async HTTP client for the Firestore REST API (v1).
//
// Documents are addressed as
//   {base}/projects/{project}/databases/{database}/documents/{collection}/{id}
// and carry their fields in Firestore's typed value encoding (see `codec`).

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as Json, json};
use tracing::debug;
use url::Url;

use super::codec;
use crate::endpoint::Endpoint;
use crate::error::{Error, StoreError};
use crate::store::{DocumentStore, strip_caller_id};
use crate::transport::TransportConfig;
use crate::value::{Document, Fields};

const PAGE_SIZE: u32 = 300;

// ── Wire shapes ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Json>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl WireDocument {
    fn into_document(self) -> Result<Document, Error> {
        let fields = codec::decode_fields(&self.fields)?;
        Ok(Document::new(codec::document_id(&self.name), fields))
    }
}

/// Reject names Firestore cannot address as a single path segment.
fn check_segment(name: &str) -> Result<(), Error> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(Error::InvalidDocumentId {
            id: name.to_owned(),
        });
    }
    Ok(())
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Firestore REST API.
///
/// Implements [`DocumentStore`]; the inherent methods expose the richer
/// [`Error`] for callers that want backend detail.
pub struct FirestoreClient {
    http: reqwest::Client,
    base_url: Url,
    project_id: String,
    database: String,
    api_key: Option<SecretString>,
}

impl FirestoreClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for the given endpoint and project.
    ///
    /// Against the emulator, `Authorization: Bearer owner` is injected on
    /// every request so security rules are bypassed.
    pub fn new(
        endpoint: &Endpoint,
        project_id: impl Into<String>,
        database: impl Into<String>,
        api_key: Option<SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if endpoint.is_emulator() {
            headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer owner"));
        }
        let http = transport.build_client_with_headers(headers)?;
        Self::with_client(endpoint.firestore_base()?, http, project_id, database, api_key)
    }

    /// Wrap an existing `reqwest::Client` (caller manages extra headers).
    pub fn with_client(
        base_url: Url,
        http: reqwest::Client,
        project_id: impl Into<String>,
        database: impl Into<String>,
        api_key: Option<SecretString>,
    ) -> Result<Self, Error> {
        let project_id = project_id.into();
        if project_id.is_empty() {
            return Err(Error::Authentication {
                message: "project id must not be empty".into(),
            });
        }
        Ok(Self {
            http,
            base_url,
            project_id,
            database: database.into(),
            api_key,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `projects/{p}/databases/{d}/documents`, the prefix of every
    /// document resource name.
    fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database
        )
    }

    /// Document or collection URL. Each name is pushed as its own
    /// percent-encoded path segment, so an id can never leave `collection`.
    fn url(&self, collection: &str, id: Option<&str>) -> Result<Url, Error> {
        check_segment(collection)?;
        if let Some(id) = id {
            check_segment(id)?;
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            segments.pop_if_empty().extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                self.database.as_str(),
                "documents",
                collection,
            ]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn auth_params(&self) -> Vec<(&'static str, String)> {
        self.api_key
            .iter()
            .map(|key| ("key", key.expose_secret().to_owned()))
            .collect()
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            // An empty collection lists as `{}` or even an empty body.
            let body = if body.trim().is_empty() {
                "{}".to_owned()
            } else {
                body
            };
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ErrorEnvelope>(&raw).ok();
        let (message, code) = match parsed {
            Some(env) => (
                env.error.message.unwrap_or_else(|| status.to_string()),
                env.error.status,
            ),
            None if raw.is_empty() => (status.to_string(), None),
            None => (raw, None),
        };

        if matches!(
            status,
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN
        ) {
            return Error::Authentication { message };
        }

        Error::Api {
            message,
            code,
            status: status.as_u16(),
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Every document in `collection`, following `nextPageToken` until the
    /// listing is exhausted.
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, Error> {
        let url = self.url(collection, None)?;
        let mut all = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = self.auth_params();
            params.push(("pageSize", PAGE_SIZE.to_string()));
            if let Some(token) = page_token.take() {
                params.push(("pageToken", token));
            }
            debug!("GET {url} fetched={}", all.len());

            let resp = self.http.get(url.clone()).query(&params).send().await?;
            let page: ListResponse = Self::handle_response(resp).await?;
            for doc in page.documents {
                all.push(doc.into_document()?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(all)
    }

    /// Single document, or `None` on 404.
    pub async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, Error> {
        let url = self.url(collection, Some(id))?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .query(&self.auth_params())
            .send()
            .await?;
        match Self::handle_response::<WireDocument>(resp).await {
            Ok(doc) => doc.into_document().map(Some),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a document with a server-assigned id; returns that id.
    pub async fn create_document(&self, collection: &str, fields: &Fields) -> Result<String, Error> {
        let url = self.url(collection, None)?;
        debug!("POST {url}");

        let body = json!({ "fields": codec::encode_fields(fields, &self.documents_root()) });
        let resp = self
            .http
            .post(url)
            .query(&self.auth_params())
            .json(&body)
            .send()
            .await?;
        let created: WireDocument = Self::handle_response(resp).await?;
        Ok(codec::document_id(&created.name).to_owned())
    }

    /// Merge `fields` into an existing document.
    ///
    /// Only the named fields are written (`updateMask`), and the call
    /// fails if the document does not exist (`currentDocument.exists`).
    pub async fn patch_document(
        &self,
        collection: &str,
        id: &str,
        fields: &Fields,
    ) -> Result<(), Error> {
        if fields.is_empty() {
            // A mask-less PATCH would replace the whole document.
            return match self.get_document(collection, id).await? {
                Some(_) => Ok(()),
                None => Err(Error::Api {
                    message: format!("document {collection}/{id} not found"),
                    code: Some("NOT_FOUND".into()),
                    status: 404,
                }),
            };
        }

        let url = self.url(collection, Some(id))?;
        let mut params = self.auth_params();
        params.extend(
            fields
                .keys()
                .map(|name| ("updateMask.fieldPaths", codec::field_path(name))),
        );
        params.push(("currentDocument.exists", "true".to_owned()));
        debug!("PATCH {url} fields={:?}", fields.keys().collect::<Vec<_>>());

        let body = json!({ "fields": codec::encode_fields(fields, &self.documents_root()) });
        let resp = self
            .http
            .patch(url)
            .query(&params)
            .json(&body)
            .send()
            .await?;
        let _: WireDocument = Self::handle_response(resp).await?;
        Ok(())
    }

    /// Delete a document. Absent documents are not an error.
    pub async fn delete_document(&self, collection: &str, id: &str) -> Result<(), Error> {
        let url = self.url(collection, Some(id))?;
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .query(&self.auth_params())
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.list_documents(collection)
            .await
            .map_err(|e| StoreError::read(collection, "list_all", &e))
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.get_document(collection, id)
            .await
            .map_err(|e| StoreError::read(collection, "get_by_id", &e))
    }

    async fn create(&self, collection: &str, mut fields: Fields) -> Result<String, StoreError> {
        strip_caller_id(collection, &mut fields);
        self.create_document(collection, &fields)
            .await
            .map_err(|e| StoreError::write(collection, "create", &e))
    }

    async fn update_partial(
        &self,
        collection: &str,
        id: &str,
        mut fields: Fields,
    ) -> Result<(), StoreError> {
        strip_caller_id(collection, &mut fields);
        self.patch_document(collection, id, &fields)
            .await
            .map_err(|e| StoreError::write(collection, "update_partial", &e))
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.delete_document(collection, id)
            .await
            .map_err(|e| StoreError::write(collection, "delete_by_id", &e))
    }
}
