use thiserror::Error;

/// Top-level error type for the `towdesk-api` crate.
///
/// Covers every failure mode of the REST clients: transport, HTTP status,
/// backend error bodies, and wire decoding. The [`DocumentStore`] surface
/// never returns this type directly -- it collapses it into [`StoreError`]
/// after logging.
///
/// [`DocumentStore`]: crate::DocumentStore
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Request rejected for missing or invalid credentials (HTTP 401/403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Collection or document id that is not a single path segment.
    #[error("Invalid document id: {id:?}")]
    InvalidDocumentId { id: String },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Structured error body returned by the document database.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: u16,
    },

    /// Rejection from the identity provider. The message is the provider's
    /// own text (e.g. `EMAIL_NOT_FOUND`) and is meant for display.
    #[error("{message}")]
    Identity { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON or wire-value decoding failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this error is a network-level fault rather than a
    /// rejection by the backend.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Extract the backend error code (e.g. `"NOT_FOUND"`), if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Failure surfaced by a [`DocumentStore`](crate::DocumentStore).
///
/// One variant per operation category. Backend codes
/// and messages stay out of it; the original cause is logged at the point
/// where the error is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("read failed: {operation} on '{collection}'")]
    ReadFailed {
        collection: String,
        operation: &'static str,
    },

    #[error("write failed: {operation} on '{collection}'")]
    WriteFailed {
        collection: String,
        operation: &'static str,
    },
}

impl StoreError {
    /// Log `cause` and build a [`StoreError::ReadFailed`].
    pub fn read(collection: &str, operation: &'static str, cause: &dyn std::fmt::Display) -> Self {
        tracing::error!(collection, operation, error = %cause, "document read failed");
        Self::ReadFailed {
            collection: collection.to_owned(),
            operation,
        }
    }

    /// Log `cause` and build a [`StoreError::WriteFailed`].
    pub fn write(collection: &str, operation: &'static str, cause: &dyn std::fmt::Display) -> Self {
        tracing::error!(collection, operation, error = %cause, "document write failed");
        Self::WriteFailed {
            collection: collection.to_owned(),
            operation,
        }
    }

    pub fn collection(&self) -> &str {
        match self {
            Self::ReadFailed { collection, .. } | Self::WriteFailed { collection, .. } => collection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_hides_cause() {
        let err = StoreError::read("users", "list_all", &"permission denied: rules v2");
        assert_eq!(err.to_string(), "read failed: list_all on 'users'");
        assert_eq!(err.collection(), "users");
    }

    #[test]
    fn api_404_is_not_found() {
        let err = Error::Api {
            message: "missing".into(),
            code: Some("NOT_FOUND".into()),
            status: 404,
        };
        assert!(err.is_not_found());
        assert_eq!(err.api_error_code(), Some("NOT_FOUND"));
        assert!(!err.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Api {
            message: "unavailable".into(),
            code: None,
            status: 503,
        };
        assert!(err.is_transient());
    }
}
