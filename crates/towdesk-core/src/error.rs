// ── Core error types ──
//
// User-facing errors from towdesk-core. Services never hand raw adapter
// errors upward: a failed read or write becomes a short entity-specific
// `Service` message after the original cause has been logged.

use std::fmt;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Data access ──────────────────────────────────────────────────
    /// An entity service operation failed (e.g. "Failed to fetch all tow
    /// requests"). The underlying cause has already been logged.
    #[error("{message}")]
    Service { message: String },

    // ── Form input ───────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    // ── Identity provider ────────────────────────────────────────────
    /// Rejection from the identity provider, displayed as-is.
    #[error("{message}")]
    Identity { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Log `cause` and wrap it as a [`CoreError::Service`] carrying only
    /// `message`.
    pub(crate) fn service(message: impl Into<String>, cause: &dyn fmt::Display) -> Self {
        let message = message.into();
        tracing::error!(error = %cause, "{message}");
        Self::Service { message }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<towdesk_api::Error> for CoreError {
    fn from(err: towdesk_api::Error) -> Self {
        match err {
            towdesk_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            towdesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Internal(e.to_string())
                }
            }
            towdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            towdesk_api::Error::InvalidDocumentId { id } => CoreError::Validation {
                field: "id",
                reason: format!("{id:?} is not a valid document id"),
            },
            towdesk_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            towdesk_api::Error::Api {
                message, status, ..
            } => CoreError::Internal(format!("HTTP {status}: {message}")),
            towdesk_api::Error::Identity { message } => CoreError::Identity { message },
            towdesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_message_is_verbatim() {
        let err: CoreError = towdesk_api::Error::Identity {
            message: "EMAIL_NOT_FOUND".into(),
        }
        .into();
        assert_eq!(err.to_string(), "EMAIL_NOT_FOUND");
    }

    #[test]
    fn service_error_keeps_only_message() {
        let err = CoreError::service("Failed to fetch companies", &"permission denied");
        assert_eq!(err.to_string(), "Failed to fetch companies");
    }

    #[test]
    fn validation_names_field() {
        let err = CoreError::validation("email", "must contain '@'");
        assert_eq!(err.to_string(), "Invalid email: must contain '@'");
    }
}
