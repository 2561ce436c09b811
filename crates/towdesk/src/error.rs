//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use towdesk_config::ConfigError;
use towdesk_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(towdesk::connection_failed),
        help(
            "Check network access, or that the emulator is running.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(towdesk::timeout),
        help("Increase the timeout with --timeout or `towdesk config set timeout <secs>`.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(towdesk::auth_failed),
        help(
            "Verify the project's web API key and security rules.\n\
             Run: towdesk config set-api-key"
        )
    )]
    AuthFailed { message: String },

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(towdesk::no_credentials),
        help(
            "Store one with: towdesk config set-api-key --profile {profile}\n\
             Or set the TOWDESK_API_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(towdesk::not_found),
        help("Run: towdesk {list_command} to see available ids")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Backend ──────────────────────────────────────────────────────
    /// Entity-level failure; the cause is in the `-v` log.
    #[error("{message}")]
    #[diagnostic(code(towdesk::operation_failed), help("Re-run with -vv for details."))]
    OperationFailed { message: String },

    #[error("{message}")]
    #[diagnostic(code(towdesk::identity))]
    Identity { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(towdesk::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(towdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(towdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: towdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(towdesk::no_config),
        help(
            "Create a profile with: towdesk config init\n\
             Or pass --project (plus --emulator for local testing).\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(towdesk::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {0}")]
    #[diagnostic(code(towdesk::keyring))]
    Keyring(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(towdesk::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to serialize config: {0}")]
    Toml(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn not_found(resource_type: &str, identifier: &str, list_command: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Service { message } => Self::OperationFailed { message },
            CoreError::Validation { field, reason } => Self::Validation {
                field: field.into(),
                reason,
            },
            CoreError::Identity { message } => Self::Identity { message },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Keyring(e) => Self::Keyring(e.to_string()),
            ConfigError::Serialization(e) => Self::Toml(e.to_string()),
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}
