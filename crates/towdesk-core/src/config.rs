// ── Runtime backend configuration ──
//
// Describes *where* the document database and identity provider live and
// which credentials to present. The CLI constructs a `BackendConfig` and
// hands it in; core never reads config files.

use std::time::Duration;

use secrecy::SecretString;
use towdesk_api::{Endpoint, TlsMode, TransportConfig};

pub const DEFAULT_DATABASE: &str = "(default)";

/// Configuration for a single backend project.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Cloud project id (e.g. `towdesk-prod`).
    pub project_id: String,
    /// Database id within the project.
    pub database: String,
    /// Web API key, sent as the `key` query parameter. Optional against
    /// the emulator.
    pub api_key: Option<SecretString>,
    /// Production, emulator, or explicit base URLs.
    pub endpoint: Endpoint,
    pub tls: TlsMode,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.into(),
            api_key: None,
            endpoint: Endpoint::Production,
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}
