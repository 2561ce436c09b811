//! Shared configuration for towdesk front ends.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `towdesk_core::BackendConfig`. The CLI adds
//! flag-aware overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use towdesk_api::Endpoint;
use towdesk_core::BackendConfig;
use towdesk_core::config::DEFAULT_DATABASE;

/// Keyring service name for stored API keys.
pub const KEYRING_SERVICE: &str = "towdesk";

/// Overrides the config file location (used by tests and scripts).
pub const CONFIG_PATH_ENV: &str = "TOWDESK_CONFIG";

const DEFAULT_AUTH_EMULATOR: &str = "127.0.0.1:9099";
const PRODUCTION_IDENTITY: &str = "https://identitytoolkit.googleapis.com/v1/";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Cloud project id.
    pub project_id: String,

    /// Database id (`(default)` unless the project uses named databases).
    #[serde(default = "default_database")]
    pub database: String,

    /// Web API key (plaintext, prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Firestore emulator `host:port`. Setting this selects the emulator.
    pub emulator_host: Option<String>,

    /// Auth emulator `host:port` (defaults to `127.0.0.1:9099`).
    pub auth_emulator_host: Option<String>,

    /// Explicit Firestore base URL (ending in `/v1/`), e.g. behind a proxy.
    pub firestore_url: Option<String>,

    /// Explicit Identity Toolkit base URL, paired with `firestore_url`.
    pub identity_url: Option<String>,

    /// Path to an extra CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

fn default_database() -> String {
    DEFAULT_DATABASE.into()
}

impl Profile {
    pub fn is_emulator(&self) -> bool {
        self.emulator_host.is_some()
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$TOWDESK_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "towdesk", "towdesk").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("towdesk");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. Layers: defaults, then the TOML file (if
/// present), then `TOWDESK_*` variables (`__` separates nested keys, e.g.
/// `TOWDESK_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TOWDESK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key"))
}

/// Resolve the profile's API key from the credential chain.
///
/// Emulator profiles may run keyless and yield `Ok(None)`; production
/// profiles without a key are an error.
pub fn resolve_api_key(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<SecretString>, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(Some(SecretString::from(val)));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(Some(SecretString::from(secret)));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        return Ok(Some(SecretString::from(key.clone())));
    }

    if profile.is_emulator() {
        return Ok(None);
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store an API key in the system keyring for `profile_name`.
pub fn store_api_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(key)?;
    Ok(())
}

/// Work out where the profile's services live.
pub fn resolve_endpoint(profile: &Profile) -> Result<Endpoint, ConfigError> {
    if let Some(ref host) = profile.emulator_host {
        return Ok(Endpoint::Emulator {
            firestore: host.clone(),
            auth: profile
                .auth_emulator_host
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTH_EMULATOR.into()),
        });
    }

    if let Some(ref raw) = profile.firestore_url {
        let firestore = parse_url("firestore_url", raw)?;
        let identity = parse_url(
            "identity_url",
            profile.identity_url.as_deref().unwrap_or(PRODUCTION_IDENTITY),
        )?;
        return Ok(Endpoint::Custom {
            firestore,
            identity,
        });
    }

    Ok(Endpoint::Production)
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Build a `BackendConfig` from a profile, with no CLI overrides.
pub fn profile_to_backend_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<BackendConfig, ConfigError> {
    let api_key = resolve_api_key(profile, profile_name)?;
    backend_config(profile, api_key)
}

/// Build a `BackendConfig` from a profile and an already-resolved key.
pub fn backend_config(
    profile: &Profile,
    api_key: Option<SecretString>,
) -> Result<BackendConfig, ConfigError> {
    if profile.project_id.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "project_id".into(),
            reason: "must not be empty".into(),
        });
    }

    let endpoint = resolve_endpoint(profile)?;

    let tls = profile
        .ca_cert
        .as_ref()
        .map_or(towdesk_api::TlsMode::System, |ca| {
            towdesk_api::TlsMode::CustomCa(ca.clone())
        });

    Ok(BackendConfig {
        project_id: profile.project_id.clone(),
        database: profile.database.clone(),
        api_key,
        endpoint,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout)),
    })
}
