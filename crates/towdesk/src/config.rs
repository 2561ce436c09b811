//! CLI configuration: thin wrapper around `towdesk_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--project,
//! --api-key, --emulator, --timeout) on top of the stored profile.

use secrecy::SecretString;

use towdesk_core::BackendConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use towdesk_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Build the `BackendConfig` for this invocation.
///
/// A stored profile is the base; `--project` alone is enough to run
/// without one. Flags win over profile values.
pub fn resolve_backend(global: &GlobalOpts, config: &Config) -> Result<BackendConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(config),
            });
        }
        None if global.project.is_some() => Profile {
            database: towdesk_core::config::DEFAULT_DATABASE.into(),
            ..Profile::default()
        },
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref project) = global.project {
        profile.project_id.clone_from(project);
    }
    if let Some(ref host) = global.emulator {
        profile.emulator_host = Some(host.clone());
    }
    profile.timeout = global
        .timeout
        .or(profile.timeout)
        .or(Some(config.defaults.timeout));

    let api_key = match global.api_key {
        Some(ref key) => Some(SecretString::from(key.clone())),
        None => towdesk_config::resolve_api_key(&profile, &profile_name)?,
    };

    tracing::debug!(profile = %profile_name, project = %profile.project_id, "resolved backend");
    Ok(towdesk_config::backend_config(&profile, api_key)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use towdesk_core::config::DEFAULT_DATABASE;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["towdesk"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["roles", "list"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, profile: Profile) -> Config {
        let mut cfg = Config::default();
        cfg.default_profile = Some(name.into());
        cfg.profiles.insert(name.into(), profile);
        cfg
    }

    #[test]
    fn project_flag_works_without_profile() {
        let g = global(&["--project", "demo", "--emulator", "127.0.0.1:8080"]);
        let backend = resolve_backend(&g, &Config::default()).unwrap();
        assert_eq!(backend.project_id, "demo");
        assert_eq!(backend.database, DEFAULT_DATABASE);
        assert!(backend.endpoint.is_emulator());
        assert!(backend.api_key.is_none());
    }

    #[test]
    fn missing_everything_is_no_config() {
        let err = resolve_backend(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn explicit_unknown_profile_lists_available() {
        let cfg = config_with(
            "prod",
            Profile {
                project_id: "towdesk-prod".into(),
                ..Profile::default()
            },
        );
        let err = resolve_backend(&global(&["--profile", "staging"]), &cfg).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "staging");
                assert_eq!(available, "prod");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with(
            "prod",
            Profile {
                project_id: "towdesk-prod".into(),
                database: DEFAULT_DATABASE.into(),
                timeout: Some(5),
                ..Profile::default()
            },
        );
        let g = global(&["--project", "towdesk-staging", "--api-key", "k", "--timeout", "9"]);
        let backend = resolve_backend(&g, &cfg).unwrap();
        assert_eq!(backend.project_id, "towdesk-staging");
        assert_eq!(backend.timeout, Duration::from_secs(9));
        assert!(backend.api_key.is_some());
    }
}
