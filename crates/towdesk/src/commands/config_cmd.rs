//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};
use towdesk_core::config::DEFAULT_DATABASE;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the plaintext API key.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "project_id = \"{}\"", p.project_id);
        let _ = writeln!(out, "database = \"{}\"", p.database);
        if p.api_key.is_some() {
            let _ = writeln!(out, "api_key = \"****\"");
        }
        let optional = [
            ("api_key_env", p.api_key_env.as_deref()),
            ("emulator_host", p.emulator_host.as_deref()),
            ("auth_emulator_host", p.auth_emulator_host.as_deref()),
            ("firestore_url", p.firestore_url.as_deref()),
            ("identity_url", p.identity_url.as_deref()),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                let _ = writeln!(out, "{key} = \"{value}\"");
            }
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Copy of the config with plaintext secrets masked, for structured output.
fn redacted(cfg: &Config) -> Config {
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: config::Defaults {
            output: cfg.defaults.output.clone(),
            color: cfg.defaults.color.clone(),
            timeout: cfg.defaults.timeout,
        },
        profiles: cfg
            .profiles
            .iter()
            .map(|(name, p)| {
                let mut p = p.clone();
                if p.api_key.is_some() {
                    p.api_key = Some("****".into());
                }
                (name.clone(), p)
            })
            .collect(),
    }
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_api_key() -> Result<String, CliError> {
    let key = rpassword::prompt_password("Web API key: ").map_err(prompt_err)?;
    if key.trim().is_empty() {
        return Err(CliError::Validation {
            field: "api_key".into(),
            reason: "API key cannot be empty".into(),
        });
    }
    Ok(key.trim().to_owned())
}

/// Offer keyring or plaintext storage for the API key.
///
/// Returns `Some(key)` if the user chose plaintext, `None` if stored in keyring.
fn store_key_interactively(profile_name: &str, key: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the API key?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        towdesk_config::store_api_key(profile_name, key)?;
        eprintln!("   ✓ API key stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(key.to_owned()))
    }
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    let key = key.replace('-', "_");
    match key.as_str() {
        "project_id" | "project" => profile.project_id = value,
        "database" => profile.database = value,
        "api_key" => profile.api_key = Some(value),
        "api_key_env" => profile.api_key_env = Some(value),
        "emulator_host" | "emulator" => profile.emulator_host = Some(value),
        "auth_emulator_host" => profile.auth_emulator_host = Some(value),
        "firestore_url" => profile.firestore_url = Some(value),
        "identity_url" => profile.identity_url = Some(value),
        "ca_cert" => profile.ca_cert = Some(value.into()),
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: project_id, database, api_key, \
                     api_key_env, emulator_host, auth_emulator_host, firestore_url, \
                     identity_url, ca_cert, timeout"
                ),
            });
        }
    }
    Ok(())
}

fn new_profile() -> Profile {
    Profile {
        database: DEFAULT_DATABASE.into(),
        ..Profile::default()
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("towdesk configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let mut profile = new_profile();
            profile.project_id = Input::new()
                .with_prompt("Cloud project id")
                .interact_text()
                .map_err(prompt_err)?;

            let backends = &["Production", "Local emulator suite"];
            let backend = Select::new()
                .with_prompt("Backend")
                .items(backends)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            if backend == 0 {
                let key = prompt_api_key()?;
                profile.api_key = store_key_interactively(&profile_name, &key)?;
            } else {
                let host: String = Input::new()
                    .with_prompt("Firestore emulator host:port")
                    .default("127.0.0.1:8080".into())
                    .interact_text()
                    .map_err(prompt_err)?;
                profile.emulator_host = Some(host);
            }

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: towdesk roles list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |c| {
                config::active_profile_name(global, c)
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(new_profile);
            set_profile_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            output::note(&format!("Set {key} on profile '{profile_name}'"), global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: towdesk config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::note(&format!("Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        // ── SetApiKey ───────────────────────────────────────────────
        ConfigCommand::SetApiKey { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let key = prompt_api_key()?;
            towdesk_config::store_api_key(&profile_name, &key)?;
            output::note(
                &format!("API key stored in system keyring for profile '{profile_name}'"),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_accepts_dashed_keys() {
        let mut p = new_profile();
        set_profile_key(&mut p, "emulator-host", "127.0.0.1:8080".into()).unwrap();
        set_profile_key(&mut p, "timeout", "12".into()).unwrap();
        assert_eq!(p.emulator_host.as_deref(), Some("127.0.0.1:8080"));
        assert_eq!(p.timeout, Some(12));
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_timeout() {
        let mut p = new_profile();
        assert!(matches!(
            set_profile_key(&mut p, "site", "x".into()),
            Err(CliError::Validation { .. })
        ));
        assert!(matches!(
            set_profile_key(&mut p, "timeout", "soon".into()),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn show_masks_plaintext_key() {
        let mut cfg = Config::default();
        let mut p = new_profile();
        p.project_id = "towdesk-prod".into();
        p.api_key = Some("AIza-secret".into());
        cfg.profiles.insert("prod".into(), p);

        let text = format_config_redacted(&redacted(&cfg));
        assert!(text.contains("project_id = \"towdesk-prod\""));
        assert!(text.contains("api_key = \"****\""));
        assert!(!text.contains("AIza-secret"));
    }
}
