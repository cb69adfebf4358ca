//! Profile resolution for the CLI: the config file from `mirakurun-config`
//! plus command-line overrides, translated to a `mirakurun_api::Client`.

use clap::ValueEnum;
use mirakurun_api::Client;
use mirakurun_config::{Config, ConfigError, DEFAULT_PROFILE, Profile};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use mirakurun_config::{config_path, load_config, save_config};

/// Determine which profile name is active.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.into())
}

/// Pick the profile, then apply `--url`, `--priority` and `--timeout`.
///
/// A missing default profile is tolerated when `--url` names the server;
/// an explicitly requested profile must exist.
pub fn resolve_profile(global: &GlobalOpts, cfg: &Config) -> Result<Profile, CliError> {
    let mut profile = match cfg.resolve_profile(global.profile.as_deref()) {
        Ok((_, profile)) => profile,
        Err(ConfigError::UnknownProfile { .. })
            if global.profile.is_none() && global.url.is_some() =>
        {
            Profile::default()
        }
        Err(ConfigError::UnknownProfile { name }) => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(cfg),
            });
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(ref url) = global.url {
        profile.url.clone_from(url);
    }
    if let Some(priority) = global.priority {
        profile.priority = Some(priority);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    Ok(profile)
}

/// Build the API client for this invocation.
pub fn build_client(global: &GlobalOpts, cfg: &Config) -> Result<Client, CliError> {
    let profile = resolve_profile(global, cfg)?;
    tracing::debug!(
        profile = %active_profile_name(global, cfg),
        url = %profile.url,
        priority = ?profile.priority,
        "building client"
    );
    Ok(profile.to_client(cfg.defaults.timeout)?)
}

/// `--output` wins, then `defaults.output`, then table.
pub fn resolve_output(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(ref format) = global.output {
        return Ok(format.clone());
    }
    OutputFormat::from_str(&cfg.defaults.output, true).map_err(|_| CliError::Validation {
        field: "defaults.output".into(),
        reason: format!(
            "unknown output format '{}' (expected table, json, json-compact, yaml or plain)",
            cfg.defaults.output
        ),
    })
}

/// Comma-separated profile names for error hints.
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn global() -> GlobalOpts {
        GlobalOpts {
            profile: None,
            url: None,
            priority: None,
            output: None,
            timeout: None,
            verbose: 0,
            quiet: false,
        }
    }

    fn config_with_home() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                url: "http://tuner.local:40772/api/".into(),
                priority: Some(1),
                user_agent: None,
                timeout: None,
            },
        );
        cfg
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with_home();
        let opts = GlobalOpts {
            profile: Some("home".into()),
            priority: Some(-1),
            timeout: Some(0),
            ..global()
        };
        let profile = resolve_profile(&opts, &cfg).unwrap();
        assert_eq!(profile.url, "http://tuner.local:40772/api/");
        assert_eq!(profile.priority, Some(-1));
        assert_eq!(profile.timeout, Some(0));
    }

    #[test]
    fn url_flag_works_without_config() {
        let cfg = Config {
            default_profile: Some("living".into()),
            ..Config::default()
        };
        let opts = GlobalOpts {
            url: Some("http://10.0.0.2:40772/api".into()),
            ..global()
        };
        let client = build_client(&opts, &cfg).unwrap();
        assert_eq!(client.base_url().as_str(), "http://10.0.0.2:40772/api/");
    }

    #[test]
    fn unknown_profile_lists_alternatives() {
        let cfg = config_with_home();
        let opts = GlobalOpts {
            profile: Some("office".into()),
            ..global()
        };
        match resolve_profile(&opts, &cfg).unwrap_err() {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "office");
                assert_eq!(available, "home");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn output_falls_back_to_config_default() {
        let mut cfg = Config::default();
        cfg.defaults.output = "yaml".into();
        assert_eq!(resolve_output(&global(), &cfg).unwrap(), OutputFormat::Yaml);

        let opts = GlobalOpts {
            output: Some(OutputFormat::Json),
            ..global()
        };
        assert_eq!(resolve_output(&opts, &cfg).unwrap(), OutputFormat::Json);

        cfg.defaults.output = "xml".into();
        assert!(matches!(
            resolve_output(&global(), &cfg),
            Err(CliError::Validation { .. })
        ));
    }
}
