//! Shared configuration for Mirakurun tools.
//!
//! TOML profiles naming one server each, layered with `MIRAKURUN_*`
//! environment variables, and translation to a ready `mirakurun_api::Client`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use mirakurun_api::{Client, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "MIRAKURUN_CONFIG";

/// Prefix for environment overrides of config keys.
pub const ENV_PREFIX: &str = "MIRAKURUN_";

/// Name of the implicit profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build client: {0}")]
    Client(#[from] mirakurun_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is selected on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds. Unset means no deadline, which live
    /// streams need.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}

fn default_url() -> String {
    DEFAULT_BASE_URL.into()
}

/// One Mirakurun server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API root, e.g. "http://tuner.local:40772/api/".
    #[serde(default = "default_url")]
    pub url: String,

    /// `X-Mirakurun-Priority` sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Overrides `defaults.timeout`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            url: default_url(),
            priority: None,
            user_agent: None,
            timeout: None,
        }
    }
}

impl Profile {
    /// Parse `url`, appending the trailing slash the client requires.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut url: Url = self.url.parse().map_err(|e| ConfigError::Validation {
            field: "url".into(),
            reason: format!("{e}: {}", self.url),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "url".into(),
                reason: format!("expected http or https, got '{}'", url.scheme()),
            });
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Build a client for this profile. `default_timeout` applies when the
    /// profile sets none.
    pub fn to_client(&self, default_timeout: Option<u64>) -> Result<Client, ConfigError> {
        let mut builder = Client::builder().base_url(self.base_url()?.as_str());

        if let Some(priority) = self.priority {
            builder = builder.priority(priority);
        }
        if let Some(ref agent) = self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        if let Some(secs) = self.timeout.or(default_timeout).filter(|s| *s > 0) {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(builder.build()?)
    }
}

impl Config {
    /// Resolve a profile by explicit name, falling back to
    /// `default_profile`. An unconfigured `default` profile resolves to the
    /// local server.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE);

        match self.profiles.get(name) {
            Some(profile) => Ok((name.to_owned(), profile.clone())),
            None if name == DEFAULT_PROFILE => Ok((name.to_owned(), Profile::default())),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `MIRAKURUN_CONFIG`, then the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    ProjectDirs::from("", "", "mirakurun").map_or_else(
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
    p.push("mirakurun");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the default path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load defaults, then `path` (if it exists), then `MIRAKURUN_*` variables.
///
/// Nested keys use `__`: `MIRAKURUN_PROFILES__HOME__URL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
