//! Shared configuration for the CECECO hub CLI.
//!
//! A flat TOML file merged with `CECECO_`-prefixed environment variables,
//! translated to `cececo_core::HubConfig`. The CLI layers its own flag
//! overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cececo_core::HubConfig;

/// Server-side cap on `limit` for match requests.
pub const MAX_MATCH_LIMIT: u32 = 50;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

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

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Hub base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// `limit` sent with match requests.
    #[serde(default = "default_match_limit")]
    pub match_limit: u32,

    /// Matches shown before `--all`.
    #[serde(default = "default_preview")]
    pub preview: usize,

    /// Default output format (`table`, `json`, `yaml`, `plain`).
    #[serde(default = "default_output")]
    pub output: String,

    /// `auto`, `always` or `never`.
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout: default_timeout(),
            match_limit: default_match_limit(),
            preview: default_preview(),
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_api_base() -> String {
    cececo_core::config::DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_match_limit() -> u32 {
    MAX_MATCH_LIMIT
}
fn default_preview() -> usize {
    3
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

impl Config {
    /// Validate and translate to the core runtime config.
    pub fn to_hub_config(&self) -> Result<HubConfig, ConfigError> {
        let base = self.api_base.trim();
        url::Url::parse(base).map_err(|e| ConfigError::Validation {
            field: "api_base".into(),
            reason: format!("{e}: {base}"),
        })?;
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        if !(1..=MAX_MATCH_LIMIT).contains(&self.match_limit) {
            return Err(ConfigError::Validation {
                field: "match_limit".into(),
                reason: format!("must be between 1 and {MAX_MATCH_LIMIT}"),
            });
        }
        if self.preview == 0 {
            return Err(ConfigError::Validation {
                field: "preview".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(HubConfig {
            base_url: base.to_owned(),
            timeout: Duration::from_secs(self.timeout),
            match_limit: self.match_limit,
            preview: self.preview,
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "cececo", "cececo").map_or_else(
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
    p.push("cececo");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path`, then `CECECO_*` variables.
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CECECO_"))
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    Ok(figment_for(path).extract()?)
}

/// Load from the canonical path and the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, falling back to defaults if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}
