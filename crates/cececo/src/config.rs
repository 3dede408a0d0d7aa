//! Resolve the effective CLI settings: config file and `CECECO_*`
//! environment first, then command-line flags on top.
//!
//! Core never sees the TOML types; it receives a validated `HubConfig`.

use clap::ValueEnum;

use cececo_config::Config;
use cececo_core::HubConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Settings a command runs with.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub hub: HubConfig,
    pub output: OutputFormat,
    pub color: ColorMode,
}

/// Load the config file and apply flag overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = cececo_config::load_config()?;
    resolve_with(cfg, global)
}

pub fn resolve_with(mut cfg: Config, global: &GlobalOpts) -> Result<Resolved, CliError> {
    if let Some(ref base) = global.api_base {
        cfg.api_base.clone_from(base);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    let hub = cfg.to_hub_config()?;

    Ok(Resolved {
        hub,
        output: output_format(global, &cfg)?,
        color: color_mode(global, &cfg)?,
    })
}

/// Output format: `--output` wins over the config value.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(fmt) = global.output {
        return Ok(fmt);
    }
    OutputFormat::from_str(&cfg.output, true).map_err(|_| CliError::Validation {
        field: "output".into(),
        reason: format!("unknown output format '{}'", cfg.output),
    })
}

/// Color mode: `--color` wins over the config value.
pub fn color_mode(global: &GlobalOpts, cfg: &Config) -> Result<ColorMode, CliError> {
    if let Some(mode) = global.color {
        return Ok(mode);
    }
    ColorMode::from_str(&cfg.color, true).map_err(|_| CliError::Validation {
        field: "color".into(),
        reason: format!("unknown color mode '{}'", cfg.color),
    })
}
