//! Config subcommand handlers.

use dialoguer::Input;

use cececo_config::{self as cfgfile, Config, MAX_MATCH_LIMIT};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn detail(c: &Config) -> String {
    [
        format!("api_base:    {}", c.api_base),
        format!("timeout:     {}s", c.timeout),
        format!("match_limit: {}", c.match_limit),
        format!("preview:     {}", c.preview),
        format!("output:      {}", c.output),
        format!("color:       {}", c.color),
    ]
    .join("\n")
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init => {
            let path = cfgfile::config_path();
            let current = cfgfile::load_config_or_default();
            eprintln!("CECECO hub CLI configuration");
            eprintln!("   Config path: {}\n", path.display());

            let api_base: String = Input::new()
                .with_prompt("Hub base URL")
                .default(global.api_base.clone().unwrap_or(current.api_base))
                .interact_text()
                .map_err(prompt_err)?;

            let timeout: u64 = Input::new()
                .with_prompt("Request timeout (seconds)")
                .default(current.timeout)
                .interact_text()
                .map_err(prompt_err)?;

            let match_limit: u32 = Input::new()
                .with_prompt(format!("Matches fetched per project (1-{MAX_MATCH_LIMIT})"))
                .default(current.match_limit)
                .interact_text()
                .map_err(prompt_err)?;

            let cfg = Config {
                api_base: api_base.trim().to_owned(),
                timeout,
                match_limit,
                ..current
            };
            // Refuse to write a file the next run could not load.
            cfg.to_hub_config()?;
            cfgfile::save_config_to(&cfg, &path)?;

            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Test it: cececo countries");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = cfgfile::load_config()?;
            let format = config::output_format(global, &cfg)?;
            let mut effective = cfg;
            if let Some(ref base) = global.api_base {
                effective.api_base.clone_from(base);
            }
            if let Some(timeout) = global.timeout {
                effective.timeout = timeout;
            }
            let out = output::render_single(format, &effective, detail, |c| c.api_base.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&cfgfile::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
