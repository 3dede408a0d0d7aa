//! Command dispatch: bridges CLI args -> core screens -> output formatting.

pub mod config_cmd;
pub mod countries;
pub mod investors;
pub mod news;
pub mod projects;
pub mod util;

use cececo_core::{HubClient, HubConfig, ProjectKind};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

/// Everything a hub-bound handler needs.
pub struct Ctx {
    pub client: HubClient,
    pub hub: HubConfig,
    pub global: GlobalOpts,
    pub output: OutputFormat,
    pub color: bool,
}

impl Ctx {
    pub fn new(resolved: Resolved, global: GlobalOpts) -> Result<Self, CliError> {
        let client = resolved.hub.client()?;
        Ok(Self {
            client,
            hub: resolved.hub,
            global,
            output: resolved.output,
            color: output::should_color(resolved.color),
        })
    }

    /// Spinners and headings only accompany table output.
    pub fn decorated(&self) -> bool {
        self.output == OutputFormat::Table && !self.global.quiet
    }
}

/// Dispatch a hub-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Ctx) -> Result<(), CliError> {
    match cmd {
        Command::Countries => countries::handle(ctx).await,
        Command::Investors(args) => investors::handle(ctx, args).await,
        Command::Projects(args) => projects::handle(ctx, ProjectKind::Project, args).await,
        Command::Startups(args) => projects::handle(ctx, ProjectKind::Startup, args).await,
        Command::News(args) => news::handle(ctx, args).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "handled without a hub connection".into(),
        }),
    }
}
