//! Clap derive structures for the `cececo` CLI.
//!
//! Only depends on clap so `build.rs` can render man pages from it.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cececo -- browse the CECECO hub directory from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "cececo",
    version,
    about = "Browse countries, projects, startups, investors and news on the CECECO hub",
    long_about = "Browse the CECECO clean-energy hub directory from the command line.\n\n\
        Listings accept the same filters as the web screens and can be seeded\n\
        from a shared link with --link \"?q=solar&country_id=7\".",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Hub base URL (overrides config)
    #[arg(long, env = "CECECO_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Output format [default: table]
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Seed listing filters from a link query, e.g. "?q=solar&country_id=7"
    #[arg(long, global = true, value_name = "QUERY")]
    pub link: Option<String>,

    /// Print the canonical link for the applied filters to stderr
    #[arg(long, global = true)]
    pub print_link: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List countries known to the hub
    #[command(alias = "c")]
    Countries,

    /// Browse and register investors
    #[command(alias = "inv", alias = "i")]
    Investors(InvestorsArgs),

    /// Browse projects and their investor matches
    #[command(alias = "p")]
    Projects(ProjectsArgs),

    /// Browse startups and their investor matches
    #[command(alias = "s")]
    Startups(ProjectsArgs),

    /// Browse approved country news
    #[command(alias = "n")]
    News(NewsArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared filter arguments ──────────────────────────────────────────

/// Server-side filters mirrored to the link.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Free-text search
    #[arg(long)]
    pub query: Option<String>,

    /// Country id (see `cececo countries`)
    #[arg(long, short = 'c', value_name = "ID")]
    pub country: Option<String>,
}

/// Client-side facet narrowing (OR within a flag, AND across flags).
#[derive(Debug, Args)]
pub struct FacetArgs {
    /// Keep items tagged with this sector (repeatable)
    #[arg(long)]
    pub sector: Vec<String>,

    /// Keep items at this stage (repeatable)
    #[arg(long)]
    pub stage: Vec<String>,

    /// List the available facet values instead of the items
    #[arg(long)]
    pub facets: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INVESTORS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InvestorsArgs {
    #[command(subcommand)]
    pub command: InvestorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum InvestorsCommand {
    /// List investors
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Investor category
        #[arg(long = "type", short = 't', value_parser = INVESTOR_TYPES)]
        investor_type: Option<String>,

        #[command(flatten)]
        facets: FacetArgs,
    },

    /// Register a new investor
    Create {
        /// Investor name
        #[arg(long)]
        name: String,

        /// Investor category
        #[arg(long = "type", short = 't', value_parser = INVESTOR_TYPES)]
        investor_type: String,

        /// Comma-separated focus sectors
        #[arg(long)]
        sectors: Option<String>,

        /// Comma-separated stages
        #[arg(long)]
        stages: Option<String>,

        /// Minimum ticket size
        #[arg(long)]
        ticket_min: Option<i64>,

        /// Maximum ticket size
        #[arg(long)]
        ticket_max: Option<i64>,

        #[arg(long)]
        website: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Supported country id (repeatable)
        #[arg(long = "country", value_name = "ID")]
        countries: Vec<u32>,
    },
}

pub const INVESTOR_TYPES: [&str; 5] = ["fund", "angel", "corporate", "public", "ngo"];

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROJECTS / STARTUPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub command: ProjectsCommand,
}

/// Options for match panels.
#[derive(Debug, Args)]
pub struct MatchArgs {
    /// Only investors that support the project's country
    #[arg(long)]
    pub strict: bool,

    /// Show every match instead of the top few
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List entries, optionally with their investor matches
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        facets: FacetArgs,

        /// Open the match panel of every listed entry
        #[arg(long, short = 'm')]
        matches: bool,

        #[command(flatten)]
        match_opts: MatchArgs,
    },

    /// Show ranked investor matches for one entry
    Matches {
        /// Project or startup id
        id: u32,

        #[command(flatten)]
        match_opts: MatchArgs,
    },

    /// Register a new entry
    Create {
        /// Title
        #[arg(long)]
        title: String,

        /// One-paragraph summary
        #[arg(long)]
        summary: String,

        /// Country id
        #[arg(long, value_name = "ID")]
        country: u32,

        #[arg(long)]
        sector: Option<String>,

        #[arg(long)]
        stage: Option<String>,

        #[arg(long)]
        website: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NEWS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NewsArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Keep items with this tag (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,

    /// Page size
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: u32,

    /// List the available tags instead of the items
    #[arg(long)]
    pub facets: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
