//! CLI argument definitions
//!
//! All Clap derive structs for `bestdori-epub` command-line parsing.

use std::path::PathBuf;

use bestdori_epub_core::Region;
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::schema::BookFormat;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Turn Bang Dream! event stories from the Bestdori mirror into e-books.
#[derive(Parser, Debug)]
#[command(name = "bestdori-epub", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "BESTDORI_EPUB_COLOR")]
    pub color: ColorChoice,

    /// Log line format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,

    /// Path to a YAML settings file.
    #[arg(long, global = true, env = "BESTDORI_EPUB_CONFIG")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download, render and convert every started event story.
    Build(BuildArgs),

    /// Render one scenario asset file to markdown on stdout.
    Render(RenderArgs),

    /// List events known to the mirror.
    List(ListArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Shared arguments
// ============================================================================

/// Where data comes from and as of when.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Mirror root URL.
    #[arg(long, env = "BESTDORI_EPUB_BASE_URL")]
    pub base_url: Option<String>,

    /// Server region for names, start times and assets.
    #[arg(long, env = "BESTDORI_EPUB_REGION")]
    pub region: Option<Region>,

    /// HTTP timeout (e.g. `30s`, `2m`).
    #[arg(long, env = "BESTDORI_EPUB_TIMEOUT")]
    pub timeout: Option<String>,

    /// Treat this RFC 3339 instant as the current time.
    #[arg(long, value_parser = parse_instant)]
    pub now: Option<DateTime<Utc>>,
}

// ============================================================================
// Build Command
// ============================================================================

/// Arguments for `build`.
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Data source options.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory for downloaded scenario JSON.
    #[arg(long, env = "BESTDORI_EPUB_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Directory books are written under.
    #[arg(short, long, env = "BESTDORI_EPUB_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Artifact format.
    #[arg(short, long)]
    pub format: Option<BookFormat>,

    /// Pandoc executable.
    #[arg(long, env = "BESTDORI_EPUB_PANDOC")]
    pub pandoc: Option<String>,

    /// Extra pandoc arguments, shell-quoted.
    #[arg(long, allow_hyphen_values = true)]
    pub pandoc_args: Option<String>,

    /// Only build these events (repeatable).
    #[arg(long = "event", value_name = "ID")]
    pub events: Vec<u32>,

    /// Never build this event (repeatable, adds to the settings file).
    #[arg(long = "exclude-event", value_name = "ID")]
    pub exclude_events: Vec<u32>,

    /// Leave this chapter out of its story (repeatable).
    #[arg(long = "exclude-scenario", value_name = "SCENARIO_ID")]
    pub exclude_scenarios: Vec<String>,

    /// Reproduce the old divider placement around title cards.
    #[arg(long)]
    pub legacy_separators: bool,

    /// How to print the run summary.
    #[arg(long, default_value = "human")]
    pub summary: OutputFormat,
}

// ============================================================================
// Render / List Commands
// ============================================================================

/// Arguments for `render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Scenario asset JSON file (as stored in the cache).
    pub file: PathBuf,

    /// Reproduce the old divider placement around title cards.
    #[arg(long)]
    pub legacy_separators: bool,
}

/// Arguments for `list`.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Data source options.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Include events that have not started in the region.
    #[arg(long)]
    pub all: bool,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

// ============================================================================
// Tests
// ============================================================================
