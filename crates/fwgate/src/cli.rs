//! Clap derive structures for the `fwgate` CLI.
//!
//! Only depends on clap + clap_complete so `build.rs` can include it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fwgate -- keep a firewall's CI allowlist rule up to date
#[derive(Debug, Parser)]
#[command(
    name = "fwgate",
    version,
    about = "Allow CI address ranges through a Linode Cloud Firewall",
    long_about = "Looks up a Linode Cloud Firewall by label, drops any rule this tool\n\
        added before, appends a fresh outbound ACCEPT rule for the configured\n\
        address list, and replaces the firewall's rule set in one update.\n\n\
        Runs `apply` when no subcommand is given.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "FWGATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Linode personal access token
    #[arg(long, env = "LINODE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Label of the firewall to update (overrides config)
    #[arg(long, short = 'f', global = true)]
    pub firewall: Option<String>,

    /// Port specifier for the managed rule, e.g. "80,443" (overrides config)
    #[arg(long, global = true)]
    pub ports: Option<String>,

    /// API root URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format for `plan`
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, ValueEnum)]
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
    /// Update the firewall's rules (default)
    Apply,

    /// Show the rule set that `apply` would submit, without submitting it
    #[command(alias = "dry-run")]
    Plan,

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (token redacted)
    Show,

    /// Print the config file location
    Path,

    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
