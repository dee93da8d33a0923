//! Clap derive structures for the `huesync` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// huesync -- keep Hue bridge credentials in sync with the network
#[derive(Debug, Parser)]
#[command(
    name = "huesync",
    version,
    about = "Discover Hue bridges and manage pairing credentials",
    long_about = "Reconciles the persisted bridge registry with bridges currently\n\
        reachable on the local network, pairing interactively (link button)\n\
        wherever a credential is missing or rejected.",
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
    /// Registry file (defaults to the platform config directory)
    #[arg(long, env = "HUESYNC_REGISTRY", global = true)]
    pub registry: Option<PathBuf>,

    /// Application component of the device-type identifier
    #[arg(long, env = "HUESYNC_APP_NAME", default_value = "huesync", global = true)]
    pub app_name: String,

    /// Device component of the device-type identifier (defaults to this
    /// machine's hostname)
    #[arg(long, env = "HUESYNC_DEVICE_NAME", global = true)]
    pub device_name: Option<String>,

    /// Bridge client realization
    #[arg(long, default_value = "rest", global = true)]
    pub transport: Transport,

    /// Output format
    #[arg(long, short = 'o', env = "HUESYNC_OUTPUT", default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "HUESYNC_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Transport Enums ─────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// One serial per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Transport {
    /// Raw HTTP client
    Rest,
    /// Typed wire-model client
    Typed,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile the registry with the network, pairing where needed
    #[command(alias = "s")]
    Sync,

    /// Show the persisted registry without touching the network
    #[command(alias = "ls")]
    List,

    /// Print the registry file location
    Path,
}
