//! Clap derive structures for the `navdeck` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use navdeck_core::ProbeMethod;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// navdeck -- dashboard backend for self-hosted services
#[derive(Debug, Parser)]
#[command(
    name = "navdeck",
    version,
    about = "Serve a self-hosted service dashboard and check its services",
    long_about = "Serves the navdeck dashboard API: service catalog, adaptive\n\
        HEAD/GET health checks, and qBittorrent transfer status.\n\n\
        The same checks are available as one-shot commands.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "NAVDECK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NAVDECK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "NAVDECK_INSECURE", global = true)]
    pub insecure: bool,
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
    /// Plain text, one value per line (scripting)
    Plain,
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
    /// Run the dashboard HTTP server
    Serve(ServeArgs),

    /// Check whether a URL is reachable
    Check(CheckArgs),

    /// Fetch transfer status from a qBittorrent Web UI
    #[command(alias = "qb")]
    Poll(PollArgs),

    /// Check every service in the catalog once
    Sweep(SweepArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Serve ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Bind address (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port (overrides server.port)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// services.yaml path (overrides server.services_path)
    #[arg(long)]
    pub services: Option<PathBuf>,

    /// Built client directory (overrides server.client_dist)
    #[arg(long)]
    pub client_dist: Option<PathBuf>,
}

// ── Check / Poll / Sweep ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Target URL (http or https)
    pub url: String,

    /// Probe method
    #[arg(long, short = 'm', default_value = "auto")]
    pub method: MethodArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    /// HEAD, falling back to GET when inconclusive
    Auto,
    Head,
    Get,
}

impl From<MethodArg> for ProbeMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Auto => Self::Auto,
            MethodArg::Head => Self::Head,
            MethodArg::Get => Self::Get,
        }
    }
}

#[derive(Debug, Args)]
pub struct PollArgs {
    /// qBittorrent Web UI base URL
    pub url: String,
}

#[derive(Debug, Args)]
pub struct SweepArgs {
    /// services.yaml path (overrides server.services_path)
    #[arg(long)]
    pub services: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (passwords redacted)
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
