//! Flag-aware wrappers over `navdeck_config`.
//!
//! Core never sees these types; it receives a pre-built `MonitorConfig`.

use navdeck_config::Config;
use navdeck_core::{MonitorConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load config from `--config` (or the platform path) plus environment.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(navdeck_config::load_config(global.config.as_deref())?)
}

/// `MonitorConfig` with CLI overrides applied.
pub fn monitor_config(cfg: &Config, global: &GlobalOpts) -> MonitorConfig {
    let mut monitor = navdeck_config::to_monitor_config(cfg);
    if global.insecure {
        monitor.tls = TlsVerification::DangerAcceptInvalid;
    }
    monitor
}

/// Config file location in effect for this invocation.
pub fn effective_path(global: &GlobalOpts) -> std::path::PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(navdeck_config::config_path)
}
