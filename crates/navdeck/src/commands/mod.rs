//! Command dispatch: bridges CLI args -> core services -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod poll;
pub mod serve;
pub mod sweep;

use std::sync::Arc;

use navdeck_config::Config;
use navdeck_core::StatusService;

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Dispatch a command that needs the loaded config.
pub async fn dispatch(cmd: Command, cfg: Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Serve(args) => serve::handle(args, &cfg, global).await,
        Command::Check(args) => {
            let service = build_service(&cfg, global)?;
            check::handle(args, &service, global).await
        }
        Command::Poll(args) => {
            let service = build_service(&cfg, global)?;
            poll::handle(args, &service, global).await
        }
        Command::Sweep(args) => sweep::handle(args, &cfg, global).await,
        Command::Config(args) => config_cmd::handle(&args, &cfg, global),
        // Completions are handled before config is loaded
        Command::Completions(_) => Ok(()),
    }
}

pub(crate) fn build_service(
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<Arc<StatusService>, CliError> {
    let monitor = config::monitor_config(cfg, global);
    Ok(StatusService::new(&monitor)?.into_shared())
}
