//! `navdeck serve`

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use navdeck_config::Config;
use navdeck_core::Monitor;

use crate::cli::{GlobalOpts, ServeArgs};
use crate::commands::build_service;
use crate::error::CliError;
use crate::server::{self, AppState};
use crate::services::ServicesFile;

pub async fn handle(args: ServeArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let host = args.host.unwrap_or_else(|| cfg.server.host.clone());
    let port = args.port.unwrap_or(cfg.server.port);
    let services_path = args.services.unwrap_or_else(|| cfg.server.services_path.clone());
    let client_dist = args.client_dist.unwrap_or_else(|| cfg.server.client_dist.clone());

    let status = build_service(cfg, global)?;
    let monitor = Monitor::new(Arc::clone(&status), cfg.monitor.concurrency);
    let services = Arc::new(ServicesFile::new(services_path));

    monitor
        .start(
            Duration::from_secs(cfg.monitor.interval_secs),
            ServicesFile::clone(&services),
        )
        .await;

    let state = AppState {
        status,
        monitor: monitor.clone(),
        services,
        client_dist: Arc::new(client_dist),
    };

    let addr = format!("{host}:{port}");
    let result = server::serve(&addr, state).await;

    monitor.shutdown().await;
    info!("background sweep stopped");
    result
}
