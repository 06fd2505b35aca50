//! Dashboard HTTP server.
//!
//! JSON API under `/api`, the built client everywhere else. Handlers are
//! thin: validation and checks live in `navdeck_core::StatusService`.

mod handlers;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use navdeck_core::{Monitor, StatusService};

use crate::error::CliError;
use crate::services::ServicesFile;

pub use routes::create_router;

/// Shared state for every request.
#[derive(Clone)]
pub struct AppState {
    pub status: Arc<StatusService>,
    pub monitor: Monitor,
    pub services: Arc<ServicesFile>,
    pub client_dist: Arc<PathBuf>,
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> Result<(), CliError> {
    let listener = TcpListener::bind(addr).await.map_err(|source| CliError::Bind {
        addr: addr.to_owned(),
        source,
    })?;
    let local: SocketAddr = listener.local_addr()?;

    info!(
        addr = %local,
        services = %state.services.path().display(),
        client_dist = %state.client_dist.display(),
        "navdeck listening"
    );

    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until killed.
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
