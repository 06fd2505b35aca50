//! Router configuration for the dashboard server.

use axum::{
    Router,
    handler::Handler,
    routing::get,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::AppState;
use super::handlers;

/// Create the main router: `/api` routes, then static files with an SPA
/// fallback to `index.html`.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/services", get(handlers::services))
        .route("/health", get(handlers::health))
        .route("/qbittorrent", get(handlers::qbittorrent))
        .route("/status", get(handlers::status))
        .route("/sweep", get(handlers::sweep))
        .fallback(handlers::api_not_found);

    // `fallback` keeps the handler's status; client routes get index.html as 200.
    let static_files = ServeDir::new(state.client_dist.as_path())
        .fallback(handlers::spa_fallback.with_state(state.clone()));

    Router::new()
        .nest("/api", api)
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
