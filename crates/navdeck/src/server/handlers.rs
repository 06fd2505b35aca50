//! API endpoint handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use navdeck_core::{CoreError, ServiceKind};

use super::AppState;

// ── Errors ───────────────────────────────────────────────────────────

/// Handler-level failure, rendered as `{ "error": ..., "detail"? }`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    Internal { error: String, detail: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                debug!(%message, "rejected request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" }))).into_response()
            }
            ApiError::Internal { error, detail } => {
                error!(%error, %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": error, "detail": detail })),
                )
                    .into_response()
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal {
                error: "internal error".into(),
                detail: err.to_string(),
            }
        }
    }
}

// ── Query parameters ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TargetQuery {
    pub url: Option<String>,
    pub method: Option<String>,
    pub kind: Option<String>,
}

impl TargetQuery {
    fn required_url(&self) -> Result<&str, ApiError> {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ApiError::BadRequest("missing url parameter".into()))
    }
}

// ── Handlers ─────────────────────────────────────────────────────────

/// `GET /api/services`
pub async fn services(State(state): State<AppState>) -> Result<Response, ApiError> {
    match state.services.read().await {
        Ok(catalog) => Ok(Json(catalog).into_response()),
        Err(e) => Err(ApiError::Internal {
            error: "failed to read services.yaml".into(),
            detail: e.to_string(),
        }),
    }
}

/// `GET /api/health?url=&method=`
pub async fn health(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> Result<Response, ApiError> {
    let url = query.required_url()?;
    let envelope = state.status.health(url, query.method.as_deref()).await?;
    Ok(Json(envelope).into_response())
}

/// `GET /api/qbittorrent?url=`
pub async fn qbittorrent(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> Result<Response, ApiError> {
    let url = query.required_url()?;
    let envelope = state.status.control_plane(url).await?;
    Ok(Json(envelope).into_response())
}

/// `GET /api/status?url=&method=&kind=`
pub async fn status(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> Result<Response, ApiError> {
    let url = query.required_url()?;
    let kind = query.kind.as_deref().map(ServiceKind::from_label).unwrap_or_default();
    let report = state.status.status(url, query.method.as_deref(), kind).await?;
    Ok(Json(report).into_response())
}

/// `GET /api/sweep`
pub async fn sweep(State(state): State<AppState>) -> Response {
    Json(state.monitor.latest()).into_response()
}

/// Unmatched `/api/*` route.
pub async fn api_not_found() -> ApiError {
    ApiError::NotFound
}

/// Static-file miss: page requests get `index.html` so client-side routes
/// resolve; anything else is a JSON 404.
pub async fn spa_fallback(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let wants_page = method == Method::GET && !uri.path().starts_with("/api");
    if wants_page {
        if let Ok(html) = tokio::fs::read_to_string(state.client_dist.join("index.html")).await {
            return Html(html).into_response();
        }
    }
    ApiError::NotFound.into_response()
}
