//! HTTP API built on axum.
//!
//! Thin boundary layer: request parsing, identity extraction and
//! authorization checks live here; all computation is delegated to the
//! engine and the storage layer.

mod households;
mod performance;
mod tasks;
mod users;

use crate::config::Config;
use crate::db::{Database, now_ms};
use crate::error::{ApiError, ApiResult};
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::response::Json;
use axum::routing::{get, patch, post};
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
}

/// The authenticated caller, resolved once from the `x-user-id` header.
///
/// Handlers and the core only ever see this plain identifier; how the
/// identity arrived is this extractor's concern alone.
pub struct UserId(pub String);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| UserId(s.to_string()))
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/users", post(users::register))
        .route("/api/households", post(households::create))
        .route("/api/households/join", post(households::join))
        .route("/api/households/mine", get(households::mine))
        .route("/api/tasks", post(tasks::create).get(tasks::list))
        .route("/api/tasks/stats", get(tasks::stats))
        .route("/api/tasks/{id}", patch(tasks::update).delete(tasks::delete))
        .route(
            "/api/performance/members/{member_id}",
            get(performance::member),
        )
        .route("/api/performance/ranking", get(performance::ranking))
        .route("/api/sweep", post(sweep))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server until the process is stopped.
pub async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SweepResponse {
    failed_count: u32,
}

/// On-demand sweep pass, same operation the background sweeper runs.
async fn sweep(State(state): State<AppState>) -> ApiResult<Json<SweepResponse>> {
    let failed_count = state.db.sweep_overdue(now_ms()).map_err(ApiError::from)?;
    Ok(Json(SweepResponse { failed_count }))
}
