use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{info, warn};
use serde_json::json;
use tokio::net::TcpListener;

use crate::error::LookupError;
use crate::lookup::CorrelationMatch;
use crate::state::AppState;
use crate::telemetry::{format_elapsed, memory_usage_mb, snapshot_mb};

pub type SharedState = Arc<AppState>;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// `GET /corr/:meter_id` and `GET /metrics/memory`, wrapped in request logging.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/corr/:meter_id", get(corr))
        .route("/metrics/memory", get(memory))
        .layer(middleware::from_fn(instrument))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: SharedState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, state).await
}

/// Serve on an already bound listener until Ctrl-C.
pub async fn serve_on(listener: TcpListener, state: SharedState) -> anyhow::Result<()> {
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn corr(
    State(state): State<SharedState>,
    Path(meter_id): Path<String>,
) -> Result<Json<CorrelationMatch>, ApiError> {
    let found = state.lookup.find_most_correlated(&meter_id)?;
    Ok(Json(found))
}

pub async fn memory() -> Result<Json<f64>, ApiError> {
    memory_usage_mb().map(Json).ok_or(ApiError::MemoryUnavailable)
}

// ---------------------------------------------------------------------------
// Request instrumentation
// ---------------------------------------------------------------------------

async fn instrument(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        "{method} {path} -> {} in {} (mem {} MB)",
        response.status().as_u16(),
        format_elapsed(started.elapsed()),
        snapshot_mb()
    );
    response
}

// ---------------------------------------------------------------------------
// Error responses
// ---------------------------------------------------------------------------

/// Per-request failures, turned into JSON bodies at the boundary.
#[derive(Debug)]
pub enum ApiError {
    Lookup(LookupError),
    MemoryUnavailable,
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        ApiError::Lookup(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Lookup(err) => {
                let status = match err {
                    LookupError::UnknownSeries(_) => StatusCode::NOT_FOUND,
                    LookupError::NoCorrelationFound(_) => StatusCode::UNPROCESSABLE_ENTITY,
                };
                let body = json!({
                    "error": err.code(),
                    "meter": err.meter(),
                    "message": err.to_string(),
                });
                (status, Json(body)).into_response()
            }
            ApiError::MemoryUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "memory_unavailable",
                    "message": "process memory cannot be inspected on this platform",
                })),
            )
                .into_response(),
        }
    }
}
