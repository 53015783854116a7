// HTTP API
// Health endpoint (itself tracked) and the Prometheus scrape endpoint
//
// Numan Thabit 2025 Nov

use crate::errors::TrackError;
use crate::metrics::Metrics;
use crate::track::TrackLayer;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinHandle};
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Create the HTTP router with the health and metrics endpoints
pub fn create_api_router(metrics: Arc<Metrics>) -> AxumRouter {
    AxumRouter::new()
        .route(
            "/health",
            get(health_check).layer(TrackLayer::new(Arc::clone(&metrics), "/health")),
        )
        .route("/metrics", get(export_metrics))
        .with_state(metrics)
        .layer(TraceLayer::new_for_http())
}

/// Serve `app` on a background task.
pub fn spawn_server(listener: TcpListener, app: AxumRouter) -> JoinHandle<std::io::Result<()>> {
    tokio::spawn(async move { axum::serve(listener, app).await })
}

/// Turn a finished server task into the error that ends the process.
/// The server only stops on shutdown, so every outcome here is a failure.
pub fn server_exit(res: Result<std::io::Result<()>, JoinError>) -> TrackError {
    match res {
        Ok(Ok(())) => TrackError::Server("exited unexpectedly".to_string()),
        Ok(Err(e)) => TrackError::Server(e.to_string()),
        Err(e) => TrackError::Server(format!("task failed: {e}")),
    }
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Prometheus text exposition of the whole registry
async fn export_metrics(State(metrics): State<Arc<Metrics>>) -> Response {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, metrics.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "metrics encoding failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
