//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::RepositoryProvider;

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub started_at: Arc<Instant>,
}

/// Service health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub store: ComponentHealth,
    /// Tables in the catalog; absent when the store is unreachable
    pub tables: Option<u64>,
}

/// Component health status
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let uptime = state.started_at.elapsed().as_secs();

    // Counting tables is a cheap round trip to the store
    let ping_start = Instant::now();
    let (store, tables) = match state.repos.tables().count().await {
        Ok(count) => (
            ComponentHealth {
                status: "ok".to_string(),
                latency_ms: Some(ping_start.elapsed().as_millis() as u64),
            },
            Some(count),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check: store unreachable");
            (
                ComponentHealth {
                    status: "error".to_string(),
                    latency_ms: None,
                },
                None,
            )
        }
    };

    let (http_status, overall) = if tables.is_some() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        http_status,
        Json(HealthResponse {
            status: overall.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime,
            store,
            tables,
        }),
    )
}
