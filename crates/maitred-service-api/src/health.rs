//! Health check handlers for container probes.
//!
//! Provides `/health/live` and `/health/ready` endpoints returning JSON
//! status responses for liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or a not-ready reason.
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Number of tables in the catalog (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables_known: Option<usize>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            tables_known: None,
        }
    }

    /// Create a ready status with catalog information.
    pub fn ready(service: &str, version: &str, tables: usize) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            tables_known: Some(tables),
        }
    }

    /// Create a not-ready status.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            service: service.to_string(),
            version: version.to_string(),
            tables_known: None,
        }
    }
}

/// Liveness probe handler.
///
/// Returns 200 OK if the service is running; does not touch the store.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Returns 200 OK when a store round-trip succeeds, 503 otherwise.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match state.directory().list().await {
        Ok(tables) => {
            let status = HealthStatus::ready(service, version, tables.len());
            (StatusCode::OK, Json(status)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "readiness store round-trip failed");
            let status = HealthStatus::not_ready(service, version, "store unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
    }
}
