//! Prometheus metrics infrastructure for the HTTP service.
//!
//! This module provides:
//! - [`MetricsConfig`]: Configuration for the metrics system
//! - [`init_metrics`]: Initialize the Prometheus metrics recorder
//! - [`metrics_handler`]: Axum handler for the `/metrics` endpoint
//! - Business metric helpers for the reservation endpoints

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use maitred_lib::Error as LibError;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "true" or "false" (default: true)
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);
        Self { enabled }
    }
}

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once at application startup before any metrics are
/// recorded; subsequent calls return an error.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Axum handler for the `/metrics` endpoint.
///
/// Returns Prometheus exposition format text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone)]
pub enum MetricsError {
    /// Metrics are disabled in configuration.
    Disabled,
    /// The recorder has already been installed.
    AlreadyInitialized,
    /// The Prometheus builder failed to install.
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

/// Record a successful booking.
///
/// Increments the `maitred_reservations_created_total` counter.
pub fn record_reservation_created() {
    metrics::counter!("maitred_reservations_created_total").increment(1);
}

/// Record a failed booking.
///
/// Increments the `maitred_reservations_failed_total` counter, labeled
/// by failure reason.
pub fn record_reservation_failed(reason: &str) {
    metrics::counter!(
        "maitred_reservations_failed_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record a table registration.
///
/// Increments the `maitred_tables_created_total` counter.
pub fn record_table_created() {
    metrics::counter!("maitred_tables_created_total").increment(1);
}

/// Metric label for a booking failure.
pub fn failure_reason(error: &LibError) -> &'static str {
    match error {
        LibError::UnknownTableNumber { .. } | LibError::UnknownTableId { .. } => "unknown_table",
        LibError::SlotConflict { .. } => "slot_conflict",
        LibError::InvalidDate { .. }
        | LibError::InvalidTime { .. }
        | LibError::InvalidSlot { .. } => "invalid_request",
        LibError::Store(_) => "store_error",
    }
}
