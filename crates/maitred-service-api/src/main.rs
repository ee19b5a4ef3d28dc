//! maitred table-reservation HTTP service entry point.
//!
//! # Configuration
//!
//! - `MAITRED_STORE` - `dynamo` (default) or `memory`
//! - `MAITRED_TABLES_TABLE` / `MAITRED_RESERVATIONS_TABLE` - DynamoDB
//!   table names when the DynamoDB store is selected
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` - "true" (default) or "false"

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use maitred_lib::{DynamoStore, StoreConfig};
use maitred_service_api::logging::{init_logging, LoggingConfig};
use maitred_service_api::metrics::{init_metrics, MetricsConfig};
use maitred_service_api::{app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (reads LOG_FORMAT from environment)
    let logging_config = LoggingConfig::from_env().with_service("api");
    init_logging(&logging_config);

    // Initialize metrics
    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        // Log but don't fail - metrics are optional
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let store_kind = env::var("MAITRED_STORE").unwrap_or_else(|_| "dynamo".to_string());
    let state = if store_kind == "memory" {
        info!("using in-memory store");
        AppState::in_memory()
    } else {
        let store_config = StoreConfig::from_env();
        info!(
            tables_table = %store_config.tables_table,
            reservations_table = %store_config.reservations_table,
            "using DynamoDB store"
        );
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = aws_sdk_dynamodb::Client::new(&aws_config);
        let store = Arc::new(DynamoStore::new(client, store_config));
        AppState::new(store.clone(), store)
    };

    let app = app(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
