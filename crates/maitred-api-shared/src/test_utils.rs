//! Test utilities for API handler testing.
//!
//! This module provides shared test infrastructure for the Lambda and
//! service crates: seeded in-memory stores, canonical fixture tables,
//! and gateway-event builders.
//!
//! # Usage
//!
//! These utilities are only available in test builds:
//!
//! ```ignore
//! use maitred_api_shared::test_utils::{booking_service, gateway_event, seeded_store};
//!
//! #[tokio::test]
//! async fn test_handler() {
//!     let store = seeded_store().await;
//!     let service = booking_service(store.clone());
//!     let event = gateway_event("POST", "/reservations", Some(body), Some("bob"));
//!     // ... drive the handler
//! }
//! ```

use std::sync::Arc;

use serde_json::{json, Value};

use maitred_lib::{MemoryStore, ReservationService, Table, TableDirectory, TableStore};

/// Fixture tables seeded by [`seeded_store`].
pub mod fixtures {
    /// Window-side four-seat table.
    pub const WINDOW_TABLE_NUMBER: u32 = 5;
    /// Identifier of the window-side table.
    pub const WINDOW_TABLE_ID: &str = "table-window";

    /// Main-hall VIP table.
    pub const HALL_TABLE_NUMBER: u32 = 12;
    /// Identifier of the main-hall table.
    pub const HALL_TABLE_ID: &str = "table-hall";

    /// A table number absent from the fixtures.
    pub const UNKNOWN_TABLE_NUMBER: u32 = 99;
}

/// Build an in-memory store seeded with the fixture tables.
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .put(Table {
            id: fixtures::WINDOW_TABLE_ID.to_string(),
            number: fixtures::WINDOW_TABLE_NUMBER,
            places: 4,
            is_vip: false,
            min_order: 0,
        })
        .await
        .expect("memory store put cannot fail");
    store
        .put(Table {
            id: fixtures::HALL_TABLE_ID.to_string(),
            number: fixtures::HALL_TABLE_NUMBER,
            places: 8,
            is_vip: true,
            min_order: 100,
        })
        .await
        .expect("memory store put cannot fail");
    store
}

/// Build a booking service over a store.
pub fn booking_service(store: Arc<MemoryStore>) -> ReservationService {
    ReservationService::new(TableDirectory::new(store.clone()), store)
}

/// Build an API Gateway proxy event as the JSON payload a Lambda
/// receives.
///
/// `username` populates the authorizer claims; pass `None` for an
/// unauthenticated event.
pub fn gateway_event(
    method: &str,
    path: &str,
    body: Option<Value>,
    username: Option<&str>,
) -> Value {
    let claims = match username {
        Some(name) => json!({ "cognito:username": name }),
        None => json!({}),
    };
    json!({
        "httpMethod": method,
        "path": path,
        "body": body.map(|b| b.to_string()),
        "pathParameters": {},
        "queryStringParameters": {},
        "requestContext": {
            "requestId": mock_request_id("fixture"),
            "authorizer": { "claims": claims }
        }
    })
}

/// Create a mock request ID for testing.
pub fn mock_request_id(suffix: &str) -> String {
    format!("test-request-{}", suffix)
}
