//! End-to-end API tests over the in-memory store.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use maitred_api_shared::test_utils::{fixtures, seeded_store};
use maitred_service_api::{app, AppState};

async fn server() -> TestServer {
    let store = seeded_store().await;
    let state = AppState::new(store.clone(), store);
    TestServer::new(app(state)).expect("test server should build")
}

fn booking_body(table_number: u32, start: &str, end: &str) -> Value {
    json!({
        "tableNumber": table_number,
        "clientName": "Bob",
        "phoneNumber": "555-0100",
        "date": "2024-06-01",
        "slotTimeStart": start,
        "slotTimeEnd": end
    })
}

#[tokio::test]
async fn booking_succeeds_once_then_conflicts() {
    let server = server().await;
    let body = booking_body(fixtures::WINDOW_TABLE_NUMBER, "18:00", "19:00");

    let first = server
        .post("/reservations")
        .add_header("x-forwarded-user", "bob")
        .json(&body)
        .await;
    first.assert_status(StatusCode::OK);
    let payload: Value = first.json();
    assert!(!payload["reservationId"].as_str().unwrap().is_empty());
    assert_eq!(payload["message"], "Reservation created");

    let second = server
        .post("/reservations")
        .add_header("x-forwarded-user", "bob")
        .json(&body)
        .await;
    second.assert_status(StatusCode::CONFLICT);
    let problem: Value = second.json();
    assert_eq!(problem["type"], "/problems/slot-conflict");
}

#[tokio::test]
async fn booking_requires_identity() {
    let server = server().await;

    let response = server
        .post("/reservations")
        .json(&booking_body(fixtures::WINDOW_TABLE_NUMBER, "18:00", "19:00"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let problem: Value = response.json();
    assert_eq!(problem["type"], "/problems/unauthorized");
}

#[tokio::test]
async fn booking_with_missing_field_is_rejected() {
    let server = server().await;

    let response = server
        .post("/reservations")
        .add_header("x-forwarded-user", "bob")
        .json(&json!({
            "tableNumber": fixtures::WINDOW_TABLE_NUMBER,
            "date": "2024-06-01",
            "slotTimeStart": "18:00"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let problem: Value = response.json();
    assert!(problem["detail"].as_str().unwrap().contains("slotTimeEnd"));

    // Nothing was written.
    let listing = server
        .get("/reservations")
        .add_header("x-forwarded-user", "bob")
        .await;
    let payload: Value = listing.json();
    assert_eq!(payload["reservations"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn booking_unknown_table_is_not_found() {
    let server = server().await;

    let response = server
        .post("/reservations")
        .add_header("x-forwarded-user", "bob")
        .json(&booking_body(fixtures::UNKNOWN_TABLE_NUMBER, "18:00", "19:00"))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let problem: Value = response.json();
    assert_eq!(problem["type"], "/problems/unknown-table");
}

#[tokio::test]
async fn listing_filters_by_user() {
    let server = server().await;

    for (user, start, end) in [("alice", "10:00", "11:00"), ("bob", "12:00", "13:00")] {
        server
            .post("/reservations")
            .add_header("x-forwarded-user", user)
            .json(&booking_body(fixtures::WINDOW_TABLE_NUMBER, start, end))
            .await
            .assert_status(StatusCode::OK);
    }

    let filtered = server
        .get("/reservations")
        .add_query_param("user", "alice")
        .add_header("x-forwarded-user", "alice")
        .await;
    filtered.assert_status(StatusCode::OK);
    let payload: Value = filtered.json();
    let reservations = payload["reservations"].as_array().unwrap();
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0]["slotTimeStart"], "10:00");

    let unfiltered = server
        .get("/reservations")
        .add_header("x-forwarded-user", "alice")
        .await;
    let payload: Value = unfiltered.json();
    assert_eq!(payload["reservations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn table_catalog_round_trip() {
    let server = server().await;

    let listing = server
        .get("/tables")
        .add_header("x-forwarded-user", "alice")
        .await;
    listing.assert_status(StatusCode::OK);
    let payload: Value = listing.json();
    assert_eq!(payload["tables"].as_array().unwrap().len(), 2);

    let fetched = server
        .get(&format!("/tables/{}", fixtures::WINDOW_TABLE_ID))
        .add_header("x-forwarded-user", "alice")
        .await;
    fetched.assert_status(StatusCode::OK);
    let table: Value = fetched.json();
    assert_eq!(table["number"], fixtures::WINDOW_TABLE_NUMBER);

    let missing = server
        .get("/tables/missing")
        .add_header("x-forwarded-user", "alice")
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn table_creation_is_bookable() {
    let server = server().await;

    let created = server
        .post("/tables")
        .add_header("x-forwarded-user", "alice")
        .json(&json!({"number": 7, "places": 2}))
        .await;
    created.assert_status(StatusCode::OK);
    let payload: Value = created.json();
    let table_id = payload["tableId"].as_str().unwrap();
    assert!(!table_id.is_empty());

    let booked = server
        .post("/reservations")
        .add_header("x-forwarded-user", "bob")
        .json(&booking_body(7, "18:00", "19:00"))
        .await;
    booked.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn table_creation_rejects_zero_number() {
    let server = server().await;

    let response = server
        .post("/tables")
        .add_header("x-forwarded-user", "alice")
        .json(&json!({"number": 0, "places": 4}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_probes_respond() {
    let server = server().await;

    let live = server.get("/health/live").await;
    live.assert_status(StatusCode::OK);
    let payload: Value = live.json();
    assert_eq!(payload["status"], "ok");

    let ready = server.get("/health/ready").await;
    ready.assert_status(StatusCode::OK);
    let payload: Value = ready.json();
    assert_eq!(payload["tables_known"], 2);
}

#[tokio::test]
async fn metrics_endpoint_responds() {
    let server = server().await;
    let response = server.get("/metrics").await;
    response.assert_status(StatusCode::OK);
}
