//! maitred table-reservation HTTP service.
//!
//! Containerized twin of the Lambda API, exposing the same endpoints
//! for local development and non-Lambda deployment:
//!
//! - `POST /reservations` - Book a table
//! - `GET /reservations` - List bookings, optionally `?user=<username>`
//! - `GET /tables` - List the table catalog
//! - `GET /tables/{id}` - Fetch one table
//! - `POST /tables` - Register a table
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe (store round-trip)
//!
//! Caller identity is resolved upstream; the service trusts the
//! `x-forwarded-user` header injected by the fronting gateway, exactly
//! as the Lambda variant trusts authorizer claims.

#![deny(warnings)]

pub mod health;
pub mod logging;
pub mod metrics;
pub mod state;

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use maitred_api_shared::{
    from_lib_error, CreateReservationRequest, CreateTableRequest, Identity, ProblemDetails,
    Validate,
};
use maitred_lib::{parse_date, NewReservation, ReservationView, Slot, Table};

pub use state::AppState;

/// Response body for a successful booking.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedReservation {
    reservation_id: String,
    message: String,
}

/// Response body for the reservation listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReservationList {
    reservations: Vec<ReservationView>,
}

/// Response body for the catalog listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TableList {
    tables: Vec<Table>,
}

/// Response body for a successful table registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedTable {
    table_id: String,
    message: String,
}

/// Query parameters accepted by the reservation listing.
#[derive(Debug, Deserialize)]
struct ListQuery {
    user: Option<String>,
}

/// Build the service router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/reservations",
            post(create_reservation).get(list_reservations),
        )
        .route("/tables", get(list_tables).post(create_table))
        .route("/tables/{id}", get(get_table))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/health/live", get(health::health_live))
        .route("/health/ready", get(health::health_ready))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle `POST /reservations`.
async fn create_reservation(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Response {
    let request_id = request_id_from_headers(&headers);

    // Authorization failure outranks every body problem.
    let Some(identity) = identity_from_headers(&headers) else {
        return problem_response(ProblemDetails::unauthorized(&request_id));
    };

    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            metrics::record_reservation_failed("invalid_request");
            return problem_response(ProblemDetails::bad_request(
                format!("Invalid request body: {}", rejection.body_text()),
                &request_id,
            ));
        }
    };
    if let Err(problem) = body.validate(&request_id) {
        metrics::record_reservation_failed("invalid_request");
        return problem_response(*problem);
    }

    info!(
        request_id = %request_id,
        username = %identity.username,
        table_number = body.table_number.unwrap_or_default(),
        date = %body.date,
        "handling booking request"
    );

    let date = match parse_date(&body.date) {
        Ok(date) => date,
        Err(e) => {
            metrics::record_reservation_failed(metrics::failure_reason(&e));
            return problem_response(from_lib_error(&e, &request_id));
        }
    };
    let slot = match Slot::parse(&body.slot_time_start, &body.slot_time_end) {
        Ok(slot) => slot,
        Err(e) => {
            metrics::record_reservation_failed(metrics::failure_reason(&e));
            return problem_response(from_lib_error(&e, &request_id));
        }
    };

    let booking = NewReservation {
        table_number: body.table_number.unwrap_or_default(),
        client_name: body.client_name,
        phone_number: body.phone_number,
        date,
        slot,
        username: identity.username,
    };

    match state.bookings().create(booking).await {
        Ok(reservation) => {
            metrics::record_reservation_created();
            info!(
                request_id = %request_id,
                reservation_id = %reservation.id,
                "reservation booked"
            );
            (
                StatusCode::OK,
                Json(CreatedReservation {
                    reservation_id: reservation.id,
                    message: "Reservation created".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            metrics::record_reservation_failed(metrics::failure_reason(&e));
            error!(request_id = %request_id, error = %e, "booking failed");
            problem_response(from_lib_error(&e, &request_id))
        }
    }
}

/// Handle `GET /reservations`, optionally filtered by `?user=`.
async fn list_reservations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    let request_id = request_id_from_headers(&headers);
    let Some(identity) = identity_from_headers(&headers) else {
        return problem_response(ProblemDetails::unauthorized(&request_id));
    };

    let user = query.user.as_deref().filter(|u| !u.is_empty());
    info!(
        request_id = %request_id,
        username = %identity.username,
        filter = ?user,
        "handling reservation listing"
    );

    match state.bookings().list(user).await {
        Ok(reservations) => (
            StatusCode::OK,
            Json(ReservationList {
                reservations: reservations.iter().map(ReservationView::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "reservation listing failed");
            problem_response(from_lib_error(&e, &request_id))
        }
    }
}

/// Handle `GET /tables`.
async fn list_tables(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = request_id_from_headers(&headers);
    let Some(identity) = identity_from_headers(&headers) else {
        return problem_response(ProblemDetails::unauthorized(&request_id));
    };

    info!(request_id = %request_id, username = %identity.username, "handling table listing");

    match state.directory().list().await {
        Ok(tables) => (StatusCode::OK, Json(TableList { tables })).into_response(),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "table listing failed");
            problem_response(from_lib_error(&e, &request_id))
        }
    }
}

/// Handle `GET /tables/{id}`.
async fn get_table(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = request_id_from_headers(&headers);
    let Some(identity) = identity_from_headers(&headers) else {
        return problem_response(ProblemDetails::unauthorized(&request_id));
    };

    info!(
        request_id = %request_id,
        username = %identity.username,
        table_id = %id,
        "handling table fetch"
    );

    match state.directory().get(&id).await {
        Ok(table) => (StatusCode::OK, Json(table)).into_response(),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "table fetch failed");
            problem_response(from_lib_error(&e, &request_id))
        }
    }
}

/// Handle `POST /tables`.
async fn create_table(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateTableRequest>, JsonRejection>,
) -> Response {
    let request_id = request_id_from_headers(&headers);
    let Some(identity) = identity_from_headers(&headers) else {
        return problem_response(ProblemDetails::unauthorized(&request_id));
    };

    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return problem_response(ProblemDetails::bad_request(
                format!("Invalid request body: {}", rejection.body_text()),
                &request_id,
            ));
        }
    };
    if let Err(problem) = body.validate(&request_id) {
        return problem_response(*problem);
    }

    info!(
        request_id = %request_id,
        username = %identity.username,
        table_number = body.number.unwrap_or_default(),
        "handling table registration"
    );

    match state.directory().create(body.into_table()).await {
        Ok(table_id) => {
            metrics::record_table_created();
            (
                StatusCode::OK,
                Json(CreatedTable {
                    table_id,
                    message: "Table created".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "table registration failed");
            problem_response(from_lib_error(&e, &request_id))
        }
    }
}

/// Render a `ProblemDetails` as an HTTP response.
fn problem_response(problem: ProblemDetails) -> Response {
    let status = StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut response = (status, Json(problem)).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/problem+json"),
    );
    response
}

/// Caller identity injected by the fronting gateway.
///
/// Token verification happens upstream; the service only reads the
/// resulting `x-forwarded-user` header.
fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    headers
        .get("x-forwarded-user")
        .and_then(|value| value.to_str().ok())
        .filter(|username| !username.is_empty())
        .map(|username| Identity {
            username: username.to_string(),
        })
}

/// Extract the `X-Request-ID` header or generate a UUID v7.
fn request_id_from_headers(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .filter(|id| !id.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}
