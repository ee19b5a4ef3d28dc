//! AWS Lambda function for reservation booking and listing.
//!
//! This Lambda handles `POST /reservations` (book a table) and
//! `GET /reservations` (list bookings, optionally filtered by creating
//! user) behind an API Gateway proxy integration. Caller identity comes
//! from the gateway's authorizer claims; requests without one are
//! rejected before anything else is looked at.

use std::sync::Arc;
use std::time::Instant;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use maitred_api_shared::{
    from_lib_error, init_tracing, CreateReservationRequest, GatewayRequest, GatewayResponse,
    Identity, ProblemDetails, Validate,
};
use maitred_lib::{
    parse_date, DynamoStore, NewReservation, ReservationService, ReservationView, Slot,
    StoreConfig, TableDirectory,
};

/// Response body for a successful booking.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub reservation_id: String,
    pub message: String,
}

/// Response body for the listing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub reservations: Vec<ReservationView>,
}

/// Entry point used by the Lambda runtime.
pub async fn run() -> Result<(), Error> {
    init_tracing();

    let service = init_service().await;

    lambda_runtime::run(service_fn(move |event| {
        let service = service.clone();
        async move { handler(service, event).await }
    }))
    .await
}

/// Build the booking service over DynamoDB (logs cold-start timing).
async fn init_service() -> ReservationService {
    let start = Instant::now();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = aws_sdk_dynamodb::Client::new(&aws_config);
    let store = Arc::new(DynamoStore::new(client, StoreConfig::from_env()));
    let service = ReservationService::new(TableDirectory::new(store.clone()), store);

    info!(
        init_ms = start.elapsed().as_millis() as u64,
        "reservation Lambda initialized"
    );
    service
}

/// Lambda handler invoked per request.
pub async fn handler(
    service: ReservationService,
    event: LambdaEvent<Value>,
) -> Result<GatewayResponse, Error> {
    let lambda_request_id = event.context.request_id.clone();

    let request: GatewayRequest = match serde_json::from_value(event.payload) {
        Ok(request) => request,
        Err(e) => {
            error!(request_id = %lambda_request_id, error = %e, "failed to parse gateway event");
            return Ok(GatewayResponse::problem(ProblemDetails::bad_request(
                format!("Invalid request: {}", e),
                &lambda_request_id,
            )));
        }
    };

    // Prefer the gateway's correlation id over the runtime's.
    let request_id = if request.request_id().is_empty() {
        lambda_request_id
    } else {
        request.request_id().to_string()
    };

    match request.http_method.as_str() {
        "POST" => Ok(create(&service, &request, &request_id).await),
        "GET" => Ok(list(&service, &request, &request_id).await),
        other => {
            error!(request_id = %request_id, method = %other, "unsupported method");
            Ok(GatewayResponse::problem(ProblemDetails::bad_request(
                format!("Unsupported method: {}", other),
                &request_id,
            )))
        }
    }
}

/// Handle `POST /reservations`.
pub async fn create(
    service: &ReservationService,
    request: &GatewayRequest,
    request_id: &str,
) -> GatewayResponse {
    // Authorization failure outranks validation failure.
    let Some(identity) = Identity::from_request(request) else {
        return GatewayResponse::problem(ProblemDetails::unauthorized(request_id));
    };

    let body: CreateReservationRequest = match request.json_body(request_id) {
        Ok(body) => body,
        Err(problem) => return GatewayResponse::problem(*problem),
    };
    if let Err(problem) = body.validate(request_id) {
        return GatewayResponse::problem(*problem);
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
        Err(e) => return GatewayResponse::problem(from_lib_error(&e, request_id)),
    };
    let slot = match Slot::parse(&body.slot_time_start, &body.slot_time_end) {
        Ok(slot) => slot,
        Err(e) => return GatewayResponse::problem(from_lib_error(&e, request_id)),
    };

    let booking = NewReservation {
        table_number: body.table_number.unwrap_or_default(),
        client_name: body.client_name,
        phone_number: body.phone_number,
        date,
        slot,
        username: identity.username,
    };

    match service.create(booking).await {
        Ok(reservation) => {
            info!(
                request_id = %request_id,
                reservation_id = %reservation.id,
                "reservation booked"
            );
            GatewayResponse::ok(&CreatedResponse {
                reservation_id: reservation.id,
                message: "Reservation created".to_string(),
            })
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "booking failed");
            GatewayResponse::problem(from_lib_error(&e, request_id))
        }
    }
}

/// Handle `GET /reservations`, optionally filtered by `?user=`.
pub async fn list(
    service: &ReservationService,
    request: &GatewayRequest,
    request_id: &str,
) -> GatewayResponse {
    let Some(identity) = Identity::from_request(request) else {
        return GatewayResponse::problem(ProblemDetails::unauthorized(request_id));
    };

    let user = request.query("user");
    info!(
        request_id = %request_id,
        username = %identity.username,
        filter = ?user,
        "handling reservation listing"
    );

    match service.list(user).await {
        Ok(reservations) => GatewayResponse::ok(&ListResponse {
            reservations: reservations.iter().map(ReservationView::from).collect(),
        }),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "reservation listing failed");
            GatewayResponse::problem(from_lib_error(&e, request_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maitred_api_shared::test_utils::{
        booking_service, fixtures, gateway_event, mock_request_id, seeded_store,
    };
    use serde_json::json;

    fn parse(event: Value) -> GatewayRequest {
        serde_json::from_value(event).expect("gateway event should parse")
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

    fn body_json(response: &GatewayResponse) -> Value {
        serde_json::from_str(&response.body).expect("response body should be JSON")
    }

    // ==================== Create Tests ====================

    #[tokio::test]
    async fn test_create_returns_reservation_id() {
        let service = booking_service(seeded_store().await);
        let request = parse(gateway_event(
            "POST",
            "/reservations",
            Some(booking_body(fixtures::WINDOW_TABLE_NUMBER, "18:00", "19:00")),
            Some("bob"),
        ));

        let response = create(&service, &request, &mock_request_id("create")).await;
        assert_eq!(response.status_code, 200);

        let body = body_json(&response);
        assert!(!body["reservationId"].as_str().unwrap().is_empty());
        assert_eq!(body["message"], "Reservation created");
    }

    #[tokio::test]
    async fn test_create_without_identity_is_unauthorized() {
        let service = booking_service(seeded_store().await);
        let request = parse(gateway_event(
            "POST",
            "/reservations",
            Some(booking_body(fixtures::WINDOW_TABLE_NUMBER, "18:00", "19:00")),
            None,
        ));

        let response = create(&service, &request, &mock_request_id("unauth")).await;
        assert_eq!(response.status_code, 401);
        // Identity is checked before the body, so no store state matters.
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_missing_field_is_validation_error() {
        let service = booking_service(seeded_store().await);
        let body = json!({
            "tableNumber": fixtures::WINDOW_TABLE_NUMBER,
            "date": "2024-06-01",
            "slotTimeStart": "18:00"
            // slotTimeEnd missing
        });
        let request = parse(gateway_event("POST", "/reservations", Some(body), Some("bob")));

        let response = create(&service, &request, &mock_request_id("missing")).await;
        assert_eq!(response.status_code, 400);
        assert!(response.body.contains("slotTimeEnd"));
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_table_is_not_found() {
        let service = booking_service(seeded_store().await);
        let request = parse(gateway_event(
            "POST",
            "/reservations",
            Some(booking_body(fixtures::UNKNOWN_TABLE_NUMBER, "18:00", "19:00")),
            Some("bob"),
        ));

        let response = create(&service, &request, &mock_request_id("unknown")).await;
        assert_eq!(response.status_code, 404);
        assert!(response.body.contains("/problems/unknown-table"));
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_repeat_booking_conflicts() {
        let service = booking_service(seeded_store().await);
        let event = gateway_event(
            "POST",
            "/reservations",
            Some(booking_body(fixtures::WINDOW_TABLE_NUMBER, "18:00", "19:00")),
            Some("bob"),
        );

        let first = create(&service, &parse(event.clone()), &mock_request_id("one")).await;
        assert_eq!(first.status_code, 200);

        let second = create(&service, &parse(event), &mock_request_id("two")).await;
        assert_eq!(second.status_code, 409);
        assert!(second.body.contains("/problems/slot-conflict"));
        assert_eq!(service.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_malformed_time_is_bad_request() {
        let service = booking_service(seeded_store().await);
        let request = parse(gateway_event(
            "POST",
            "/reservations",
            Some(booking_body(fixtures::WINDOW_TABLE_NUMBER, "6pm", "19:00")),
            Some("bob"),
        ));

        let response = create(&service, &request, &mock_request_id("badtime")).await;
        assert_eq!(response.status_code, 400);
        assert!(response.body.contains("HH:MM"));
    }

    // ==================== List Tests ====================

    #[tokio::test]
    async fn test_list_filters_by_user() {
        let service = booking_service(seeded_store().await);
        for (user, start, end) in [("alice", "10:00", "11:00"), ("bob", "12:00", "13:00")] {
            let request = parse(gateway_event(
                "POST",
                "/reservations",
                Some(booking_body(fixtures::WINDOW_TABLE_NUMBER, start, end)),
                Some(user),
            ));
            let response = create(&service, &request, &mock_request_id(user)).await;
            assert_eq!(response.status_code, 200);
        }

        let mut event = gateway_event("GET", "/reservations", None, Some("alice"));
        event["queryStringParameters"] = json!({"user": "alice"});
        let response = list(&service, &parse(event), &mock_request_id("filtered")).await;
        assert_eq!(response.status_code, 200);

        let body = body_json(&response);
        let reservations = body["reservations"].as_array().unwrap();
        assert_eq!(reservations.len(), 1);
        assert_eq!(reservations[0]["slotTimeStart"], "10:00");

        let all = list(
            &service,
            &parse(gateway_event("GET", "/reservations", None, Some("alice"))),
            &mock_request_id("all"),
        )
        .await;
        assert_eq!(body_json(&all)["reservations"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_without_identity_is_unauthorized() {
        let service = booking_service(seeded_store().await);
        let request = parse(gateway_event("GET", "/reservations", None, None));

        let response = list(&service, &request, &mock_request_id("anon")).await;
        assert_eq!(response.status_code, 401);
    }

    #[tokio::test]
    async fn test_list_projection_hides_internal_fields() {
        let service = booking_service(seeded_store().await);
        let request = parse(gateway_event(
            "POST",
            "/reservations",
            Some(booking_body(fixtures::WINDOW_TABLE_NUMBER, "18:00", "19:00")),
            Some("bob"),
        ));
        create(&service, &request, &mock_request_id("seed")).await;

        let response = list(
            &service,
            &parse(gateway_event("GET", "/reservations", None, Some("bob"))),
            &mock_request_id("view"),
        )
        .await;
        let body = body_json(&response);
        let entry = &body["reservations"][0];

        assert_eq!(entry["tableNumber"], fixtures::WINDOW_TABLE_NUMBER);
        assert_eq!(entry["slotTimeStart"], "18:00");
        assert_eq!(entry["slotTimeEnd"], "19:00");
        assert!(entry.get("id").is_none());
        assert!(entry.get("tableId").is_none());
        assert!(entry.get("username").is_none());
        assert!(entry.get("time").is_none());
    }
}
