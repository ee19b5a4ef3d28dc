//! AWS Lambda function for the table catalog.
//!
//! This Lambda handles `GET /tables` (list the catalog),
//! `GET /tables/{id}` (fetch one table), and `POST /tables` (register a
//! table) behind an API Gateway proxy integration. The catalog is
//! append-only: tables are created once and never updated or deleted.

use std::sync::Arc;
use std::time::Instant;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use maitred_api_shared::{
    from_lib_error, init_tracing, CreateTableRequest, GatewayRequest, GatewayResponse, Identity,
    ProblemDetails, Validate,
};
use maitred_lib::{DynamoStore, StoreConfig, Table, TableDirectory};

/// Response body for the catalog listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablesResponse {
    pub tables: Vec<Table>,
}

/// Response body for a successful table registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub table_id: String,
    pub message: String,
}

/// Entry point used by the Lambda runtime.
pub async fn run() -> Result<(), Error> {
    init_tracing();

    let directory = init_directory().await;

    lambda_runtime::run(service_fn(move |event| {
        let directory = directory.clone();
        async move { handler(directory, event).await }
    }))
    .await
}

/// Build the table directory over DynamoDB (logs cold-start timing).
async fn init_directory() -> TableDirectory {
    let start = Instant::now();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = aws_sdk_dynamodb::Client::new(&aws_config);
    let store = Arc::new(DynamoStore::new(client, StoreConfig::from_env()));
    let directory = TableDirectory::new(store);

    info!(
        init_ms = start.elapsed().as_millis() as u64,
        "table Lambda initialized"
    );
    directory
}

/// Lambda handler invoked per request.
pub async fn handler(
    directory: TableDirectory,
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

    let request_id = if request.request_id().is_empty() {
        lambda_request_id
    } else {
        request.request_id().to_string()
    };

    match request.http_method.as_str() {
        "GET" => match request.path_parameter("id") {
            Some(id) => Ok(get(&directory, &request, id, &request_id).await),
            None => Ok(list(&directory, &request, &request_id).await),
        },
        "POST" => Ok(create(&directory, &request, &request_id).await),
        other => {
            error!(request_id = %request_id, method = %other, "unsupported method");
            Ok(GatewayResponse::problem(ProblemDetails::bad_request(
                format!("Unsupported method: {}", other),
                &request_id,
            )))
        }
    }
}

/// Handle `GET /tables`.
pub async fn list(
    directory: &TableDirectory,
    request: &GatewayRequest,
    request_id: &str,
) -> GatewayResponse {
    let Some(identity) = Identity::from_request(request) else {
        return GatewayResponse::problem(ProblemDetails::unauthorized(request_id));
    };

    info!(request_id = %request_id, username = %identity.username, "handling table listing");

    match directory.list().await {
        Ok(tables) => GatewayResponse::ok(&TablesResponse { tables }),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "table listing failed");
            GatewayResponse::problem(from_lib_error(&e, request_id))
        }
    }
}

/// Handle `GET /tables/{id}`.
pub async fn get(
    directory: &TableDirectory,
    request: &GatewayRequest,
    id: &str,
    request_id: &str,
) -> GatewayResponse {
    let Some(identity) = Identity::from_request(request) else {
        return GatewayResponse::problem(ProblemDetails::unauthorized(request_id));
    };

    info!(
        request_id = %request_id,
        username = %identity.username,
        table_id = %id,
        "handling table fetch"
    );

    match directory.get(id).await {
        Ok(table) => GatewayResponse::ok(&table),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "table fetch failed");
            GatewayResponse::problem(from_lib_error(&e, request_id))
        }
    }
}

/// Handle `POST /tables`.
pub async fn create(
    directory: &TableDirectory,
    request: &GatewayRequest,
    request_id: &str,
) -> GatewayResponse {
    let Some(identity) = Identity::from_request(request) else {
        return GatewayResponse::problem(ProblemDetails::unauthorized(request_id));
    };

    let body: CreateTableRequest = match request.json_body(request_id) {
        Ok(body) => body,
        Err(problem) => return GatewayResponse::problem(*problem),
    };
    if let Err(problem) = body.validate(request_id) {
        return GatewayResponse::problem(*problem);
    }

    info!(
        request_id = %request_id,
        username = %identity.username,
        table_number = body.number.unwrap_or_default(),
        "handling table registration"
    );

    match directory.create(body.into_table()).await {
        Ok(table_id) => GatewayResponse::ok(&CreatedResponse {
            table_id,
            message: "Table created".to_string(),
        }),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "table registration failed");
            GatewayResponse::problem(from_lib_error(&e, request_id))
        }
    }
}
