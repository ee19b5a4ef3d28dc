//! AWS Lambda entry point for the reservation endpoints.

use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    maitred_lambda_reservations::run().await
}
