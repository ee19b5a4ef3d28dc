//! AWS Lambda entry point for the table-catalog endpoints.

use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    maitred_lambda_tables::run().await
}
