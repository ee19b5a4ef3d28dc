//! DynamoDB-backed stores.
//!
//! Tables and reservations are flat items keyed by `id`, one DynamoDB
//! table each. Every lookup is a scan with a filter expression; at
//! restaurant catalog sizes that is a handful of pages at most, so no
//! secondary index is maintained.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::NaiveDate;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_item};
use tracing::debug;

use crate::model::{Reservation, Table};
use crate::slot::Slot;
use crate::store::{ReservationStore, StoreConfig, StoreError, StoreResult, TableStore};

/// A filter expression with its attribute placeholders.
struct ScanFilter {
    expression: String,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

/// Stores backed by two DynamoDB tables.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
    config: StoreConfig,
}

impl DynamoStore {
    pub fn new(client: Client, config: StoreConfig) -> Self {
        Self { client, config }
    }

    /// Scan a whole table, following pagination, optionally narrowed by
    /// a filter expression.
    async fn scan_pages(
        &self,
        table: &str,
        filter: Option<ScanFilter>,
    ) -> StoreResult<Vec<HashMap<String, AttributeValue>>> {
        let (expression, names, values) = match filter {
            Some(f) => (Some(f.expression), Some(f.names), Some(f.values)),
            None => (None, None, None),
        };

        let mut items = Vec::new();
        let mut start_key = None;
        loop {
            let output = self
                .client
                .scan()
                .table_name(table)
                .set_filter_expression(expression.clone())
                .set_expression_attribute_names(names.clone())
                .set_expression_attribute_values(values.clone())
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| StoreError::Request {
                    message: e.to_string(),
                })?;

            items.extend_from_slice(output.items());
            start_key = output.last_evaluated_key().map(|key| key.to_owned());
            if start_key.is_none() {
                break;
            }
        }

        debug!(table = table, item_count = items.len(), "scan complete");
        Ok(items)
    }
}

#[async_trait]
impl TableStore for DynamoStore {
    async fn list(&self) -> StoreResult<Vec<Table>> {
        let items = self.scan_pages(&self.config.tables_table, None).await?;
        Ok(from_items(items)?)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Table>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.config.tables_table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Request {
                message: e.to_string(),
            })?;
        Ok(output.item.map(from_item).transpose()?)
    }

    async fn find_by_number(&self, number: u32) -> StoreResult<Option<Table>> {
        let filter = ScanFilter {
            expression: "#number = :number".to_string(),
            names: HashMap::from([("#number".to_string(), "number".to_string())]),
            values: HashMap::from([(":number".to_string(), AttributeValue::N(number.to_string()))]),
        };
        let items = self
            .scan_pages(&self.config.tables_table, Some(filter))
            .await?;
        let tables: Vec<Table> = from_items(items)?;
        Ok(tables.into_iter().next())
    }

    async fn put(&self, table: Table) -> StoreResult<()> {
        let item = to_item(table)?;
        self.client
            .put_item()
            .table_name(&self.config.tables_table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| StoreError::Request {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for DynamoStore {
    async fn find_conflicting(
        &self,
        table_id: &str,
        date: NaiveDate,
        slot: Slot,
    ) -> StoreResult<Vec<Reservation>> {
        // `date` is a DynamoDB reserved word, hence the placeholders.
        let filter = ScanFilter {
            expression: "#tableId = :tableId AND #date = :date".to_string(),
            names: HashMap::from([
                ("#tableId".to_string(), "tableId".to_string()),
                ("#date".to_string(), "date".to_string()),
            ]),
            values: HashMap::from([
                (":tableId".to_string(), AttributeValue::S(table_id.to_string())),
                (":date".to_string(), AttributeValue::S(date.to_string())),
            ]),
        };
        let items = self
            .scan_pages(&self.config.reservations_table, Some(filter))
            .await?;
        let reservations: Vec<Reservation> = from_items(items)?;

        // The scan narrows by table and date only; the collision policy
        // has a single implementation, in `Slot`.
        Ok(reservations
            .into_iter()
            .filter(|r| slot.collides_with(&r.slot()))
            .collect())
    }

    async fn list(&self, username: Option<&str>) -> StoreResult<Vec<Reservation>> {
        let filter = username.map(|user| ScanFilter {
            expression: "#username = :username".to_string(),
            names: HashMap::from([("#username".to_string(), "username".to_string())]),
            values: HashMap::from([(":username".to_string(), AttributeValue::S(user.to_string()))]),
        });
        let items = self
            .scan_pages(&self.config.reservations_table, filter)
            .await?;
        Ok(from_items(items)?)
    }

    async fn put(&self, reservation: Reservation) -> StoreResult<()> {
        let item = to_item(reservation)?;
        self.client
            .put_item()
            .table_name(&self.config.reservations_table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| StoreError::Request {
                message: e.to_string(),
            })?;
        Ok(())
    }
}
