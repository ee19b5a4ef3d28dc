//! Storage traits and backends for tables and reservations.
//!
//! Both record kinds live as flat documents keyed by `id`. The traits
//! are object safe so binaries can inject either backend behind
//! `Arc<dyn ...>` handles at startup.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{Reservation, Table};
use crate::slot::Slot;

pub mod dynamo;
pub mod memory;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

/// Error raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed a request.
    #[error("storage request failed: {message}")]
    Request { message: String },

    /// A stored record could not be encoded or decoded.
    #[error("storage record conversion failed: {0}")]
    Convert(#[from] serde_dynamo::Error),
}

/// Convenient result alias for storage operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable table-catalog storage.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// All tables in the catalog.
    async fn list(&self) -> StoreResult<Vec<Table>>;

    /// The table stored under `id`, if any.
    async fn get(&self, id: &str) -> StoreResult<Option<Table>>;

    /// The first table whose `number` matches, in unspecified scan
    /// order. An O(n) scan over the catalog.
    async fn find_by_number(&self, number: u32) -> StoreResult<Option<Table>>;

    /// Unconditional upsert keyed by `table.id`.
    async fn put(&self, table: Table) -> StoreResult<()>;
}

/// Durable reservation storage.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Reservations for `table_id` on `date` whose interval collides
    /// with the requested `slot`. An O(n) scan over reservations.
    async fn find_conflicting(
        &self,
        table_id: &str,
        date: NaiveDate,
        slot: Slot,
    ) -> StoreResult<Vec<Reservation>>;

    /// All reservations, optionally restricted to one creating user.
    async fn list(&self, username: Option<&str>) -> StoreResult<Vec<Reservation>>;

    /// Unconditional insert. Conflict prevention happens in the booking
    /// service before this call, never here.
    async fn put(&self, reservation: Reservation) -> StoreResult<()>;
}

/// DynamoDB table names, resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Name of the DynamoDB table holding the table catalog.
    pub tables_table: String,
    /// Name of the DynamoDB table holding reservations.
    pub reservations_table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            tables_table: "maitred-tables".to_string(),
            reservations_table: "maitred-reservations".to_string(),
        }
    }
}

impl StoreConfig {
    /// Create configuration from environment variables.
    ///
    /// - `MAITRED_TABLES_TABLE`: table-catalog table name
    /// - `MAITRED_RESERVATIONS_TABLE`: reservations table name
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tables_table: std::env::var("MAITRED_TABLES_TABLE")
                .unwrap_or(defaults.tables_table),
            reservations_table: std::env::var("MAITRED_RESERVATIONS_TABLE")
                .unwrap_or(defaults.reservations_table),
        }
    }
}
