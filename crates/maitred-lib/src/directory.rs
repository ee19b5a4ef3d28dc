//! Table catalog lookups.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::Table;
use crate::store::TableStore;

/// Facade over the table catalog.
///
/// Cheaply cloneable; the store handle is shared.
#[derive(Clone)]
pub struct TableDirectory {
    store: Arc<dyn TableStore>,
}

impl TableDirectory {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Resolve a human-facing table number to its catalog entry.
    ///
    /// Numbers are unique by convention but not enforced at creation;
    /// under duplicates the first match in scan order wins.
    pub async fn resolve_by_number(&self, number: u32) -> Result<Table> {
        self.store
            .find_by_number(number)
            .await?
            .ok_or(Error::UnknownTableNumber { number })
    }

    /// All tables in the catalog.
    pub async fn list(&self) -> Result<Vec<Table>> {
        Ok(self.store.list().await?)
    }

    /// Look up a table by its identifier.
    pub async fn get(&self, id: &str) -> Result<Table> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| Error::UnknownTableId { id: id.to_string() })
    }

    /// Register a table and return its identifier.
    ///
    /// Assigns a fresh id when the caller supplied none. A
    /// caller-supplied id silently replaces any existing entry under
    /// that id (upsert semantics).
    pub async fn create(&self, mut table: Table) -> Result<String> {
        if table.id.is_empty() {
            table.id = Uuid::new_v4().to_string();
        }
        let id = table.id.clone();
        self.store.put(table).await?;
        Ok(id)
    }
}
