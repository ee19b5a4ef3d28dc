//! In-memory store for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::model::{Reservation, Table};
use crate::slot::Slot;
use crate::store::{ReservationStore, StoreResult, TableStore};

/// A `HashMap`-backed implementation of both storage traits.
///
/// Listings come back in a deterministic order (tables by number,
/// reservations by date and start) so tests need not sort.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Table>>,
    reservations: Mutex<HashMap<String, Reservation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reservations, for write-count assertions.
    pub async fn reservation_count(&self) -> usize {
        self.reservations.lock().await.len()
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Table>> {
        let mut tables: Vec<Table> = self.tables.lock().await.values().cloned().collect();
        tables.sort_by_key(|t| t.number);
        Ok(tables)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Table>> {
        Ok(self.tables.lock().await.get(id).cloned())
    }

    async fn find_by_number(&self, number: u32) -> StoreResult<Option<Table>> {
        Ok(self
            .tables
            .lock()
            .await
            .values()
            .find(|t| t.number == number)
            .cloned())
    }

    async fn put(&self, table: Table) -> StoreResult<()> {
        self.tables.lock().await.insert(table.id.clone(), table);
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn find_conflicting(
        &self,
        table_id: &str,
        date: NaiveDate,
        slot: Slot,
    ) -> StoreResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .lock()
            .await
            .values()
            .filter(|r| r.table_id == table_id && r.date == date)
            .filter(|r| slot.collides_with(&r.slot()))
            .cloned()
            .collect())
    }

    async fn list(&self, username: Option<&str>) -> StoreResult<Vec<Reservation>> {
        let mut reservations: Vec<Reservation> = self
            .reservations
            .lock()
            .await
            .values()
            .filter(|r| username.is_none_or(|u| r.username == u))
            .cloned()
            .collect();
        reservations.sort_by_key(|r| (r.date, r.slot_time_start));
        Ok(reservations)
    }

    async fn put(&self, reservation: Reservation) -> StoreResult<()> {
        self.reservations
            .lock()
            .await
            .insert(reservation.id.clone(), reservation);
        Ok(())
    }
}
