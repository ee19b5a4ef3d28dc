//! Application state for the HTTP service.

use std::sync::Arc;

use maitred_lib::{
    MemoryStore, ReservationService, ReservationStore, TableDirectory, TableStore,
};

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable; the store handles inside are shared. Handlers
/// receive it via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    directory: TableDirectory,
    bookings: ReservationService,
}

impl AppState {
    /// Build state over explicit store handles.
    pub fn new(tables: Arc<dyn TableStore>, reservations: Arc<dyn ReservationStore>) -> Self {
        let directory = TableDirectory::new(tables);
        let bookings = ReservationService::new(directory.clone(), reservations);
        Self {
            directory,
            bookings,
        }
    }

    /// Build state over a fresh in-memory store, for local runs and
    /// tests.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store)
    }

    /// The table catalog.
    pub fn directory(&self) -> &TableDirectory {
        &self.directory
    }

    /// The booking service.
    pub fn bookings(&self) -> &ReservationService {
        &self.bookings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_state_starts_empty() {
        let state = AppState::in_memory();
        assert!(state.directory().list().await.unwrap().is_empty());
        assert!(state.bookings().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_state_clone_shares_stores() {
        let state = AppState::in_memory();
        let clone = state.clone();

        let id = state
            .directory()
            .create(maitred_lib::Table {
                id: String::new(),
                number: 1,
                places: 2,
                is_vip: false,
                min_order: 0,
            })
            .await
            .unwrap();

        assert!(clone.directory().get(&id).await.is_ok());
    }
}
