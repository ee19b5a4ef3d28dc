//! Reservation booking and listing.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::directory::TableDirectory;
use crate::error::{Error, Result};
use crate::model::Reservation;
use crate::slot::Slot;
use crate::store::ReservationStore;

/// A validated booking request, ready to check against the store.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub table_number: u32,
    pub client_name: String,
    pub phone_number: String,
    pub date: NaiveDate,
    pub slot: Slot,
    /// Identity of the authenticated caller.
    pub username: String,
}

/// The booking service: resolves tables, rejects colliding slots, and
/// persists reservations.
///
/// Cheaply cloneable; store handles are shared.
#[derive(Clone)]
pub struct ReservationService {
    directory: TableDirectory,
    reservations: Arc<dyn ReservationStore>,
}

impl ReservationService {
    pub fn new(directory: TableDirectory, reservations: Arc<dyn ReservationStore>) -> Self {
        Self {
            directory,
            reservations,
        }
    }

    /// Book a table for a client and return the stored record.
    ///
    /// Resolves the table number, rejects the request when any existing
    /// reservation for that table and date collides with the requested
    /// slot, then writes the new record. The collision check and the
    /// write are two separate store operations with nothing holding the
    /// slot in between; two concurrent requests for the same slot can
    /// both pass the check. Callers needing a hard guarantee must
    /// serialize bookings externally.
    pub async fn create(&self, request: NewReservation) -> Result<Reservation> {
        let table = self.directory.resolve_by_number(request.table_number).await?;

        let conflicts = self
            .reservations
            .find_conflicting(&table.id, request.date, request.slot)
            .await?;
        if !conflicts.is_empty() {
            return Err(Error::SlotConflict {
                table_number: table.number,
                date: request.date,
                start: request.slot.start,
                end: request.slot.end,
            });
        }

        let reservation = Reservation {
            id: Uuid::new_v4().to_string(),
            table_id: table.id,
            table_number: table.number,
            client_name: request.client_name,
            phone_number: request.phone_number,
            username: request.username,
            date: request.date,
            slot_time_start: request.slot.start,
            slot_time_end: request.slot.end,
            created_at: Utc::now(),
        };
        self.reservations.put(reservation.clone()).await?;

        info!(
            reservation_id = %reservation.id,
            table_number = reservation.table_number,
            date = %reservation.date,
            slot = %request.slot,
            "reservation created"
        );
        Ok(reservation)
    }

    /// All reservations, optionally restricted to one creating user.
    pub async fn list(&self, username: Option<&str>) -> Result<Vec<Reservation>> {
        Ok(self.reservations.list(username).await?)
    }
}
