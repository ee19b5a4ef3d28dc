//! Table and reservation records as stored and served.
//!
//! Wire casing is camelCase throughout. The reservation's slot start is
//! stored under the legacy attribute name `time`; [`ReservationView`]
//! projects it back out as `slotTimeStart` for API responses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::slot::{Slot, SlotTime};

/// A bookable physical table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Opaque identifier; assigned at creation when the caller supplied
    /// none.
    #[serde(default)]
    pub id: String,

    /// Human-facing table number, unique by convention.
    pub number: u32,

    /// Seating capacity.
    pub places: u32,

    /// Whether this is a VIP table.
    #[serde(default)]
    pub is_vip: bool,

    /// Minimum order amount required to book, zero when unset.
    #[serde(default)]
    pub min_order: u32,
}

/// A booking of one table for one date and time interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,

    /// Identifier of the reserved table.
    pub table_id: String,

    /// Denormalized copy of the table's human-facing number.
    pub table_number: u32,

    pub client_name: String,
    pub phone_number: String,

    /// Identity of the authenticated user who created the booking.
    pub username: String,

    pub date: NaiveDate,

    /// Slot start; the stored attribute keeps the legacy name `time`.
    #[serde(rename = "time")]
    pub slot_time_start: SlotTime,

    pub slot_time_end: SlotTime,

    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// The reserved `[start, end)` interval.
    pub fn slot(&self) -> Slot {
        Slot {
            start: self.slot_time_start,
            end: self.slot_time_end,
        }
    }
}

/// Response projection of a reservation as returned by the listing
/// endpoint. The stored `time` attribute surfaces as `slotTimeStart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    pub table_number: u32,
    pub client_name: String,
    pub phone_number: String,
    pub date: NaiveDate,
    pub slot_time_start: SlotTime,
    pub slot_time_end: SlotTime,
}

impl From<&Reservation> for ReservationView {
    fn from(reservation: &Reservation) -> Self {
        Self {
            table_number: reservation.table_number,
            client_name: reservation.client_name.clone(),
            phone_number: reservation.phone_number.clone(),
            date: reservation.date,
            slot_time_start: reservation.slot_time_start,
            slot_time_end: reservation.slot_time_end,
        }
    }
}
