use chrono::NaiveDate;
use thiserror::Error;

use crate::slot::SlotTime;
use crate::store::StoreError;

/// Convenient result alias for the maitred library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when no table carries the requested human-facing number.
    #[error("no table with number {number}")]
    UnknownTableNumber { number: u32 },

    /// Raised when no table exists under the given identifier.
    #[error("no table with id {id}")]
    UnknownTableId { id: String },

    /// Raised when the requested slot collides with an existing
    /// reservation for the same table and date.
    #[error("table {table_number} is already reserved on {date} within {start}-{end}")]
    SlotConflict {
        table_number: u32,
        date: NaiveDate,
        start: SlotTime,
        end: SlotTime,
    },

    /// Raised when a calendar date does not parse as `YYYY-MM-DD`.
    #[error("invalid date {value:?}; expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// Raised when a time of day does not parse as zero-padded `HH:MM`.
    #[error("invalid time {value:?}; expected HH:MM")]
    InvalidTime { value: String },

    /// Raised when a slot's end does not lie after its start.
    #[error("slot end {end} is not after start {start}")]
    InvalidSlot { start: SlotTime, end: SlotTime },

    /// Wrapper for storage failures.
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_table_number_names_the_number() {
        let err = Error::UnknownTableNumber { number: 42 };
        assert_eq!(err.to_string(), "no table with number 42");
    }

    #[test]
    fn slot_conflict_names_table_date_and_slot() {
        let err = Error::SlotConflict {
            table_number: 5,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            start: "18:00".parse().unwrap(),
            end: "19:00".parse().unwrap(),
        };
        let message = err.to_string();
        assert!(message.contains("table 5"));
        assert!(message.contains("2024-06-01"));
        assert!(message.contains("18:00-19:00"));
    }

    #[test]
    fn invalid_time_quotes_the_value() {
        let err = Error::InvalidTime {
            value: "6pm".to_string(),
        };
        assert!(err.to_string().contains("\"6pm\""));
    }
}
