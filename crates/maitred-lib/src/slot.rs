//! Reservation time slots and the collision policy between them.
//!
//! All times of day travel as zero-padded `HH:MM` strings on the wire
//! and in the store, but are parsed into [`SlotTime`] before any
//! comparison, so ordering never depends on string representation.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Wire and storage format for times of day.
const TIME_FORMAT: &str = "%H:%M";

/// A time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    /// Parse a zero-padded 24-hour `HH:MM` string.
    pub fn parse(value: &str) -> Result<Self> {
        NaiveTime::parse_from_str(value, TIME_FORMAT)
            .map(Self)
            .map_err(|_| Error::InvalidTime {
                value: value.to_string(),
            })
    }

    /// Build a slot time from clock components, for fixtures and tests.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl FromStr for SlotTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// A half-open `[start, end)` reservation interval within one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: SlotTime,
    pub end: SlotTime,
}

impl Slot {
    /// Build a slot, rejecting empty and inverted intervals.
    pub fn new(start: SlotTime, end: SlotTime) -> Result<Self> {
        if end <= start {
            return Err(Error::InvalidSlot { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a slot from its `HH:MM` boundary strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(SlotTime::parse(start)?, SlotTime::parse(end)?)
    }

    /// Whether this requested slot collides with an existing slot.
    ///
    /// For requested `[a,b)` and existing `[c,d)` the test is
    /// `a <= d <= b || c <= a <= d`. Slots that merely touch at a
    /// boundary still collide when the request starts at or before the
    /// existing end; the reverse touch (request ending exactly at the
    /// existing start) does not. The asymmetry is inherited behavior
    /// and is pinned by the tests below.
    pub fn collides_with(&self, existing: &Slot) -> bool {
        (self.start <= existing.end && existing.end <= self.end)
            || (existing.start <= self.start && self.start <= existing.end)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start: &str, end: &str) -> Slot {
        Slot::parse(start, end).expect("valid slot")
    }

    #[test]
    fn parses_zero_padded_times() {
        let time = SlotTime::parse("09:30").unwrap();
        assert_eq!(time.to_string(), "09:30");
    }

    #[test]
    fn rejects_unpadded_and_decorated_times() {
        assert!(SlotTime::parse("9:30").is_err());
        assert!(SlotTime::parse("09:30:00").is_err());
        assert!(SlotTime::parse("6pm").is_err());
        assert!(SlotTime::parse("").is_err());
    }

    #[test]
    fn slot_times_order_by_clock_value() {
        let early = SlotTime::parse("09:00").unwrap();
        let late = SlotTime::parse("10:30").unwrap();
        assert!(early < late);
    }

    #[test]
    fn rejects_empty_and_inverted_slots() {
        assert!(matches!(
            Slot::parse("18:00", "18:00"),
            Err(Error::InvalidSlot { .. })
        ));
        assert!(matches!(
            Slot::parse("19:00", "18:00"),
            Err(Error::InvalidSlot { .. })
        ));
    }

    #[test]
    fn contained_request_collides() {
        let existing = slot("10:00", "11:00");
        assert!(slot("10:30", "10:45").collides_with(&existing));
    }

    #[test]
    fn identical_request_collides() {
        let existing = slot("18:00", "19:00");
        assert!(slot("18:00", "19:00").collides_with(&existing));
    }

    #[test]
    fn straddling_request_collides() {
        let existing = slot("10:00", "11:00");
        assert!(slot("09:30", "10:15").collides_with(&existing));
        assert!(slot("10:45", "11:30").collides_with(&existing));
        assert!(slot("09:00", "12:00").collides_with(&existing));
    }

    #[test]
    fn request_starting_at_existing_end_collides() {
        // Touching boundary: [11:00,12:00) after [10:00,11:00) is a
        // collision under the inherited policy.
        let existing = slot("10:00", "11:00");
        assert!(slot("11:00", "12:00").collides_with(&existing));
    }

    #[test]
    fn request_ending_at_existing_start_does_not_collide() {
        // The other touching direction is allowed; the predicate is
        // asymmetric on purpose and this pins it.
        let existing = slot("10:00", "11:00");
        assert!(!slot("09:00", "10:00").collides_with(&existing));
    }

    #[test]
    fn disjoint_request_does_not_collide() {
        let existing = slot("10:00", "11:00");
        assert!(!slot("12:00", "13:00").collides_with(&existing));
        assert!(!slot("08:00", "09:00").collides_with(&existing));
    }

    #[test]
    fn parses_calendar_dates() {
        let date = parse_date("2024-06-01").unwrap();
        assert_eq!(date.to_string(), "2024-06-01");
        assert!(parse_date("01/06/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn slot_time_serde_round_trip() {
        let time = SlotTime::parse("18:05").unwrap();
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(json, "\"18:05\"");
        let back: SlotTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, time);
    }
}
