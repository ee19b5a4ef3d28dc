//! Request types and validation for the reservation API endpoints.

use serde::{Deserialize, Serialize};

use maitred_lib::Table;

use crate::problem::ProblemDetails;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a
/// `ProblemDetails` error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err`
    /// variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Request body for booking a table.
///
/// Date and time fields stay as strings here; parsing into typed values
/// happens in the library so malformed values and missing fields
/// produce distinct messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    /// Human-facing number of the table to book.
    #[serde(default)]
    pub table_number: Option<u32>,

    #[serde(default)]
    pub client_name: String,

    #[serde(default)]
    pub phone_number: String,

    /// Calendar date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,

    /// Slot start, zero-padded `HH:MM`.
    #[serde(default)]
    pub slot_time_start: String,

    /// Slot end, zero-padded `HH:MM`.
    #[serde(default)]
    pub slot_time_end: String,
}

impl Validate for CreateReservationRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        match self.table_number {
            None => {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'tableNumber' field is required",
                    request_id,
                )));
            }
            Some(0) => {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'tableNumber' field must be a positive number",
                    request_id,
                )));
            }
            Some(_) => {}
        }

        if self.date.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'date' field is required and cannot be empty",
                request_id,
            )));
        }

        if self.slot_time_start.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'slotTimeStart' field is required and cannot be empty",
                request_id,
            )));
        }

        if self.slot_time_end.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'slotTimeEnd' field is required and cannot be empty",
                request_id,
            )));
        }

        Ok(())
    }
}

/// Request body for registering a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableRequest {
    /// Optional caller-supplied identifier; generated when absent.
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub number: Option<u32>,

    #[serde(default)]
    pub places: Option<u32>,

    #[serde(default)]
    pub is_vip: bool,

    #[serde(default)]
    pub min_order: u32,
}

impl Validate for CreateTableRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        match self.number {
            None | Some(0) => {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'number' field is required and must be positive",
                    request_id,
                )));
            }
            Some(_) => {}
        }

        match self.places {
            None | Some(0) => {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'places' field is required and must be positive",
                    request_id,
                )));
            }
            Some(_) => {}
        }

        Ok(())
    }
}

impl CreateTableRequest {
    /// Convert a validated request into the catalog record.
    pub fn into_table(self) -> Table {
        Table {
            id: self.id.unwrap_or_default(),
            number: self.number.unwrap_or_default(),
            places: self.places.unwrap_or_default(),
            is_vip: self.is_vip,
            min_order: self.min_order,
        }
    }
}
