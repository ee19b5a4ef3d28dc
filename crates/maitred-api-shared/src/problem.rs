//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details
//! standard. See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use http::StatusCode;
use serde::{Deserialize, Serialize};

use maitred_lib::Error as LibError;

/// Problem type URI for requests without a usable caller identity.
pub const PROBLEM_UNAUTHORIZED: &str = "/problems/unauthorized";

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for unknown table numbers or identifiers.
pub const PROBLEM_UNKNOWN_TABLE: &str = "/problems/unknown-table";

/// Problem type URI for reservation slot collisions.
pub const PROBLEM_SLOT_CONFLICT: &str = "/problems/slot-conflict";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// RFC 9457 Problem Details response structure.
///
/// Provides a consistent format for error responses across all
/// endpoints, Lambda and container alike.
///
/// # Example
///
/// ```
/// use maitred_api_shared::{ProblemDetails, PROBLEM_UNKNOWN_TABLE};
/// use http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_UNKNOWN_TABLE,
///     "Unknown Table",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("no table with number 42")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Content type for this response (always "application/problem+json").
    pub content_type: String,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Create a 401 Unauthorized problem for requests without identity.
    pub fn unauthorized(request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_UNAUTHORIZED, "Unauthorized", StatusCode::UNAUTHORIZED)
            .with_detail("Missing or invalid caller identity")
            .with_request_id(request_id)
    }

    /// Create a 400 Bad Request problem for invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 404 Not Found problem for unknown tables.
    pub fn unknown_table(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_UNKNOWN_TABLE, "Unknown Table", StatusCode::NOT_FOUND)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    /// Create a 409 Conflict problem for colliding reservation slots.
    pub fn slot_conflict(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_SLOT_CONFLICT, "Slot Conflict", StatusCode::CONFLICT)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    /// Create a 500 Internal Server Error problem.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors
/// don't carry one. Storage failures come back with a generic detail;
/// callers log the full error server-side before mapping.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::UnknownTableNumber { .. } | LibError::UnknownTableId { .. } => {
            ProblemDetails::unknown_table(error.to_string(), request_id)
        }
        LibError::SlotConflict { .. } => {
            ProblemDetails::slot_conflict(error.to_string(), request_id)
        }
        LibError::InvalidDate { .. }
        | LibError::InvalidTime { .. }
        | LibError::InvalidSlot { .. } => {
            ProblemDetails::bad_request(error.to_string(), request_id)
        }
        LibError::Store(_) => {
            ProblemDetails::internal_error("Storage is temporarily unavailable", request_id)
        }
    }
}
