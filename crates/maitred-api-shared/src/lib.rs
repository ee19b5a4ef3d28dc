//! Shared infrastructure for the maitred HTTP boundary.
//!
//! This crate provides common functionality used by both the Lambda
//! handlers and the containerized HTTP service:
//!
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error
//!   responses
//! - [`GatewayRequest`] / [`GatewayResponse`]: API Gateway proxy event
//!   and response envelopes
//! - [`Identity`]: authenticated-caller extraction from authorizer
//!   claims
//! - Request DTOs with validation for each endpoint
//! - [`init_tracing`]: JSON-formatted tracing for CloudWatch Logs
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides seeded stores and event builders
//! for handler testing. Enable the `test-utils` feature to access it
//! from dependent crates.

#![deny(warnings)]

mod gateway;
mod problem;
mod requests;
mod tracing_init;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use gateway::{Authorizer, GatewayRequest, GatewayResponse, Identity, RequestContext};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_SLOT_CONFLICT, PROBLEM_UNAUTHORIZED, PROBLEM_UNKNOWN_TABLE,
};
pub use requests::{CreateReservationRequest, CreateTableRequest, Validate};
pub use tracing_init::init_tracing;
