//! HTTP API module for the Outsourcing Cost Engine.
//!
//! This module provides the REST API endpoints for pricing outsourced
//! employees under the loaded pricing policy.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AdditionalCostRequest, CalculationRequest, ValidateMarginRequest};
pub use response::{ApiError, CalculationResponse, ValidateMarginResponse};
pub use state::AppState;
