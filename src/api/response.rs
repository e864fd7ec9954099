//! Response types for the Outsourcing Cost Engine API.
//!
//! This module defines the success envelopes and the error response
//! structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MarginFormula;
use crate::error::EngineError;
use crate::models::CalculationResult;

/// Response body of the calculation endpoints.
///
/// Identifiers, timestamps and timings live here rather than in the
/// [`CalculationResult`], which stays a pure function of its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// Code of the policy the calculation ran under.
    pub policy_code: String,
    /// How long the calculation took, in microseconds.
    pub duration_us: u64,
    /// The calculation result.
    pub result: CalculationResult,
}

/// Response body of the `/validate-margin` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateMarginResponse {
    /// Always true; invalid configurations are returned as errors.
    pub valid: bool,
    /// Tax rate over the invoice base, as a fraction.
    pub effective_tax_rate: Decimal,
    /// The positive denominator the invoice base is solved with.
    pub denominator: Decimal,
    /// The margin formula of the loaded policy.
    pub margin_formula: MarginFormula,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let code = error.code();
        let message = error.to_string();
        match &error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    code,
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    code,
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidInput { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    code,
                    message,
                    format!("Field '{}' could not be used", field),
                ),
            },
            EngineError::MissingRegime => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    code,
                    message,
                    "Select 'simplified' or 'presumed_or_real_profit'",
                ),
            },
            EngineError::InvalidPercent { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    code,
                    message,
                    format!("Field '{}' must be between 0 and 100", field),
                ),
            },
            EngineError::InvalidMarginConfiguration { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    code,
                    message,
                    "Margin plus tax rate must stay below 100% of the invoice",
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_margin_maps_to_422() {
        let engine_error = EngineError::InvalidMarginConfiguration {
            margin_percent: Decimal::from(95),
            tax_rate: Decimal::from_str("0.083").unwrap(),
            denominator: Decimal::from_str("-0.033").unwrap(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api_error.error.code, "INVALID_MARGIN_CONFIGURATION");
        assert!(api_error.error.message.contains("-0.033"));
    }

    #[test]
    fn test_client_errors_map_to_400() {
        let cases = [
            (EngineError::MissingRegime, "MISSING_REGIME"),
            (
                EngineError::invalid_input("employee_count", "not a number"),
                "INVALID_INPUT",
            ),
            (
                EngineError::InvalidPercent {
                    field: "margin_percent".to_string(),
                    value: Decimal::from(120),
                },
                "INVALID_PERCENT",
            ),
        ];
        for (engine_error, code) in cases {
            let api_error: ApiErrorResponse = engine_error.into();
            assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
            assert_eq!(api_error.error.code, code);
        }
    }

    #[test]
    fn test_config_error_maps_to_500() {
        let api_error: ApiErrorResponse = EngineError::ConfigNotFound {
            path: "/missing/policy.yaml".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }
}
