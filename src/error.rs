//! Error types for the Outsourcing Cost Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while pricing an outsourced employee.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the Outsourcing Cost Engine.
///
/// Stage-level errors (`InvalidInput`, `MissingRegime`) are recovered inside the
/// pipeline and reported as audit warnings. The pipeline escalates
/// `InvalidMarginConfiguration` to its caller, and `InvalidInput` only for an
/// amount above the policy ceiling or a price that overflows.
///
/// # Example
///
/// ```
/// use outsourcing_cost_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A required numeric input is non-positive, unparseable or out of range.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// No tax regime has been selected, so regime-dependent stages cannot run.
    #[error("Tax regime not selected")]
    MissingRegime,

    /// Margin plus tax rate consume the whole invoice value.
    #[error(
        "Invalid margin configuration: margin {margin_percent}% with tax rate {tax_rate} leaves denominator {denominator}"
    )]
    InvalidMarginConfiguration {
        /// The requested margin, in percentage points.
        margin_percent: Decimal,
        /// The effective tax rate as a fraction.
        tax_rate: Decimal,
        /// The resulting non-positive denominator.
        denominator: Decimal,
    },

    /// A percentage input is outside the closed range 0 to 100.
    #[error("Invalid percent '{field}': {value} is outside 0..=100")]
    InvalidPercent {
        /// The input field holding the percentage.
        field: String,
        /// The rejected value, in percentage points.
        value: Decimal,
    },
}

impl EngineError {
    /// Returns the stable machine-readable code for this error.
    ///
    /// The same code is used in audit warnings and HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
            EngineError::InvalidInput { .. } => "INVALID_INPUT",
            EngineError::MissingRegime => "MISSING_REGIME",
            EngineError::InvalidMarginConfiguration { .. } => "INVALID_MARGIN_CONFIGURATION",
            EngineError::InvalidPercent { .. } => "INVALID_PERCENT",
        }
    }

    /// Shorthand for building an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
