//! HTTP request handlers for the Outsourcing Cost Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    compute, effective_tax_rate, margin_denominator, validate_margin_configuration,
};
use crate::error::EngineError;
use crate::models::{FormInput, InputSnapshot};

use super::request::{CalculationRequest, ValidateMarginRequest};
use super::response::{ApiError, ApiErrorResponse, CalculationResponse, ValidateMarginResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/calculate/form", post(calculate_form_handler))
        .route("/validate-margin", post(validate_margin_handler))
        .route("/policy", get(policy_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a numeric calculation request and returns the priced result.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    match InputSnapshot::try_from(request) {
        Ok(snapshot) => run_calculation(&state, &snapshot, correlation_id),
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for POST /calculate/form endpoint.
///
/// Accepts the calculator form as text (BRL amounts, comma percentages).
async fn calculate_form_handler(
    State(state): State<AppState>,
    payload: Result<Json<FormInput>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing form calculation request");

    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    match InputSnapshot::try_from(form) {
        Ok(snapshot) => run_calculation(&state, &snapshot, correlation_id),
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for POST /validate-margin endpoint.
///
/// Reports whether a margin and regime leave a positive denominator.
async fn validate_margin_handler(
    State(state): State<AppState>,
    payload: Result<Json<ValidateMarginRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let policy = state.policy();
    let outcome = request.percents().and_then(|(margin, simplified)| {
        validate_margin_configuration(margin, request.tax_regime, simplified, policy)?;
        let tax_rate =
            effective_tax_rate(request.tax_regime, simplified, &policy.rates().service_taxes)?;
        let formula = policy.options().margin_formula;
        Ok(ValidateMarginResponse {
            valid: true,
            effective_tax_rate: tax_rate,
            denominator: margin_denominator(margin.fraction(), tax_rate, formula),
            margin_formula: formula,
        })
    });

    match outcome {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                denominator = %body.denominator,
                "Margin configuration valid"
            );
            json_response(StatusCode::OK, body)
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for GET /policy endpoint.
async fn policy_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, state.policy().clone())
}

/// Runs the pipeline and wraps the result in the response envelope.
fn run_calculation(state: &AppState, snapshot: &InputSnapshot, correlation_id: Uuid) -> Response {
    let policy = state.policy();
    let start_time = Instant::now();

    match compute(snapshot, policy) {
        Ok(result) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                policy = %policy.metadata().code,
                per_employee_total = %result.final_summary.per_employee_total.round_dp(2),
                warnings = result.audit_trace.warnings.len(),
                duration_us = duration.as_micros(),
                "Calculation completed successfully"
            );
            json_response(
                StatusCode::OK,
                CalculationResponse {
                    calculation_id: correlation_id,
                    timestamp: Utc::now(),
                    engine_version: env!("CARGO_PKG_VERSION").to_string(),
                    policy_code: policy.metadata().code.clone(),
                    duration_us: duration.as_micros() as u64,
                    result,
                },
            )
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(err: EngineError, correlation_id: Uuid) -> Response {
    warn!(
        correlation_id = %correlation_id,
        code = err.code(),
        error = %err,
        "Request rejected"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            // Check if it's a missing field error
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else if body_text.contains("outside 0..=100") {
                ApiError::new("INVALID_PERCENT", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, PricingPolicy};
    use crate::models::CalculationResult;
    use axum::{body::Body, http::Request};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        AppState::new(ConfigLoader::from_policy(PricingPolicy::default()))
    }

    async fn post_json(uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_api_001_valid_request_returns_200() {
        let (status, body) = post_json(
            "/calculate",
            r#"{
                "gross_salary": "2000.00",
                "tax_regime": "presumed_or_real_profit",
                "margin_percent": 20
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["policy_code"], "standard");
        assert!(body["calculation_id"].is_string());

        let result: CalculationResult = serde_json::from_value(body["result"].clone()).unwrap();
        assert!(result.margin.is_some());
        assert!(result.final_summary.per_employee_total > Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_api_002_malformed_json_returns_400() {
        let (status, body) = post_json("/calculate", "{invalid json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_api_003_missing_salary_returns_400() {
        let (status, body) = post_json("/calculate", r#"{ "tax_regime": "simplified" }"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("gross_salary"));
    }

    #[tokio::test]
    async fn test_api_004_invalid_margin_returns_422() {
        let (status, body) = post_json(
            "/calculate",
            r#"{
                "gross_salary": 2000,
                "tax_regime": "presumed_or_real_profit",
                "margin_percent": 95
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "INVALID_MARGIN_CONFIGURATION");
    }

    #[tokio::test]
    async fn test_form_calculation() {
        let (status, body) = post_json(
            "/calculate/form",
            r#"{
                "gross_salary": "R$ 2.000,00",
                "tax_regime": "lucro",
                "daily_transport_fare": "R$ 10,00",
                "margin_percent": "20%",
                "employee_count": "2"
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["benefits"]["transport_monthly_total"], "230.00");
        assert!(body["result"]["final_summary"]["multi_employee_total"].is_string());
    }

    #[tokio::test]
    async fn test_validate_margin_endpoint() {
        let (status, body) = post_json(
            "/validate-margin",
            r#"{ "margin_percent": 20, "tax_regime": "simplified", "simplified_tax_rate": 6 }"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        let denominator: Decimal = body["denominator"].as_str().unwrap().parse().unwrap();
        assert_eq!(denominator, Decimal::new(74, 2));
        assert_eq!(body["margin_formula"], "on_invoice");
    }
}
