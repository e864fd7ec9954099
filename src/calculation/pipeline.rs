//! The calculation pipeline.
//!
//! [`compute`] runs the nine cost blocks once, in dependency order, over an
//! immutable [`InputSnapshot`]. Stage errors are recovered: the stage output
//! becomes `None` or zero and the error is recorded as an audit warning. An
//! amount above the policy ceiling and an invalid margin configuration are
//! returned to the caller; both are checked before any stage runs.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::PricingPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, AuditWarning, CalculationResult, InputSnapshot};

use super::{
    calculate_additional_costs, calculate_benefits, calculate_charges, calculate_final_summary,
    calculate_interim_summary, calculate_subtotals, calculate_taxes,
    calculate_termination_provision, solve_margin, validate_margin_configuration,
};

/// Warning code for a salary under the policy minimum wage.
pub const SALARY_BELOW_MINIMUM: &str = "SALARY_BELOW_MINIMUM";

/// Warning code for a salary over the policy maximum salary.
pub const SALARY_ABOVE_MAXIMUM: &str = "SALARY_ABOVE_MAXIMUM";

/// Prices one outsourced employee (and optionally several) under a policy.
///
/// The function is pure: the same snapshot and policy always produce an equal
/// result.
///
/// # Errors
///
/// - `InvalidInput` when a monetary input exceeds the policy `max_amount`, or
///   the final price overflows
/// - `InvalidMarginConfiguration` when the margin and regime tax leave no
///   positive denominator
///
/// Every other problem is reported through [`AuditTrace::warnings`].
///
/// # Examples
///
/// ```
/// use outsourcing_cost_engine::calculation::compute;
/// use outsourcing_cost_engine::config::PricingPolicy;
/// use outsourcing_cost_engine::models::{InputSnapshot, Percent, TaxRegime};
/// use rust_decimal::Decimal;
///
/// let inputs = InputSnapshot {
///     gross_salary: Decimal::from(2000),
///     tax_regime: Some(TaxRegime::PresumedOrRealProfit),
///     margin_percent: Some(Percent::new("margin_percent", Decimal::from(20)).unwrap()),
///     ..InputSnapshot::default()
/// };
/// let result = compute(&inputs, &PricingPolicy::default()).unwrap();
/// assert!(result.margin.is_some());
/// assert!(result.audit_trace.warnings.is_empty());
/// ```
pub fn compute(inputs: &InputSnapshot, policy: &PricingPolicy) -> EngineResult<CalculationResult> {
    check_amount_ceiling(inputs, policy.limits().max_amount).inspect_err(|err| {
        warn!(error = %err, "Rejected input amount");
    })?;

    if let (Some(margin), Some(regime)) = (inputs.margin_percent, inputs.tax_regime) {
        if let Err(err @ EngineError::InvalidMarginConfiguration { .. }) =
            validate_margin_configuration(margin, regime, inputs.simplified_tax_rate, policy)
        {
            warn!(error = %err, "Rejected margin configuration");
            return Err(err);
        }
    }

    let rates = policy.rates();
    let limits = policy.limits();
    let options = policy.options();

    let mut trace = AuditTrace::default();
    let mut step_number: u32 = 1;

    if inputs.gross_salary > Decimal::ZERO && inputs.gross_salary < limits.minimum_wage {
        push_warning(
            &mut trace.warnings,
            AuditWarning {
                code: SALARY_BELOW_MINIMUM.to_string(),
                message: format!(
                    "Salary {} is below the minimum wage of {}",
                    inputs.gross_salary, limits.minimum_wage
                ),
                severity: "low".to_string(),
            },
        );
    }

    if inputs.gross_salary > limits.maximum_salary {
        push_warning(
            &mut trace.warnings,
            AuditWarning {
                code: SALARY_ABOVE_MAXIMUM.to_string(),
                message: format!(
                    "Salary {} is above the expected maximum of {}",
                    inputs.gross_salary, limits.maximum_salary
                ),
                severity: "low".to_string(),
            },
        );
    }

    if inputs.employee_count == 0 || inputs.employee_count > limits.max_employee_count {
        record_error(
            &mut trace.warnings,
            &EngineError::invalid_input(
                "employee_count",
                format!("must be between 1 and {}", limits.max_employee_count),
            ),
        );
    }

    // Block 3.1 / 3.2
    let charges = match calculate_charges(
        inputs.gross_salary,
        inputs.tax_regime,
        &rates.charges,
        step_number,
    ) {
        Ok(result) => {
            trace.steps.push(result.audit_step);
            step_number += 1;
            Some(result.charges)
        }
        Err(err) => {
            record_error(&mut trace.warnings, &err);
            None
        }
    };

    // Block 3.3
    let benefits_result = calculate_benefits(
        inputs.daily_transport_fare,
        inputs.daily_meal_allowance,
        inputs.gross_salary,
        &rates.benefits,
        step_number,
    );
    trace.steps.push(benefits_result.audit_step);
    step_number += 1;
    let benefits = benefits_result.benefits;

    // Block 4
    let termination_provision = match calculate_termination_provision(
        inputs.gross_salary,
        inputs.tax_regime,
        &rates.termination,
        step_number,
    ) {
        Ok(result) => {
            trace.steps.push(result.audit_step);
            step_number += 1;
            Some(result.provision)
        }
        Err(err) => {
            record_error(&mut trace.warnings, &err);
            None
        }
    };

    // Block 5
    let costs_result = calculate_additional_costs(
        &inputs.additional_costs,
        limits.max_additional_costs,
        step_number,
    );
    if costs_result.dropped_items > 0 {
        record_error(
            &mut trace.warnings,
            &EngineError::invalid_input(
                "additional_costs",
                format!(
                    "at most {} items are allowed; {} ignored",
                    limits.max_additional_costs, costs_result.dropped_items
                ),
            ),
        );
    }
    trace.steps.push(costs_result.audit_step);
    step_number += 1;
    let additional_costs = costs_result.summary;

    let subtotals_result = calculate_subtotals(
        charges.as_ref(),
        &benefits,
        termination_provision.as_ref(),
        step_number,
    );
    trace.steps.push(subtotals_result.audit_step);
    step_number += 1;
    let subtotals = subtotals_result.subtotals;

    // Block 6
    let interim_result = calculate_interim_summary(
        inputs.gross_salary.max(Decimal::ZERO),
        &subtotals,
        additional_costs.block_5_total,
        inputs.replace_vacation,
        options.vacation_replacement,
        step_number,
    );
    trace.steps.push(interim_result.audit_step);
    step_number += 1;
    let interim_summary = interim_result.summary;

    // Block 8
    let margin = match (inputs.margin_percent, inputs.tax_regime) {
        (Some(margin_percent), Some(regime)) if interim_summary.margin_base > Decimal::ZERO => {
            match solve_margin(
                interim_summary.margin_base,
                inputs.additional_cost_percent,
                margin_percent,
                regime,
                inputs.simplified_tax_rate,
                policy,
                step_number,
            ) {
                Ok(result) => {
                    trace.steps.push(result.audit_step);
                    step_number += 1;
                    Some(result.margin)
                }
                Err(err) => {
                    record_error(&mut trace.warnings, &err);
                    None
                }
            }
        }
        _ => None,
    };

    // Block 7
    let taxes_result = calculate_taxes(
        interim_summary.margin_base,
        inputs.additional_cost_percent,
        margin.as_ref(),
        inputs.tax_regime,
        &rates.service_taxes,
        step_number,
    );
    trace.steps.push(taxes_result.audit_step);
    step_number += 1;
    let taxes = taxes_result.taxes;

    // Block 9
    let final_result = calculate_final_summary(
        &interim_summary,
        &taxes,
        margin.as_ref(),
        options.vacation_replacement,
        inputs.employee_count,
        limits.max_employee_count,
        step_number,
    )?;
    trace.steps.push(final_result.audit_step);
    let final_summary = final_result.summary;

    debug!(
        policy = %policy.metadata().code,
        per_employee_total = %final_summary.per_employee_total.round_dp(2),
        employee_count = final_summary.employee_count,
        margin_solved = margin.is_some(),
        warnings = trace.warnings.len(),
        "Calculation pipeline completed"
    );

    Ok(CalculationResult {
        policy_code: policy.metadata().code.clone(),
        charges,
        benefits,
        termination_provision,
        additional_costs,
        subtotals,
        interim_summary,
        margin,
        taxes,
        final_summary,
        audit_trace: trace,
    })
}

/// Rejects monetary inputs above the policy ceiling.
fn check_amount_ceiling(inputs: &InputSnapshot, max_amount: Decimal) -> EngineResult<()> {
    let amounts = [
        ("gross_salary", inputs.gross_salary),
        ("daily_transport_fare", inputs.daily_transport_fare),
        ("daily_meal_allowance", inputs.daily_meal_allowance),
    ]
    .into_iter()
    .chain(
        inputs
            .additional_costs
            .iter()
            .map(|cost| ("additional_costs", cost.amount)),
    );

    for (field, amount) in amounts {
        if amount > max_amount {
            return Err(EngineError::invalid_input(
                field,
                format!("must not exceed {}", max_amount),
            ));
        }
    }
    Ok(())
}

/// Records a recovered stage error as a warning.
fn record_error(warnings: &mut Vec<AuditWarning>, err: &EngineError) {
    let severity = match err {
        EngineError::MissingRegime => "high",
        _ => "medium",
    };
    warn!(code = err.code(), error = %err, "Recovered calculation error");
    push_warning(
        warnings,
        AuditWarning {
            code: err.code().to_string(),
            message: err.to_string(),
            severity: severity.to_string(),
        },
    );
}

/// Adds a warning unless one with the same code and message is present.
fn push_warning(warnings: &mut Vec<AuditWarning>, warning: AuditWarning) {
    let duplicate = warnings
        .iter()
        .any(|w| w.code == warning.code && w.message == warning.message);
    if !duplicate {
        warnings.push(warning);
    }
}
