//! Final price summary (block 9).

use rust_decimal::Decimal;

use crate::config::VacationReplacementMode;
use crate::error::{EngineError, EngineResult};
use crate::format::format_currency;
use crate::models::{AuditStep, Block7Result, FinalSummary, InterimSummary, MarginResult};

use super::audit_amount;

/// The result of the final summary aggregation.
#[derive(Debug, Clone)]
pub struct FinalSummaryResult {
    /// The computed final summary.
    pub summary: FinalSummary,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Builds the per-employee price and, for several employees, the total.
///
/// With a solved margin the price is the invoice base. Under
/// [`VacationReplacementMode::AddedAtCost`] the vacation replacement is added
/// on top of it. Without a margin the price falls back to
/// `block_6_total + block_7_total`. The multi-employee total is only produced
/// for `1 < employee_count <= max_employee_count`.
///
/// The summary lines (salary, charges, provisions, additional costs, taxes and
/// margin) always add up to `per_employee_total`. The replacement is listed
/// with the additional costs only when it is part of the price.
///
/// # Errors
///
/// Returns `InvalidInput` if the price or the multi-employee total overflows.
pub fn calculate_final_summary(
    interim: &InterimSummary,
    taxes: &Block7Result,
    margin: Option<&MarginResult>,
    mode: VacationReplacementMode,
    employee_count: u32,
    max_employee_count: u32,
    step_number: u32,
) -> EngineResult<FinalSummaryResult> {
    let too_large =
        || EngineError::invalid_input("per_employee_total", "amount is too large to price");

    let (per_employee_total, replacement_priced) = match margin {
        Some(m) => match mode {
            VacationReplacementMode::AddedAtCost => (
                m.invoice_base
                    .checked_add(interim.vacation_replacement)
                    .ok_or_else(too_large)?,
                true,
            ),
            VacationReplacementMode::IncludedInMarginBase => (m.invoice_base, true),
            VacationReplacementMode::ExcludedFromMarginBase => (m.invoice_base, false),
        },
        None => (
            interim
                .block_6_total
                .checked_add(taxes.block_7_total)
                .ok_or_else(too_large)?,
            true,
        ),
    };

    let multi_employee_total = if employee_count > 1 && employee_count <= max_employee_count {
        Some(
            per_employee_total
                .checked_mul(Decimal::from(employee_count))
                .ok_or_else(|| {
                    EngineError::invalid_input(
                        "employee_count",
                        "multi-employee total is too large to price",
                    )
                })?,
        )
    } else {
        None
    };

    let additional_costs = if replacement_priced {
        interim.block_5 + interim.vacation_replacement
    } else {
        interim.block_5
    };

    let summary = FinalSummary {
        gross_salary: interim.gross_salary,
        charges: interim.block_3,
        termination_provision: interim.block_4,
        additional_costs,
        taxes_and_surcharge: taxes.block_7_total,
        margin: margin.map(|m| m.margin_amount).unwrap_or(Decimal::ZERO),
        per_employee_total,
        employee_count,
        multi_employee_total,
    };

    let reasoning = match multi_employee_total {
        Some(total) => format!(
            "{} per employee x {} employees = {}",
            format_currency(per_employee_total),
            employee_count,
            format_currency(total)
        ),
        None if margin.is_some() => format!(
            "Invoice price {} per employee",
            format_currency(per_employee_total)
        ),
        None => format!(
            "No margin solved; block 6 + block 7 = {} per employee",
            format_currency(per_employee_total)
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "final_summary".to_string(),
        rule_name: "Final Summary".to_string(),
        block_ref: "9".to_string(),
        input: serde_json::json!({
            "block_6_total": audit_amount(interim.block_6_total),
            "block_7_total": audit_amount(taxes.block_7_total),
            "invoice_base": margin.map(|m| audit_amount(m.invoice_base)),
            "vacation_replacement_mode": mode.as_str(),
            "employee_count": employee_count
        }),
        output: serde_json::json!({
            "per_employee_total": audit_amount(per_employee_total),
            "multi_employee_total": multi_employee_total.map(audit_amount)
        }),
        reasoning,
    };

    Ok(FinalSummaryResult {
        summary,
        audit_step,
    })
}
