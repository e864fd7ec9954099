//! Interim summary (block 6) with the optional vacation replacement.

use rust_decimal::Decimal;

use crate::config::VacationReplacementMode;
use crate::format::format_currency;
use crate::models::{AuditStep, InterimSummary, Subtotals};

use super::audit_amount;

/// The result of the interim summary calculation.
#[derive(Debug, Clone)]
pub struct InterimSummaryResult {
    /// The computed block 6 summary.
    pub summary: InterimSummary,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Totals salary and blocks 3 to 5, then adds the vacation replacement.
///
/// The replacement is one twelfth of the total before replacement, and only
/// when `replace_vacation` is set and that total is positive. The mode decides
/// whether the replacement joins the margin base.
///
/// `gross_salary` is the salary that entered the charge stages: callers pass
/// zero when the salary was rejected.
pub fn calculate_interim_summary(
    gross_salary: Decimal,
    subtotals: &Subtotals,
    block_5_total: Decimal,
    replace_vacation: bool,
    mode: VacationReplacementMode,
    step_number: u32,
) -> InterimSummaryResult {
    let total_before_replacement =
        gross_salary + subtotals.block_3 + subtotals.block_4 + block_5_total;

    let vacation_replacement = if replace_vacation && total_before_replacement > Decimal::ZERO {
        total_before_replacement / Decimal::from(12)
    } else {
        Decimal::ZERO
    };

    let block_6_total = total_before_replacement + vacation_replacement;
    let margin_base = match mode {
        VacationReplacementMode::ExcludedFromMarginBase | VacationReplacementMode::AddedAtCost => {
            total_before_replacement
        }
        VacationReplacementMode::IncludedInMarginBase => block_6_total,
    };

    let summary = InterimSummary {
        gross_salary,
        block_3: subtotals.block_3,
        block_4: subtotals.block_4,
        block_5: block_5_total,
        total_before_replacement,
        vacation_replacement,
        block_6_total,
        margin_base,
    };

    let reasoning = if vacation_replacement.is_zero() {
        format!(
            "Salary + blocks 3, 4 and 5 = {}; no vacation replacement",
            format_currency(block_6_total)
        )
    } else {
        format!(
            "Salary + blocks 3, 4 and 5 = {}; vacation replacement {} (1/12); margin base {}",
            format_currency(total_before_replacement),
            format_currency(vacation_replacement),
            format_currency(margin_base)
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "interim_summary".to_string(),
        rule_name: "Total Before Taxes and Margin".to_string(),
        block_ref: "6".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.to_string(),
            "block_3": audit_amount(subtotals.block_3),
            "block_4": audit_amount(subtotals.block_4),
            "block_5": audit_amount(block_5_total),
            "replace_vacation": replace_vacation,
            "vacation_replacement_mode": mode.as_str()
        }),
        output: serde_json::json!({
            "total_before_replacement": audit_amount(total_before_replacement),
            "vacation_replacement": audit_amount(vacation_replacement),
            "block_6_total": audit_amount(block_6_total),
            "margin_base": audit_amount(margin_base)
        }),
        reasoning,
    };

    InterimSummaryResult {
        summary,
        audit_step,
    }
}
