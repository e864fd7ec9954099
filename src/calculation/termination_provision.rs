//! Termination provision calculation (block 4.1).

use rust_decimal::Decimal;

use crate::config::TerminationRates;
use crate::error::{EngineError, EngineResult};
use crate::format::format_currency;
use crate::models::{AuditStep, TaxRegime, TerminationProvision};

use super::audit_amount;

/// The result of the termination provision calculation.
#[derive(Debug, Clone)]
pub struct TerminationProvisionResult {
    /// The computed provisions.
    pub provision: TerminationProvision,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the monthly provision for an indemnified notice.
///
/// The notice accrues at `salary / 12`. FGTS on the notice is applied to the
/// salary, and the FGTS fine is a share of that FGTS amount.
///
/// # Errors
///
/// - `MissingRegime` if no regime is selected
/// - `InvalidInput` if `gross_salary` is not positive
pub fn calculate_termination_provision(
    gross_salary: Decimal,
    regime: Option<TaxRegime>,
    rates: &TerminationRates,
    step_number: u32,
) -> EngineResult<TerminationProvisionResult> {
    let regime = regime.ok_or(EngineError::MissingRegime)?;
    if gross_salary <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "gross_salary",
            "must be greater than zero",
        ));
    }

    let notice_indemnified = gross_salary / Decimal::from(12);
    let fgts_on_notice = gross_salary * rates.fgts_on_notice;
    let fgts_fine_on_notice = fgts_on_notice * rates.fgts_fine;
    let total = notice_indemnified + fgts_on_notice + fgts_fine_on_notice;

    let provision = TerminationProvision {
        notice_indemnified,
        fgts_on_notice,
        fgts_fine_on_notice,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "termination_provision".to_string(),
        rule_name: "Indemnified Notice Provision".to_string(),
        block_ref: "4.1".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.to_string(),
            "tax_regime": regime.as_str(),
            "fgts_on_notice_rate": rates.fgts_on_notice.to_string(),
            "fgts_fine_rate": rates.fgts_fine.to_string()
        }),
        output: serde_json::json!({
            "notice_indemnified": audit_amount(notice_indemnified),
            "fgts_on_notice": audit_amount(fgts_on_notice),
            "fgts_fine_on_notice": audit_amount(fgts_fine_on_notice),
            "submodule_41": audit_amount(total)
        }),
        reasoning: format!(
            "Notice {} + FGTS on notice {} + FGTS fine {} = {}",
            format_currency(notice_indemnified),
            format_currency(fgts_on_notice),
            format_currency(fgts_fine_on_notice),
            format_currency(total)
        ),
    };

    Ok(TerminationProvisionResult {
        provision,
        audit_step,
    })
}
