//! Submodule and block subtotals for blocks 3 and 4.

use rust_decimal::Decimal;

use crate::format::format_currency;
use crate::models::{AuditStep, Benefits, Charges, Subtotals, TerminationProvision};

use super::audit_amount;

/// The result of the subtotal aggregation.
#[derive(Debug, Clone)]
pub struct SubtotalsResult {
    /// The computed subtotals.
    pub subtotals: Subtotals,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Aggregates submodules 3.1, 3.2, 3.3 and 4.1 into blocks 3 and 4.
///
/// Stages that were not computed contribute zero.
pub fn calculate_subtotals(
    charges: Option<&Charges>,
    benefits: &Benefits,
    provision: Option<&TerminationProvision>,
    step_number: u32,
) -> SubtotalsResult {
    let (submodule_31, submodule_32) = match charges {
        Some(c) => (
            c.thirteenth_salary + c.vacation_third + c.proportional_vacation,
            c.inss
                + c.fgts
                + c.education_salary
                + c.sat
                + c.sesc_sesi
                + c.senai_senac
                + c.sebrae
                + c.incra,
        ),
        None => (Decimal::ZERO, Decimal::ZERO),
    };

    let submodule_33 = benefits.transport_monthly_total + benefits.meal_monthly_total
        - benefits.transport_employee_deduction;
    let block_3 = submodule_31 + submodule_32 + submodule_33;

    let submodule_41 = provision
        .map(|p| p.notice_indemnified + p.fgts_on_notice + p.fgts_fine_on_notice)
        .unwrap_or(Decimal::ZERO);
    let block_4 = submodule_41;

    let subtotals = Subtotals {
        submodule_31,
        submodule_32,
        submodule_33,
        block_3,
        submodule_41,
        block_4,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "subtotals".to_string(),
        rule_name: "Block 3 and 4 Subtotals".to_string(),
        block_ref: "3/4".to_string(),
        input: serde_json::json!({
            "charges_computed": charges.is_some(),
            "termination_provision_computed": provision.is_some()
        }),
        output: serde_json::json!({
            "submodule_31": audit_amount(submodule_31),
            "submodule_32": audit_amount(submodule_32),
            "submodule_33": audit_amount(submodule_33),
            "block_3": audit_amount(block_3),
            "submodule_41": audit_amount(submodule_41),
            "block_4": audit_amount(block_4)
        }),
        reasoning: format!(
            "Block 3 = {} + {} + {} = {}; block 4 = {}",
            format_currency(submodule_31),
            format_currency(submodule_32),
            format_currency(submodule_33),
            format_currency(block_3),
            format_currency(block_4)
        ),
    };

    SubtotalsResult {
        subtotals,
        audit_step,
    }
}
