//! Calculation result models for the Outsourcing Cost Engine.
//!
//! This module contains the [`CalculationResult`] type and the per-block records
//! it is composed of, together with the audit trace that explains every stage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AdditionalCost;

/// Block 3.1 and 3.2: thirteenth salary, vacation accruals and social charges.
///
/// Under the simplified regime the seven itemised social charges are zero and
/// `social_charges_active` is false, which tells a form which fields to show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charges {
    /// 13th salary accrual (salary / 12).
    pub thirteenth_salary: Decimal,
    /// One third vacation bonus accrual (salary / 12 / 3).
    pub vacation_third: Decimal,
    /// Proportional vacation accrual (salary / 12).
    pub proportional_vacation: Decimal,
    /// Social security contribution.
    pub inss: Decimal,
    /// Education salary contribution.
    pub education_salary: Decimal,
    /// Work accident insurance.
    pub sat: Decimal,
    /// SESC / SESI contribution.
    pub sesc_sesi: Decimal,
    /// SENAI / SENAC contribution.
    pub senai_senac: Decimal,
    /// SEBRAE contribution.
    pub sebrae: Decimal,
    /// INCRA contribution.
    pub incra: Decimal,
    /// Severance fund deposit (both regimes).
    pub fgts: Decimal,
    /// Salary plus the 3.1 accruals; base of the itemised charges.
    pub social_charge_base: Decimal,
    /// Salary plus the 3.1 accruals; base of FGTS.
    pub fgts_base: Decimal,
    /// Whether the itemised social charges apply to the selected regime.
    pub social_charges_active: bool,
}

/// Block 3.3 inputs: transport and meal benefits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benefits {
    /// Monthly transport cost (daily fare x working days).
    pub transport_monthly_total: Decimal,
    /// Amount deducted from the employee, capped at the transport total.
    pub transport_employee_deduction: Decimal,
    /// True when the cap on the deduction was applied.
    pub transport_deduction_clamped: bool,
    /// Monthly meal allowance (daily rate x working days).
    pub meal_monthly_total: Decimal,
}

/// Block 4.1: termination provisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationProvision {
    /// Indemnified notice accrual.
    pub notice_indemnified: Decimal,
    /// FGTS on the indemnified notice.
    pub fgts_on_notice: Decimal,
    /// FGTS fine on the indemnified notice.
    pub fgts_fine_on_notice: Decimal,
}

/// Block 5: sanitised additional costs and their total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalCostsSummary {
    /// The costs that entered the total, negative amounts already zeroed.
    pub items: Vec<AdditionalCost>,
    /// Sum of the item amounts.
    pub block_5_total: Decimal,
}

/// Submodule and block subtotals for blocks 3 and 4.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtotals {
    /// 13th salary and vacation.
    pub submodule_31: Decimal,
    /// Social charges and FGTS.
    pub submodule_32: Decimal,
    /// Transport and meals, net of the employee deduction.
    pub submodule_33: Decimal,
    /// Total of block 3.
    pub block_3: Decimal,
    /// Indemnified notice provisions.
    pub submodule_41: Decimal,
    /// Total of block 4.
    pub block_4: Decimal,
}

/// Block 6: total per employee before taxes and margin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterimSummary {
    /// Gross salary that entered the total (zero when invalid).
    pub gross_salary: Decimal,
    /// Charges and benefits.
    pub block_3: Decimal,
    /// Termination provisions.
    pub block_4: Decimal,
    /// Additional costs.
    pub block_5: Decimal,
    /// Salary + blocks 3, 4 and 5.
    pub total_before_replacement: Decimal,
    /// Vacation replacement cost, zero unless requested.
    pub vacation_replacement: Decimal,
    /// Total including the vacation replacement.
    pub block_6_total: Decimal,
    /// The amount the margin solver and surcharge are computed on.
    pub margin_base: Decimal,
}

/// Block 8: the solved invoice base, tax and margin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginResult {
    /// Tax rate applied over the invoice base, as a fraction.
    pub effective_tax_rate: Decimal,
    /// Surcharge over the margin base (block 7.1).
    pub additional_surcharge: Decimal,
    /// Margin base plus surcharge.
    pub total_costs: Decimal,
    /// The positive denominator used to solve the invoice base.
    pub denominator: Decimal,
    /// The gross billed amount.
    pub invoice_base: Decimal,
    /// Tax over the invoice base.
    pub tax_amount: Decimal,
    /// Profit margin amount.
    pub margin_amount: Decimal,
    /// Total with margin (equal to the invoice base).
    pub total_with_margin: Decimal,
}

/// Block 7: additional surcharge and regime taxes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block7Result {
    /// Submodule 7.1.
    pub additional_surcharge: Decimal,
    /// PIS over the invoice base.
    pub pis: Decimal,
    /// COFINS over the invoice base.
    pub cofins: Decimal,
    /// ISS over the invoice base.
    pub iss: Decimal,
    /// Simples Nacional tax over the invoice base.
    pub simplified_tax: Decimal,
    /// Submodule 7.2.
    pub tax_total: Decimal,
    /// Total of block 7.
    pub block_7_total: Decimal,
}

/// Block 9: the final price summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalSummary {
    /// Gross salary.
    pub gross_salary: Decimal,
    /// Block 3.
    pub charges: Decimal,
    /// Block 4.
    pub termination_provision: Decimal,
    /// Block 5 plus the vacation replacement.
    pub additional_costs: Decimal,
    /// Block 7.
    pub taxes_and_surcharge: Decimal,
    /// Margin amount, zero when not solved.
    pub margin: Decimal,
    /// Final monthly price for one employee.
    pub per_employee_total: Decimal,
    /// The number of employees priced.
    pub employee_count: u32,
    /// Price for all employees; only present for more than one employee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_employee_total: Option<Decimal>,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the stage rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The cost block or submodule the rule fills (e.g., "3.2").
    pub block_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings record recovered stage errors and advisory checks; they never
/// stop the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of pricing one outsourced employee.
///
/// The result holds no identifiers or timestamps, so computing the same
/// snapshot twice yields equal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Code of the pricing policy the calculation ran under.
    pub policy_code: String,
    /// Block 3.1/3.2, `None` when not computed.
    pub charges: Option<Charges>,
    /// Block 3.3 inputs.
    pub benefits: Benefits,
    /// Block 4, `None` when not computed.
    pub termination_provision: Option<TerminationProvision>,
    /// Block 5.
    pub additional_costs: AdditionalCostsSummary,
    /// Blocks 3 and 4 subtotals.
    pub subtotals: Subtotals,
    /// Block 6.
    pub interim_summary: InterimSummary,
    /// Block 8, `None` when the margin was not solved.
    pub margin: Option<MarginResult>,
    /// Block 7.
    pub taxes: Block7Result,
    /// Block 9.
    pub final_summary: FinalSummary,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl CalculationResult {
    /// Returns true when a warning with the given code was recorded.
    pub fn has_warning(&self, code: &str) -> bool {
        self.audit_trace.warnings.iter().any(|w| w.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_result() -> CalculationResult {
        CalculationResult {
            policy_code: "standard".to_string(),
            charges: None,
            benefits: Benefits::default(),
            termination_provision: None,
            additional_costs: AdditionalCostsSummary::default(),
            subtotals: Subtotals::default(),
            interim_summary: InterimSummary::default(),
            margin: None,
            taxes: Block7Result::default(),
            final_summary: FinalSummary {
                per_employee_total: dec("5000.00"),
                employee_count: 1,
                ..FinalSummary::default()
            },
            audit_trace: AuditTrace {
                steps: vec![],
                warnings: vec![AuditWarning {
                    code: "MISSING_REGIME".to_string(),
                    message: "Tax regime not selected".to_string(),
                    severity: "high".to_string(),
                }],
            },
        }
    }

    #[test]
    fn test_multi_employee_total_skipped_when_absent() {
        let result = create_sample_result();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["final_summary"].get("multi_employee_total").is_none());
        assert_eq!(json["final_summary"]["per_employee_total"], "5000.00");
    }

    #[test]
    fn test_result_round_trips_through_json() {
        let result = create_sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let parsed: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_has_warning() {
        let result = create_sample_result();
        assert!(result.has_warning("MISSING_REGIME"));
        assert!(!result.has_warning("INVALID_INPUT"));
    }

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "charges".to_string(),
            rule_name: "Charges".to_string(),
            block_ref: "3.1/3.2".to_string(),
            input: serde_json::json!({ "gross_salary": "2000" }),
            output: serde_json::json!({ "fgts": "191.11" }),
            reasoning: "test".to_string(),
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["block_ref"], "3.1/3.2");
        assert_eq!(json["input"]["gross_salary"], "2000");
    }
}
