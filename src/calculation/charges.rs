//! Charges calculation functionality (blocks 3.1 and 3.2).
//!
//! This module derives the 13th salary and vacation accruals, the itemised
//! employer social charges of the presumed/real profit regime, and FGTS.

use rust_decimal::Decimal;

use crate::config::ChargeRates;
use crate::error::{EngineError, EngineResult};
use crate::format::{format_currency, format_percent};
use crate::models::{AuditStep, Charges, TaxRegime};

use super::audit_amount;

/// The result of the charges calculation, including the record and audit step.
#[derive(Debug, Clone)]
pub struct ChargesResult {
    /// The computed charges.
    pub charges: Charges,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the 13th salary, vacation accruals, social charges and FGTS.
///
/// The accruals are `salary / 12` (13th), `salary / 12 / 3` (vacation third)
/// and `salary / 12` (proportional vacation). Their sum plus the salary forms
/// the base of every charge. FGTS applies under both regimes; the seven
/// itemised social charges apply only to [`TaxRegime::PresumedOrRealProfit`]
/// and are zero otherwise.
///
/// # Errors
///
/// - `InvalidInput` if `gross_salary` is not positive
/// - `MissingRegime` if no regime is selected
///
/// # Examples
///
/// ```
/// use outsourcing_cost_engine::calculation::calculate_charges;
/// use outsourcing_cost_engine::config::PricingPolicy;
/// use outsourcing_cost_engine::models::TaxRegime;
/// use rust_decimal::Decimal;
///
/// let policy = PricingPolicy::default();
/// let result = calculate_charges(
///     Decimal::from(2000),
///     Some(TaxRegime::PresumedOrRealProfit),
///     &policy.rates().charges,
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.charges.fgts.round_dp(2), Decimal::new(19111, 2));
/// ```
pub fn calculate_charges(
    gross_salary: Decimal,
    regime: Option<TaxRegime>,
    rates: &ChargeRates,
    step_number: u32,
) -> EngineResult<ChargesResult> {
    if gross_salary <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "gross_salary",
            "must be greater than zero",
        ));
    }
    let regime = regime.ok_or(EngineError::MissingRegime)?;

    let twelve = Decimal::from(12);
    let thirteenth_salary = gross_salary / twelve;
    let vacation_third = gross_salary / twelve / Decimal::from(3);
    let proportional_vacation = gross_salary / twelve;
    let item_31_total = thirteenth_salary + vacation_third + proportional_vacation;

    let base = gross_salary + item_31_total;
    let fgts = base * rates.fgts;
    let social_charges_active = !regime.is_simplified();

    let social = |rate: Decimal| {
        if social_charges_active {
            base * rate
        } else {
            Decimal::ZERO
        }
    };

    let charges = Charges {
        thirteenth_salary,
        vacation_third,
        proportional_vacation,
        inss: social(rates.inss),
        education_salary: social(rates.education_salary),
        sat: social(rates.sat),
        sesc_sesi: social(rates.sesc_sesi),
        senai_senac: social(rates.senai_senac),
        sebrae: social(rates.sebrae),
        incra: social(rates.incra),
        fgts,
        social_charge_base: base,
        fgts_base: base,
        social_charges_active,
    };

    let social_total = charges.inss
        + charges.education_salary
        + charges.sat
        + charges.sesc_sesi
        + charges.senai_senac
        + charges.sebrae
        + charges.incra;

    let reasoning = if social_charges_active {
        format!(
            "Base {} (salary {} + accruals {}): social charges {} ({} of base) + FGTS {}",
            format_currency(base),
            format_currency(gross_salary),
            format_currency(item_31_total),
            format_currency(social_total),
            format_percent(share_of(social_total, base)),
            format_currency(fgts)
        )
    } else {
        format!(
            "{}: itemised social charges do not apply; FGTS {} over base {}",
            regime.label(),
            format_currency(fgts),
            format_currency(base)
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "charges".to_string(),
        rule_name: "13th Salary, Vacation and Social Charges".to_string(),
        block_ref: "3.1/3.2".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.to_string(),
            "tax_regime": regime.as_str()
        }),
        output: serde_json::json!({
            "thirteenth_salary": audit_amount(charges.thirteenth_salary),
            "vacation_third": audit_amount(charges.vacation_third),
            "proportional_vacation": audit_amount(charges.proportional_vacation),
            "inss": audit_amount(charges.inss),
            "education_salary": audit_amount(charges.education_salary),
            "sat": audit_amount(charges.sat),
            "sesc_sesi": audit_amount(charges.sesc_sesi),
            "senai_senac": audit_amount(charges.senai_senac),
            "sebrae": audit_amount(charges.sebrae),
            "incra": audit_amount(charges.incra),
            "fgts": audit_amount(charges.fgts),
            "base": audit_amount(base),
            "fgts_share_of_base": format_percent(share_of(fgts, base)),
            "social_charges_active": social_charges_active
        }),
        reasoning,
    };

    Ok(ChargesResult {
        charges,
        audit_step,
    })
}

/// Returns `value` as percentage points of `base`.
fn share_of(value: Decimal, base: Decimal) -> Decimal {
    if base.is_zero() {
        Decimal::ZERO
    } else {
        value / base * Decimal::from(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PricingPolicy;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rates() -> ChargeRates {
        PricingPolicy::default().rates().charges.clone()
    }

    /// CH-001: accruals and FGTS for a 2000.00 salary
    #[test]
    fn test_accruals_and_fgts_for_2000() {
        let result = calculate_charges(
            dec("2000.00"),
            Some(TaxRegime::PresumedOrRealProfit),
            &rates(),
            1,
        )
        .unwrap();
        let charges = result.charges;

        assert_eq!(charges.thirteenth_salary.round_dp(2), dec("166.67"));
        assert_eq!(charges.vacation_third.round_dp(2), dec("55.56"));
        assert_eq!(charges.proportional_vacation.round_dp(2), dec("166.67"));
        assert_eq!(charges.fgts_base.round_dp(2), dec("2388.89"));
        assert_eq!(charges.fgts.round_dp(2), dec("191.11"));
    }

    /// CH-002: presumed regime itemises every social charge
    #[test]
    fn test_presumed_regime_social_charges() {
        let result = calculate_charges(
            dec("2000.00"),
            Some(TaxRegime::PresumedOrRealProfit),
            &rates(),
            1,
        )
        .unwrap();
        let charges = result.charges;

        assert!(charges.social_charges_active);
        assert_eq!(charges.inss.round_dp(2), dec("477.78"));
        assert_eq!(charges.education_salary.round_dp(2), dec("59.72"));
        assert_eq!(charges.sat.round_dp(2), dec("56.62"));
        assert_eq!(charges.sesc_sesi.round_dp(2), dec("35.83"));
        assert_eq!(charges.senai_senac.round_dp(2), dec("23.89"));
        assert_eq!(charges.sebrae.round_dp(2), dec("14.33"));
        assert_eq!(charges.incra.round_dp(2), dec("4.78"));
    }

    /// CH-003: simplified regime zeroes social charges but keeps FGTS
    #[test]
    fn test_simplified_regime_zeroes_social_charges() {
        let result =
            calculate_charges(dec("2000.00"), Some(TaxRegime::Simplified), &rates(), 1).unwrap();
        let charges = result.charges;

        assert!(!charges.social_charges_active);
        assert_eq!(charges.inss, Decimal::ZERO);
        assert_eq!(charges.education_salary, Decimal::ZERO);
        assert_eq!(charges.sat, Decimal::ZERO);
        assert_eq!(charges.sesc_sesi, Decimal::ZERO);
        assert_eq!(charges.senai_senac, Decimal::ZERO);
        assert_eq!(charges.sebrae, Decimal::ZERO);
        assert_eq!(charges.incra, Decimal::ZERO);
        assert_eq!(charges.fgts.round_dp(2), dec("191.11"));
        assert!(result.audit_step.reasoning.contains("Simples Nacional"));
    }

    /// CH-004: non-positive salary is rejected
    #[test]
    fn test_zero_salary_returns_invalid_input() {
        let result = calculate_charges(
            Decimal::ZERO,
            Some(TaxRegime::PresumedOrRealProfit),
            &rates(),
            1,
        );
        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "gross_salary"),
            other => panic!("Expected InvalidInput, got {:?}", other.map(|r| r.charges)),
        }
        assert!(calculate_charges(dec("-1"), Some(TaxRegime::Simplified), &rates(), 1).is_err());
    }

    /// CH-005: missing regime short-circuits
    #[test]
    fn test_missing_regime_returns_error() {
        let result = calculate_charges(dec("2000.00"), None, &rates(), 1);
        assert!(matches!(result, Err(EngineError::MissingRegime)));
    }

    #[test]
    fn test_audit_step_records_inputs_and_outputs() {
        let result = calculate_charges(
            dec("2000.00"),
            Some(TaxRegime::PresumedOrRealProfit),
            &rates(),
            4,
        )
        .unwrap();
        let step = result.audit_step;

        assert_eq!(step.step_number, 4);
        assert_eq!(step.rule_id, "charges");
        assert_eq!(step.block_ref, "3.1/3.2");
        assert_eq!(step.input["tax_regime"], "presumed_or_real_profit");
        assert_eq!(step.output["fgts"], "191.11");
        assert_eq!(step.output["fgts_share_of_base"], "8,00%");
        assert!(step.reasoning.contains("R$ 2.388,89"));
    }
}
