//! Transport and meal benefit calculation (block 3.3 inputs).

use rust_decimal::Decimal;

use crate::config::BenefitRates;
use crate::format::format_currency;
use crate::models::{AuditStep, Benefits};

use super::audit_amount;

/// The result of the benefits calculation, including the record and audit step.
#[derive(Debug, Clone)]
pub struct BenefitsResult {
    /// The computed benefits.
    pub benefits: Benefits,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates monthly transport and meal costs from daily rates.
///
/// The employee's transport deduction is a share of the salary, capped at the
/// monthly transport total; `transport_deduction_clamped` records when the cap
/// binds. Negative rates and a non-positive salary count as zero, so this stage
/// never fails.
///
/// # Examples
///
/// ```
/// use outsourcing_cost_engine::calculation::calculate_benefits;
/// use outsourcing_cost_engine::config::PricingPolicy;
/// use rust_decimal::Decimal;
///
/// let policy = PricingPolicy::default();
/// let result = calculate_benefits(
///     Decimal::from(2),
///     Decimal::ZERO,
///     Decimal::from(5000),
///     &policy.rates().benefits,
///     2,
/// );
/// assert_eq!(result.benefits.transport_employee_deduction, Decimal::from(46));
/// assert!(result.benefits.transport_deduction_clamped);
/// ```
pub fn calculate_benefits(
    daily_transport_fare: Decimal,
    daily_meal_allowance: Decimal,
    gross_salary: Decimal,
    rates: &BenefitRates,
    step_number: u32,
) -> BenefitsResult {
    let days = Decimal::from(rates.working_days_per_month);
    let fare = daily_transport_fare.max(Decimal::ZERO);
    let meal = daily_meal_allowance.max(Decimal::ZERO);
    let salary = gross_salary.max(Decimal::ZERO);

    let transport_monthly_total = fare * days;
    let uncapped_deduction = salary * rates.transport_deduction_rate;

    // Apply the cap
    let (transport_employee_deduction, transport_deduction_clamped) =
        if uncapped_deduction > transport_monthly_total {
            (transport_monthly_total, true)
        } else {
            (uncapped_deduction, false)
        };

    let meal_monthly_total = meal * days;

    let benefits = Benefits {
        transport_monthly_total,
        transport_employee_deduction,
        transport_deduction_clamped,
        meal_monthly_total,
    };

    let reasoning = if transport_deduction_clamped {
        format!(
            "Transport {} x {} days = {}; employee deduction {} capped at the transport total; meals {}",
            format_currency(fare),
            rates.working_days_per_month,
            format_currency(transport_monthly_total),
            format_currency(uncapped_deduction),
            format_currency(meal_monthly_total)
        )
    } else {
        format!(
            "Transport {} x {} days = {}; employee deduction {}; meals {}",
            format_currency(fare),
            rates.working_days_per_month,
            format_currency(transport_monthly_total),
            format_currency(transport_employee_deduction),
            format_currency(meal_monthly_total)
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "benefits".to_string(),
        rule_name: "Transport and Meal Benefits".to_string(),
        block_ref: "3.3".to_string(),
        input: serde_json::json!({
            "daily_transport_fare": daily_transport_fare.to_string(),
            "daily_meal_allowance": daily_meal_allowance.to_string(),
            "gross_salary": gross_salary.to_string(),
            "working_days": rates.working_days_per_month
        }),
        output: serde_json::json!({
            "transport_monthly_total": audit_amount(transport_monthly_total),
            "transport_employee_deduction": audit_amount(transport_employee_deduction),
            "transport_deduction_clamped": transport_deduction_clamped,
            "meal_monthly_total": audit_amount(meal_monthly_total)
        }),
        reasoning,
    };

    BenefitsResult {
        benefits,
        audit_step,
    }
}
