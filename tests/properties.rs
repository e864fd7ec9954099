use proptest::prelude::*;
use rust_decimal::Decimal;

use outsourcing_cost_engine::calculation::{calculate_benefits, compute, solve_margin};
use outsourcing_cost_engine::config::{
    MarginFormula, PolicyOptions, PricingPolicy, VacationReplacementMode,
};
use outsourcing_cost_engine::models::{InputSnapshot, Percent, TaxRegime};

/// Property-based tests for the pricing pipeline
///
/// Validates:
/// - invoice_base - tax_amount - total_costs == margin_amount (both formulas)
/// - A higher margin yields a higher invoice and margin
/// - The transport deduction never exceeds the transport total
/// - compute is idempotent
/// - Summary lines add up to the per-employee total
/// - Oversized amounts are rejected, never priced into an overflow

fn percent(points: u32) -> Percent {
    Percent::new("margin_percent", Decimal::from(points)).unwrap()
}

fn money(cents: u64) -> Decimal {
    Decimal::new(cents as i64, 2)
}

fn regime(simplified: bool) -> TaxRegime {
    if simplified {
        TaxRegime::Simplified
    } else {
        TaxRegime::PresumedOrRealProfit
    }
}

fn policy(on_cost: bool, mode: usize) -> PricingPolicy {
    PricingPolicy::default().with_options(PolicyOptions {
        margin_formula: if on_cost {
            MarginFormula::OnCost
        } else {
            MarginFormula::OnInvoice
        },
        vacation_replacement: [
            VacationReplacementMode::ExcludedFromMarginBase,
            VacationReplacementMode::IncludedInMarginBase,
            VacationReplacementMode::AddedAtCost,
        ][mode],
    })
}

proptest! {
    #[test]
    fn test_closed_loop_holds(
        base_cents in 100u64..5_000_000u64,
        surcharge in 0u32..30u32,
        margin in 0u32..60u32,
        simplified_rate in 1u32..20u32,
        simplified in any::<bool>(),
        on_cost in any::<bool>(),
    ) {
        let solved = solve_margin(
            money(base_cents),
            percent(surcharge),
            percent(margin),
            regime(simplified),
            Some(percent(simplified_rate)),
            &policy(on_cost, 0),
            1,
        )
        .unwrap()
        .margin;

        let gap = (solved.invoice_base - solved.tax_amount - solved.total_costs
            - solved.margin_amount)
            .abs();
        prop_assert!(gap < Decimal::new(1, 2), "closed loop gap {}", gap);
        prop_assert!(solved.denominator > Decimal::ZERO);
    }

    #[test]
    fn test_higher_margin_increases_invoice(
        base_cents in 100u64..5_000_000u64,
        low in 0u32..80u32,
        step in 1u32..10u32,
        on_cost in any::<bool>(),
    ) {
        let run = |margin: u32| {
            solve_margin(
                money(base_cents),
                Percent::ZERO,
                percent(margin),
                TaxRegime::PresumedOrRealProfit,
                None,
                &policy(on_cost, 0),
                1,
            )
            .unwrap()
            .margin
        };

        let lower = run(low);
        let higher = run(low + step);
        prop_assert!(higher.invoice_base > lower.invoice_base);
        prop_assert!(higher.margin_amount > lower.margin_amount);
    }

    #[test]
    fn test_transport_deduction_capped(
        fare_cents in 0u64..10_000u64,
        salary_cents in 0u64..10_000_000u64,
    ) {
        let policy = PricingPolicy::default();
        let benefits = calculate_benefits(
            money(fare_cents),
            Decimal::ZERO,
            money(salary_cents),
            &policy.rates().benefits,
            1,
        )
        .benefits;

        prop_assert!(benefits.transport_employee_deduction <= benefits.transport_monthly_total);
        prop_assert!(benefits.transport_employee_deduction >= Decimal::ZERO);
    }

    #[test]
    fn test_compute_idempotent_and_lines_add_up(
        salary_cents in 150_000u64..3_000_000u64,
        fare_cents in 0u64..2_000u64,
        meal_cents in 0u64..5_000u64,
        surcharge in 0u32..20u32,
        margin in 0u32..50u32,
        simplified in any::<bool>(),
        replace_vacation in any::<bool>(),
        on_cost in any::<bool>(),
        mode in 0usize..3,
    ) {
        let inputs = InputSnapshot {
            gross_salary: money(salary_cents),
            tax_regime: Some(regime(simplified)),
            daily_transport_fare: money(fare_cents),
            daily_meal_allowance: money(meal_cents),
            additional_cost_percent: percent(surcharge),
            margin_percent: Some(percent(margin)),
            simplified_tax_rate: Some(percent(6)),
            replace_vacation,
            ..InputSnapshot::default()
        };
        let policy = policy(on_cost, mode);

        let first = compute(&inputs, &policy).unwrap();
        let second = compute(&inputs, &policy).unwrap();
        prop_assert_eq!(&first, &second);

        let s = &first.final_summary;
        let lines = s.gross_salary
            + s.charges
            + s.termination_provision
            + s.additional_costs
            + s.taxes_and_surcharge
            + s.margin;
        prop_assert!((lines - s.per_employee_total).abs() < Decimal::new(1, 2));
    }

    #[test]
    fn test_oversized_amounts_are_rejected(
        digits in 1usize..29,
        margin in 0u32..91,
        employee_count in 1u32..1000,
        on_cost in any::<bool>(),
    ) {
        let salary: Decimal = "9".repeat(digits).parse().unwrap();
        let inputs = InputSnapshot {
            gross_salary: salary,
            tax_regime: Some(TaxRegime::PresumedOrRealProfit),
            additional_cost_percent: percent(10),
            margin_percent: Some(percent(margin)),
            employee_count,
            replace_vacation: true,
            ..InputSnapshot::default()
        };
        let policy = policy(on_cost, 2);

        let result = compute(&inputs, &policy);
        if salary > policy.limits().max_amount {
            prop_assert!(result.is_err());
        } else {
            prop_assert!(result.is_ok());
        }
    }
}
