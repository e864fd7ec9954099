//! Margin and tax solver (block 8).
//!
//! Both tax and margin are expressed as shares of the invoice (or, under
//! [`MarginFormula::OnCost`], the margin as a markup on costs), so the invoice
//! base is solved in closed form:
//!
//! ```text
//! on_invoice: invoice = total_costs / (1 - margin - tax)
//! on_cost:    invoice = total_costs * (1 + margin) / (1 - tax)
//! ```
//!
//! Either way `invoice - tax_amount - total_costs == margin_amount`.

use rust_decimal::Decimal;

use crate::config::{MarginFormula, PricingPolicy, ServiceTaxRates};
use crate::error::{EngineError, EngineResult};
use crate::format::{format_currency, format_percent};
use crate::models::{AuditStep, MarginResult, Percent, TaxRegime};

use super::audit_amount;

/// The result of solving the margin, including the record and audit step.
#[derive(Debug, Clone)]
pub struct MarginSolverResult {
    /// The solved invoice base, tax and margin.
    pub margin: MarginResult,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the tax rate applied over the invoice base, as a fraction.
///
/// The simplified regime uses the rate the user supplied; the presumed/real
/// regime uses PIS + COFINS + ISS from the rate table.
///
/// # Errors
///
/// Returns `InvalidInput` if the regime is simplified and no rate was given.
///
/// # Examples
///
/// ```
/// use outsourcing_cost_engine::calculation::effective_tax_rate;
/// use outsourcing_cost_engine::config::PricingPolicy;
/// use outsourcing_cost_engine::models::TaxRegime;
/// use rust_decimal::Decimal;
///
/// let policy = PricingPolicy::default();
/// let rate = effective_tax_rate(
///     TaxRegime::PresumedOrRealProfit,
///     None,
///     &policy.rates().service_taxes,
/// )
/// .unwrap();
/// assert_eq!(rate, Decimal::new(83, 3));
/// ```
pub fn effective_tax_rate(
    regime: TaxRegime,
    simplified_tax_rate: Option<Percent>,
    rates: &ServiceTaxRates,
) -> EngineResult<Decimal> {
    match regime {
        TaxRegime::Simplified => simplified_tax_rate
            .map(Percent::fraction)
            .ok_or_else(|| {
                EngineError::invalid_input(
                    "simplified_tax_rate",
                    "required for the simplified regime",
                )
            }),
        TaxRegime::PresumedOrRealProfit => Ok(rates.composite()),
    }
}

/// Returns the denominator the invoice base is solved with.
pub fn margin_denominator(margin: Decimal, tax_rate: Decimal, formula: MarginFormula) -> Decimal {
    match formula {
        MarginFormula::OnInvoice => Decimal::ONE - margin - tax_rate,
        MarginFormula::OnCost => Decimal::ONE - tax_rate,
    }
}

/// Checks that a margin and regime leave a strictly positive denominator.
///
/// # Errors
///
/// - `InvalidMarginConfiguration` if the denominator is zero or negative
/// - `InvalidInput` if the regime is simplified and no rate was given
///
/// # Examples
///
/// ```
/// use outsourcing_cost_engine::calculation::validate_margin_configuration;
/// use outsourcing_cost_engine::config::PricingPolicy;
/// use outsourcing_cost_engine::models::{Percent, TaxRegime};
/// use rust_decimal::Decimal;
///
/// let policy = PricingPolicy::default();
/// let margin = Percent::new("margin_percent", Decimal::from(95)).unwrap();
/// let result =
///     validate_margin_configuration(margin, TaxRegime::PresumedOrRealProfit, None, &policy);
/// assert!(result.is_err());
/// ```
pub fn validate_margin_configuration(
    margin_percent: Percent,
    regime: TaxRegime,
    simplified_tax_rate: Option<Percent>,
    policy: &PricingPolicy,
) -> EngineResult<()> {
    let tax_rate = effective_tax_rate(regime, simplified_tax_rate, &policy.rates().service_taxes)?;
    let denominator = margin_denominator(
        margin_percent.fraction(),
        tax_rate,
        policy.options().margin_formula,
    );

    if denominator <= Decimal::ZERO {
        return Err(EngineError::InvalidMarginConfiguration {
            margin_percent: margin_percent.points(),
            tax_rate,
            denominator,
        });
    }

    Ok(())
}

/// Solves the invoice base, tax and margin over the margin base.
///
/// The additional surcharge is applied to `margin_base` before solving, so the
/// total costs the invoice must cover are `margin_base * (1 + surcharge)`.
///
/// # Errors
///
/// - `InvalidInput` if the regime is simplified and no rate was given
/// - `InvalidInput` if the invoice base overflows
/// - `InvalidMarginConfiguration` if the denominator is not positive
pub fn solve_margin(
    margin_base: Decimal,
    additional_cost_percent: Percent,
    margin_percent: Percent,
    regime: TaxRegime,
    simplified_tax_rate: Option<Percent>,
    policy: &PricingPolicy,
    step_number: u32,
) -> EngineResult<MarginSolverResult> {
    let formula = policy.options().margin_formula;
    let effective_tax_rate =
        effective_tax_rate(regime, simplified_tax_rate, &policy.rates().service_taxes)?;
    let margin = margin_percent.fraction();

    let denominator = margin_denominator(margin, effective_tax_rate, formula);
    if denominator <= Decimal::ZERO {
        return Err(EngineError::InvalidMarginConfiguration {
            margin_percent: margin_percent.points(),
            tax_rate: effective_tax_rate,
            denominator,
        });
    }

    let too_large = || EngineError::invalid_input("margin_base", "amount is too large to price");

    let additional_surcharge = margin_base
        .checked_mul(additional_cost_percent.fraction())
        .ok_or_else(too_large)?;
    let total_costs = margin_base
        .checked_add(additional_surcharge)
        .ok_or_else(too_large)?;

    let (invoice_base, margin_amount) = match formula {
        MarginFormula::OnInvoice => {
            let invoice_base = total_costs.checked_div(denominator).ok_or_else(too_large)?;
            let margin_amount = invoice_base.checked_mul(margin).ok_or_else(too_large)?;
            (invoice_base, margin_amount)
        }
        MarginFormula::OnCost => {
            let invoice_base = total_costs
                .checked_mul(Decimal::ONE + margin)
                .and_then(|marked_up| marked_up.checked_div(denominator))
                .ok_or_else(too_large)?;
            let margin_amount = total_costs.checked_mul(margin).ok_or_else(too_large)?;
            (invoice_base, margin_amount)
        }
    };
    let tax_amount = invoice_base
        .checked_mul(effective_tax_rate)
        .ok_or_else(too_large)?;

    let result = MarginResult {
        effective_tax_rate,
        additional_surcharge,
        total_costs,
        denominator,
        invoice_base,
        tax_amount,
        margin_amount,
        total_with_margin: invoice_base,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "margin_solver".to_string(),
        rule_name: "Margin and Tax Solver".to_string(),
        block_ref: "8".to_string(),
        input: serde_json::json!({
            "margin_base": audit_amount(margin_base),
            "additional_cost_percent": additional_cost_percent.points().to_string(),
            "margin_percent": margin_percent.points().to_string(),
            "tax_regime": regime.as_str(),
            "margin_formula": formula.as_str()
        }),
        output: serde_json::json!({
            "effective_tax_rate": effective_tax_rate.to_string(),
            "additional_surcharge": audit_amount(additional_surcharge),
            "total_costs": audit_amount(total_costs),
            "denominator": denominator.to_string(),
            "invoice_base": audit_amount(invoice_base),
            "tax_amount": audit_amount(tax_amount),
            "margin_amount": audit_amount(margin_amount)
        }),
        reasoning: format!(
            "Costs {} over denominator {} ({} margin, {} tax, {}) = invoice {}; tax {}, margin {}",
            format_currency(total_costs),
            denominator,
            format_percent(margin_percent.points()),
            format_percent(effective_tax_rate * Decimal::from(100)),
            formula.as_str(),
            format_currency(invoice_base),
            format_currency(tax_amount),
            format_currency(margin_amount)
        ),
    };

    Ok(MarginSolverResult {
        margin: result,
        audit_step,
    })
}
