//! Additional surcharge and regime taxes (block 7).

use rust_decimal::Decimal;

use crate::config::ServiceTaxRates;
use crate::format::format_currency;
use crate::models::{AuditStep, Block7Result, MarginResult, Percent, TaxRegime};

use super::audit_amount;

/// The result of the block 7 calculation.
#[derive(Debug, Clone)]
pub struct TaxesResult {
    /// The computed surcharge and taxes.
    pub taxes: Block7Result,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Itemises the surcharge and the regime taxes over the solved invoice base.
///
/// The surcharge is taken from the solver when it ran, otherwise it is
/// `margin_base * additional_cost_percent`. Without a solved invoice base every
/// tax is zero. The simplified regime pays one blended rate; the presumed/real
/// regime pays PIS, COFINS and ISS.
pub fn calculate_taxes(
    margin_base: Decimal,
    additional_cost_percent: Percent,
    margin: Option<&MarginResult>,
    regime: Option<TaxRegime>,
    rates: &ServiceTaxRates,
    step_number: u32,
) -> TaxesResult {
    let additional_surcharge = match margin {
        Some(m) => m.additional_surcharge,
        None => margin_base.max(Decimal::ZERO) * additional_cost_percent.fraction(),
    };

    let mut taxes = Block7Result {
        additional_surcharge,
        ..Block7Result::default()
    };

    match (margin, regime) {
        (Some(m), Some(TaxRegime::Simplified)) => {
            taxes.simplified_tax = m.invoice_base * m.effective_tax_rate;
        }
        (Some(m), Some(TaxRegime::PresumedOrRealProfit)) => {
            taxes.pis = m.invoice_base * rates.pis;
            taxes.cofins = m.invoice_base * rates.cofins;
            taxes.iss = m.invoice_base * rates.iss;
        }
        _ => {}
    }
    let invoice_base = margin.map(|m| m.invoice_base);

    taxes.tax_total = taxes.pis + taxes.cofins + taxes.iss + taxes.simplified_tax;
    taxes.block_7_total = taxes.additional_surcharge + taxes.tax_total;

    let reasoning = match invoice_base {
        Some(invoice) => format!(
            "Surcharge {} + taxes {} over invoice {} = {}",
            format_currency(taxes.additional_surcharge),
            format_currency(taxes.tax_total),
            format_currency(invoice),
            format_currency(taxes.block_7_total)
        ),
        None => format!(
            "No invoice base; surcharge {} only",
            format_currency(taxes.additional_surcharge)
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "taxes".to_string(),
        rule_name: "Surcharge and Regime Taxes".to_string(),
        block_ref: "7".to_string(),
        input: serde_json::json!({
            "margin_base": audit_amount(margin_base),
            "additional_cost_percent": additional_cost_percent.points().to_string(),
            "invoice_base": invoice_base.map(audit_amount),
            "tax_regime": regime.map(|r| r.as_str())
        }),
        output: serde_json::json!({
            "additional_surcharge": audit_amount(taxes.additional_surcharge),
            "pis": audit_amount(taxes.pis),
            "cofins": audit_amount(taxes.cofins),
            "iss": audit_amount(taxes.iss),
            "simplified_tax": audit_amount(taxes.simplified_tax),
            "tax_total": audit_amount(taxes.tax_total),
            "block_7_total": audit_amount(taxes.block_7_total)
        }),
        reasoning,
    };

    TaxesResult { taxes, audit_step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PricingPolicy;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn pct(points: &str) -> Percent {
        Percent::new("test", dec(points)).unwrap()
    }

    fn rates() -> ServiceTaxRates {
        PricingPolicy::default().rates().service_taxes.clone()
    }

    fn solved(invoice: &str, tax_rate: &str, surcharge: &str) -> MarginResult {
        MarginResult {
            effective_tax_rate: dec(tax_rate),
            additional_surcharge: dec(surcharge),
            invoice_base: dec(invoice),
            total_with_margin: dec(invoice),
            ..MarginResult::default()
        }
    }

    /// TX-001: presumed regime itemises PIS, COFINS and ISS
    #[test]
    fn test_presumed_regime_itemises_taxes() {
        let margin = solved("10000", "0.083", "250");
        let result = calculate_taxes(
            dec("5000"),
            pct("5"),
            Some(&margin),
            Some(TaxRegime::PresumedOrRealProfit),
            &rates(),
            8,
        );
        let t = result.taxes;

        assert_eq!(t.pis, dec("59"));
        assert_eq!(t.cofins, dec("271"));
        assert_eq!(t.iss, dec("500"));
        assert_eq!(t.simplified_tax, Decimal::ZERO);
        assert_eq!(t.tax_total, dec("830"));
        assert_eq!(t.additional_surcharge, dec("250"));
        assert_eq!(t.block_7_total, dec("1080"));
    }

    /// TX-002: simplified regime pays one blended tax
    #[test]
    fn test_simplified_regime_single_tax() {
        let margin = solved("14189.19", "0.06", "500");
        let result = calculate_taxes(
            dec("10000"),
            pct("5"),
            Some(&margin),
            Some(TaxRegime::Simplified),
            &rates(),
            8,
        );
        let t = result.taxes;

        assert_eq!(t.pis, Decimal::ZERO);
        assert_eq!(t.cofins, Decimal::ZERO);
        assert_eq!(t.iss, Decimal::ZERO);
        assert_eq!(t.simplified_tax.round_dp(2), dec("851.35"));
        assert_eq!(t.block_7_total.round_dp(2), dec("1351.35"));
    }

    /// TX-003: without an invoice base only the surcharge remains
    #[test]
    fn test_no_invoice_base_only_surcharge() {
        let result = calculate_taxes(
            dec("4000"),
            pct("10"),
            None,
            Some(TaxRegime::PresumedOrRealProfit),
            &rates(),
            8,
        );
        let t = result.taxes;

        assert_eq!(t.additional_surcharge, dec("400"));
        assert_eq!(t.tax_total, Decimal::ZERO);
        assert_eq!(t.block_7_total, dec("400"));
        assert_eq!(result.audit_step.output["pis"], "0");
        assert!(result.audit_step.input["invoice_base"].is_null());
    }

    #[test]
    fn test_surcharge_taken_from_solver() {
        // The solver value wins over a recomputation.
        let margin = solved("10000", "0.083", "123.45");
        let result = calculate_taxes(
            dec("5000"),
            pct("5"),
            Some(&margin),
            Some(TaxRegime::PresumedOrRealProfit),
            &rates(),
            8,
        );
        assert_eq!(result.taxes.additional_surcharge, dec("123.45"));
    }
}
