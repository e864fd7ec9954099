//! Additional costs aggregation (block 5).

use rust_decimal::Decimal;

use crate::format::format_currency;
use crate::models::{AdditionalCost, AdditionalCostsSummary, AuditStep};

use super::audit_amount;

/// The result of aggregating additional costs.
#[derive(Debug, Clone)]
pub struct AdditionalCostsResult {
    /// The sanitised items and their total.
    pub summary: AdditionalCostsSummary,
    /// How many items beyond the limit were ignored.
    pub dropped_items: usize,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Sums up to `max_items` additional costs.
///
/// Negative amounts count as zero. Items past `max_items` are ignored and
/// reported through `dropped_items`, which the pipeline turns into an
/// `INVALID_INPUT` warning.
///
/// # Examples
///
/// ```
/// use outsourcing_cost_engine::calculation::calculate_additional_costs;
/// use outsourcing_cost_engine::models::AdditionalCost;
/// use rust_decimal::Decimal;
///
/// let items = vec![
///     AdditionalCost { label: "Uniforms".into(), amount: Decimal::from(150) },
///     AdditionalCost { label: "Refund".into(), amount: Decimal::from(-20) },
/// ];
/// let result = calculate_additional_costs(&items, 5, 4);
/// assert_eq!(result.summary.block_5_total, Decimal::from(150));
/// ```
pub fn calculate_additional_costs(
    items: &[AdditionalCost],
    max_items: usize,
    step_number: u32,
) -> AdditionalCostsResult {
    let dropped_items = items.len().saturating_sub(max_items);

    let sanitised: Vec<AdditionalCost> = items
        .iter()
        .take(max_items)
        .map(|item| AdditionalCost {
            label: item.label.clone(),
            amount: item.amount.max(Decimal::ZERO),
        })
        .collect();

    let block_5_total: Decimal = sanitised.iter().map(|item| item.amount).sum();

    let mut reasoning = format!(
        "{} additional cost(s) totalling {}",
        sanitised.len(),
        format_currency(block_5_total)
    );
    if dropped_items > 0 {
        reasoning.push_str(&format!(
            "; {} item(s) over the limit of {} ignored",
            dropped_items, max_items
        ));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "additional_costs".to_string(),
        rule_name: "Additional Costs".to_string(),
        block_ref: "5".to_string(),
        input: serde_json::json!({
            "item_count": items.len(),
            "max_items": max_items,
            "amounts": items.iter().map(|i| i.amount.to_string()).collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "items": sanitised
                .iter()
                .map(|i| serde_json::json!({ "label": i.label, "amount": audit_amount(i.amount) }))
                .collect::<Vec<_>>(),
            "block_5_total": audit_amount(block_5_total),
            "dropped_items": dropped_items
        }),
        reasoning,
    };

    AdditionalCostsResult {
        summary: AdditionalCostsSummary {
            items: sanitised,
            block_5_total,
        },
        dropped_items,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn cost(label: &str, amount: &str) -> AdditionalCost {
        AdditionalCost {
            label: label.to_string(),
            amount: dec(amount),
        }
    }

    /// AC-001: amounts are summed
    #[test]
    fn test_sums_items() {
        let items = vec![cost("Uniforms", "150.00"), cost("Tools", "49.90")];
        let result = calculate_additional_costs(&items, 5, 4);

        assert_eq!(result.summary.block_5_total, dec("199.90"));
        assert_eq!(result.summary.items.len(), 2);
        assert_eq!(result.dropped_items, 0);
    }

    /// AC-002: negative amounts are zeroed
    #[test]
    fn test_negative_amounts_zeroed() {
        let items = vec![cost("Uniforms", "100.00"), cost("Credit", "-40.00")];
        let result = calculate_additional_costs(&items, 5, 4);

        assert_eq!(result.summary.block_5_total, dec("100.00"));
        assert_eq!(result.summary.items[1].amount, Decimal::ZERO);
        assert_eq!(result.summary.items[1].label, "Credit");
    }

    /// AC-003: items past the limit are ignored and counted
    #[test]
    fn test_items_over_limit_are_dropped() {
        let items: Vec<AdditionalCost> = (1..=7).map(|i| cost("Item", &i.to_string())).collect();
        let result = calculate_additional_costs(&items, 5, 4);

        assert_eq!(result.summary.items.len(), 5);
        assert_eq!(result.summary.block_5_total, dec("15"));
        assert_eq!(result.dropped_items, 2);
        assert!(result.audit_step.reasoning.contains("ignored"));
    }

    #[test]
    fn test_empty_list_totals_zero() {
        let result = calculate_additional_costs(&[], 5, 4);

        assert_eq!(result.summary.block_5_total, Decimal::ZERO);
        assert!(result.summary.items.is_empty());
        assert_eq!(result.audit_step.output["block_5_total"], "0");
    }
}
