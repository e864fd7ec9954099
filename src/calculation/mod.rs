//! Calculation logic for the Outsourcing Cost Engine.
//!
//! This module contains one function per cost block: charges and benefits
//! (block 3), termination provisions (block 4), additional costs (block 5),
//! subtotals, the interim summary (block 6), the margin and tax solver
//! (block 8), surcharge and taxes (block 7) and the final summary (block 9).
//! [`compute`] runs them in order.

mod additional_costs;
mod benefits;
mod charges;
mod final_summary;
mod interim_summary;
mod margin_solver;
mod pipeline;
mod subtotals;
mod taxes;
mod termination_provision;

use rust_decimal::{Decimal, RoundingStrategy};

pub use additional_costs::{AdditionalCostsResult, calculate_additional_costs};
pub use benefits::{BenefitsResult, calculate_benefits};
pub use charges::{ChargesResult, calculate_charges};
pub use final_summary::{FinalSummaryResult, calculate_final_summary};
pub use interim_summary::{InterimSummaryResult, calculate_interim_summary};
pub use margin_solver::{
    MarginSolverResult, effective_tax_rate, margin_denominator, solve_margin,
    validate_margin_configuration,
};
pub use pipeline::{SALARY_ABOVE_MAXIMUM, SALARY_BELOW_MINIMUM, compute};
pub use subtotals::{SubtotalsResult, calculate_subtotals};
pub use taxes::{TaxesResult, calculate_taxes};
pub use termination_provision::{TerminationProvisionResult, calculate_termination_provision};

/// Formats an amount for audit output, rounded to cents.
pub(crate) fn audit_amount(value: Decimal) -> String {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
}
