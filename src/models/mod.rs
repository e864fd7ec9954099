//! Core data models for the Outsourcing Cost Engine.
//!
//! This module contains the calculation inputs and the per-block records
//! that make up a calculation result.

mod calculation_result;
mod inputs;

pub use calculation_result::{
    AdditionalCostsSummary, AuditStep, AuditTrace, AuditWarning, Benefits, Block7Result,
    CalculationResult, Charges, FinalSummary, InterimSummary, MarginResult, Subtotals,
    TerminationProvision,
};
pub use inputs::{AdditionalCost, FormAdditionalCost, FormInput, InputSnapshot, Percent, TaxRegime};
