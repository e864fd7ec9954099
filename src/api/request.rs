//! Request types for the Outsourcing Cost Engine API.
//!
//! This module defines the JSON request structures for the `/calculate` and
//! `/validate-margin` endpoints. `/calculate/form` takes a
//! [`FormInput`](crate::models::FormInput) directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{AdditionalCost, InputSnapshot, Percent, TaxRegime};

/// Request body for the `/calculate` endpoint.
///
/// Amounts are plain decimals (numbers or strings), percentages are points
/// (`20` for 20%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Monthly gross salary.
    pub gross_salary: Decimal,
    /// The selected tax regime.
    #[serde(default)]
    pub tax_regime: Option<TaxRegime>,
    /// Daily public transport fare.
    #[serde(default)]
    pub daily_transport_fare: Decimal,
    /// Daily meal allowance.
    #[serde(default)]
    pub daily_meal_allowance: Decimal,
    /// Additional monthly costs.
    #[serde(default)]
    pub additional_costs: Vec<AdditionalCostRequest>,
    /// Surcharge over the pre-tax total, in points.
    #[serde(default)]
    pub additional_cost_percent: Decimal,
    /// Desired margin, in points.
    #[serde(default)]
    pub margin_percent: Option<Decimal>,
    /// Simples Nacional rate, in points.
    #[serde(default)]
    pub simplified_tax_rate: Option<Decimal>,
    /// Number of employees to price.
    #[serde(default = "default_employee_count")]
    pub employee_count: u32,
    /// Whether to add a vacation replacement cost.
    #[serde(default)]
    pub replace_vacation: bool,
}

fn default_employee_count() -> u32 {
    1
}

/// An additional cost in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalCostRequest {
    /// What the cost is for.
    #[serde(default)]
    pub label: String,
    /// The monthly amount.
    pub amount: Decimal,
}

/// Request body for the `/validate-margin` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateMarginRequest {
    /// Desired margin, in points.
    pub margin_percent: Decimal,
    /// The selected tax regime.
    pub tax_regime: TaxRegime,
    /// Simples Nacional rate, in points.
    #[serde(default)]
    pub simplified_tax_rate: Option<Decimal>,
}

impl From<AdditionalCostRequest> for AdditionalCost {
    fn from(req: AdditionalCostRequest) -> Self {
        AdditionalCost {
            label: req.label,
            amount: req.amount,
        }
    }
}

impl TryFrom<CalculationRequest> for InputSnapshot {
    type Error = EngineError;

    fn try_from(req: CalculationRequest) -> Result<Self, Self::Error> {
        Ok(InputSnapshot {
            gross_salary: req.gross_salary,
            tax_regime: req.tax_regime,
            daily_transport_fare: req.daily_transport_fare,
            daily_meal_allowance: req.daily_meal_allowance,
            additional_costs: req.additional_costs.into_iter().map(Into::into).collect(),
            additional_cost_percent: Percent::new(
                "additional_cost_percent",
                req.additional_cost_percent,
            )?,
            margin_percent: req
                .margin_percent
                .map(|points| Percent::new("margin_percent", points))
                .transpose()?,
            simplified_tax_rate: req
                .simplified_tax_rate
                .map(|points| Percent::new("simplified_tax_rate", points))
                .transpose()?,
            employee_count: req.employee_count,
            replace_vacation: req.replace_vacation,
        })
    }
}

impl ValidateMarginRequest {
    /// Validates the percentages of the request.
    pub fn percents(&self) -> Result<(Percent, Option<Percent>), EngineError> {
        let margin = Percent::new("margin_percent", self.margin_percent)?;
        let simplified = self
            .simplified_tax_rate
            .map(|points| Percent::new("simplified_tax_rate", points))
            .transpose()?;
        Ok((margin, simplified))
    }
}
