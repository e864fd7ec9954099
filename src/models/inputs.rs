//! Calculation inputs.
//!
//! This module defines the [`InputSnapshot`] consumed by the pipeline, the
//! validated [`Percent`] newtype, the [`TaxRegime`] enum and the all-text
//! [`FormInput`] contract used by form-driven callers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};
use crate::format::{parse_currency, parse_percent};

/// The tax regime of the contracting company.
///
/// Deserializes from `simplified` / `presumed_or_real_profit` and also accepts
/// the short form values `simples` / `lucro`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Simples Nacional: a single blended rate supplied by the user, no itemised
    /// social charges.
    #[serde(alias = "simples")]
    Simplified,
    /// Lucro Presumido or Lucro Real: itemised social charges plus PIS, COFINS and ISS.
    #[serde(alias = "lucro")]
    PresumedOrRealProfit,
}

impl TaxRegime {
    /// Returns the snake_case identifier used in audit records.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxRegime::Simplified => "simplified",
            TaxRegime::PresumedOrRealProfit => "presumed_or_real_profit",
        }
    }

    /// Returns the human-readable regime name.
    pub fn label(&self) -> &'static str {
        match self {
            TaxRegime::Simplified => "Simples Nacional",
            TaxRegime::PresumedOrRealProfit => "Lucro Presumido / Real",
        }
    }

    /// Returns true for the Simples Nacional regime.
    pub fn is_simplified(&self) -> bool {
        *self == TaxRegime::Simplified
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxRegime {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simplified" | "simples" => Ok(TaxRegime::Simplified),
            "presumed_or_real_profit" | "lucro" => Ok(TaxRegime::PresumedOrRealProfit),
            other => Err(EngineError::invalid_input(
                "tax_regime",
                format!("unknown tax regime '{}'", other),
            )),
        }
    }
}

/// A percentage in points, guaranteed to lie in `0..=100`.
///
/// # Examples
///
/// ```
/// use outsourcing_cost_engine::models::Percent;
/// use rust_decimal::Decimal;
///
/// let margin = Percent::new("margin_percent", Decimal::from(20)).unwrap();
/// assert_eq!(margin.fraction(), Decimal::new(2, 1));
/// assert!(Percent::new("margin_percent", Decimal::from(101)).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percent(Decimal);

impl Percent {
    /// Zero percent.
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    /// Creates a percentage from points, failing with `InvalidPercent` outside `0..=100`.
    pub fn new(field: &str, points: Decimal) -> EngineResult<Self> {
        if points < Decimal::ZERO || points > Decimal::from(100) {
            return Err(EngineError::InvalidPercent {
                field: field.to_string(),
                value: points,
            });
        }
        Ok(Percent(points))
    }

    /// Returns the value in percentage points (20 for 20%).
    pub fn points(self) -> Decimal {
        self.0
    }

    /// Returns the value as a fraction (0.2 for 20%).
    pub fn fraction(self) -> Decimal {
        self.0 / Decimal::from(100)
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = EngineError;

    fn try_from(points: Decimal) -> Result<Self, Self::Error> {
        Percent::new("percent", points)
    }
}

impl From<Percent> for Decimal {
    fn from(percent: Percent) -> Self {
        percent.0
    }
}

/// A free-form additional monthly cost (Block 5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalCost {
    /// What the cost is for (e.g., "Uniforms").
    #[serde(default)]
    pub label: String,
    /// The monthly amount.
    pub amount: Decimal,
}

impl AdditionalCost {
    /// Builds a cost from BRL text; unparseable text becomes zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use outsourcing_cost_engine::models::AdditionalCost;
    /// use rust_decimal::Decimal;
    ///
    /// let cost = AdditionalCost::from_text("Uniforms", "R$ 150,00");
    /// assert_eq!(cost.amount, Decimal::new(15000, 2));
    /// assert_eq!(AdditionalCost::from_text("Tools", "n/a").amount, Decimal::ZERO);
    /// ```
    pub fn from_text(label: impl Into<String>, raw: &str) -> Self {
        AdditionalCost {
            label: label.into(),
            amount: parse_currency(raw).unwrap_or(Decimal::ZERO),
        }
    }
}

/// Every input to one calculation run.
///
/// The snapshot is immutable for the duration of a run; the pipeline never
/// mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Monthly gross salary of one employee.
    pub gross_salary: Decimal,
    /// The selected tax regime, if any.
    #[serde(default)]
    pub tax_regime: Option<TaxRegime>,
    /// Daily public transport fare.
    #[serde(default)]
    pub daily_transport_fare: Decimal,
    /// Daily meal allowance.
    #[serde(default)]
    pub daily_meal_allowance: Decimal,
    /// Up to five additional monthly costs.
    #[serde(default)]
    pub additional_costs: Vec<AdditionalCost>,
    /// Percentage applied over the pre-tax total as an additional surcharge.
    #[serde(default)]
    pub additional_cost_percent: Percent,
    /// Desired profit margin; `None` skips the margin solver.
    #[serde(default)]
    pub margin_percent: Option<Percent>,
    /// Simples Nacional rate; required only for the simplified regime.
    #[serde(default)]
    pub simplified_tax_rate: Option<Percent>,
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

impl Default for InputSnapshot {
    fn default() -> Self {
        InputSnapshot {
            gross_salary: Decimal::ZERO,
            tax_regime: None,
            daily_transport_fare: Decimal::ZERO,
            daily_meal_allowance: Decimal::ZERO,
            additional_costs: Vec::new(),
            additional_cost_percent: Percent::ZERO,
            margin_percent: None,
            simplified_tax_rate: None,
            employee_count: default_employee_count(),
            replace_vacation: false,
        }
    }
}

/// A form-entered additional cost, amount as BRL text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormAdditionalCost {
    /// What the cost is for.
    pub label: String,
    /// Amount text such as `R$ 150,00`.
    pub amount: String,
}

/// The calculator form as text, the way a browser submits it.
///
/// Money fields use BRL text (`R$ 2.000,00`), percentages use comma decimals
/// (`12,5%`), the regime uses the form values `simples` / `lucro`. Empty
/// strings mean "not filled in".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    /// Gross salary text.
    pub gross_salary: String,
    /// Regime form value.
    pub tax_regime: String,
    /// Daily transport fare text.
    pub daily_transport_fare: String,
    /// Daily meal allowance text.
    pub daily_meal_allowance: String,
    /// Additional cost rows.
    pub additional_costs: Vec<FormAdditionalCost>,
    /// Additional cost percentage text.
    pub additional_cost_percent: String,
    /// Margin percentage text.
    pub margin_percent: String,
    /// Simples Nacional rate text.
    pub simplified_tax_rate: String,
    /// Employee count text.
    pub employee_count: String,
    /// Vacation replacement choice.
    pub replace_vacation: bool,
}

impl TryFrom<FormInput> for InputSnapshot {
    type Error = EngineError;

    /// Converts form text into a snapshot.
    ///
    /// Unparseable money becomes zero so the affected stage reports it;
    /// unparseable or out-of-range percentages, an unknown regime and a
    /// non-numeric employee count are rejected.
    fn try_from(form: FormInput) -> Result<Self, Self::Error> {
        let tax_regime = if form.tax_regime.trim().is_empty() {
            None
        } else {
            Some(form.tax_regime.parse::<TaxRegime>()?)
        };

        let employee_count = if form.employee_count.trim().is_empty() {
            default_employee_count()
        } else {
            form.employee_count.trim().parse::<u32>().map_err(|_| {
                EngineError::invalid_input(
                    "employee_count",
                    format!("'{}' is not a whole number", form.employee_count.trim()),
                )
            })?
        };

        Ok(InputSnapshot {
            gross_salary: parse_currency(&form.gross_salary).unwrap_or(Decimal::ZERO),
            tax_regime,
            daily_transport_fare: parse_currency(&form.daily_transport_fare)
                .unwrap_or(Decimal::ZERO),
            daily_meal_allowance: parse_currency(&form.daily_meal_allowance)
                .unwrap_or(Decimal::ZERO),
            additional_costs: form
                .additional_costs
                .iter()
                .map(|row| AdditionalCost::from_text(row.label.clone(), &row.amount))
                .collect(),
            additional_cost_percent: optional_percent(
                "additional_cost_percent",
                &form.additional_cost_percent,
            )?
            .unwrap_or(Percent::ZERO),
            margin_percent: optional_percent("margin_percent", &form.margin_percent)?,
            simplified_tax_rate: optional_percent(
                "simplified_tax_rate",
                &form.simplified_tax_rate,
            )?,
            employee_count,
            replace_vacation: form.replace_vacation,
        })
    }
}

fn optional_percent(field: &str, raw: &str) -> EngineResult<Option<Percent>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let points = parse_percent(raw).ok_or_else(|| {
        EngineError::invalid_input(field, format!("'{}' is not a percentage", raw.trim()))
    })?;
    Percent::new(field, points).map(Some)
}
