//! Configuration types for pricing policies.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML files of a policy directory.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Metadata about the pricing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyMetadata {
    /// Short policy identifier (e.g., "standard").
    pub code: String,
    /// The human-readable name of the policy.
    pub name: String,
    /// The version or effective date of the rate table.
    pub version: String,
    /// Free-text notes on where the rates come from.
    #[serde(default)]
    pub description: String,
}

/// How the margin relates to the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginFormula {
    /// Margin is a share of the invoice: `invoice = costs / (1 - margin - tax)`.
    OnInvoice,
    /// Margin is a markup on costs: `invoice = costs * (1 + margin) / (1 - tax)`.
    OnCost,
}

impl MarginFormula {
    /// Returns the snake_case identifier used in audit records.
    pub fn as_str(&self) -> &'static str {
        match self {
            MarginFormula::OnInvoice => "on_invoice",
            MarginFormula::OnCost => "on_cost",
        }
    }
}

/// Whether the vacation replacement cost is priced with margin and tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationReplacementMode {
    /// Replacement stays out of the margin base; the price is the invoice base.
    ExcludedFromMarginBase,
    /// Replacement is part of the margin base like any other cost.
    IncludedInMarginBase,
    /// Replacement stays out of the margin base and is added to the invoice at cost.
    AddedAtCost,
}

impl VacationReplacementMode {
    /// Returns the snake_case identifier used in audit records.
    pub fn as_str(&self) -> &'static str {
        match self {
            VacationReplacementMode::ExcludedFromMarginBase => "excluded_from_margin_base",
            VacationReplacementMode::IncludedInMarginBase => "included_in_margin_base",
            VacationReplacementMode::AddedAtCost => "added_at_cost",
        }
    }
}

/// Formula options of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOptions {
    /// The margin formula.
    pub margin_formula: MarginFormula,
    /// The vacation replacement mode.
    pub vacation_replacement: VacationReplacementMode,
}

/// Input limits and advisory thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyLimits {
    /// Salaries below this produce a `SALARY_BELOW_MINIMUM` warning.
    pub minimum_wage: Decimal,
    /// Salaries above this produce a `SALARY_ABOVE_MAXIMUM` warning.
    pub maximum_salary: Decimal,
    /// Monetary inputs above this are rejected before pricing.
    pub max_amount: Decimal,
    /// The largest accepted employee count.
    pub max_employee_count: u32,
    /// The largest number of additional cost rows.
    pub max_additional_costs: usize,
}

/// Policy file structure (`policy.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyFile {
    /// Policy metadata.
    pub metadata: PolicyMetadata,
    /// Formula options.
    pub options: PolicyOptions,
    /// Input limits.
    pub limits: PolicyLimits,
}

/// Employer charge rates over the salary-plus-accruals base (block 3.2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRates {
    /// INSS rate.
    pub inss: Decimal,
    /// Education salary rate.
    pub education_salary: Decimal,
    /// SAT rate.
    pub sat: Decimal,
    /// SESC / SESI rate.
    pub sesc_sesi: Decimal,
    /// SENAI / SENAC rate.
    pub senai_senac: Decimal,
    /// SEBRAE rate.
    pub sebrae: Decimal,
    /// INCRA rate.
    pub incra: Decimal,
    /// FGTS rate, applied under every regime.
    pub fgts: Decimal,
}

/// Benefit parameters (block 3.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitRates {
    /// Working days per month used for daily benefits.
    pub working_days_per_month: u32,
    /// Share of the salary deducted from the employee for transport.
    pub transport_deduction_rate: Decimal,
}

/// Termination provision rates (block 4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationRates {
    /// FGTS rate on the indemnified notice.
    pub fgts_on_notice: Decimal,
    /// FGTS fine rate over the FGTS on notice.
    pub fgts_fine: Decimal,
}

/// Service tax rates over the invoice base for the presumed/real regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTaxRates {
    /// PIS rate.
    pub pis: Decimal,
    /// COFINS rate.
    pub cofins: Decimal,
    /// ISS rate.
    pub iss: Decimal,
}

impl ServiceTaxRates {
    /// Returns PIS + COFINS + ISS.
    pub fn composite(&self) -> Decimal {
        self.pis + self.cofins + self.iss
    }
}

/// Rate table file structure (`rates.yaml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// Employer charge rates.
    pub charges: ChargeRates,
    /// Benefit parameters.
    pub benefits: BenefitRates,
    /// Termination provision rates.
    pub termination: TerminationRates,
    /// Service tax rates.
    pub service_taxes: ServiceTaxRates,
}

/// A complete pricing policy: metadata, formula options, limits and rates.
///
/// [`PricingPolicy::default`] is the `standard` policy shipped in
/// `config/standard`, so the engine can run without configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingPolicy {
    metadata: PolicyMetadata,
    options: PolicyOptions,
    limits: PolicyLimits,
    rates: RateTable,
}

impl PricingPolicy {
    /// Creates a new PricingPolicy from its component parts.
    pub fn new(
        metadata: PolicyMetadata,
        options: PolicyOptions,
        limits: PolicyLimits,
        rates: RateTable,
    ) -> Self {
        Self {
            metadata,
            options,
            limits,
            rates,
        }
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        &self.metadata
    }

    /// Returns the formula options.
    pub fn options(&self) -> &PolicyOptions {
        &self.options
    }

    /// Returns the input limits.
    pub fn limits(&self) -> &PolicyLimits {
        &self.limits
    }

    /// Returns the rate table.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Returns a copy of this policy with different formula options.
    pub fn with_options(mut self, options: PolicyOptions) -> Self {
        self.options = options;
        self
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy::new(
            PolicyMetadata {
                code: "standard".to_string(),
                name: "Standard outsourcing policy".to_string(),
                version: "2025-01-01".to_string(),
                description: "PIS 0.59%, COFINS 2.71%, ISS 5%, SAT 2.37%".to_string(),
            },
            PolicyOptions {
                margin_formula: MarginFormula::OnInvoice,
                vacation_replacement: VacationReplacementMode::ExcludedFromMarginBase,
            },
            PolicyLimits {
                minimum_wage: Decimal::from(1320),
                maximum_salary: Decimal::from(50_000),
                max_amount: Decimal::from(1_000_000_000),
                max_employee_count: 999,
                max_additional_costs: 5,
            },
            RateTable {
                charges: ChargeRates {
                    inss: Decimal::new(20, 2),
                    education_salary: Decimal::new(25, 3),
                    sat: Decimal::new(237, 4),
                    sesc_sesi: Decimal::new(15, 3),
                    senai_senac: Decimal::new(1, 2),
                    sebrae: Decimal::new(6, 3),
                    incra: Decimal::new(2, 3),
                    fgts: Decimal::new(8, 2),
                },
                benefits: BenefitRates {
                    working_days_per_month: 23,
                    transport_deduction_rate: Decimal::new(6, 2),
                },
                termination: TerminationRates {
                    fgts_on_notice: Decimal::new(8, 2),
                    fgts_fine: Decimal::new(40, 2),
                },
                service_taxes: ServiceTaxRates {
                    pis: Decimal::new(59, 4),
                    cofins: Decimal::new(271, 4),
                    iss: Decimal::new(5, 2),
                },
            },
        )
    }
}
