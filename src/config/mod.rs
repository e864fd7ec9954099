//! Configuration loading and management for the Outsourcing Cost Engine.
//!
//! This module loads pricing policies from YAML files: the rate table for
//! employer charges, benefits, termination provisions and service taxes, plus
//! the formula options that settle how margin and vacation replacement are priced.
//!
//! # Example
//!
//! ```no_run
//! use outsourcing_cost_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/standard").unwrap();
//! println!("Loaded policy: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BenefitRates, ChargeRates, MarginFormula, PolicyFile, PolicyLimits, PolicyMetadata,
    PolicyOptions, PricingPolicy, RateTable, ServiceTaxRates, TerminationRates,
    VacationReplacementMode,
};
