//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading pricing
//! policies from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{PolicyFile, PolicyMetadata, PricingPolicy, RateTable};

/// Loads and provides access to a pricing policy.
///
/// # Directory Structure
///
/// ```text
/// config/standard/
/// ├── policy.yaml   # Metadata, formula options and limits
/// └── rates.yaml    # Charge, benefit, termination and service tax rates
/// ```
///
/// # Example
///
/// ```no_run
/// use outsourcing_cost_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/standard")?;
/// println!("Loaded policy: {}", loader.metadata().name);
/// # Ok::<(), outsourcing_cost_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: PricingPolicy,
}

impl ConfigLoader {
    /// Loads a policy from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Either file is missing (`ConfigNotFound`)
    /// - Either file contains invalid YAML or misses a field (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy_file = Self::load_yaml::<PolicyFile>(&path.join("policy.yaml"))?;
        let rates = Self::load_yaml::<RateTable>(&path.join("rates.yaml"))?;

        let policy = PricingPolicy::new(
            policy_file.metadata,
            policy_file.options,
            policy_file.limits,
            rates,
        );

        Ok(Self { policy })
    }

    /// Wraps an already built policy.
    pub fn from_policy(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded policy.
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        self.policy.metadata()
    }
}
