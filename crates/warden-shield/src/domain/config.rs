//! Filter configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use warden_shield::domain::FilterConfigBuilder;
//!
//! let config = FilterConfigBuilder::new()
//!     .expected_items(1_000_000)
//!     .target_fpr(0.01)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use super::parameters::{calculate_optimal_parameters, validate_inputs, FilterParams};
use crate::error::FilterError;

/// Sizing inputs for the admission filter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Expected number of distinct keys in the store (n)
    pub expected_items: usize,
    /// Target false positive rate (p), strictly within (0, 1)
    pub target_fpr: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            expected_items: 1_000_000,
            target_fpr: 0.01,
        }
    }
}

impl FilterConfig {
    /// Create a new configuration with validation
    pub fn new(expected_items: usize, target_fpr: f64) -> Result<Self, FilterError> {
        let config = Self {
            expected_items,
            target_fpr,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        validate_inputs(self.expected_items, self.target_fpr)
    }

    /// Sizing this configuration resolves to
    pub fn params(&self) -> Result<FilterParams, FilterError> {
        calculate_optimal_parameters(self.expected_items, self.target_fpr)
    }

    /// Builder-style method to set expected items
    pub fn with_expected_items(mut self, n: usize) -> Self {
        self.expected_items = n;
        self
    }

    /// Builder-style method to set target FPR
    pub fn with_target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = fpr;
        self
    }
}

/// Builder for FilterConfig with validation
#[derive(Default)]
pub struct FilterConfigBuilder {
    expected_items: Option<usize>,
    target_fpr: Option<f64>,
}

impl FilterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected_items(mut self, n: usize) -> Self {
        self.expected_items = Some(n);
        self
    }

    pub fn target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = Some(fpr);
        self
    }

    /// Build the FilterConfig, validating all parameters
    pub fn build(self) -> Result<FilterConfig, FilterError> {
        let defaults = FilterConfig::default();
        FilterConfig::new(
            self.expected_items.unwrap_or(defaults.expected_items),
            self.target_fpr.unwrap_or(defaults.target_fpr),
        )
    }
}
