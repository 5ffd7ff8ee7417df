//! Optimal Bloom filter parameter calculation
//!
//! Formulas:
//! - m = ceil(-n*ln(p) / (ln(2)^2))  -- optimal bits
//! - k = round((m/n) * ln(2)), k >= 1 -- optimal hash rounds
//! - FPR = (1 - e^(-kn/m))^k

use std::f64::consts::LN_2;

use bitvec::order::Lsb0;
use bitvec::slice::BitSlice;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Bloom filter sizing derived from `(n, p)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Number of bits in the filter (m)
    pub size_bits: u64,
    /// Number of hash rounds (k)
    pub hash_count: u32,
    /// Expected false positive rate once `n` items are inserted
    pub expected_fpr: f64,
}

/// Validate `(n, p)` without computing anything
///
/// Rejects `n == 0` and any `p` outside the open interval `(0, 1)`,
/// including NaN. Never clamps to a nearby valid value.
pub fn validate_inputs(num_items: usize, target_fpr: f64) -> Result<(), FilterError> {
    if num_items == 0 {
        return Err(FilterError::InvalidExpectedItems);
    }
    // Written as a negated range check so NaN is rejected as well.
    if !(target_fpr > 0.0 && target_fpr < 1.0) {
        return Err(FilterError::InvalidFalsePositiveRate { fpr: target_fpr });
    }
    Ok(())
}

/// Calculate optimal Bloom filter parameters for given constraints
///
/// # Arguments
/// * `num_items` - Expected number of distinct items to insert (n)
/// * `target_fpr` - Target false positive rate (p)
///
/// # Errors
/// Returns a configuration error if `n == 0`, `p` is not within `(0, 1)`,
/// or the resulting bit count cannot be allocated.
pub fn calculate_optimal_parameters(
    num_items: usize,
    target_fpr: f64,
) -> Result<FilterParams, FilterError> {
    validate_inputs(num_items, target_fpr)?;

    let n = num_items as f64;
    let bits = ((-n * target_fpr.ln()) / (LN_2 * LN_2)).ceil().max(1.0);
    let max = BitSlice::<u64, Lsb0>::MAX_BITS;
    // `as u64` saturates, so the bound is checked in f64.
    if !bits.is_finite() || bits > max as f64 {
        return Err(FilterError::FilterTooLarge { bits, max });
    }
    let m = bits as u64;
    let k = optimal_k(m, num_items);

    Ok(FilterParams {
        size_bits: m,
        hash_count: k,
        expected_fpr: calculate_fpr(m, num_items as u64, k),
    })
}

/// Nearest-integer k for given m and n, never below 1
pub fn optimal_k(m: u64, n: usize) -> u32 {
    if n == 0 {
        return 1;
    }
    let k = ((m as f64 / n as f64) * LN_2).round();
    (k as u32).max(1)
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: u64, n: u64, k: u32) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}
