//! Core Bloom filter implementation
//!
//! INVARIANTS:
//! - INVARIANT-1: FPR = (1 - e^(-kn/m))^k <= target_fpr at n inserted items
//! - INVARIANT-2: No false negatives - if inserted, contains() MUST return true
//! - INVARIANT-3: m and k never change after construction
//! - INVARIANT-4: bits are only set while Populating; a Frozen filter is immutable
//!
//! ## Lifecycle
//!
//! A filter starts `Populating` and is owned by a single writer. `freeze()`
//! moves it to `Frozen`. Sharing happens only after that, through
//! `Arc<BloomFilter>`: `insert` takes `&mut self`, so no reader can observe a
//! write in progress, and handing the `Arc` to other threads (spawn, channel,
//! axum state) is the release/acquire point that publishes every bit.

use std::sync::Arc;

use bitvec::prelude::*;

use super::config::FilterConfig;
use super::hash_functions::bit_indices;
use super::parameters::{calculate_fpr, calculate_optimal_parameters, FilterParams};
use crate::error::FilterError;

/// Lifecycle phase of a filter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterPhase {
    /// Accepting inserts from its single owner
    Populating,
    /// Read-only; safe to share across threads
    Frozen,
}

/// Bloom filter for probabilistic membership testing
///
/// Stores only derived bit positions, never the items themselves.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    /// Bit array packed into 64-bit words
    bits: BitVec<u64, Lsb0>,
    /// Size in bits (m)
    m: u64,
    /// Number of hash rounds (k)
    k: u32,
    /// Expected number of items (n), kept for diagnostics
    expected_items: usize,
    /// Number of insert calls, duplicates included
    inserted: u64,
    phase: FilterPhase,
}

impl BloomFilter {
    /// Create a filter sized for `expected_items` at `target_fpr`
    ///
    /// # Errors
    /// Fails if `expected_items == 0` or `target_fpr` is not within `(0, 1)`.
    pub fn new(expected_items: usize, target_fpr: f64) -> Result<Self, FilterError> {
        let params = calculate_optimal_parameters(expected_items, target_fpr)?;
        Ok(Self::with_params(&params, expected_items))
    }

    /// Create a filter from a validated configuration
    pub fn from_config(config: &FilterConfig) -> Result<Self, FilterError> {
        Self::new(config.expected_items, config.target_fpr)
    }

    fn with_params(params: &FilterParams, expected_items: usize) -> Self {
        Self {
            bits: bitvec![u64, Lsb0; 0; params.size_bits as usize],
            m: params.size_bits,
            k: params.hash_count,
            expected_items,
            inserted: 0,
            phase: FilterPhase::Populating,
        }
    }

    /// Insert an item into the filter
    ///
    /// After insertion, `contains(item)` is guaranteed to return true.
    /// Re-inserting an item leaves the bit array unchanged.
    ///
    /// # Errors
    /// Returns `PhaseViolation` once the filter is frozen. Callers treat this
    /// as a programming error.
    pub fn insert(&mut self, item: &[u8]) -> Result<(), FilterError> {
        if self.phase == FilterPhase::Frozen {
            return Err(FilterError::PhaseViolation);
        }
        for idx in bit_indices(item, self.k, self.m) {
            self.bits.set(idx as usize, true);
        }
        self.inserted += 1;
        Ok(())
    }

    /// Test if an item might be in the filter
    ///
    /// Returns:
    /// - `true` if the item might be in the set (could be false positive)
    /// - `false` if the item is definitely NOT in the set (never false negative)
    pub fn contains(&self, item: &[u8]) -> bool {
        bit_indices(item, self.k, self.m).all(|idx| self.bits[idx as usize])
    }

    /// Transition from Populating to Frozen
    ///
    /// Idempotent. No insert is accepted afterwards.
    pub fn freeze(&mut self) {
        self.phase = FilterPhase::Frozen;
    }

    /// Freeze and wrap for sharing with concurrent readers
    pub fn into_frozen(mut self) -> Arc<Self> {
        self.freeze();
        Arc::new(self)
    }

    pub fn phase(&self) -> FilterPhase {
        self.phase
    }

    pub fn is_frozen(&self) -> bool {
        self.phase == FilterPhase::Frozen
    }

    /// Estimated false positive rate for the current fill
    ///
    /// Formula: FPR = (1 - e^(-kn/m))^k with n = insert calls so far
    pub fn estimated_fpr(&self) -> f64 {
        calculate_fpr(self.m, self.inserted, self.k)
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Get the filter size in bits (m)
    pub fn size_bits(&self) -> u64 {
        self.m
    }

    /// Get the number of hash rounds (k)
    pub fn hash_count(&self) -> u32 {
        self.k
    }

    /// Get the expected item count the filter was sized for (n)
    pub fn expected_items(&self) -> usize {
        self.expected_items
    }

    /// Get the number of insert calls so far
    pub fn elements_inserted(&self) -> u64 {
        self.inserted
    }

    /// Number of 64-bit words backing the bit array, `ceil(m / 64)`
    pub fn word_count(&self) -> usize {
        self.bits.as_raw_slice().len()
    }

    pub fn memory_bytes(&self) -> usize {
        self.word_count() * std::mem::size_of::<u64>()
    }
}
