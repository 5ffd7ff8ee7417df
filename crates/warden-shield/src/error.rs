//! Error types for the Warden shield

use thiserror::Error;

/// Errors raised by the filter and its population lifecycle
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid expected item count: must be greater than 0")]
    InvalidExpectedItems,

    #[error("Invalid false positive rate: {fpr} (must be strictly between 0 and 1)")]
    InvalidFalsePositiveRate { fpr: f64 },

    #[error("Filter too large: {bits} bits exceeds the addressable maximum of {max}")]
    FilterTooLarge { bits: f64, max: usize },

    #[error("Phase violation: insert attempted on a frozen filter")]
    PhaseViolation,

    #[error("Filter is still populating; freeze it before serving lookups")]
    NotFrozen,

    #[error("Store error during population: {0}")]
    Store(#[from] StoreError),
}

impl FilterError {
    /// True for errors caused by invalid `(n, p)` sizing input
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            FilterError::InvalidExpectedItems
                | FilterError::InvalidFalsePositiveRate { .. }
                | FilterError::FilterTooLarge { .. }
        )
    }
}

/// Errors surfaced by the backing store
///
/// The gate passes these through verbatim and never retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Query error: {0}")]
    QueryError(String),
}
