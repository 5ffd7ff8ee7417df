//! Inbound Ports (Driving Ports)
//!
//! The single existence-check entry point exposed to the request boundary.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::StoreError;

/// Which component produced the answer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// The filter proved absence; the store was not consulted
    Filter,
    /// The store answered authoritatively
    Store,
}

/// Outcome of a successful existence check
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Whether the key exists in the store
    pub exists: bool,
    /// Who decided
    pub source: VerdictSource,
}

impl Verdict {
    pub fn rejected_by_filter() -> Self {
        Self {
            exists: false,
            source: VerdictSource::Filter,
        }
    }

    pub fn from_store(exists: bool) -> Self {
        Self {
            exists,
            source: VerdictSource::Store,
        }
    }
}

/// Existence-check API (Driving Port)
#[async_trait]
pub trait ExistenceCheckApi: Send + Sync {
    /// Check whether `id` exists, consulting the filter before the store
    async fn check(&self, id: &str) -> Result<Verdict, StoreError>;

    /// Route every lookup through the filter first
    fn enable(&self);

    /// Send every lookup straight to the store
    fn disable(&self);

    fn is_enabled(&self) -> bool;
}
