//! Outbound Ports (Driven Ports)
//!
//! The backing store is the system of record for key existence. Its schema,
//! transactions and seeding are its own business; the shield only needs a
//! point lookup and a one-shot enumeration.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::StoreError;

/// Lazy, finite, single-pass sequence of every stored key
pub type KeyStream<'a> = BoxStream<'a, Result<String, StoreError>>;

/// Authoritative key-existence store (Driven Port)
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Point lookup for a single key
    ///
    /// Errors are surfaced to the caller as-is; implementations own any
    /// timeout or retry policy.
    async fn exists(&self, id: &str) -> Result<bool, StoreError>;

    /// Enumerate all keys currently stored
    ///
    /// The stream is consumed exactly once to populate the filter and must
    /// not be assumed restartable.
    fn enumerate_all(&self) -> KeyStream<'_>;
}
