//! Per-lookup timeout decorator
//!
//! Timeout policy belongs to the store side of the port, so it lives here
//! rather than in the gate. An elapsed lookup surfaces as
//! `StoreError::Timeout` and is never retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::debug;

use crate::error::StoreError;
use crate::ports::{KeyStore, KeyStream};

/// Default timeout for point lookups
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Wraps a `KeyStore`, bounding every `exists` call
pub struct TimeoutKeyStore<S: KeyStore + ?Sized> {
    inner: Arc<S>,
    lookup_timeout: Duration,
}

impl<S: KeyStore + ?Sized> TimeoutKeyStore<S> {
    pub fn new(inner: Arc<S>, lookup_timeout: Duration) -> Self {
        Self {
            inner,
            lookup_timeout,
        }
    }

    pub fn lookup_timeout(&self) -> Duration {
        self.lookup_timeout
    }

    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }
}

#[async_trait]
impl<S: KeyStore + ?Sized> KeyStore for TimeoutKeyStore<S> {
    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        timeout(self.lookup_timeout, self.inner.exists(id))
            .await
            .map_err(|_| {
                debug!(
                    id,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Store lookup timed out"
                );
                StoreError::Timeout
            })?
    }

    /// Enumeration is a bulk scan and is not bounded by the lookup timeout.
    fn enumerate_all(&self) -> KeyStream<'_> {
        self.inner.enumerate_all()
    }
}
