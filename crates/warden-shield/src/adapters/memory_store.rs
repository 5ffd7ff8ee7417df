//! In-memory key store
//!
//! Stands in for the authoritative table in development and tests.

use std::collections::HashSet;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use parking_lot::RwLock;
use tracing::info;

use crate::error::StoreError;
use crate::ports::{KeyStore, KeyStream};

/// Prefix used for seeded keys (`user_0`, `user_1`, ...)
pub const SEED_PREFIX: &str = "user_";

/// HashSet-backed `KeyStore`
#[derive(Default)]
pub struct InMemoryKeyStore {
    keys: RwLock<HashSet<String>>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: impl Into<String>) -> bool {
        self.keys.write().insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// Insert `user_0..user_{n-1}`
    ///
    /// Skipped when the store already holds at least `n` keys. Returns the
    /// number of keys actually added.
    pub fn seed(&self, n: usize) -> usize {
        let mut keys = self.keys.write();
        if keys.len() >= n {
            info!(existing = keys.len(), "Store already seeded, skipping");
            return 0;
        }

        info!(count = n, "Seeding store");
        let existing = keys.len();
        keys.reserve(n - existing);
        (0..n)
            .filter(|i| keys.insert(format!("{}{}", SEED_PREFIX, i)))
            .count()
    }
}

impl<S: Into<String>> FromIterator<S> for InMemoryKeyStore {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: RwLock::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.keys.read().contains(id))
    }

    fn enumerate_all(&self) -> KeyStream<'_> {
        // Snapshot under the read lock so the stream holds no guard.
        let snapshot: Vec<String> = self.keys.read().iter().cloned().collect();
        stream::iter(snapshot.into_iter().map(Ok)).boxed()
    }
}
