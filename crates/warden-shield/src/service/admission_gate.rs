//! Admission Gate
//!
//! Composes a frozen Bloom filter with the authoritative store. While the
//! gate is enabled, keys the filter proves absent are rejected in O(k) with
//! no store I/O. Everything else is delegated to the store and its answer
//! (found, not found, or error) is returned verbatim.
//!
//! ## State machine
//!
//! `Enabled` <-> `Disabled`, toggled atomically at any time while serving.
//! The gate starts `Enabled`; the state is in-memory only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::BloomFilter;
use crate::error::{FilterError, StoreError};
use crate::metrics::GateMetrics;
use crate::ports::{ExistenceCheckApi, KeyStore, Verdict};

/// Filter-fronted existence check over a backing store
pub struct AdmissionGate<S: KeyStore + ?Sized> {
    /// Frozen filter shared read-only with every request
    filter: Arc<BloomFilter>,
    /// Backing store (not owned)
    store: Arc<S>,
    enabled: AtomicBool,
    metrics: Arc<GateMetrics>,
}

impl<S: KeyStore + ?Sized> AdmissionGate<S> {
    /// Create an enabled gate over a frozen filter
    ///
    /// # Errors
    /// Returns `NotFrozen` if the filter is still populating.
    pub fn new(filter: Arc<BloomFilter>, store: Arc<S>) -> Result<Self, FilterError> {
        Self::with_metrics(filter, store, Arc::new(GateMetrics::new()))
    }

    /// Create a gate that records into shared metrics
    pub fn with_metrics(
        filter: Arc<BloomFilter>,
        store: Arc<S>,
        metrics: Arc<GateMetrics>,
    ) -> Result<Self, FilterError> {
        if !filter.is_frozen() {
            return Err(FilterError::NotFrozen);
        }
        Ok(Self {
            filter,
            store,
            enabled: AtomicBool::new(true),
            metrics,
        })
    }

    pub fn filter(&self) -> &BloomFilter {
        &self.filter
    }

    pub fn metrics(&self) -> Arc<GateMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Check whether `id` exists
    ///
    /// Never retries: a store timeout or failure is returned as-is.
    pub async fn check(&self, id: &str) -> Result<Verdict, StoreError> {
        let started = Instant::now();

        if self.is_enabled() && !self.filter.contains(id.as_bytes()) {
            self.metrics.record_filter_rejection(started.elapsed());
            debug!(id, "Rejected by filter, store not consulted");
            return Ok(Verdict::rejected_by_filter());
        }

        let result = self.store.exists(id).await;
        self.metrics.record_store_lookup(started.elapsed(), &result);
        if let Err(e) = &result {
            warn!(id, error = %e, "Store lookup failed");
        }
        result.map(Verdict::from_store)
    }

    pub fn enable(&self) {
        if !self.enabled.swap(true, Ordering::AcqRel) {
            info!("Admission gate enabled");
        }
    }

    pub fn disable(&self) {
        if self.enabled.swap(false, Ordering::AcqRel) {
            info!("Admission gate disabled, all lookups go to the store");
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

#[async_trait]
impl<S: KeyStore + ?Sized> ExistenceCheckApi for AdmissionGate<S> {
    async fn check(&self, id: &str) -> Result<Verdict, StoreError> {
        AdmissionGate::check(self, id).await
    }

    fn enable(&self) {
        AdmissionGate::enable(self)
    }

    fn disable(&self) {
        AdmissionGate::disable(self)
    }

    fn is_enabled(&self) -> bool {
        AdmissionGate::is_enabled(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{KeyStream, VerdictSource};
    use futures::stream::{self, StreamExt};
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;

    /// Store stub that counts point lookups
    struct CountingStore {
        keys: HashSet<String>,
        lookups: AtomicUsize,
        fail_with: Option<StoreError>,
    }

    impl CountingStore {
        fn with_keys<I: IntoIterator<Item = String>>(keys: I) -> Self {
            Self {
                keys: keys.into_iter().collect(),
                lookups: AtomicUsize::new(0),
                fail_with: None,
            }
        }

        fn failing(err: StoreError) -> Self {
            Self {
                fail_with: Some(err),
                ..Self::with_keys(Vec::new())
            }
        }

        fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl KeyStore for CountingStore {
        async fn exists(&self, id: &str) -> Result<bool, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(self.keys.contains(id)),
            }
        }

        fn enumerate_all(&self) -> KeyStream<'_> {
            stream::iter(self.keys.iter().cloned().map(Ok)).boxed()
        }
    }

    /// Oversized so that a handful of keys leaves false positives negligible
    fn frozen_filter(ids: &[&str]) -> Arc<BloomFilter> {
        let mut filter = BloomFilter::new(1000, 0.001).unwrap();
        for id in ids {
            filter.insert(id.as_bytes()).unwrap();
        }
        filter.into_frozen()
    }

    #[test]
    fn test_gate_requires_frozen_filter() {
        let filter = Arc::new(BloomFilter::new(10, 0.01).unwrap());
        let store = Arc::new(CountingStore::with_keys(Vec::new()));

        let result = AdmissionGate::new(filter, store);
        assert!(matches!(result, Err(FilterError::NotFrozen)));
    }

    #[test]
    fn test_gate_starts_enabled_and_toggles() {
        let store = Arc::new(CountingStore::with_keys(Vec::new()));
        let gate = AdmissionGate::new(frozen_filter(&["a"]), store).unwrap();

        assert!(gate.is_enabled());
        gate.disable();
        assert!(!gate.is_enabled());
        gate.disable();
        assert!(!gate.is_enabled());
        gate.enable();
        assert!(gate.is_enabled());
    }

    #[tokio::test]
    async fn test_absent_key_short_circuits_store() {
        let store = Arc::new(CountingStore::with_keys(vec!["user_1".to_string()]));
        let gate = AdmissionGate::new(frozen_filter(&["user_1"]), Arc::clone(&store)).unwrap();

        let verdict = gate.check("ghost_1").await.unwrap();

        assert_eq!(verdict, Verdict::rejected_by_filter());
        assert_eq!(store.lookups(), 0, "Store must not be consulted");
        assert_eq!(gate.metrics().snapshot().filter_rejections, 1);
    }

    #[tokio::test]
    async fn test_maybe_present_key_defers_to_store() {
        let store = Arc::new(CountingStore::with_keys(vec!["user_1".to_string()]));
        let gate = AdmissionGate::new(frozen_filter(&["user_1"]), Arc::clone(&store)).unwrap();

        let verdict = gate.check("user_1").await.unwrap();

        assert_eq!(verdict, Verdict::from_store(true));
        assert_eq!(store.lookups(), 1);
    }

    #[tokio::test]
    async fn test_store_answer_wins_over_filter_positive() {
        // In the filter but since removed from the store
        let store = Arc::new(CountingStore::with_keys(Vec::new()));
        let gate = AdmissionGate::new(frozen_filter(&["stale"]), Arc::clone(&store)).unwrap();

        let verdict = gate.check("stale").await.unwrap();

        assert!(!verdict.exists);
        assert_eq!(verdict.source, VerdictSource::Store);
        assert_eq!(store.lookups(), 1);
    }

    #[tokio::test]
    async fn test_disabled_gate_always_delegates() {
        let store = Arc::new(CountingStore::with_keys(vec![
            "user_1".to_string(),
            "not_in_filter".to_string(),
        ]));
        let gate = AdmissionGate::new(frozen_filter(&["user_1"]), Arc::clone(&store)).unwrap();
        gate.disable();

        assert_eq!(gate.check("user_1").await.unwrap(), Verdict::from_store(true));
        assert_eq!(gate.check("ghost_1").await.unwrap(), Verdict::from_store(false));
        assert_eq!(
            gate.check("not_in_filter").await.unwrap(),
            Verdict::from_store(true)
        );
        assert_eq!(store.lookups(), 3);
    }

    #[tokio::test]
    async fn test_store_error_propagated_without_retry() {
        let store = Arc::new(CountingStore::failing(StoreError::Timeout));
        let gate = AdmissionGate::new(frozen_filter(&["user_1"]), Arc::clone(&store)).unwrap();

        let result = gate.check("user_1").await;

        assert_eq!(result, Err(StoreError::Timeout));
        assert_eq!(store.lookups(), 1, "Gate must not retry");
        let snapshot = gate.metrics().snapshot();
        assert_eq!(snapshot.store_errors, 1);
        assert_eq!(snapshot.store_timeouts, 1);
    }

    #[tokio::test]
    async fn test_concurrent_checks_and_toggles() {
        let ids: Vec<String> = (0..200).map(|i| format!("user_{}", i)).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let store = Arc::new(CountingStore::with_keys(ids.clone()));
        let gate = Arc::new(AdmissionGate::new(frozen_filter(&refs), store).unwrap());

        let mut handles = Vec::new();
        for t in 0..8 {
            let gate = Arc::clone(&gate);
            handles.push(tokio::spawn(async move {
                for i in 0..200 {
                    if t == 0 && i % 50 == 0 {
                        gate.disable();
                        gate.enable();
                    }
                    let verdict = gate.check(&format!("user_{}", i)).await.unwrap();
                    assert!(verdict.exists);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(gate.metrics().snapshot().checks, 1600);
    }

    #[tokio::test]
    async fn test_gate_through_dyn_api() {
        let store = Arc::new(CountingStore::with_keys(vec!["user_1".to_string()]));
        let gate: Arc<dyn ExistenceCheckApi> =
            Arc::new(AdmissionGate::new(frozen_filter(&["user_1"]), store).unwrap());

        assert!(gate.check("user_1").await.unwrap().exists);
        gate.disable();
        assert!(!gate.is_enabled());
    }
}
