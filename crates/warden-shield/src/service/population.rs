//! Filter population
//!
//! Runs once, sequentially, before serving begins. The single writer drains
//! the store's key stream into the filter and freezes it; only the frozen,
//! `Arc`-wrapped filter ever leaves this module.

use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;
use tracing::{error, info, warn};

use crate::domain::{BloomFilter, FilterConfig};
use crate::error::FilterError;
use crate::ports::{KeyStore, KeyStream};

/// Log a progress line every this many keys
pub const PROGRESS_INTERVAL: u64 = 100_000;

/// Drain `keys` into `filter`, then freeze it
///
/// The stream is consumed exactly once. Any enumeration error aborts the
/// build; a partially populated filter is never returned.
pub async fn populate_from_stream(
    mut filter: BloomFilter,
    mut keys: KeyStream<'_>,
) -> Result<Arc<BloomFilter>, FilterError> {
    let started = Instant::now();

    while let Some(key) = keys.next().await {
        let key = key.map_err(|e| {
            error!(
                loaded = filter.elements_inserted(),
                error = %e,
                "Store enumeration failed, aborting filter population"
            );
            FilterError::Store(e)
        })?;
        filter.insert(key.as_bytes())?;

        let loaded = filter.elements_inserted();
        if loaded % PROGRESS_INTERVAL == 0 {
            info!(loaded, "Loading keys into filter");
        }
    }

    let loaded = filter.elements_inserted();
    if loaded > filter.expected_items() as u64 {
        warn!(
            loaded,
            expected = filter.expected_items(),
            estimated_fpr = filter.estimated_fpr(),
            "Store holds more keys than the filter was sized for"
        );
    }

    let frozen = filter.into_frozen();
    info!(
        loaded,
        elapsed_ms = started.elapsed().as_millis() as u64,
        bits_set = frozen.bits_set(),
        estimated_fpr = frozen.estimated_fpr(),
        frozen = frozen.is_frozen(),
        "Filter populated and frozen"
    );

    Ok(frozen)
}

/// Size a filter from `config` and populate it from every key in `store`
pub async fn populate_filter<S>(
    config: &FilterConfig,
    store: &S,
) -> Result<Arc<BloomFilter>, FilterError>
where
    S: KeyStore + ?Sized,
{
    let filter = BloomFilter::from_config(config)?;
    info!(
        size_bits = filter.size_bits(),
        hash_count = filter.hash_count(),
        words = filter.word_count(),
        expected_items = filter.expected_items(),
        "Bloom filter initialized"
    );
    populate_from_stream(filter, store.enumerate_all()).await
}
