//! # Warden Server
//!
//! Serves `/check?id=...` behind a Bloom-filter admission gate.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (from env)
//! 2. Seed the backing store
//! 3. Size the filter, populate it from a full key enumeration, freeze it
//! 4. Build the admission gate over the frozen filter
//! 5. Serve HTTP until Ctrl+C
//!
//! Population completes before the listener is bound, so no request can
//! observe a filter that is still being written.

mod config;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use warden_shield::{populate_filter, router, AdmissionGate, InMemoryKeyStore, TimeoutKeyStore};

use crate::config::ServerConfig;

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    info!("===========================================");
    info!("  Warden v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let config = ServerConfig::from_env();
    config
        .filter
        .validate()
        .context("Invalid filter configuration")?;

    // Step 1: backing store
    let store = Arc::new(InMemoryKeyStore::new());
    let started = Instant::now();
    let added = store.seed(config.store.seed_count);
    info!(
        added,
        total = store.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Store ready"
    );

    // Step 2: single-writer population, then freeze
    let filter = populate_filter(&config.filter, store.as_ref())
        .await
        .context("Failed to populate filter from store")?;

    // Step 3: gate over the frozen filter
    let store = Arc::new(TimeoutKeyStore::new(store, config.store.lookup_timeout()));
    let gate = AdmissionGate::new(filter, store).context("Failed to build admission gate")?;
    let gate = Arc::new(gate);

    // Step 4: serve
    let addr = config.http.addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Warden is active on /check?id=...");

    axum::serve(listener, router(gate))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutdown complete");
    Ok(())
}
