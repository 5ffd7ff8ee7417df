//! # Warden Shield
//!
//! Bloom-filter admission gate in front of a slow, authoritative
//! key-existence store. Keys the filter proves absent are rejected without
//! touching the store; everything else is answered by the store.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `BloomFilter`: bit-packed filter with a Populating -> Frozen lifecycle
//!   - `hash_functions`: salted MurmurHash3 pair + double hashing
//!   - `parameters`: optimal (m, k) for (n, p)
//!   - `FilterConfig` / `FilterConfigBuilder`: validated sizing inputs
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `ExistenceCheckApi`: Driving port (inbound API)
//!   - `KeyStore`: Driven port (authoritative store)
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `populate_filter`: one-shot build from the store's key enumeration
//!   - `AdmissionGate`: implements `ExistenceCheckApi`
//!
//! - **Adapters Layer** (`adapters/`): `KeyStore` implementations
//!   - `InMemoryKeyStore`, `TimeoutKeyStore`
//!
//! - **Handler Layer** (`handler/`): axum routes for `/check` and `/shield`
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: FPR = (1 - e^(-kn/m))^k <= target_fpr
//! - **INVARIANT-2**: No false negatives - if inserted, contains() MUST return true
//! - **INVARIANT-3**: A gate only ever serves a frozen filter
//!
//! ## Usage Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use warden_shield::{populate_filter, AdmissionGate, FilterConfig, InMemoryKeyStore};
//!
//! let store = Arc::new(InMemoryKeyStore::new());
//! store.seed(1_000);
//!
//! let filter = populate_filter(&FilterConfig::new(1_000, 0.01)?, store.as_ref()).await?;
//! let gate = AdmissionGate::new(filter, store)?;
//!
//! assert!(gate.check("user_500").await?.exists);
//! assert!(!gate.check("ghost_1").await?.exists);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{InMemoryKeyStore, TimeoutKeyStore};
pub use domain::{BloomFilter, FilterConfig, FilterConfigBuilder, FilterPhase};
pub use error::{FilterError, StoreError};
pub use handler::{router, ShieldStatus};
pub use metrics::{GateMetrics, MetricsSnapshot};
pub use ports::{ExistenceCheckApi, KeyStore, KeyStream, Verdict, VerdictSource};
pub use service::{populate_filter, populate_from_stream, AdmissionGate};
