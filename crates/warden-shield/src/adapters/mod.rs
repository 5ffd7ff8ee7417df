//! Adapters Layer (Driven Adapters)
//!
//! Implementations of the `KeyStore` port.
//!
//! ## Adapters
//!
//! - `InMemoryKeyStore` - HashSet-backed store with `user_N` seeding
//! - `TimeoutKeyStore` - decorator bounding each point lookup

pub mod memory_store;
pub mod timeout_store;

pub use memory_store::InMemoryKeyStore;
pub use timeout_store::TimeoutKeyStore;
