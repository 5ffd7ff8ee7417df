//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Core Bloom filter with its Populating -> Frozen lifecycle
//! - Double hashing over two salted base hashes
//! - Sizing math for (n, p)
//! - Filter configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod bloom_filter;
pub mod config;
pub mod hash_functions;
pub mod parameters;

pub use bloom_filter::{BloomFilter, FilterPhase};
pub use config::{FilterConfig, FilterConfigBuilder};
pub use hash_functions::{base_hashes, bit_indices};
pub use parameters::{calculate_fpr, calculate_optimal_parameters, FilterParams};
