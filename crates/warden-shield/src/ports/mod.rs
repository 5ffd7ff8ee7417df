//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - the existence-check API offered to callers
//! - Driven Ports (outbound) - the authoritative key store we depend on

pub mod inbound;
pub mod outbound;

pub use inbound::{ExistenceCheckApi, Verdict, VerdictSource};
pub use outbound::{KeyStore, KeyStream};
