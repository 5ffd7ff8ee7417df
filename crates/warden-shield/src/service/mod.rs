//! Service Layer
//!
//! Contains the application services that compose the filter with the
//! backing store:
//! - `population` - one-shot build of the filter from a store enumeration
//! - `admission_gate` - the existence-check protocol served afterwards

pub mod admission_gate;
pub mod population;

pub use admission_gate::AdmissionGate;
pub use population::{populate_filter, populate_from_stream, PROGRESS_INTERVAL};
