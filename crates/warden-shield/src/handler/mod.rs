//! Handler Layer
//!
//! HTTP request boundary: parses the identifier, invokes the admission
//! gate and maps its outcome onto status codes. Also carries the small
//! administrative surface for toggling the gate.

pub mod http_handler;

pub use http_handler::{router, ShieldStatus};
