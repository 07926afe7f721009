//! Observability module
//!
//! Structured logging for build runs.

pub mod logging;

pub use logging::{LogFormat, init_logging};
