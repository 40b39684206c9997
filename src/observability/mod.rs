//! Observability module
//!
//! Structured logging and the content-diagnostics channel.

pub mod logging;

pub use logging::{DIAGNOSTICS_TARGET, LogFormat, init_logging};
