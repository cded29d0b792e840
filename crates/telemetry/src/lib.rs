//! Structured logging for the geo-enricher service.

pub mod tracing_setup;

pub use tracing_setup::*;
