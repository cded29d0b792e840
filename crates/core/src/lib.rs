//! Core types and pipeline seams for the geo-enricher service.

pub mod error;
pub mod geolocation;
pub mod pipeline;
pub mod record;

pub use error::{Error, Result};
pub use geolocation::Geolocation;
pub use pipeline::{BatchHandler, BatchSource, RecordSink};
pub use record::Record;
