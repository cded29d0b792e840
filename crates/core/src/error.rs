//! Unified error types for the geo-enricher service.
//!
//! The taxonomy mirrors the recovery boundaries of the pipeline:
//! - `MissingField` drops a single record, the batch continues
//! - `Provider` is folded into the record's `geolocation` state
//! - `Sink` is logged by the batch processor and swallowed
//! - `Queue` escapes the consumer loop and is handled by the supervisor

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the geo-enricher service.
#[derive(Debug, Error)]
pub enum Error {
    /// A record is missing a field the enricher requires.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A geolocation provider call failed (network, timeout, non-2xx,
    /// or malformed payload).
    #[error("provider error: {0}")]
    Provider(String),

    /// The queue transport failed while consuming or committing.
    #[error("queue error: {0}")]
    Queue(String),

    /// Forwarding an enriched batch to the output sink failed.
    #[error("sink error: {0}")]
    Sink(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn queue(msg: impl Into<String>) -> Self {
        Self::Queue(msg.into())
    }

    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is recoverable at record granularity.
    ///
    /// Record-level errors never escape the batch processor; everything
    /// else propagates up to the supervisor's restart boundary.
    pub fn is_record_level(&self) -> bool {
        matches!(self, Self::MissingField(_) | Self::Provider(_))
    }
}
