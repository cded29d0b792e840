//! Seam traits between the pipeline and its collaborators.
//!
//! The queue transport and the output sink live behind these traits so the
//! worker crate never depends on a concrete broker and tests can swap in
//! in-memory implementations.

use async_trait::async_trait;

use crate::{Record, Result};

/// Receives batches delivered by a [`BatchSource`].
#[async_trait]
pub trait BatchHandler: Send + Sync {
    /// Handles one delivered batch. Must not panic; record-level failures
    /// are contained inside the handler.
    async fn handle(&self, batch: Vec<Record>);
}

/// A source of record batches (the work queue collaborator).
#[async_trait]
pub trait BatchSource: Send + Sync {
    /// Consumes batches indefinitely, invoking `handler` once per delivered
    /// batch. Returns only when the transport fails (`Err`) or shuts the
    /// stream down on its own (`Ok`, not expected in normal operation).
    async fn consume(&self, handler: &dyn BatchHandler) -> Result<()>;
}

/// Destination for enriched records (the output sink collaborator).
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Forwards one enriched batch in a single call.
    async fn send(&self, records: Vec<Record>) -> Result<()>;
}
