//! Batch processing with per-record failure isolation.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use enricher_core::{BatchHandler, Record, RecordSink};

use crate::enrichment::RecordEnricher;

/// What happened to one processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Records successfully enriched
    pub enriched: usize,
    /// Records dropped for failing validation
    pub dropped: usize,
    /// Whether the sink accepted the enriched records
    pub forwarded: bool,
}

/// Processes one batch at a time: enrich each record, drop the ones that
/// fail validation, forward the rest in a single sink call.
pub struct BatchProcessor {
    enricher: RecordEnricher,
    sink: Arc<dyn RecordSink>,
}

impl BatchProcessor {
    pub fn new(enricher: RecordEnricher, sink: Arc<dyn RecordSink>) -> Self {
        Self { enricher, sink }
    }

    /// Processes one batch.
    ///
    /// A record failing validation is dropped and logged; the rest of the
    /// batch continues. A sink failure is logged and swallowed: the batch
    /// counts as handled either way, with no retry or dead-lettering at
    /// this layer.
    pub async fn process(&self, batch: Vec<Record>) -> BatchOutcome {
        if batch.is_empty() {
            warn!("Received empty batch, skipping");
            return BatchOutcome::default();
        }

        info!(count = batch.len(), "Processing batch");

        let mut enriched = Vec::with_capacity(batch.len());
        let mut dropped = 0usize;

        for record in batch {
            match self.enricher.enrich(record).await {
                Ok(record) => enriched.push(record),
                Err(e) => {
                    dropped += 1;
                    warn!(error = %e, "Dropping record that failed enrichment");
                }
            }
        }

        let mut outcome = BatchOutcome {
            enriched: enriched.len(),
            dropped,
            forwarded: false,
        };

        if enriched.is_empty() {
            return outcome;
        }

        match self.sink.send(enriched).await {
            Ok(()) => {
                info!(count = outcome.enriched, "Forwarded enriched batch");
                outcome.forwarded = true;
            }
            Err(e) => {
                error!(error = %e, "Failed to forward enriched batch");
            }
        }

        outcome
    }
}

#[async_trait]
impl BatchHandler for BatchProcessor {
    async fn handle(&self, batch: Vec<Record>) {
        self.process(batch).await;
    }
}
