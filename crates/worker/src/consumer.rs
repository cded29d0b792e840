//! Consumer loop binding the queue source to the batch processor.

use std::sync::Arc;
use tracing::info;

use enricher_core::{BatchSource, Result};

use crate::processor::BatchProcessor;

/// Registers the batch processor with the queue source and lets the source
/// drive it. The loop itself holds no polling logic: delivery, batching,
/// and acknowledgment belong to the source. Any error from the source
/// propagates to the supervisor.
pub struct ConsumerLoop {
    source: Arc<dyn BatchSource>,
    processor: Arc<BatchProcessor>,
}

impl ConsumerLoop {
    pub fn new(source: Arc<dyn BatchSource>, processor: Arc<BatchProcessor>) -> Self {
        Self { source, processor }
    }

    /// Consumes until the source fails (`Err`) or ends delivery on its own
    /// (`Ok`, unexpected in normal operation). A batch already delivered is
    /// always fully processed; shutdown is observed one level up, between
    /// invocations of this method.
    pub async fn run(&self) -> Result<()> {
        info!("Consumer loop starting");
        self.source.consume(self.processor.as_ref()).await
    }
}
