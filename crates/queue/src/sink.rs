//! Output sink publishing enriched records to the output topic.

use async_trait::async_trait;
use tracing::debug;

use enricher_core::{Error, Record, RecordSink, Result};

use crate::config::QueueConfig;
use crate::publisher::Publisher;

/// Forwards enriched records to the configured output topic.
pub struct QueueSink {
    publisher: Publisher,
}

impl QueueSink {
    pub fn new(config: QueueConfig) -> Self {
        let publisher = Publisher::new(config.clone(), config.output_topic.clone());
        Self { publisher }
    }
}

#[async_trait]
impl RecordSink for QueueSink {
    async fn send(&self, records: Vec<Record>) -> Result<()> {
        let count = records.len();

        let payloads = records
            .into_iter()
            .map(|record| serde_json::to_vec(&record))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::sink(format!("Failed to serialize record: {}", e)))?;

        self.publisher
            .publish(payloads)
            .await
            .map_err(|e| Error::sink(e.to_string()))?;

        debug!(topic = %self.publisher.topic(), count = count, "Forwarded enriched batch");
        Ok(())
    }
}
