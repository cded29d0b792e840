//! Queue consumer delivering record batches to a handler.
//!
//! Implements the `BatchSource` seam: `consume` registers the handler once
//! and drives it with every fetched batch until the transport fails. Offsets
//! are committed after the handler returns (at-least-once delivery), and
//! payloads that fail to decode are dead-lettered instead of delivered.

use async_trait::async_trait;
use rskafka::client::partition::{OffsetAt, PartitionClient};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use enricher_core::{BatchHandler, BatchSource, Error, Record, Result};

use crate::client::connect_partition;
use crate::config::QueueConfig;
use crate::publisher::Publisher;

/// Offset to commit after a batch is handled.
#[derive(Debug, Clone, Copy)]
struct CommitOffset(i64);

/// Consumer for the work-queue topic.
pub struct QueueConsumer {
    config: QueueConfig,
    dlq: Publisher,
    client: RwLock<Option<Arc<PartitionClient>>>,
    /// Next offset to read
    current_offset: AtomicI64,
    initialized: AtomicBool,
}

impl QueueConsumer {
    pub fn new(config: QueueConfig) -> Self {
        info!(
            topic = %config.queue_topic,
            dlq = %config.dlq_topic,
            batch_size = config.batch_size,
            "Creating queue consumer"
        );

        let dlq = Publisher::new(config.clone(), config.dlq_topic.clone());

        Self {
            config,
            dlq,
            client: RwLock::new(None),
            current_offset: AtomicI64::new(-1),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    async fn ensure_connected(&self) -> Result<Arc<PartitionClient>> {
        {
            let client = self.client.read().await;
            if let Some(ref c) = *client {
                return Ok(c.clone());
            }
        }

        let client = connect_partition(&self.config, &self.config.queue_topic).await?;

        if !self.initialized.load(Ordering::SeqCst) {
            let offset = client
                .get_offset(OffsetAt::Latest)
                .await
                .map_err(|e| Error::queue(format!("Failed to get offset: {}", e)))?;

            self.current_offset.store(offset, Ordering::SeqCst);
            self.initialized.store(true, Ordering::SeqCst);

            info!(
                topic = %self.config.queue_topic,
                offset = offset,
                "Consumer initialized at offset"
            );
        }

        {
            let mut guard = self.client.write().await;
            *guard = Some(client.clone());
        }

        Ok(client)
    }

    /// Fetches one batch, dead-lettering payloads that fail to decode.
    ///
    /// Returns the decoded records and the offset to commit once they are
    /// handled.
    async fn fetch_batch(&self) -> Result<(Vec<Record>, Option<CommitOffset>)> {
        let client = self.ensure_connected().await?;

        let timeout = Duration::from_millis(self.config.poll_timeout_ms);
        let max_bytes = self.config.batch_size * 64 * 1024; // ~64KB budget per record

        let current = self.current_offset.load(Ordering::SeqCst);

        let (fetched, _watermark) = client
            .fetch_records(current, 1..max_bytes as i32, timeout.as_millis() as i32)
            .await
            .map_err(|e| {
                // Connection-level failure: drop the cached client so the
                // next attempt reconnects
                Error::queue(format!("Failed to fetch records: {}", e))
            })?;

        if fetched.is_empty() {
            return Ok((Vec::new(), None));
        }

        let mut batch = Vec::with_capacity(fetched.len());
        let mut max_offset = current;

        for entry in fetched {
            max_offset = entry.offset.max(max_offset);

            let Some(payload) = entry.record.value else {
                continue;
            };

            match decode_record(&payload) {
                Ok(record) => batch.push(record),
                Err(e) => {
                    warn!(
                        offset = entry.offset,
                        error = %e,
                        "Undecodable payload, dead-lettering"
                    );
                    self.dead_letter(payload, &e).await;
                }
            }
        }

        debug!(
            records = batch.len(),
            offset_start = current,
            offset_end = max_offset,
            "Fetched batch from queue"
        );

        Ok((batch, Some(CommitOffset(max_offset + 1))))
    }

    /// Publishes an undecodable payload to the DLQ with the decode error
    /// attached as a header. DLQ failure is logged, not fatal: losing a
    /// malformed payload must not take the consumer down.
    async fn dead_letter(&self, payload: Vec<u8>, cause: &Error) {
        let mut headers = BTreeMap::new();
        headers.insert("error".to_string(), cause.to_string().into_bytes());

        if let Err(e) = self.dlq.publish_with_headers(vec![payload], headers).await {
            warn!(dlq = %self.config.dlq_topic, error = %e, "Failed to dead-letter payload");
        }
    }

    fn commit(&self, offset: CommitOffset) {
        let prev = self.current_offset.swap(offset.0, Ordering::SeqCst);
        debug!(prev_offset = prev, new_offset = offset.0, "Committed offset");
    }

    /// Drops the cached connection (for error recovery).
    pub async fn reset_connection(&self) {
        let mut client = self.client.write().await;
        *client = None;
        info!("Consumer connection reset");
    }
}

fn decode_record(payload: &[u8]) -> Result<Record> {
    let value: serde_json::Value = serde_json::from_slice(payload)?;
    Record::from_value(value)
}

#[async_trait]
impl BatchSource for QueueConsumer {
    async fn consume(&self, handler: &dyn BatchHandler) -> Result<()> {
        info!(topic = %self.config.queue_topic, "Consuming from queue");

        loop {
            let (batch, offset) = match self.fetch_batch().await {
                Ok(fetched) => fetched,
                Err(e) => {
                    self.reset_connection().await;
                    return Err(e);
                }
            };

            if !batch.is_empty() {
                handler.handle(batch).await;
            }

            // Commit even when every payload in the fetch was dead-lettered,
            // otherwise the consumer refetches the same poison batch forever
            if let Some(offset) = offset {
                self.commit(offset);
            }
        }
    }
}
