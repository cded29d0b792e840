//! Topic publisher shared by the output sink and the dead-letter path.

use chrono::Utc;
use rskafka::client::partition::{Compression, PartitionClient};
use rskafka::record::Record as WireRecord;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use enricher_core::{Error, Result};

use crate::client::connect_partition;
use crate::config::QueueConfig;

/// Publishes raw payloads to a single topic, partition 0.
pub struct Publisher {
    config: QueueConfig,
    topic: String,
    client: RwLock<Option<Arc<PartitionClient>>>,
}

impl Publisher {
    pub fn new(config: QueueConfig, topic: impl Into<String>) -> Self {
        Self {
            config,
            topic: topic.into(),
            client: RwLock::new(None),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    async fn ensure_connected(&self) -> Result<Arc<PartitionClient>> {
        {
            let client = self.client.read().await;
            if let Some(ref c) = *client {
                return Ok(c.clone());
            }
        }

        let client = connect_partition(&self.config, &self.topic).await?;

        {
            let mut guard = self.client.write().await;
            *guard = Some(client.clone());
        }

        Ok(client)
    }

    /// Publishes one batch of payloads in a single produce call.
    pub async fn publish(&self, payloads: Vec<Vec<u8>>) -> Result<()> {
        self.publish_with_headers(payloads, BTreeMap::new()).await
    }

    /// Publishes payloads, attaching the same headers to each record.
    pub async fn publish_with_headers(
        &self,
        payloads: Vec<Vec<u8>>,
        headers: BTreeMap<String, Vec<u8>>,
    ) -> Result<()> {
        if payloads.is_empty() {
            return Ok(());
        }

        let client = self.ensure_connected().await?;
        let count = payloads.len();

        let records: Vec<WireRecord> = payloads
            .into_iter()
            .map(|payload| WireRecord {
                key: None,
                value: Some(payload),
                headers: headers.clone(),
                timestamp: Utc::now(),
            })
            .collect();

        client
            .produce(records, Compression::NoCompression)
            .await
            .map_err(|e| {
                Error::queue(format!("Failed to publish to {}: {}", self.topic, e))
            })?;

        debug!(topic = %self.topic, count = count, "Published batch");
        Ok(())
    }

    /// Drops the cached connection (for error recovery).
    pub async fn reset_connection(&self) {
        let mut client = self.client.write().await;
        *client = None;
    }
}
