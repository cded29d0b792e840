//! Queue transport configuration.

use serde::{Deserialize, Serialize};

/// Queue transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Broker addresses
    #[serde(default = "default_brokers")]
    pub brokers: Vec<String>,
    /// Topic batches of raw records are consumed from
    #[serde(default = "default_queue_topic")]
    pub queue_topic: String,
    /// Topic undeliverable payloads are dead-lettered to
    #[serde(default = "default_dlq_topic")]
    pub dlq_topic: String,
    /// Topic enriched records are forwarded to
    #[serde(default = "default_output_topic")]
    pub output_topic: String,
    /// Maximum records per fetched batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Fetch wait timeout in milliseconds
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    /// SASL username (for managed broker authentication)
    #[serde(default)]
    pub sasl_username: Option<String>,
    /// SASL password (for managed broker authentication)
    #[serde(default)]
    pub sasl_password: Option<String>,
}

fn default_brokers() -> Vec<String> {
    vec!["localhost:9092".to_string()]
}

fn default_queue_topic() -> String {
    "geo_enricher_queue".to_string()
}

fn default_dlq_topic() -> String {
    "geo_enricher_dlq".to_string()
}

fn default_output_topic() -> String {
    "geo_enricher_out".to_string()
}

fn default_batch_size() -> usize {
    100
}

fn default_poll_timeout_ms() -> u64 {
    1000
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            brokers: default_brokers(),
            queue_topic: default_queue_topic(),
            dlq_topic: default_dlq_topic(),
            output_topic: default_output_topic(),
            batch_size: default_batch_size(),
            poll_timeout_ms: default_poll_timeout_ms(),
            sasl_username: None,
            sasl_password: None,
        }
    }
}

impl QueueConfig {
    /// Returns the broker list as a comma-separated string.
    pub fn broker_string(&self) -> String {
        self.brokers.join(",")
    }
}
