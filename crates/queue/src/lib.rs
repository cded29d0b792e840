//! Kafka-compatible queue transport for the geo-enricher service.
//!
//! Uses rskafka for broker access with:
//! - Manual offset management for at-least-once delivery
//! - Batch fetching with configurable size and timeout
//! - JSON (de)serialization of records
//! - Dead-letter publishing for payloads that fail to decode
//!
//! The worker crate never sees this crate directly; it consumes the
//! `BatchSource` and `RecordSink` seams from `enricher-core`.

pub mod client;
pub mod config;
pub mod consumer;
pub mod publisher;
pub mod sink;

pub use config::QueueConfig;
pub use consumer::QueueConsumer;
pub use publisher::Publisher;
pub use sink::QueueSink;
