//! Consume-enrich-forward pipeline for the geo-enricher service.
//!
//! Control flow, outermost first:
//! - Supervisor (restart/backoff policy, shutdown, exit status)
//! - ConsumerLoop (binds the queue source to the batch processor)
//! - BatchProcessor (per-record failure isolation, sink forwarding)
//! - RecordEnricher (validation plus geolocation attachment)

pub mod consumer;
pub mod enrichment;
pub mod processor;
pub mod shutdown;
pub mod supervisor;

pub use consumer::ConsumerLoop;
pub use enrichment::RecordEnricher;
pub use processor::{BatchOutcome, BatchProcessor};
pub use shutdown::{spawn_signal_listener, ShutdownToken};
pub use supervisor::{ExitStatus, Supervisor, SupervisorConfig};
