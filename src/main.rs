//! geo-enricher service
//!
//! Queue-driven enrichment pipeline:
//! - Consume record batches from the work queue
//! - Attach geolocation derived from each record's IP address
//! - Forward enriched batches to the output topic
//! - Supervised restart with fixed backoff on consumer failure

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use geoip::{ConfiguredProvider, GeoConfig};
use queue::{QueueConfig, QueueConsumer, QueueSink};
use telemetry::init_tracing_from_env;
use worker::{
    spawn_signal_listener, BatchProcessor, ConsumerLoop, ExitStatus, RecordEnricher,
    ShutdownToken, Supervisor,
};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_service_name")]
    service_name: String,

    #[serde(default)]
    queue: QueueConfig,

    #[serde(default)]
    geo: GeoConfig,
}

fn default_service_name() -> String {
    "geo-enricher".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            queue: QueueConfig::default(),
            geo: GeoConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(status) => ExitCode::from(status.code()),
        Err(e) => {
            eprintln!("geo-enricher failed to start: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitStatus> {
    // Install rustls crypto provider BEFORE any TLS operations
    // rustls 0.23+ requires explicit crypto provider selection
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting geo-enricher v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    info!(
        service = %config.service_name,
        queue = %config.queue.queue_topic,
        dlq = %config.queue.dlq_topic,
        provider = %config.geo.provider,
        "Loaded configuration"
    );

    // Geolocation provider, selected once from configuration
    let provider = Arc::new(
        ConfiguredProvider::from_config(&config.geo)
            .context("Failed to create geolocation provider")?,
    );

    // Queue collaborators
    let source = Arc::new(QueueConsumer::new(config.queue.clone()));
    let sink = Arc::new(QueueSink::new(config.queue.clone()));

    // Pipeline
    let enricher = RecordEnricher::new(provider);
    let processor = Arc::new(BatchProcessor::new(enricher, sink));
    let consumer_loop = ConsumerLoop::new(source, processor);

    // Cooperative shutdown on SIGINT/SIGTERM
    let shutdown = ShutdownToken::new();
    let _signal_handle = spawn_signal_listener(shutdown.clone());

    let supervisor = Supervisor::new(consumer_loop, shutdown);
    let status = supervisor.run().await;

    info!("Service shutdown complete");
    Ok(status)
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("ENRICHER")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested config from environment
    // The config crate's nested parsing doesn't work reliably with underscored field names
    if let Ok(name) = std::env::var("ENRICHER_SERVICE_NAME") {
        config.service_name = name;
    }
    if let Ok(brokers) = std::env::var("ENRICHER_QUEUE_BROKERS") {
        config.queue.brokers = brokers.split(',').map(|s| s.trim().to_string()).collect();
    }
    if let Ok(topic) = std::env::var("ENRICHER_QUEUE_TOPIC") {
        config.queue.queue_topic = topic;
    }
    if let Ok(topic) = std::env::var("ENRICHER_DLQ_TOPIC") {
        config.queue.dlq_topic = topic;
    }
    if let Ok(topic) = std::env::var("ENRICHER_OUTPUT_TOPIC") {
        config.queue.output_topic = topic;
    }
    if let Ok(username) = std::env::var("ENRICHER_QUEUE_SASL_USERNAME") {
        config.queue.sasl_username = Some(username);
    }
    if let Ok(password) = std::env::var("ENRICHER_QUEUE_SASL_PASSWORD") {
        config.queue.sasl_password = Some(password);
    }
    if let Ok(provider) = std::env::var("ENRICHER_GEO_PROVIDER") {
        config.geo.provider = provider;
    }
    if let Ok(api_key) = std::env::var("ENRICHER_GEO_API_KEY") {
        config.geo.api_key = api_key;
    }
    if let Ok(base_url) = std::env::var("ENRICHER_GEO_BASE_URL") {
        config.geo.base_url = base_url;
    }

    Ok(config)
}
