//! Shared broker connection helpers.

use rskafka::client::{
    partition::{PartitionClient, UnknownTopicHandling},
    ClientBuilder, Credentials, SaslConfig,
};
use std::sync::Arc;

use enricher_core::{Error, Result};

use crate::config::QueueConfig;

/// Creates a TLS configuration for managed brokers.
fn create_tls_config() -> Arc<rustls::ClientConfig> {
    let root_store =
        rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Arc::new(config)
}

/// Connects to the brokers and returns a client for `topic`, partition 0.
pub async fn connect_partition(config: &QueueConfig, topic: &str) -> Result<Arc<PartitionClient>> {
    let connection = config.broker_string();
    let mut builder = ClientBuilder::new(vec![connection]);

    // TLS plus SASL auth only when credentials are configured
    if let (Some(username), Some(password)) = (&config.sasl_username, &config.sasl_password) {
        builder = builder
            .tls_config(create_tls_config())
            .sasl_config(SaslConfig::ScramSha256(Credentials::new(
                username.clone(),
                password.clone(),
            )));
    }

    let client = builder
        .build()
        .await
        .map_err(|e| Error::queue(format!("Failed to connect to brokers: {}", e)))?;

    let partition_client = client
        .partition_client(topic.to_string(), 0, UnknownTopicHandling::Error)
        .await
        .map_err(|e| {
            Error::queue(format!(
                "Failed to get partition client for {}: {}",
                topic, e
            ))
        })?;

    Ok(Arc::new(partition_client))
}
