//! Provider trait and closed provider dispatch.

use async_trait::async_trait;
use tracing::warn;

use enricher_core::{Geolocation, Result};

use crate::config::GeoConfig;
use crate::ipstack::IpstackProvider;

/// A geolocation lookup backend.
///
/// `lookup` models every failure it understands as a [`Geolocation`] state;
/// an `Err` is reserved for failures outside the provider contract and is
/// folded into the `error` state by the enricher.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// The identifier attached to lookup outcomes.
    fn name(&self) -> &str;

    /// Resolves one IP address to a geolocation outcome.
    async fn lookup(&self, ip: &str) -> Result<Geolocation>;
}

/// Supported provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Ipstack,
}

impl ProviderKind {
    /// Parses a configured identifier, case-insensitively.
    ///
    /// `None` is not an error: unrecognized identifiers are modeled as the
    /// `unsupported_provider` outcome at lookup time.
    pub fn parse(identifier: &str) -> Option<Self> {
        match identifier.to_ascii_lowercase().as_str() {
            "ipstack" => Some(Self::Ipstack),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ipstack => "ipstack",
        }
    }
}

enum Backend {
    Ipstack(IpstackProvider),
    /// Configured identifier did not match any [`ProviderKind`].
    Unsupported,
}

/// The provider selected by configuration.
///
/// Dispatch over the configured identifier happens exactly once, here;
/// lookups go straight to the selected backend.
pub struct ConfiguredProvider {
    name: String,
    backend: Backend,
}

impl ConfiguredProvider {
    /// Selects and constructs the backend for `config.provider`.
    pub fn from_config(config: &GeoConfig) -> Result<Self> {
        let name = config.provider.to_ascii_lowercase();
        let backend = match ProviderKind::parse(&name) {
            Some(ProviderKind::Ipstack) => Backend::Ipstack(IpstackProvider::new(config)?),
            None => Backend::Unsupported,
        };

        Ok(Self { name, backend })
    }

    /// Whether the configured identifier mapped to a real backend.
    pub fn is_supported(&self) -> bool {
        !matches!(self.backend, Backend::Unsupported)
    }
}

#[async_trait]
impl GeoProvider for ConfiguredProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, ip: &str) -> Result<Geolocation> {
        match &self.backend {
            Backend::Ipstack(provider) => provider.lookup(ip).await,
            Backend::Unsupported => {
                warn!(provider = %self.name, "Unsupported geolocation provider");
                Ok(Geolocation::unsupported(&self.name))
            }
        }
    }
}
