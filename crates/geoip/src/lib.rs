//! Geolocation provider abstraction for the geo-enricher service.
//!
//! A provider turns an IP address into a [`Geolocation`] outcome:
//! - `ok` with the provider's answer
//! - `error` for network failures, timeouts, non-2xx, or bad payloads
//! - `unsupported_provider` when the configured identifier is unrecognized
//!
//! Adding a provider means adding a [`ProviderKind`] variant and its client,
//! not a string branch at the call site.

pub mod config;
pub mod ipstack;
pub mod provider;

pub use config::GeoConfig;
pub use ipstack::IpstackProvider;
pub use provider::{ConfiguredProvider, GeoProvider, ProviderKind};
