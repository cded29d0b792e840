//! Geolocation outcome attached to every enriched record.

use serde::{Deserialize, Serialize};

/// Outcome of a geolocation lookup.
///
/// Exactly one state holds at any time, tagged by `status` on the wire.
/// Every record leaving the enricher carries one of these under its
/// `geolocation` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Geolocation {
    /// Lookup succeeded; carries the queried IP and the answering provider.
    Ok {
        ip: String,
        country: Option<String>,
        region: Option<String>,
        city: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        provider: String,
    },

    /// The configured provider identifier is not recognized.
    UnsupportedProvider { provider: String },

    /// The provider call failed (network, timeout, non-2xx, bad payload).
    Error { error: String, provider: String },

    /// Never attempted.
    Unknown,
}

impl Geolocation {
    pub fn error(provider: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::Error {
            error: cause.into(),
            provider: provider.into(),
        }
    }

    pub fn unsupported(provider: impl Into<String>) -> Self {
        Self::UnsupportedProvider {
            provider: provider.into(),
        }
    }

    /// The `status` tag this outcome serializes under.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Ok { .. } => "ok",
            Self::UnsupportedProvider { .. } => "unsupported_provider",
            Self::Error { .. } => "error",
            Self::Unknown => "unknown",
        }
    }
}
