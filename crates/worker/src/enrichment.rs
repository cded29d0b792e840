//! Record enrichment: validate, look up, attach.

use std::sync::Arc;
use tracing::{debug, error};

use enricher_core::record::IP_ADDRESS_FIELD;
use enricher_core::{Error, Geolocation, Record, Result};
use geoip::GeoProvider;

/// Attaches a geolocation outcome to each record.
///
/// The only error this returns is `MissingField` for records without an
/// `ip_address`; every provider-side failure is folded into the record's
/// `geolocation` state so enrichment cannot fail past validation.
pub struct RecordEnricher {
    provider: Arc<dyn GeoProvider>,
}

impl RecordEnricher {
    pub fn new(provider: Arc<dyn GeoProvider>) -> Self {
        Self { provider }
    }

    /// Enriches one record, returning it with a `geolocation` field in
    /// exactly one of its four states. A pre-existing `geolocation` field
    /// is overwritten, not merged.
    pub async fn enrich(&self, mut record: Record) -> Result<Record> {
        let ip = record
            .ip_address()
            .map(str::to_string)
            .ok_or_else(|| Error::missing_field(IP_ADDRESS_FIELD))?;

        let geo = match self.provider.lookup(&ip).await {
            Ok(geo) => geo,
            Err(e) => {
                // Failures outside the provider's modeled states still end
                // up as an `error` outcome, never as a propagated error
                error!(ip = %ip, error = %e, "Geolocation lookup failed");
                Geolocation::error(self.provider.name(), e.to_string())
            }
        };

        debug!(ip = %ip, status = geo.status(), "Enriched record");
        record.set_geolocation(&geo)?;
        Ok(record)
    }
}
