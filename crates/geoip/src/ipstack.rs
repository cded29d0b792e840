//! ipstack HTTP lookup client.
//!
//! `GET {base_url}/{ip}?access_key={key}` returning a JSON payload with
//! `country_code`, `region_code`, `city`, `latitude`, `longitude`.

use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use enricher_core::{Error, Geolocation, Result};

use crate::config::GeoConfig;

const PROVIDER_NAME: &str = "ipstack";

/// Relevant subset of the ipstack response payload.
#[derive(Debug, Deserialize)]
struct IpstackResponse {
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    region_code: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

/// Lookup client for the ipstack HTTP API.
///
/// Every failure mode (connect error, timeout, non-2xx, malformed JSON)
/// surfaces as the `error` geolocation state; `lookup` never hangs past the
/// configured timeout and never fails past this boundary.
pub struct IpstackProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl IpstackProvider {
    pub fn new(config: &GeoConfig) -> Result<Self> {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout,
        })
    }

    pub async fn lookup(&self, ip: &str) -> Result<Geolocation> {
        match self.fetch(ip).await {
            Ok(data) => {
                let geo = map_response(ip, data);
                debug!(ip = %ip, "Resolved geolocation via ipstack");
                Ok(geo)
            }
            Err(e) => {
                warn!(ip = %ip, error = %e, "ipstack lookup failed");
                Ok(Geolocation::error(PROVIDER_NAME, e.to_string()))
            }
        }
    }

    /// Issues the lookup request; any failure maps to `Error::Provider`.
    async fn fetch(&self, ip: &str) -> Result<IpstackResponse> {
        let url = format!("{}/{}?access_key={}", self.base_url, ip, self.api_key);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify_request_error(&e, self.timeout))?;

        let response = response
            .error_for_status()
            .map_err(|e| Error::provider(format!("lookup returned {}", describe_status(&e))))?;

        response
            .json::<IpstackResponse>()
            .await
            .map_err(|e| Error::provider(format!("malformed lookup payload: {}", e)))
    }
}

fn map_response(ip: &str, data: IpstackResponse) -> Geolocation {
    Geolocation::Ok {
        ip: ip.to_string(),
        country: data.country_code,
        region: data.region_code,
        city: data.city,
        latitude: data.latitude,
        longitude: data.longitude,
        provider: PROVIDER_NAME.to_string(),
    }
}

fn classify_request_error(e: &reqwest::Error, timeout: Duration) -> Error {
    if e.is_timeout() {
        Error::provider(format!("lookup timed out after {:?}", timeout))
    } else {
        // reqwest error chains embed the full URL; keep the message free of
        // the access_key query parameter.
        Error::provider(format!("lookup request failed: {}", source_message(e)))
    }
}

fn describe_status(e: &reqwest::Error) -> String {
    e.status()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "non-2xx status".to_string())
}

fn source_message(e: &reqwest::Error) -> String {
    use std::error::Error as _;
    match e.source() {
        Some(source) => source.to_string(),
        None => "request error".to_string(),
    }
}
