//! Google Geocoding API (secondary provider)
//!
//! The response carries its own `status` on top of the HTTP status; it is
//! normalized into the same [`GeocodeCandidate`] shape as the primary.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::config::GoogleGeocodingConfig;
use crate::http::{Provider, get_json};
use crate::models::GeocodeCandidate;
use crate::{Result, SkycastError};

#[derive(Debug, Deserialize)]
struct GoogleGeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleResult {
    formatted_address: String,
    geometry: GoogleGeometry,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct GoogleGeometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    short_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl GoogleResult {
    fn component(&self, kind: &str) -> Option<&AddressComponent> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
    }

    /// Use the structured components when a city is present, the
    /// pre-formatted address otherwise.
    fn into_candidate(self) -> GeocodeCandidate {
        let city = self
            .component("locality")
            .or_else(|| self.component("postal_town"))
            .map(|c| c.long_name.clone());

        match city {
            Some(name) => GeocodeCandidate {
                name,
                lat: self.geometry.location.lat,
                lon: self.geometry.location.lng,
                country: self.component("country").map(|c| c.short_name.clone()),
                region: self
                    .component("administrative_area_level_1")
                    .map(|c| c.long_name.clone()),
            },
            None => GeocodeCandidate {
                name: self.formatted_address,
                lat: self.geometry.location.lat,
                lon: self.geometry.location.lng,
                country: None,
                region: None,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl GoogleGeocoder {
    pub fn new(client: Client, config: &GoogleGeocodingConfig, api_key: &str) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: api_key.to_string(),
            timeout: config.timeout(),
        }
    }

    /// Forward lookup. `ZERO_RESULTS` yields an empty list; any status other
    /// than `OK` is an upstream error.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        info!("Geocoding '{}' with secondary provider", query);

        let url = format!(
            "{}?address={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            self.api_key
        );

        let response: GoogleGeocodeResponse =
            get_json(&self.client, Provider::GoogleGeocoding, &url, self.timeout).await?;

        interpret(response)
    }
}

fn interpret(response: GoogleGeocodeResponse) -> Result<Vec<GeocodeCandidate>> {
    match response.status.as_str() {
        "OK" => Ok(response
            .results
            .into_iter()
            .map(GoogleResult::into_candidate)
            .collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => {
            let detail = response.error_message.unwrap_or_default();
            warn!("Google geocoding returned status {}: {}", status, detail);
            Err(SkycastError::upstream(
                Provider::GoogleGeocoding,
                Some(200),
                format!("status {status}: {detail}"),
            ))
        }
    }
}
