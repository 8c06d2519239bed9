//! OpenWeatherMap direct and reverse geocoding (primary provider)

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::config::OpenWeatherConfig;
use crate::http::{Provider, get_json};
use crate::models::GeocodeCandidate;

/// One entry of the `/geo/1.0/direct` and `/geo/1.0/reverse` arrays
#[derive(Debug, Deserialize)]
struct OwmGeocodingResult {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

impl From<OwmGeocodingResult> for GeocodeCandidate {
    fn from(result: OwmGeocodingResult) -> Self {
        GeocodeCandidate {
            name: result.name,
            lat: result.lat,
            lon: result.lon,
            country: result.country,
            region: result.state,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl OpenWeatherGeocoder {
    pub fn new(client: Client, config: &OpenWeatherConfig, api_key: &str) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout: config.timeout(),
        }
    }

    /// Forward lookup. An empty list means the provider definitively found
    /// nothing; every other failure is an error.
    #[instrument(skip(self))]
    pub async fn direct(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        info!("Geocoding location: '{}'", query);

        let url = format!(
            "{}/geo/1.0/direct?q={}&limit=1&appid={}",
            self.base_url,
            urlencoding::encode(query),
            self.api_key
        );

        let results: Vec<OwmGeocodingResult> =
            get_json(&self.client, Provider::OpenWeatherGeocoding, &url, self.timeout).await?;

        let candidates: Vec<GeocodeCandidate> = results.into_iter().map(Into::into).collect();

        if candidates.is_empty() {
            warn!("No results found for location '{}'", query);
        } else {
            debug!(
                "Geocoding results: {:?}",
                candidates
                    .iter()
                    .map(|c| format!("{} ({:.4}, {:.4})", c.name, c.lat, c.lon))
                    .collect::<Vec<_>>()
            );
        }

        Ok(candidates)
    }

    /// Reverse lookup for a display name
    #[instrument(skip(self))]
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Vec<GeocodeCandidate>> {
        let url = format!(
            "{}/geo/1.0/reverse?lat={}&lon={}&limit=1&appid={}",
            self.base_url, lat, lon, self.api_key
        );

        let results: Vec<OwmGeocodingResult> =
            get_json(&self.client, Provider::OpenWeatherGeocoding, &url, self.timeout).await?;

        Ok(results.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_to_candidate() {
        let json = r#"[{"name":"Paris","local_names":{"fr":"Paris"},"lat":48.8589,"lon":2.32,"country":"FR","state":"Ile-de-France"}]"#;
        let results: Vec<OwmGeocodingResult> = serde_json::from_str(json).unwrap();
        let candidate: GeocodeCandidate = results.into_iter().next().unwrap().into();
        assert_eq!(candidate.display_name(), "Paris, Ile-de-France, FR");
        assert_eq!(candidate.lat, 48.8589);
    }

    #[test]
    fn test_result_without_state() {
        let json = r#"[{"name":"Monaco","lat":43.73,"lon":7.42,"country":"MC"}]"#;
        let results: Vec<OwmGeocodingResult> = serde_json::from_str(json).unwrap();
        let candidate: GeocodeCandidate = results.into_iter().next().unwrap().into();
        assert_eq!(candidate.display_name(), "Monaco, MC");
    }
}
