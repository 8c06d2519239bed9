//! Air quality from OpenWeatherMap `/data/2.5/air_pollution`
//!
//! Air quality is optional data: every failure is logged here and handed
//! back as a [`DegradedData`] marker instead of an error.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::OpenWeatherConfig;
use crate::http::{Provider, get_json};
use crate::models::{AirQualitySample, DegradedData, Pollutant, PollutantReading};

const UPSTREAM_UNIT: &str = "µg/m³";

#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    #[serde(default)]
    list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    dt: i64,
    main: AqiBlock,
    #[serde(default)]
    components: Components,
}

#[derive(Debug, Deserialize)]
struct AqiBlock {
    aqi: u8,
}

#[derive(Debug, Deserialize, Default)]
struct Components {
    pm2_5: Option<f64>,
    pm10: Option<f64>,
    o3: Option<f64>,
    no2: Option<f64>,
    so2: Option<f64>,
    co: Option<f64>,
}

impl Components {
    fn get(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
            Pollutant::O3 => self.o3,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
            Pollutant::Co => self.co,
        }
    }
}

impl From<AirPollutionEntry> for AirQualitySample {
    fn from(entry: AirPollutionEntry) -> Self {
        let pollutants = Pollutant::ALL
            .into_iter()
            .filter_map(|pollutant| {
                entry
                    .components
                    .get(pollutant)
                    .map(|concentration| PollutantReading {
                        pollutant,
                        concentration,
                        unit: UPSTREAM_UNIT.to_string(),
                    })
            })
            .collect();

        AirQualitySample {
            class_value: entry.main.aqi,
            pollutants,
            epoch_seconds: entry.dt,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AirQualityFetcher {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl AirQualityFetcher {
    pub fn new(client: Client, config: &OpenWeatherConfig, api_key: &str) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout: config.air_quality_timeout(),
        }
    }

    /// Latest sample, or the reason it is unavailable
    #[instrument(skip(self))]
    pub async fn fetch(&self, lat: f64, lon: f64) -> Result<AirQualitySample, DegradedData> {
        let url = format!(
            "{}/data/2.5/air_pollution?lat={}&lon={}&appid={}",
            self.base_url, lat, lon, self.api_key
        );

        let reason = match get_json::<AirPollutionResponse>(
            &self.client,
            Provider::OpenWeatherAirQuality,
            &url,
            self.timeout,
        )
        .await
        {
            Ok(response) => match response.list.into_iter().next() {
                Some(entry) => {
                    let sample = AirQualitySample::from(entry);
                    debug!("Air quality class {}", sample.class_value);
                    return Ok(sample);
                }
                None => "air quality response contained no samples".to_string(),
            },
            Err(e) => e.to_string(),
        };

        warn!("Air quality unavailable for ({}, {}): {}", lat, lon, reason);
        Err(DegradedData::AirQualityUnavailable { reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_to_sample() {
        let json = r#"{"coord":{"lon":2.35,"lat":48.85},"list":[{"main":{"aqi":3},
            "components":{"co":230.31,"no":0.1,"no2":12.5,"o3":110.2,"so2":1.2,"pm2_5":8.4,"pm10":12.0,"nh3":0.5},
            "dt":1721649600}]}"#;
        let response: AirPollutionResponse = serde_json::from_str(json).unwrap();
        let sample = AirQualitySample::from(response.list.into_iter().next().unwrap());

        assert_eq!(sample.class_value, 3);
        assert_eq!(sample.pollutants.len(), 6);
        assert_eq!(sample.pollutants[0].pollutant, Pollutant::Pm25);
        assert_eq!(sample.concentration(Pollutant::Co), Some(230.31));
        assert_eq!(sample.concentration(Pollutant::O3), Some(110.2));
    }

    #[test]
    fn test_missing_components_are_skipped() {
        let json = r#"{"list":[{"main":{"aqi":1},"components":{"pm2_5":2.0},"dt":1}]}"#;
        let response: AirPollutionResponse = serde_json::from_str(json).unwrap();
        let sample = AirQualitySample::from(response.list.into_iter().next().unwrap());
        assert_eq!(sample.pollutants.len(), 1);
        assert_eq!(sample.concentration(Pollutant::Pm10), None);
    }
}
