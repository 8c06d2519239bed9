//! Current conditions and 5-day / 3-hour forecast from OpenWeatherMap

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::Result;
use crate::config::OpenWeatherConfig;
use crate::http::{Provider, get_json};
use crate::models::{RawCurrentSample, WeatherBundle};

mod openweather;

use openweather::{CurrentResponse, ForecastResponse};

#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl WeatherFetcher {
    pub fn new(client: Client, config: &OpenWeatherConfig, api_key: &str) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout: config.timeout(),
        }
    }

    /// Fetch current conditions and the forecast concurrently.
    ///
    /// Either call failing fails the whole fetch. The forecast's offset wins
    /// over the one reported with the current conditions.
    #[instrument(skip(self))]
    pub async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherBundle> {
        let (current, forecast) =
            tokio::try_join!(self.fetch_current(lat, lon), self.fetch_forecast(lat, lon))?;

        let utc_offset_seconds = forecast
            .utc_offset_seconds()
            .or(current.utc_offset_seconds)
            .unwrap_or(0);
        let forecast = forecast.into_samples();

        info!(
            "Fetched current conditions and {} forecast samples (UTC offset {}s)",
            forecast.len(),
            utc_offset_seconds
        );

        Ok(WeatherBundle {
            current,
            forecast,
            utc_offset_seconds,
        })
    }

    async fn fetch_current(&self, lat: f64, lon: f64) -> Result<RawCurrentSample> {
        let url = format!(
            "{}/data/2.5/weather?lat={}&lon={}&units=metric&appid={}",
            self.base_url, lat, lon, self.api_key
        );
        let response: CurrentResponse =
            get_json(&self.client, Provider::OpenWeatherCurrent, &url, self.timeout).await?;
        debug!("Current conditions at epoch {}", response.dt);
        Ok(response.into())
    }

    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<ForecastResponse> {
        let url = format!(
            "{}/data/2.5/forecast?lat={}&lon={}&units=metric&appid={}",
            self.base_url, lat, lon, self.api_key
        );
        get_json(&self.client, Provider::OpenWeatherForecast, &url, self.timeout).await
    }
}
