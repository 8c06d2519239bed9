//! End-to-end aggregation: resolve, fetch, group, normalize.

use std::fmt;

use reqwest::Client;
use tracing::{debug, error, info, instrument};

use crate::air_quality::AirQualityFetcher;
use crate::config::SkycastConfig;
use crate::geocoding::{GoogleGeocoder, OpenWeatherGeocoder};
use crate::location_resolver::LocationResolver;
use crate::models::{AggregateResult, LocationQuery, WeatherReport};
use crate::normalize;
use crate::weather::WeatherFetcher;
use crate::{Result, http};

/// Where an invocation currently is; used for log context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    ResolvingLocation,
    FetchingWeatherAndAqi,
    Grouping,
    Normalizing,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::ResolvingLocation => "resolving_location",
            PipelineStage::FetchingWeatherAndAqi => "fetching_weather_and_aqi",
            PipelineStage::Grouping => "grouping",
            PipelineStage::Normalizing => "normalizing",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Stateless between invocations; one instance can serve concurrent queries.
#[derive(Debug, Clone)]
pub struct AggregationPipeline {
    config: SkycastConfig,
    client: Client,
}

impl AggregationPipeline {
    pub fn new(config: SkycastConfig) -> Result<Self> {
        let client = http::build_client()?;
        Ok(Self { config, client })
    }

    #[must_use]
    pub fn config(&self) -> &SkycastConfig {
        &self.config
    }

    /// Run a free-text query. Always yields exactly one result.
    #[instrument(skip(self))]
    pub async fn aggregate(&self, raw_query: &str) -> AggregateResult {
        let result = self.run(raw_query).await;
        Self::finish(result)
    }

    /// Run an already-parsed query
    #[instrument(skip(self))]
    pub async fn aggregate_query(&self, query: &LocationQuery) -> AggregateResult {
        let result = self.run_parsed(query).await;
        Self::finish(result)
    }

    fn finish(result: Result<WeatherReport>) -> AggregateResult {
        match &result {
            Ok(report) => info!(
                stage = %PipelineStage::Done,
                "Aggregated {} days for {}",
                report.days.len(),
                report.current.location_name
            ),
            Err(e) => error!(stage = %PipelineStage::Done, kind = ?e.kind(), "Aggregation failed: {}", e),
        }
        result.into()
    }

    async fn run(&self, raw_query: &str) -> Result<WeatherReport> {
        // configuration problems win over bad input, and both precede any I/O
        let api_key = self.config.openweather.require_api_key()?;
        let query = LocationQuery::parse(raw_query)?;
        self.run_query(api_key, &query).await
    }

    async fn run_parsed(&self, query: &LocationQuery) -> Result<WeatherReport> {
        let api_key = self.config.openweather.require_api_key()?;
        query.validate()?;
        self.run_query(api_key, query).await
    }

    async fn run_query(&self, api_key: &str, query: &LocationQuery) -> Result<WeatherReport> {
        let openweather = &self.config.openweather;

        info!(stage = %PipelineStage::ResolvingLocation, "Resolving {:?}", query);
        let secondary = self
            .config
            .google
            .enabled_key()
            .map(|key| GoogleGeocoder::new(self.client.clone(), &self.config.google, key));
        let resolver = LocationResolver::new(
            OpenWeatherGeocoder::new(self.client.clone(), openweather, api_key),
            secondary,
        );
        let location = resolver.resolve(query).await?;

        info!(
            stage = %PipelineStage::FetchingWeatherAndAqi,
            "Fetching weather and air quality for ({}, {})",
            location.latitude,
            location.longitude
        );
        let weather = WeatherFetcher::new(self.client.clone(), openweather, api_key);
        let air_quality = AirQualityFetcher::new(self.client.clone(), openweather, api_key);
        let (bundle, air_quality) = tokio::join!(
            weather.fetch(location.latitude, location.longitude),
            air_quality.fetch(location.latitude, location.longitude)
        );
        let bundle = bundle?;

        info!(
            stage = %PipelineStage::Grouping,
            "Grouping {} forecast samples at UTC offset {}s",
            bundle.forecast.len(),
            bundle.utc_offset_seconds
        );
        debug!(stage = %PipelineStage::Normalizing, air_quality = air_quality.is_ok());
        Ok(normalize::build_report(&location, &bundle, air_quality))
    }
}
