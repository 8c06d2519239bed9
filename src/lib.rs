//! `Skycast` - Weather, forecast and air quality for a single place
//!
//! This library resolves a free-text or coordinate query to a location,
//! fetches current conditions, a 5-day forecast and air quality, and
//! normalizes them into one display-ready report.

pub mod air_quality;
pub mod api;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod grouping;
pub mod http;
pub mod location_resolver;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod saved;
pub mod scene;
pub mod tables;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use air_quality::AirQualityFetcher;
pub use config::SkycastConfig;
pub use error::{FailureKind, SkycastError};
pub use location_resolver::{GeocodeStrategy, LocationResolver};
pub use models::{AggregateResult, LocationQuery, ResolvedLocation, WeatherReport};
pub use pipeline::{AggregationPipeline, PipelineStage};
pub use saved::{InMemorySavedSearchStore, SavedSearch, SavedSearchStore};
pub use scene::{Scene, SceneGenerator, SceneRequest};
pub use tables::DisplayIcon;
pub use weather::WeatherFetcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
