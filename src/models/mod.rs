//! Data models for Skycast
//!
//! - Location: queries, resolved places and geocoding candidates
//! - Weather: provider-neutral raw samples handed over by the fetchers
//! - Forecast: normalized output and the pipeline result

pub mod forecast;
pub mod location;
pub mod weather;

pub use forecast::{
    AggregateResult, DegradedData, DisplayPollutant, NormalizedAqi, NormalizedCurrent,
    NormalizedDay, NormalizedHour, WeatherReport,
};
pub use location::{GeocodeCandidate, LocationQuery, ResolvedLocation};
pub use weather::{
    AirQualitySample, Pollutant, PollutantReading, RawCurrentSample, RawForecastSample,
    WeatherBundle,
};
