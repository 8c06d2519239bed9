//! Geocoding providers
//!
//! Each provider has its own response types and maps them into
//! [`GeocodeCandidate`](crate::models::GeocodeCandidate) before returning.

pub mod google;
pub mod openweather;

pub use google::GoogleGeocoder;
pub use openweather::OpenWeatherGeocoder;
