//! Provider-neutral raw samples, as handed over by the fetchers

use serde::{Deserialize, Serialize};

/// Current conditions at the resolved location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RawCurrentSample {
    /// Observation time (UTC epoch seconds)
    pub epoch_seconds: i64,
    /// Temperature in Celsius
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
    pub condition_code: u32,
    pub icon_code: String,
    pub description: String,
    /// Shift from UTC reported alongside the current conditions
    pub utc_offset_seconds: Option<i32>,
}

/// One 3-hour forecast step
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RawForecastSample {
    /// Start of the step (UTC epoch seconds)
    pub epoch_seconds: i64,
    /// Temperatures in Celsius
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub feels_like: f64,
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
    pub condition_code: u32,
    pub icon_code: String,
    pub description: String,
}

/// Current conditions plus forecast, with the offset used for grouping
#[derive(Debug, Clone)]
pub struct WeatherBundle {
    pub current: RawCurrentSample,
    pub forecast: Vec<RawForecastSample>,
    pub utc_offset_seconds: i32,
}

/// The six tracked pollutants, in dominant-pollutant tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "O3")]
    O3,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "SO2")]
    So2,
    #[serde(rename = "CO")]
    Co,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::O3 => "O3",
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
            Pollutant::Co => "CO",
        }
    }
}

/// Concentration of one pollutant as reported upstream (µg/m³)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PollutantReading {
    pub pollutant: Pollutant,
    pub concentration: f64,
    pub unit: String,
}

/// Latest air-quality sample for a location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AirQualitySample {
    /// Upstream index class, 1 (good) to 5 (very poor)
    pub class_value: u8,
    pub pollutants: Vec<PollutantReading>,
    pub epoch_seconds: i64,
}

impl AirQualitySample {
    #[must_use]
    pub fn concentration(&self, pollutant: Pollutant) -> Option<f64> {
        self.pollutants
            .iter()
            .find(|reading| reading.pollutant == pollutant)
            .map(|reading| reading.concentration)
    }
}
