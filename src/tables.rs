//! Static lookup tables: display icons, air-quality categories and scaling,
//! pollutant thresholds.

use serde::{Deserialize, Serialize};

use crate::models::Pollutant;

/// Closed set of icons the presentation layer knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayIcon {
    #[default]
    Sun,
    Moon,
    Cloud,
    CloudSun,
    CloudMoon,
    Rain,
    Drizzle,
    Lightning,
    Snow,
    Fog,
}

impl DisplayIcon {
    /// Pick the icon for a sample: icon code first, condition code second,
    /// `Sun` when neither is recognized.
    #[must_use]
    pub fn resolve(icon_code: &str, condition_code: u32) -> Self {
        Self::from_icon_code(icon_code)
            .or_else(|| Self::from_condition_code(condition_code))
            .unwrap_or_default()
    }

    /// Map an OpenWeatherMap icon code such as `"10d"`
    #[must_use]
    pub fn from_icon_code(code: &str) -> Option<Self> {
        let icon = match code {
            "01d" => Self::Sun,
            "01n" => Self::Moon,
            "02d" => Self::CloudSun,
            "02n" => Self::CloudMoon,
            "03d" | "03n" | "04d" | "04n" => Self::Cloud,
            "09d" | "09n" => Self::Rain,
            "10d" | "10n" => Self::Drizzle,
            "11d" | "11n" => Self::Lightning,
            "13d" | "13n" => Self::Snow,
            "50d" | "50n" => Self::Fog,
            _ => return None,
        };
        Some(icon)
    }

    /// Map an OpenWeatherMap condition id by group
    /// See: https://openweathermap.org/weather-conditions
    #[must_use]
    pub fn from_condition_code(code: u32) -> Option<Self> {
        let icon = match code {
            200..=299 => Self::Lightning,
            300..=399 => Self::Drizzle,
            500..=599 => Self::Rain,
            600..=699 => Self::Snow,
            700..=799 => Self::Fog,
            800 => Self::Sun,
            801 => Self::CloudSun,
            802..=804 => Self::Cloud,
            _ => return None,
        };
        Some(icon)
    }
}

/// Category label for the upstream 1-5 air-quality class
#[must_use]
pub fn aqi_category(class_value: u8) -> &'static str {
    match class_value {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Unhealthy",
        5 => "Very Unhealthy",
        _ => "Unknown",
    }
}

/// Representative display value for the upstream 1-5 air-quality class
#[must_use]
pub fn aqi_scaled_value(class_value: u8) -> u16 {
    match class_value {
        1 => 25,
        2 => 75,
        3 => 125,
        4 => 175,
        5 => 250,
        _ => 0,
    }
}

/// Concentration (µg/m³) at which a pollutant starts to count as moderate
#[must_use]
pub fn moderate_threshold(pollutant: Pollutant) -> f64 {
    match pollutant {
        Pollutant::Pm25 => 35.4,
        Pollutant::Pm10 => 154.0,
        Pollutant::O3 => 100.0,
        Pollutant::No2 => 100.0,
        Pollutant::So2 => 75.0,
        Pollutant::Co => 9000.0,
    }
}
