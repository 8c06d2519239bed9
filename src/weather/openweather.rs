//! OpenWeatherMap `/data/2.5/weather` and `/data/2.5/forecast` response shapes

use serde::Deserialize;

use crate::models::{RawCurrentSample, RawForecastSample};

const MISSING_DESCRIPTION: &str = "N/A";

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    pub dt: i64,
    pub main: MainBlock,
    #[serde(default)]
    pub wind: WindBlock,
    #[serde(default)]
    pub weather: Vec<ConditionBlock>,
    /// Shift in seconds from UTC
    pub timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
    pub city: Option<CityBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastEntry {
    pub dt: i64,
    pub main: MainBlock,
    #[serde(default)]
    pub wind: WindBlock,
    #[serde(default)]
    pub weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CityBlock {
    pub timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainBlock {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    #[serde(default)]
    pub humidity: u8,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct WindBlock {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionBlock {
    pub id: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// `(condition_code, icon_code, description)` of the first condition entry
fn primary_condition(conditions: &[ConditionBlock]) -> (u32, String, String) {
    match conditions.first() {
        Some(c) if !c.description.trim().is_empty() => {
            (c.id, c.icon.clone(), c.description.clone())
        }
        Some(c) => (c.id, c.icon.clone(), MISSING_DESCRIPTION.to_string()),
        None => (0, String::new(), MISSING_DESCRIPTION.to_string()),
    }
}

impl From<CurrentResponse> for RawCurrentSample {
    fn from(response: CurrentResponse) -> Self {
        let (condition_code, icon_code, description) = primary_condition(&response.weather);
        RawCurrentSample {
            epoch_seconds: response.dt,
            temperature: response.main.temp,
            feels_like: response.main.feels_like,
            humidity: response.main.humidity,
            wind_speed: response.wind.speed,
            condition_code,
            icon_code,
            description,
            utc_offset_seconds: response.timezone,
        }
    }
}

impl From<ForecastEntry> for RawForecastSample {
    fn from(entry: ForecastEntry) -> Self {
        let (condition_code, icon_code, description) = primary_condition(&entry.weather);
        let temperature = entry.main.temp;
        RawForecastSample {
            epoch_seconds: entry.dt,
            temperature,
            temp_min: entry.main.temp_min.unwrap_or(temperature),
            temp_max: entry.main.temp_max.unwrap_or(temperature),
            feels_like: entry.main.feels_like,
            humidity: entry.main.humidity,
            wind_speed: entry.wind.speed,
            condition_code,
            icon_code,
            description,
        }
    }
}

impl ForecastResponse {
    pub(crate) fn utc_offset_seconds(&self) -> Option<i32> {
        self.city.as_ref().and_then(|city| city.timezone)
    }

    pub(crate) fn into_samples(self) -> Vec<RawForecastSample> {
        self.list.into_iter().map(Into::into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_response_mapping() {
        let json = r#"{
            "coord":{"lon":2.35,"lat":48.85},
            "weather":[{"id":500,"main":"Rain","description":"light rain","icon":"10d"}],
            "main":{"temp":18.4,"feels_like":18.1,"temp_min":17.0,"temp_max":19.5,"pressure":1012,"humidity":77},
            "wind":{"speed":4.1,"deg":250},
            "dt":1721649600,
            "timezone":7200,
            "name":"Paris"
        }"#;
        let response: CurrentResponse = serde_json::from_str(json).unwrap();
        let sample = RawCurrentSample::from(response);
        assert_eq!(sample.condition_code, 500);
        assert_eq!(sample.icon_code, "10d");
        assert_eq!(sample.description, "light rain");
        assert_eq!(sample.humidity, 77);
        assert_eq!(sample.utc_offset_seconds, Some(7200));
    }

    #[test]
    fn test_missing_condition_uses_placeholder() {
        let json = r#"{"dt":1,"main":{"temp":1.0,"feels_like":0.5,"humidity":50},"weather":[]}"#;
        let response: CurrentResponse = serde_json::from_str(json).unwrap();
        let sample = RawCurrentSample::from(response);
        assert_eq!(sample.description, "N/A");
        assert_eq!(sample.wind_speed, 0.0);
        assert_eq!(sample.utc_offset_seconds, None);
    }

    #[test]
    fn test_forecast_response_mapping() {
        let json = r#"{
            "cod":"200",
            "list":[
                {"dt":1721649600,"main":{"temp":20.0,"feels_like":19.0,"temp_min":18.5,"temp_max":21.2,"humidity":60},
                 "weather":[{"id":801,"description":"few clouds","icon":"02d"}],"wind":{"speed":3.0},
                 "dt_txt":"2024-07-22 12:00:00"}
            ],
            "city":{"name":"Paris","timezone":7200}
        }"#;
        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.utc_offset_seconds(), Some(7200));
        let samples = response.into_samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].temp_min, 18.5);
        assert_eq!(samples[0].temp_max, 21.2);
        assert_eq!(samples[0].icon_code, "02d");
    }
}
