//! Normalized output models and the pipeline result

use serde::{Deserialize, Serialize};

use crate::error::{FailureKind, SkycastError, UPSTREAM_USER_MESSAGE};
use crate::tables::DisplayIcon;

/// Current conditions ready for display
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NormalizedCurrent {
    pub location_name: String,
    /// Rounded Celsius
    pub temperature: i32,
    pub feels_like: i32,
    pub humidity: u8,
    pub wind_speed_kmh: i32,
    pub description: String,
    pub icon: DisplayIcon,
    pub epoch_seconds: i64,
}

/// One forecast step within a day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NormalizedHour {
    /// Local wall-clock label, e.g. "3 PM"
    pub time_label: String,
    pub temperature: i32,
    pub description: String,
    pub icon: DisplayIcon,
}

/// Pollutant concentration formatted for display
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DisplayPollutant {
    pub name: String,
    /// Rounded to one decimal place
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NormalizedAqi {
    pub scaled_value: u16,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_pollutant: Option<String>,
    pub pollutants: Vec<DisplayPollutant>,
}

/// Summary of one local calendar day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NormalizedDay {
    /// e.g. "Mon, Jul 22"
    pub date_label: String,
    pub temp_high: i32,
    pub temp_low: i32,
    pub description: String,
    pub icon: DisplayIcon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aqi: Option<NormalizedAqi>,
    pub hourly: Vec<NormalizedHour>,
}

/// Marker for data the report was built without
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegradedData {
    AirQualityUnavailable { reason: String },
}

/// Everything a successful query produces
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: NormalizedCurrent,
    pub days: Vec<NormalizedDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aqi: Option<NormalizedAqi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly: Option<Vec<NormalizedHour>>,
    pub resolved_lat: f64,
    pub resolved_lon: f64,
    /// e.g. "UTC+02:00"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<DegradedData>,
}

/// Terminal value of every pipeline invocation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AggregateResult {
    Success(WeatherReport),
    Failure { kind: FailureKind, message: String },
}

impl AggregateResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, AggregateResult::Success(_))
    }

    #[must_use]
    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            AggregateResult::Success(report) => Some(report),
            AggregateResult::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            AggregateResult::Success(_) => None,
            AggregateResult::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl AggregateResult {
    /// Replace upstream failure details with the generic retry prompt
    #[must_use]
    pub fn into_user_facing(self) -> Self {
        match self {
            AggregateResult::Failure {
                kind: FailureKind::UpstreamError,
                ..
            } => AggregateResult::Failure {
                kind: FailureKind::UpstreamError,
                message: UPSTREAM_USER_MESSAGE.to_string(),
            },
            other => other,
        }
    }
}

impl From<SkycastError> for AggregateResult {
    fn from(err: SkycastError) -> Self {
        AggregateResult::Failure {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<crate::Result<WeatherReport>> for AggregateResult {
    fn from(result: crate::Result<WeatherReport>) -> Self {
        match result {
            Ok(report) => AggregateResult::Success(report),
            Err(err) => err.into(),
        }
    }
}
