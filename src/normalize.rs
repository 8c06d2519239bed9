//! Unit conversion, rounding and air-quality interpretation
//!
//! Everything here is pure: raw samples in, display-ready models out.

use chrono::FixedOffset;

use crate::grouping::{self, DayGroup, LocalSample};
use crate::models::{
    AirQualitySample, DegradedData, DisplayPollutant, NormalizedAqi, NormalizedCurrent,
    NormalizedDay, NormalizedHour, Pollutant, RawCurrentSample, ResolvedLocation, WeatherBundle,
    WeatherReport,
};
use crate::tables::{self, DisplayIcon};

/// Forecast steps shown in the top-level preview (24 hours of 3-hour steps)
pub const HOURLY_PREVIEW_LEN: usize = 8;

/// Air-quality class from which a dominant pollutant is reported
const DOMINANT_POLLUTANT_MIN_CLASS: u8 = 3;

const MS_TO_KMH: f64 = 3.6;

/// Nearest integer, halves toward positive infinity (-2.5 becomes -2)
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

#[must_use]
pub fn wind_kmh(meters_per_second: f64) -> i32 {
    round_half_up(meters_per_second * MS_TO_KMH)
}

#[must_use]
pub fn round_temp(celsius: f64) -> i32 {
    round_half_up(celsius)
}

/// One decimal, rounded from the exact stored value: 1.45 is really
/// 1.4499999... and becomes 1.4, while the exact tie 0.25 becomes 0.3.
fn round_one_decimal(value: f64) -> f64 {
    let magnitude = value.abs();
    let tenths = magnitude * 10.0;
    // only multiples of 0.25 can sit exactly on a tie
    let rounded = if tenths.fract() == 0.5 && (magnitude * 4.0).fract() == 0.0 {
        (tenths.floor() + 1.0) / 10.0
    } else {
        format!("{magnitude:.1}").parse().unwrap_or(magnitude)
    };
    rounded.copysign(value)
}

#[must_use]
pub fn normalize_current(sample: &RawCurrentSample, location_name: &str) -> NormalizedCurrent {
    NormalizedCurrent {
        location_name: location_name.to_string(),
        temperature: round_temp(sample.temperature),
        feels_like: round_temp(sample.feels_like),
        humidity: sample.humidity,
        wind_speed_kmh: wind_kmh(sample.wind_speed),
        description: sample.description.clone(),
        icon: DisplayIcon::resolve(&sample.icon_code, sample.condition_code),
        epoch_seconds: sample.epoch_seconds,
    }
}

#[must_use]
pub fn normalize_hour(step: &LocalSample) -> NormalizedHour {
    NormalizedHour {
        time_label: grouping::hour_label(&step.local),
        temperature: round_temp(step.sample.temperature),
        description: step.sample.description.clone(),
        icon: DisplayIcon::resolve(&step.sample.icon_code, step.sample.condition_code),
    }
}

/// Day summary; description and icon come from the representative sample
#[must_use]
pub fn normalize_day(day: &DayGroup, aqi: Option<&NormalizedAqi>) -> NormalizedDay {
    let (description, icon) = match day.representative() {
        Some(rep) => (
            rep.sample.description.clone(),
            DisplayIcon::resolve(&rep.sample.icon_code, rep.sample.condition_code),
        ),
        None => ("N/A".to_string(), DisplayIcon::default()),
    };

    NormalizedDay {
        date_label: day.label(),
        temp_high: round_temp(day.temp_high()),
        temp_low: round_temp(day.temp_low()),
        description,
        icon,
        aqi: aqi.cloned(),
        hourly: day.samples.iter().map(normalize_hour).collect(),
    }
}

/// Pollutant furthest above its moderate threshold.
///
/// Only reported from class 3 upward and only when some ratio exceeds 1.
/// Ties keep the earlier pollutant in [`Pollutant::ALL`] order.
#[must_use]
pub fn dominant_pollutant(sample: &AirQualitySample) -> Option<Pollutant> {
    if sample.class_value < DOMINANT_POLLUTANT_MIN_CLASS {
        return None;
    }

    let mut dominant: Option<(Pollutant, f64)> = None;
    for pollutant in Pollutant::ALL {
        let Some(concentration) = sample.concentration(pollutant) else {
            continue;
        };
        let ratio = concentration / tables::moderate_threshold(pollutant);
        if ratio > 1.0 && dominant.is_none_or(|(_, best)| ratio > best) {
            dominant = Some((pollutant, ratio));
        }
    }

    dominant.map(|(pollutant, _)| pollutant)
}

/// Concentrations for display: CO in mg/m³, the rest in µg/m³
#[must_use]
pub fn display_pollutants(sample: &AirQualitySample) -> Vec<DisplayPollutant> {
    Pollutant::ALL
        .into_iter()
        .filter_map(|pollutant| {
            let concentration = sample.concentration(pollutant)?;
            if concentration < 0.0 {
                return None;
            }
            let (value, unit) = match pollutant {
                Pollutant::Co => (concentration / 1000.0, "mg/m³"),
                _ => (concentration, "µg/m³"),
            };
            Some(DisplayPollutant {
                name: pollutant.label().to_string(),
                value: round_one_decimal(value),
                unit: unit.to_string(),
            })
        })
        .collect()
}

#[must_use]
pub fn normalize_aqi(sample: &AirQualitySample) -> NormalizedAqi {
    NormalizedAqi {
        scaled_value: tables::aqi_scaled_value(sample.class_value),
        category: tables::aqi_category(sample.class_value).to_string(),
        dominant_pollutant: dominant_pollutant(sample).map(|p| p.label().to_string()),
        pollutants: display_pollutants(sample),
    }
}

/// e.g. "UTC+02:00", "UTC-05:30"
#[must_use]
pub fn format_utc_offset(utc_offset_seconds: i32) -> Option<String> {
    FixedOffset::east_opt(utc_offset_seconds).map(|offset| format!("UTC{offset}"))
}

/// Assemble the final report from already-fetched data
#[must_use]
pub fn build_report(
    location: &ResolvedLocation,
    bundle: &WeatherBundle,
    air_quality: Result<AirQualitySample, DegradedData>,
) -> WeatherReport {
    let offset = bundle.utc_offset_seconds;

    let (aqi, degraded) = match air_quality {
        Ok(sample) => (Some(normalize_aqi(&sample)), Vec::new()),
        Err(marker) => (None, vec![marker]),
    };

    let days = grouping::group_by_local_day(&bundle.forecast, offset)
        .iter()
        .map(|day| normalize_day(day, aqi.as_ref()))
        .collect();

    let hourly: Vec<NormalizedHour> = bundle
        .forecast
        .iter()
        .take(HOURLY_PREVIEW_LEN)
        .filter_map(|sample| {
            grouping::local_datetime(sample.epoch_seconds, offset).map(|local| LocalSample {
                local,
                sample: sample.clone(),
            })
        })
        .map(|step| normalize_hour(&step))
        .collect();

    WeatherReport {
        current: normalize_current(&bundle.current, &location.display_name),
        days,
        aqi,
        hourly: (!hourly.is_empty()).then_some(hourly),
        resolved_lat: location.latitude,
        resolved_lon: location.longitude,
        time_zone: format_utc_offset(offset),
        degraded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PollutantReading, RawForecastSample};
    use rstest::rstest;

    fn aqi_sample(class_value: u8, readings: &[(Pollutant, f64)]) -> AirQualitySample {
        AirQualitySample {
            class_value,
            pollutants: readings
                .iter()
                .map(|&(pollutant, concentration)| PollutantReading {
                    pollutant,
                    concentration,
                    unit: "µg/m³".to_string(),
                })
                .collect(),
            epoch_seconds: 0,
        }
    }

    fn current() -> RawCurrentSample {
        RawCurrentSample {
            epoch_seconds: 1_721_649_600,
            temperature: 21.6,
            feels_like: 21.4,
            humidity: 55,
            wind_speed: 5.0,
            condition_code: 800,
            icon_code: "01d".to_string(),
            description: "clear sky".to_string(),
            utc_offset_seconds: Some(7200),
        }
    }

    fn forecast(count: usize) -> Vec<RawForecastSample> {
        (0..count)
            .map(|i| RawForecastSample {
                epoch_seconds: 1_721_606_400 + i as i64 * 3 * 3600,
                temperature: 15.0,
                temp_min: 14.0,
                temp_max: 16.0,
                feels_like: 15.0,
                humidity: 60,
                wind_speed: 1.0,
                condition_code: 500,
                icon_code: "10d".to_string(),
                description: "light rain".to_string(),
            })
            .collect()
    }

    #[rstest]
    #[case(5.0, 18)]
    #[case(0.0, 0)]
    #[case(2.5, 9)]
    #[case(10.0, 36)]
    fn test_wind_conversion(#[case] ms: f64, #[case] kmh: i32) {
        assert_eq!(wind_kmh(ms), kmh);
    }

    #[rstest]
    #[case(21.5, 22)]
    #[case(21.49, 21)]
    #[case(-0.4, 0)]
    #[case(-3.6, -4)]
    #[case(-2.5, -2)]
    #[case(-0.5, 0)]
    #[case(2.5, 3)]
    fn test_temperature_rounding(#[case] celsius: f64, #[case] rounded: i32) {
        assert_eq!(round_temp(celsius), rounded);
    }

    #[rstest]
    #[case(1.45, 1.4)]
    #[case(0.25, 0.3)]
    #[case(0.75, 0.8)]
    #[case(8.44, 8.4)]
    #[case(0.23031, 0.2)]
    #[case(2.05, 2.0)]
    #[case(2.15, 2.1)]
    #[case(12.0, 12.0)]
    fn test_one_decimal_rounding(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(round_one_decimal(value), expected);
    }

    #[test]
    fn test_dominant_pollutant_highest_ratio() {
        // PM2.5 ratio ~1.41, O3 ratio 1.8
        let sample = aqi_sample(4, &[(Pollutant::Pm25, 50.0), (Pollutant::O3, 180.0)]);
        assert_eq!(dominant_pollutant(&sample), Some(Pollutant::O3));
    }

    #[test]
    fn test_dominant_pollutant_requires_class_three() {
        let sample = aqi_sample(2, &[(Pollutant::Pm25, 500.0)]);
        assert_eq!(dominant_pollutant(&sample), None);
    }

    #[test]
    fn test_dominant_pollutant_requires_exceeding_threshold() {
        let sample = aqi_sample(3, &[(Pollutant::Pm25, 35.4), (Pollutant::O3, 99.0)]);
        assert_eq!(dominant_pollutant(&sample), None);
    }

    #[test]
    fn test_dominant_pollutant_tie_keeps_first() {
        // NO2 and O3 share a threshold; O3 comes first
        let sample = aqi_sample(3, &[(Pollutant::No2, 150.0), (Pollutant::O3, 150.0)]);
        assert_eq!(dominant_pollutant(&sample), Some(Pollutant::O3));
    }

    #[test]
    fn test_display_pollutants_units_and_rounding() {
        let sample = aqi_sample(
            1,
            &[
                (Pollutant::Pm25, 8.44),
                (Pollutant::Co, 230.31),
                (Pollutant::So2, 0.0),
                (Pollutant::No2, -1.0),
            ],
        );
        let display = display_pollutants(&sample);
        assert_eq!(display.len(), 3);
        assert_eq!(display[0].name, "PM2.5");
        assert_eq!(display[0].value, 8.4);
        assert_eq!(display[0].unit, "µg/m³");
        assert_eq!(display[1].name, "SO2");
        assert_eq!(display[1].value, 0.0);
        assert_eq!(display[2].name, "CO");
        assert_eq!(display[2].value, 0.2);
        assert_eq!(display[2].unit, "mg/m³");
    }

    #[test]
    fn test_normalize_aqi() {
        let aqi = normalize_aqi(&aqi_sample(3, &[(Pollutant::Pm25, 40.0)]));
        assert_eq!(aqi.scaled_value, 125);
        assert_eq!(aqi.category, "Moderate");
        assert_eq!(aqi.dominant_pollutant.as_deref(), Some("PM2.5"));
    }

    #[rstest]
    #[case(0, "UTC+00:00")]
    #[case(7200, "UTC+02:00")]
    #[case(-18_000, "UTC-05:00")]
    #[case(19_800, "UTC+05:30")]
    fn test_format_utc_offset(#[case] seconds: i32, #[case] expected: &str) {
        assert_eq!(format_utc_offset(seconds).as_deref(), Some(expected));
    }

    #[test]
    fn test_normalize_current() {
        let normalized = normalize_current(&current(), "Paris, FR");
        assert_eq!(normalized.location_name, "Paris, FR");
        assert_eq!(normalized.temperature, 22);
        assert_eq!(normalized.feels_like, 21);
        assert_eq!(normalized.wind_speed_kmh, 18);
        assert_eq!(normalized.icon, DisplayIcon::Sun);
    }

    #[test]
    fn test_build_report_attaches_aqi_to_every_day() {
        let location = ResolvedLocation::new(48.85, 2.35, "Paris, FR".to_string());
        let bundle = WeatherBundle {
            current: current(),
            forecast: forecast(40),
            utc_offset_seconds: 0,
        };
        let sample = aqi_sample(2, &[(Pollutant::Pm25, 12.0)]);

        let report = build_report(&location, &bundle, Ok(sample));

        assert_eq!(report.days.len(), 5);
        assert!(report.days.iter().all(|d| d.aqi == report.aqi));
        assert_eq!(report.hourly.as_ref().map(Vec::len), Some(HOURLY_PREVIEW_LEN));
        assert_eq!(report.time_zone.as_deref(), Some("UTC+00:00"));
        assert!(report.degraded.is_empty());
        assert_eq!(report.days[0].icon, DisplayIcon::Drizzle);
    }

    #[test]
    fn test_build_report_without_aqi_or_forecast() {
        let location = ResolvedLocation::from_coordinates(10.0, 20.0);
        let bundle = WeatherBundle {
            current: current(),
            forecast: Vec::new(),
            utc_offset_seconds: 3600,
        };
        let marker = DegradedData::AirQualityUnavailable {
            reason: "timed out".to_string(),
        };

        let report = build_report(&location, &bundle, Err(marker.clone()));

        assert!(report.days.is_empty());
        assert!(report.aqi.is_none());
        assert!(report.hourly.is_none());
        assert_eq!(report.degraded, vec![marker]);
        assert_eq!(report.resolved_lat, 10.0);
    }
}
