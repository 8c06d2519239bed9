//! Buckets forecast samples into local calendar days

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, warn};

use crate::models::RawForecastSample;

/// Number of days a report covers at most
pub const MAX_DAYS: usize = 5;

/// Preferred window for a day's representative sample, local hours `[12, 18)`
const AFTERNOON_HOURS: std::ops::Range<u32> = 12..18;

/// A forecast sample paired with its local wall-clock time
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSample {
    pub local: NaiveDateTime,
    pub sample: RawForecastSample,
}

/// All samples falling on one local calendar date, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub samples: Vec<LocalSample>,
}

impl DayGroup {
    #[must_use]
    pub fn temp_low(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.sample.temp_min)
            .fold(f64::INFINITY, f64::min)
    }

    #[must_use]
    pub fn temp_high(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.sample.temp_max)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// First afternoon sample, else the middle one, else the first
    #[must_use]
    pub fn representative(&self) -> Option<&LocalSample> {
        self.samples
            .iter()
            .find(|s| AFTERNOON_HOURS.contains(&s.local.hour()))
            .or_else(|| self.samples.get(self.samples.len() / 2))
            .or_else(|| self.samples.first())
    }

    /// e.g. "Mon, Jul 22"
    #[must_use]
    pub fn label(&self) -> String {
        self.date.format("%a, %b %-d").to_string()
    }
}

/// Shift a UTC epoch into local wall-clock time
#[must_use]
pub fn local_datetime(epoch_seconds: i64, utc_offset_seconds: i32) -> Option<NaiveDateTime> {
    epoch_seconds
        .checked_add(i64::from(utc_offset_seconds))
        .and_then(|local| DateTime::from_timestamp(local, 0))
        .map(|dt| dt.naive_utc())
}

/// e.g. "3 PM"
#[must_use]
pub fn hour_label(local: &NaiveDateTime) -> String {
    local.format("%-I %p").to_string()
}

/// Group samples by local date, keeping the first [`MAX_DAYS`] distinct dates.
///
/// Samples are assumed to arrive in chronological order; a date is never
/// split into two groups.
#[must_use]
pub fn group_by_local_day(
    samples: &[RawForecastSample],
    utc_offset_seconds: i32,
) -> Vec<DayGroup> {
    let mut days: Vec<DayGroup> = Vec::new();

    for sample in samples {
        let Some(local) = local_datetime(sample.epoch_seconds, utc_offset_seconds) else {
            warn!("Skipping forecast sample with invalid time {}", sample.epoch_seconds);
            continue;
        };
        let date = local.date();

        if let Some(day) = days.iter_mut().find(|d| d.date == date) {
            day.samples.push(LocalSample {
                local,
                sample: sample.clone(),
            });
            continue;
        }

        if days.len() == MAX_DAYS {
            continue;
        }

        days.push(DayGroup {
            date,
            samples: vec![LocalSample {
                local,
                sample: sample.clone(),
            }],
        });
    }

    debug!(
        "Grouped {} forecast samples into {} days",
        samples.len(),
        days.len()
    );
    days
}
