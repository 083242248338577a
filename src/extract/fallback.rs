//! Deterministic stand-in series used when live extraction fails.

use crate::types::hourly::{COL_HUMIDITY, COL_PRECIPITATION, COL_TEMPERATURE, COL_TIME};
use crate::types::raw_row::RawRow;
use chrono::{DurationRound, Local, NaiveDateTime, TimeDelta};
use serde_json::{json, Map};

pub const FALLBACK_HOURS: usize = 24;

/// Timestamp format used by the forecast API for hourly data.
pub const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// The current local wall-clock time, floored to the hour.
pub fn current_hour() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now)
}

/// Builds [`FALLBACK_HOURS`] hourly rows for `city`, oldest first, the last
/// one stamped `end`.
///
/// Row `i` gets temperature `20 + i % 6`, humidity `70 - i % 10` and
/// precipitation `0.1` on every seventh row starting with the first.
pub fn fallback_series(city: &str, end: NaiveDateTime) -> Vec<RawRow> {
    let start = end - TimeDelta::hours(FALLBACK_HOURS as i64 - 1);
    (0..FALLBACK_HOURS)
        .map(|i| {
            let time = start + TimeDelta::hours(i as i64);
            let mut fields = Map::new();
            fields.insert(
                COL_TIME.to_string(),
                json!(time.format(API_TIME_FORMAT).to_string()),
            );
            fields.insert(COL_TEMPERATURE.to_string(), json!(20 + i % 6));
            fields.insert(COL_HUMIDITY.to_string(), json!(70 - i % 10));
            fields.insert(
                COL_PRECIPITATION.to_string(),
                json!(if i % 7 == 0 { 0.1 } else { 0.0 }),
            );
            RawRow::new(city, fields)
        })
        .collect()
}
