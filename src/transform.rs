//! Normalization of raw extracted rows into typed, sorted hourly records.

use crate::types::hourly::{
    HourlyRecord, COL_HUMIDITY, COL_PRECIPITATION, COL_TEMPERATURE, COL_TIME,
};
use crate::types::raw_row::RawRow;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, info};
use serde_json::Value;

const NAIVE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Turns the union of all extracted rows into hourly records.
///
/// Rows whose `time` cannot be parsed are dropped. Measurements that cannot be
/// read as numbers, or are absent altogether, become `None` and the row is
/// kept. The result is ordered by city, then time.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use weather_etl::{transform, RawRow};
///
/// let row = |time: &str, temp: serde_json::Value| {
///     let serde_json::Value::Object(fields) = json!({ "time": time, "temperature_2m": temp }) else {
///         unreachable!()
///     };
///     RawRow::new("recife", fields)
/// };
///
/// let hourly = transform(vec![
///     row("2024-01-01T01:00", json!("27.5")),
///     row("not a time", json!(30)),
///     row("2024-01-01T00:00", json!("n/a")),
/// ]);
///
/// assert_eq!(hourly.len(), 2);
/// assert_eq!(hourly[0].temperature_2m, None);
/// assert_eq!(hourly[1].temperature_2m, Some(27.5));
/// assert_eq!(hourly[1].precipitation, None);
/// ```
pub fn transform(rows: Vec<RawRow>) -> Vec<HourlyRecord> {
    let input_len = rows.len();
    let mut records: Vec<HourlyRecord> = rows.into_iter().filter_map(to_record).collect();

    let dropped = input_len - records.len();
    if dropped > 0 {
        debug!("Dropped {} rows with unparseable timestamps", dropped);
    }

    records.sort_by(|a, b| a.city.cmp(&b.city).then(a.time.cmp(&b.time)));
    info!("Transformed {} hourly records", records.len());
    records
}

fn to_record(row: RawRow) -> Option<HourlyRecord> {
    let time = row.get(COL_TIME).and_then(parse_time)?;
    Some(HourlyRecord {
        time,
        temperature_2m: row.get(COL_TEMPERATURE).and_then(parse_number),
        relativehumidity_2m: row.get(COL_HUMIDITY).and_then(parse_number),
        precipitation: row.get(COL_PRECIPITATION).and_then(parse_number),
        city: row.city,
    })
}

/// Reads a timestamp from a JSON value.
///
/// Strings may be ISO-like local times (minute or second precision, `T` or
/// space separated), RFC 3339 with an offset (kept as the local wall clock of
/// that offset) or a bare date (midnight). Integers are Unix seconds.
pub fn parse_time(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_time_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}

fn parse_time_str(s: &str) -> Option<NaiveDateTime> {
    NAIVE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Reads a finite number from a JSON number or a numeric string.
pub fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::{json, Map};

    fn raw(city: &str, fields: Value) -> RawRow {
        let Value::Object(fields) = fields else {
            panic!("fields must be an object")
        };
        RawRow::new(city, fields)
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_bad_timestamps_are_dropped() {
        let rows = vec![
            raw("recife", json!({ "time": "2024-01-01T00:00" })),
            raw("recife", json!({ "time": "yesterday" })),
            raw("recife", json!({ "time": null })),
            raw("recife", json!({ "temperature_2m": 25 })),
            raw("recife", json!({ "time": true })),
            raw("recife", json!({ "time": "2024-01-01T01:00" })),
        ];
        let hourly = transform(rows);
        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly[0].time, at(1, 0));
        assert_eq!(hourly[1].time, at(1, 1));
    }

    #[test]
    fn test_missing_columns_become_none() {
        let hourly = transform(vec![raw("manaus", json!({ "time": "2024-01-01T00:00" }))]);
        assert_eq!(
            hourly,
            vec![HourlyRecord {
                time: at(1, 0),
                city: "manaus".to_string(),
                temperature_2m: None,
                relativehumidity_2m: None,
                precipitation: None,
            }]
        );
    }

    #[test]
    fn test_bad_numbers_keep_the_row() {
        let hourly = transform(vec![raw(
            "salvador",
            json!({
                "time": "2024-01-01T00:00",
                "temperature_2m": "warm",
                "relativehumidity_2m": " 81 ",
                "precipitation": [0.1],
                "windspeed_10m": 12.0
            }),
        )]);
        assert_eq!(hourly.len(), 1);
        assert_eq!(hourly[0].temperature_2m, None);
        assert_eq!(hourly[0].relativehumidity_2m, Some(81.0));
        assert_eq!(hourly[0].precipitation, None);
    }

    #[test]
    fn test_sorted_by_city_then_time() {
        let hourly = transform(vec![
            raw("sao_paulo", json!({ "time": "2024-01-01T05:00" })),
            raw("brasilia", json!({ "time": "2024-01-02T00:00" })),
            raw("sao_paulo", json!({ "time": "2024-01-01T01:00" })),
            raw("brasilia", json!({ "time": "2024-01-01T23:00" })),
        ]);
        let order: Vec<_> = hourly.iter().map(|r| (r.city.as_str(), r.time)).collect();
        assert_eq!(
            order,
            [
                ("brasilia", at(1, 23)),
                ("brasilia", at(2, 0)),
                ("sao_paulo", at(1, 1)),
                ("sao_paulo", at(1, 5)),
            ]
        );
    }

    #[test]
    fn test_time_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap();
        for input in [
            json!("2024-01-01T13:00"),
            json!("2024-01-01T13:00:00"),
            json!("2024-01-01 13:00"),
            json!("2024-01-01 13:00:00.000"),
            json!("2024-01-01T13:00:00-03:00"),
            json!(1_704_114_000),
        ] {
            assert_eq!(parse_time(&input), Some(expected), "input {input}");
        }
        assert_eq!(parse_time(&json!("2024-01-01")), Some(at(1, 0)));
        assert_eq!(parse_time(&json!("2024-13-01T00:00")), None);
        assert_eq!(parse_time(&json!(1.5)), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(&json!(3)), Some(3.0));
        assert_eq!(parse_number(&json!("0.25")), Some(0.25));
        assert_eq!(parse_number(&json!("NaN")), None);
        assert_eq!(parse_number(&json!(null)), None);
        assert_eq!(parse_number(&Value::Object(Map::new())), None);
    }
}
