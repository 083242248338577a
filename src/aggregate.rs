//! Daily aggregation of hourly records.

use crate::types::daily::DailyRecord;
use crate::types::hourly::HourlyRecord;
use chrono::NaiveDate;
use log::info;
use std::collections::BTreeMap;

#[derive(Default)]
struct DayValues {
    temperature: Vec<f64>,
    humidity: Vec<f64>,
    precipitation: Vec<f64>,
    hours: u32,
}

impl DayValues {
    fn push(&mut self, record: &HourlyRecord) {
        self.temperature.extend(record.temperature_2m);
        self.humidity.extend(record.relativehumidity_2m);
        self.precipitation.extend(record.precipitation);
        self.hours += 1;
    }

    fn into_record(mut self, city: String, date: NaiveDate) -> DailyRecord {
        // Summing in sorted order keeps results independent of input order.
        for values in [
            &mut self.temperature,
            &mut self.humidity,
            &mut self.precipitation,
        ] {
            values.sort_by(f64::total_cmp);
        }
        DailyRecord {
            city,
            date,
            temp_min: self.temperature.first().copied().map(round2),
            temp_avg: mean(&self.temperature).map(round2),
            temp_max: self.temperature.last().copied().map(round2),
            rh_avg: mean(&self.humidity).map(round2),
            precip_sum: sum(&self.precipitation).map(round2),
            hours: self.hours,
        }
    }
}

/// Groups hourly records by city and calendar date.
///
/// Per group: min, mean and max temperature, mean humidity, total
/// precipitation and the number of records. Missing measurements are skipped;
/// a statistic with no inputs is `None`. The output is sorted by city, then
/// date.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use weather_etl::{aggregate, HourlyRecord};
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let hourly: Vec<_> = [20.0, 21.0, 22.0, 23.0, 24.0]
///     .into_iter()
///     .enumerate()
///     .map(|(h, t)| HourlyRecord {
///         time: day.and_hms_opt(h as u32, 0, 0).unwrap(),
///         city: "sao_paulo".to_string(),
///         temperature_2m: Some(t),
///         relativehumidity_2m: None,
///         precipitation: Some(0.0),
///     })
///     .collect();
///
/// let daily = aggregate(&hourly);
/// assert_eq!(daily.len(), 1);
/// assert_eq!(daily[0].temp_avg, Some(22.0));
/// assert_eq!(daily[0].rh_avg, None);
/// assert_eq!(daily[0].hours, 5);
/// ```
pub fn aggregate(hourly: &[HourlyRecord]) -> Vec<DailyRecord> {
    let mut groups: BTreeMap<(&str, NaiveDate), DayValues> = BTreeMap::new();
    for record in hourly {
        groups
            .entry((record.city.as_str(), record.time.date()))
            .or_default()
            .push(record);
    }

    let daily: Vec<DailyRecord> = groups
        .into_iter()
        .map(|((city, date), values)| values.into_record(city.to_string(), date))
        .collect();
    info!("Aggregated {} daily records", daily.len());
    daily
}

/// Rounds to two decimals, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn sum(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum())
}

fn mean(values: &[f64]) -> Option<f64> {
    sum(values).map(|total| total / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn hour(city: &str, time: NaiveDateTime, temp: Option<f64>, rh: Option<f64>, prcp: Option<f64>) -> HourlyRecord {
        HourlyRecord {
            time,
            city: city.to_string(),
            temperature_2m: temp,
            relativehumidity_2m: rh,
            precipitation: prcp,
        }
    }

    fn single_day() -> Vec<HourlyRecord> {
        let temps = [20.0, 21.0, 22.0, 23.0, 24.0];
        let rh = [70.0, 71.0, 72.0, 73.0, 74.0];
        let prcp = [0.0, 0.1, 0.0, 0.2, 0.0];
        (0..5)
            .map(|i| hour("sao_paulo", at(1, i as u32), Some(temps[i]), Some(rh[i]), Some(prcp[i])))
            .collect()
    }

    #[test]
    fn test_single_day_statistics() {
        let daily = aggregate(&single_day());
        assert_eq!(
            daily,
            vec![DailyRecord {
                city: "sao_paulo".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                temp_min: Some(20.0),
                temp_avg: Some(22.0),
                temp_max: Some(24.0),
                rh_avg: Some(72.0),
                precip_sum: Some(0.3),
                hours: 5,
            }]
        );
    }

    #[test]
    fn test_hours_counts_rows_with_missing_values() {
        let hourly = vec![
            hour("recife", at(1, 0), Some(28.0), None, None),
            hour("recife", at(1, 1), None, None, None),
            hour("recife", at(1, 2), Some(30.0), Some(80.0), None),
        ];
        let daily = aggregate(&hourly);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].hours, 3);
        assert_eq!(daily[0].temp_avg, Some(29.0));
        assert_eq!(daily[0].rh_avg, Some(80.0));
        assert_eq!(daily[0].precip_sum, None);
    }

    #[test]
    fn test_groups_split_by_city_and_date_and_sorted() {
        let hourly = vec![
            hour("sao_paulo", at(2, 0), Some(1.0), None, None),
            hour("brasilia", at(1, 23), Some(2.0), None, None),
            hour("sao_paulo", at(1, 12), Some(3.0), None, None),
            hour("brasilia", at(2, 0), Some(4.0), None, None),
            hour("brasilia", at(2, 1), Some(6.0), None, None),
        ];
        let daily = aggregate(&hourly);
        let keys: Vec<_> = daily
            .iter()
            .map(|d| (d.city.as_str(), d.date.to_string(), d.hours))
            .collect();
        assert_eq!(
            keys,
            [
                ("brasilia", "2024-01-01".to_string(), 1),
                ("brasilia", "2024-01-02".to_string(), 2),
                ("sao_paulo", "2024-01-01".to_string(), 1),
                ("sao_paulo", "2024-01-02".to_string(), 1),
            ]
        );
        assert_eq!(daily[1].temp_avg, Some(5.0));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut hourly = single_day();
        hourly.extend([
            hour("curitiba", at(1, 3), Some(15.123), Some(90.0), Some(0.7)),
            hour("curitiba", at(1, 4), Some(16.456), Some(91.0), Some(0.1)),
            hour("curitiba", at(2, 4), Some(11.0), None, Some(0.2)),
        ]);
        let expected = aggregate(&hourly);

        hourly.reverse();
        assert_eq!(aggregate(&hourly), expected);
        hourly.rotate_left(3);
        assert_eq!(aggregate(&hourly), expected);
        hourly.swap(0, 5);
        assert_eq!(aggregate(&hourly), expected);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(15.789_5), 15.79);
        assert_eq!(round2(0.1 + 0.2), 0.3);
        assert_eq!(round2(-2.346), -2.35);
        assert_eq!(round2(22.0), 22.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }
}
