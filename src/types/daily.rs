use chrono::NaiveDate;

/// Column order of every daily table written by the loader.
pub const DAILY_COLUMNS: [&str; 8] = [
    "city",
    "date",
    "temp_min",
    "temp_avg",
    "temp_max",
    "rh_avg",
    "precip_sum",
    "hours",
];

/// Summary of all hourly records of one city on one calendar date.
///
/// Numeric fields are rounded to two decimals. A field is `None` when every
/// contributing hourly value was missing.
#[derive(Debug, PartialEq, Clone)]
pub struct DailyRecord {
    pub city: String,
    pub date: NaiveDate,
    pub temp_min: Option<f64>,
    pub temp_avg: Option<f64>,
    pub temp_max: Option<f64>,
    pub rh_avg: Option<f64>,
    pub precip_sum: Option<f64>,
    /// Number of hourly records in the group, missing measurements included.
    pub hours: u32,
}
