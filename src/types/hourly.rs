use chrono::NaiveDateTime;

pub const COL_TIME: &str = "time";
pub const COL_CITY: &str = "city";
pub const COL_TEMPERATURE: &str = "temperature_2m";
pub const COL_HUMIDITY: &str = "relativehumidity_2m";
pub const COL_PRECIPITATION: &str = "precipitation";

/// Column order of every hourly table written by the loader.
pub const HOURLY_COLUMNS: [&str; 5] = [
    COL_TIME,
    COL_CITY,
    COL_TEMPERATURE,
    COL_HUMIDITY,
    COL_PRECIPITATION,
];

/// One normalized hourly observation for a city.
///
/// `time` is always a valid wall-clock timestamp in the timezone the data was
/// requested in. Any of the measurements may be missing.
#[derive(Debug, PartialEq, Clone)]
pub struct HourlyRecord {
    pub time: NaiveDateTime,
    pub city: String,
    pub temperature_2m: Option<f64>,      // °C
    pub relativehumidity_2m: Option<f64>, // %
    pub precipitation: Option<f64>,       // mm
}
