mod aggregate;
mod error;
mod extract;
mod load;
mod pipeline;
mod settings;
mod transform;
mod types;

pub use error::EtlError;
pub use pipeline::*;

pub use settings::error::ConfigError;
pub use settings::Settings;

pub use extract::cities::{coordinates, is_supported, LatLon, CITY_COORDS};
pub use extract::client::ForecastExtractor;
pub use extract::error::ExtractError;
pub use extract::fallback::fallback_series;
pub use extract::Extraction;

pub use transform::transform;

pub use aggregate::{aggregate, round2};

pub use load::error::LoadError;
pub use load::files::{daily_frame, hourly_frame, write_files, OutputPaths};
pub use load::sql::{write_sql, TABLE_NAME};

pub use types::daily::{DailyRecord, DAILY_COLUMNS};
pub use types::hourly::{HourlyRecord, HOURLY_COLUMNS};
pub use types::raw_row::RawRow;
