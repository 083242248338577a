//! Parquet and CSV output of the hourly and daily tables.

use crate::load::error::LoadError;
use crate::types::daily::{DailyRecord, DAILY_COLUMNS};
use crate::types::hourly::{
    HourlyRecord, COL_CITY, COL_HUMIDITY, COL_PRECIPITATION, COL_TEMPERATURE, COL_TIME,
};
use log::info;
use polars::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::{fs, task};

pub const HOURLY_FILE_STEM: &str = "hourly_weather";
pub const DAILY_FILE_STEM: &str = "daily_weather";

const CSV_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Parquet,
    Csv,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Parquet => "parquet",
            FileFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Locations of the four files one run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub hourly_parquet: PathBuf,
    pub daily_parquet: PathBuf,
    pub hourly_csv: PathBuf,
    pub daily_csv: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        let file = |stem: &str, format: FileFormat| dir.join(format!("{stem}.{format}"));
        Self {
            hourly_parquet: file(HOURLY_FILE_STEM, FileFormat::Parquet),
            daily_parquet: file(DAILY_FILE_STEM, FileFormat::Parquet),
            hourly_csv: file(HOURLY_FILE_STEM, FileFormat::Csv),
            daily_csv: file(DAILY_FILE_STEM, FileFormat::Csv),
        }
    }

    pub fn all(&self) -> [&Path; 4] {
        [
            self.hourly_parquet.as_path(),
            self.daily_parquet.as_path(),
            self.hourly_csv.as_path(),
            self.daily_csv.as_path(),
        ]
    }
}

/// Builds the hourly table with columns `time, city, temperature_2m,
/// relativehumidity_2m, precipitation`.
pub fn hourly_frame(hourly: &[HourlyRecord]) -> PolarsResult<DataFrame> {
    let time = DatetimeChunked::from_naive_datetime(
        COL_TIME.into(),
        hourly.iter().map(|r| r.time),
        TimeUnit::Microseconds,
    )
    .into_series();

    DataFrame::new(vec![
        Column::from(time),
        Column::new(
            COL_CITY.into(),
            hourly.iter().map(|r| r.city.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_TEMPERATURE.into(),
            hourly.iter().map(|r| r.temperature_2m).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_HUMIDITY.into(),
            hourly.iter().map(|r| r.relativehumidity_2m).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_PRECIPITATION.into(),
            hourly.iter().map(|r| r.precipitation).collect::<Vec<_>>(),
        ),
    ])
}

/// Builds the daily table with the columns of [`DAILY_COLUMNS`].
pub fn daily_frame(daily: &[DailyRecord]) -> PolarsResult<DataFrame> {
    let [city, date, temp_min, temp_avg, temp_max, rh_avg, precip_sum, hours] = DAILY_COLUMNS;
    let floats = |name: &str, get: fn(&DailyRecord) -> Option<f64>| {
        Column::new(name.into(), daily.iter().map(get).collect::<Vec<_>>())
    };
    let dates = DateChunked::from_naive_date(date.into(), daily.iter().map(|r| r.date)).into_series();

    DataFrame::new(vec![
        Column::new(
            city.into(),
            daily.iter().map(|r| r.city.as_str()).collect::<Vec<_>>(),
        ),
        Column::from(dates),
        floats(temp_min, |r| r.temp_min),
        floats(temp_avg, |r| r.temp_avg),
        floats(temp_max, |r| r.temp_max),
        floats(rh_avg, |r| r.rh_avg),
        floats(precip_sum, |r| r.precip_sum),
        Column::new(
            hours.into(),
            daily.iter().map(|r| r.hours).collect::<Vec<_>>(),
        ),
    ])
}

/// Writes both tables as Parquet and CSV into `output_dir`, creating it if
/// needed and overwriting existing files.
///
/// # Errors
///
/// Returns a [`LoadError`] if the directory cannot be created, a table cannot
/// be assembled or any file fails to write.
pub async fn write_files(
    output_dir: &Path,
    hourly: &[HourlyRecord],
    daily: &[DailyRecord],
) -> Result<OutputPaths, LoadError> {
    fs::create_dir_all(output_dir)
        .await
        .map_err(|e| LoadError::OutputDirCreation(output_dir.to_path_buf(), e))?;

    let hourly_df = hourly_frame(hourly).map_err(|e| LoadError::FrameBuild("hourly", e))?;
    let daily_df = daily_frame(daily).map_err(|e| LoadError::FrameBuild("daily", e))?;
    let paths = OutputPaths::in_dir(output_dir);

    // DataFrame clones share their column buffers.
    write_dataframe(hourly_df.clone(), &paths.hourly_parquet, FileFormat::Parquet).await?;
    write_dataframe(daily_df.clone(), &paths.daily_parquet, FileFormat::Parquet).await?;
    write_dataframe(hourly_df, &paths.hourly_csv, FileFormat::Csv).await?;
    write_dataframe(daily_df, &paths.daily_csv, FileFormat::Csv).await?;

    Ok(paths)
}

/// Writes a DataFrame to `path` in `format` using spawn_blocking.
async fn write_dataframe(
    mut df: DataFrame,
    path: &Path,
    format: FileFormat,
) -> Result<(), LoadError> {
    let path_buf = path.to_path_buf();
    let rows = df.height();
    task::spawn_blocking(move || {
        let mut file = std::fs::File::create(&path_buf)
            .map_err(|e| LoadError::FileWriteIo(path_buf.clone(), e))?;
        match format {
            FileFormat::Parquet => ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map(|_| ()),
            FileFormat::Csv => CsvWriter::new(&mut file)
                .include_header(true)
                .with_datetime_format(Some(CSV_DATETIME_FORMAT.to_string()))
                .finish(&mut df),
        }
        .map_err(|e| LoadError::FileWritePolars(path_buf, e))
    })
    .await??;
    info!("Wrote {} rows to {}", rows, path.display());
    Ok(())
}
