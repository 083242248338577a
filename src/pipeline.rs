//! Runs extraction, transformation, aggregation and loading for every
//! configured city, strictly one step after the other.

use crate::aggregate::aggregate;
use crate::error::EtlError;
use crate::extract::cities::is_supported;
use crate::extract::client::ForecastExtractor;
use crate::load::files::{write_files, OutputPaths};
use crate::load::sql::write_sql;
use crate::settings::Settings;
use crate::transform::transform;
use log::{info, warn};
use std::path::Path;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Supported cities that were extracted, in configuration order.
    pub cities: Vec<String>,
    /// The subset of `cities` whose rows are synthetic fallback data.
    pub fallback_cities: Vec<String>,
    pub hourly_rows: usize,
    pub daily_rows: usize,
    pub outputs: OutputPaths,
}

/// Loads [`Settings`] from the process environment and `env_file`.
///
/// # Errors
///
/// Returns [`EtlError::Config`] if the env file is malformed or a day count is
/// not a non-negative integer.
pub fn load_settings(env_file: Option<&Path>) -> Result<Settings, EtlError> {
    Ok(Settings::load(env_file)?)
}

/// Runs the pipeline once against the forecast API named in `settings`.
///
/// # Errors
///
/// Returns [`EtlError::NoValidCities`] before writing anything if none of the
/// configured slugs is supported, and propagates file and database errors.
pub async fn run(settings: &Settings) -> Result<RunSummary, EtlError> {
    let extractor = ForecastExtractor::new(settings.api_url.as_str())?;
    run_with(&extractor, settings).await
}

/// Same as [`run`], with a caller-provided extractor.
pub async fn run_with(
    extractor: &ForecastExtractor,
    settings: &Settings,
) -> Result<RunSummary, EtlError> {
    let mut cities = Vec::new();
    let mut fallback_cities = Vec::new();
    let mut raw_rows = Vec::new();

    for city in &settings.cities {
        if !is_supported(city) {
            warn!("City '{}' is not supported, skipping", city);
            continue;
        }
        let extraction = extractor
            .extract()
            .city(city)
            .past_days(settings.past_days)
            .forecast_days(settings.forecast_days)
            .timezone(&settings.timezone)
            .call()
            .await;
        if let Some(reason) = extraction.fallback_reason() {
            warn!("Using fallback data for {}: {}", city, reason);
            fallback_cities.push(city.clone());
        }
        cities.push(city.clone());
        raw_rows.extend(extraction.into_rows());
    }

    if cities.is_empty() {
        return Err(EtlError::NoValidCities(settings.cities.clone()));
    }

    let hourly = transform(raw_rows);
    let daily = aggregate(&hourly);
    let outputs = write_files(&settings.output_dir, &hourly, &daily).await?;
    write_sql(&daily, settings.db_uri.as_deref()).await?;

    info!(
        "Processed {} cities ({} from fallback data)",
        cities.len(),
        fallback_cities.len()
    );
    Ok(RunSummary {
        cities,
        fallback_cities,
        hourly_rows: hourly.len(),
        daily_rows: daily.len(),
        outputs,
    })
}
