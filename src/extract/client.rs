//! HTTP extraction of hourly observations from the Open-Meteo forecast endpoint.

use crate::extract::cities::coordinates;
use crate::extract::error::ExtractError;
use crate::extract::fallback::{current_hour, fallback_series};
use crate::extract::Extraction;
use crate::types::hourly::{COL_HUMIDITY, COL_PRECIPITATION, COL_TEMPERATURE};
use crate::types::raw_row::RawRow;
use bon::bon;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    hourly: Option<Map<String, Value>>,
}

/// Fetches hourly weather for one city at a time.
///
/// Every call to [`ForecastExtractor::extract`] returns data: when the request
/// fails in any way a synthetic series is returned instead, wrapped in
/// [`Extraction::Fallback`].
pub struct ForecastExtractor {
    api_url: String,
    download_client: Client,
}

#[bon]
impl ForecastExtractor {
    /// Creates an extractor that sends requests to `api_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::ClientBuild`] if the TLS backend cannot be
    /// initialized.
    pub fn new(api_url: impl Into<String>) -> Result<Self, ExtractError> {
        Self::with_timeout(api_url, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeout(
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ExtractError> {
        let download_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ExtractError::ClientBuild)?;
        Ok(Self {
            api_url: api_url.into(),
            download_client,
        })
    }

    /// Extracts hourly rows for `city` covering `past_days` before today
    /// through `forecast_days` after, in `timezone`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use weather_etl::ForecastExtractor;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), weather_etl::ExtractError> {
    /// let extractor = ForecastExtractor::new("https://api.open-meteo.com/v1/forecast")?;
    /// let extraction = extractor
    ///     .extract()
    ///     .city("recife")
    ///     .past_days(3)
    ///     .forecast_days(0)
    ///     .timezone("America/Recife")
    ///     .call()
    ///     .await;
    /// if let Some(reason) = extraction.fallback_reason() {
    ///     println!("offline data used: {reason}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn extract(
        &self,
        city: &str,
        past_days: u32,
        forecast_days: u32,
        timezone: &str,
    ) -> Extraction {
        match self
            .fetch_hourly(city, past_days, forecast_days, timezone)
            .await
        {
            Ok(rows) => {
                info!("Fetched {} hourly rows for {}", rows.len(), city);
                Extraction::Live(rows)
            }
            Err(reason) => {
                debug!("Live extraction for {} failed: {:?}", city, reason);
                Extraction::Fallback {
                    rows: fallback_series(city, current_hour()),
                    reason,
                }
            }
        }
    }

    async fn fetch_hourly(
        &self,
        city: &str,
        past_days: u32,
        forecast_days: u32,
        timezone: &str,
    ) -> Result<Vec<RawRow>, ExtractError> {
        let location =
            coordinates(city).ok_or_else(|| ExtractError::UnsupportedCity(city.to_string()))?;
        let hourly_fields = [COL_TEMPERATURE, COL_HUMIDITY, COL_PRECIPITATION].join(",");

        let request = self.download_client.get(&self.api_url).query(&[
            ("latitude", location.0.to_string()),
            ("longitude", location.1.to_string()),
            ("hourly", hourly_fields),
            ("past_days", past_days.to_string()),
            ("forecast_days", forecast_days.to_string()),
            ("timezone", timezone.to_string()),
        ]);
        info!("Requesting hourly data for {} from {}", city, self.api_url);

        let response = request
            .send()
            .await
            .map_err(|e| ExtractError::NetworkRequest(self.api_url.clone(), e))?;

        let url = response.url().to_string();
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(match e.status() {
                    Some(status) => ExtractError::HttpStatus {
                        url,
                        status,
                        source: e,
                    },
                    None => ExtractError::NetworkRequest(url, e),
                });
            }
        };

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::ResponseDecode(url.clone(), e))?;

        let rows = hourly_to_rows(city, body.hourly.unwrap_or_default())
            .ok_or_else(|| ExtractError::MisalignedHourly(url.clone()))?;
        if rows.is_empty() {
            return Err(ExtractError::EmptyHourly(url));
        }
        Ok(rows)
    }
}

/// Zips the parallel arrays of the `hourly` object into one row per index.
/// Non-array entries are ignored. Returns `None` when the arrays differ in length.
fn hourly_to_rows(city: &str, hourly: Map<String, Value>) -> Option<Vec<RawRow>> {
    let columns: Vec<(String, Vec<Value>)> = hourly
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::Array(values) => Some((name, values)),
            _ => None,
        })
        .collect();
    let height = columns.first().map_or(0, |(_, v)| v.len());
    if columns.iter().any(|(_, v)| v.len() != height) {
        return None;
    }

    let rows = (0..height)
        .map(|i| {
            let fields = columns
                .iter()
                .map(|(name, values)| (name.clone(), values[i].clone()))
                .collect();
            RawRow::new(city, fields)
        })
        .collect();
    Some(rows)
}
