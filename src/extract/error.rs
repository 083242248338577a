use thiserror::Error;

/// Why live extraction did not produce data for a city.
///
/// These never abort a run: they travel inside [`crate::Extraction::Fallback`]
/// next to the synthetic rows that replaced the real ones.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("City '{0}' has no known coordinates")]
    UnsupportedCity(String),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode forecast response from {0}")]
    ResponseDecode(String, #[source] reqwest::Error),

    #[error("Forecast response from {0} contained no hourly data")]
    EmptyHourly(String),

    #[error("Forecast response from {0} has hourly arrays of different lengths")]
    MisalignedHourly(String),
}
