//! Run configuration, read once from the process environment and an optional
//! `.env` file, then passed by reference to every pipeline stage.

pub mod error;

use crate::settings::error::ConfigError;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CITY_LIST: &str = "sao_paulo;rio_de_janeiro;brasilia";
pub const DEFAULT_PAST_DAYS: u32 = 3;
pub const DEFAULT_FORECAST_DAYS: u32 = 0;
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";
pub const DEFAULT_OUTPUT_DIR: &str = "data/processed";
pub const DEFAULT_API_URL: &str = "https://api.open-meteo.com/v1/forecast";

const KEY_CITY_LIST: &str = "CITY_LIST";
const KEY_PAST_DAYS: &str = "PAST_DAYS";
const KEY_FORECAST_DAYS: &str = "FORECAST_DAYS";
const KEY_TIMEZONE: &str = "TIMEZONE";
const KEY_DB_URI: &str = "DB_URI";
const KEY_OUTPUT_DIR: &str = "OUTPUT_DIR";
const KEY_API_URL: &str = "FORECAST_API_URL";

/// Immutable configuration of a single pipeline run.
///
/// # Examples
///
/// ```
/// use weather_etl::Settings;
///
/// let settings = Settings::from_vars([("city_list", "recife; manaus;")]).unwrap();
/// assert_eq!(settings.cities, ["recife", "manaus"]);
/// assert_eq!(settings.past_days, 3);
/// assert!(settings.db_uri.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// City slugs in configuration order. May contain unsupported slugs.
    pub cities: Vec<String>,
    pub past_days: u32,
    pub forecast_days: u32,
    /// IANA timezone name sent to the forecast API.
    pub timezone: String,
    /// Connection string of the optional relational target.
    pub db_uri: Option<String>,
    pub output_dir: PathBuf,
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cities: parse_city_list(DEFAULT_CITY_LIST),
            past_days: DEFAULT_PAST_DAYS,
            forecast_days: DEFAULT_FORECAST_DAYS,
            timezone: DEFAULT_TIMEZONE.to_string(),
            db_uri: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment, with `env_file` as a
    /// lower-priority source.
    ///
    /// A nonexistent `env_file` is skipped. The process environment is never
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFile`] if the env file exists but cannot be
    /// parsed, and [`ConfigError::InvalidInteger`] for a bad day count.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let process_env = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        Self::load_with_env(env_file, process_env)
    }

    pub(crate) fn load_with_env(
        env_file: Option<&Path>,
        process_env: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let mut vars = HashMap::new();
        if let Some(path) = env_file.filter(|p| p.is_file()) {
            debug!("Reading settings overrides from {}", path.display());
            let entries = dotenvy::from_path_iter(path)
                .map_err(|e| ConfigError::EnvFile(path.to_path_buf(), e))?;
            for entry in entries {
                let (key, value) = entry.map_err(|e| ConfigError::EnvFile(path.to_path_buf(), e))?;
                vars.insert(key.to_ascii_uppercase(), value);
            }
        }
        // Real environment wins over the file.
        for (key, value) in process_env {
            vars.insert(key.to_ascii_uppercase(), value);
        }
        Self::from_vars(vars)
    }

    /// Builds settings from explicit key/value pairs. Keys are matched
    /// case-insensitively, unknown keys are ignored and absent keys take
    /// their defaults.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_uppercase(), v.into()))
            .collect();
        let defaults = Settings::default();

        Ok(Settings {
            cities: vars
                .get(KEY_CITY_LIST)
                .map(|s| parse_city_list(s))
                .unwrap_or(defaults.cities),
            past_days: parse_days(&vars, KEY_PAST_DAYS, defaults.past_days)?,
            forecast_days: parse_days(&vars, KEY_FORECAST_DAYS, defaults.forecast_days)?,
            timezone: vars
                .get(KEY_TIMEZONE)
                .cloned()
                .unwrap_or(defaults.timezone),
            db_uri: vars
                .get(KEY_DB_URI)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            output_dir: vars
                .get(KEY_OUTPUT_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            api_url: vars.get(KEY_API_URL).cloned().unwrap_or(defaults.api_url),
        })
    }
}

/// Splits a `;`-separated slug list, trimming entries and dropping empty ones.
pub fn parse_city_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_days(
    vars: &HashMap<String, String>,
    key: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    match vars.get(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidInteger {
                key,
                value: value.clone(),
                source,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_defaults() -> Result<(), ConfigError> {
        let settings = Settings::from_vars(no_env())?;
        assert_eq!(
            settings.cities,
            ["sao_paulo", "rio_de_janeiro", "brasilia"]
        );
        assert_eq!(settings.past_days, 3);
        assert_eq!(settings.forecast_days, 0);
        assert_eq!(settings.timezone, "America/Sao_Paulo");
        assert_eq!(settings.db_uri, None);
        assert_eq!(settings.output_dir, PathBuf::from("data/processed"));
        assert_eq!(settings, Settings::default());
        Ok(())
    }

    #[test]
    fn test_keys_are_case_insensitive() -> Result<(), ConfigError> {
        let settings = Settings::from_vars([
            ("city_list", "curitiba"),
            ("Past_Days", "7"),
            ("forecast_days", " 2 "),
            ("timezone", "UTC"),
            ("db_uri", "sqlite::memory:"),
        ])?;
        assert_eq!(settings.cities, ["curitiba"]);
        assert_eq!(settings.past_days, 7);
        assert_eq!(settings.forecast_days, 2);
        assert_eq!(settings.timezone, "UTC");
        assert_eq!(settings.db_uri.as_deref(), Some("sqlite::memory:"));
        Ok(())
    }

    #[test]
    fn test_city_list_trims_and_drops_empty_entries() {
        assert_eq!(
            parse_city_list(" recife ;;manaus; ;"),
            ["recife", "manaus"]
        );
        assert!(parse_city_list(";;").is_empty());
    }

    #[test]
    fn test_empty_db_uri_is_unset() -> Result<(), ConfigError> {
        let settings = Settings::from_vars([("DB_URI", "  ")])?;
        assert_eq!(settings.db_uri, None);
        Ok(())
    }

    #[test]
    fn test_invalid_days_are_rejected() {
        let err = Settings::from_vars([("PAST_DAYS", "three")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidInteger { key: "PAST_DAYS", .. }
        ));

        let err = Settings::from_vars([("FORECAST_DAYS", "-1")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidInteger { key: "FORECAST_DAYS", .. }
        ));
    }

    #[test]
    fn test_env_file_is_overridden_by_process_env() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "CITY_LIST=salvador;fortaleza")?;
        writeln!(file, "PAST_DAYS=5")?;
        writeln!(file, "timezone=America/Manaus")?;
        file.flush()?;

        let settings = Settings::load_with_env(
            Some(file.path()),
            vec![("PAST_DAYS".to_string(), "1".to_string())],
        )?;
        assert_eq!(settings.cities, ["salvador", "fortaleza"]);
        assert_eq!(settings.past_days, 1);
        assert_eq!(settings.timezone, "America/Manaus");
        Ok(())
    }

    #[test]
    fn test_missing_env_file_is_skipped() -> Result<(), ConfigError> {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = Settings::load_with_env(Some(&dir.path().join(".env")), no_env())?;
        assert_eq!(settings, Settings::default());
        Ok(())
    }
}
