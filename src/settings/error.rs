use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read env file '{0}'")]
    EnvFile(PathBuf, #[source] dotenvy::Error),

    #[error("Invalid value '{value}' for {key}, expected a non-negative integer")]
    InvalidInteger {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}
