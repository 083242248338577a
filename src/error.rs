use crate::extract::error::ExtractError;
use crate::load::error::LoadError;
use crate::settings::error::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("No valid cities configured (CITY_LIST: {0:?})")]
    NoValidCities(Vec<String>),
}
