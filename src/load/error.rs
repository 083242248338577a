use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to build {0} table")]
    FrameBuild(&'static str, #[source] PolarsError),

    // Errors inside the blocking write task
    #[error("I/O error writing output file '{0}'")]
    FileWriteIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing output file '{0}'")]
    FileWritePolars(PathBuf, #[source] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed to replace table '{table}'")]
    Database {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },
}
