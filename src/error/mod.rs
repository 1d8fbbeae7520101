use crate::storage::PreferenceError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Preferences(#[from] PreferenceError),
    #[error("failed to prepare output directory {path}")]
    OutputDirectory {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write page {path}")]
    WritePage {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start async runtime")]
    Runtime(#[source] std::io::Error),
    #[error("failed to read console input")]
    Console(#[source] std::io::Error),
}
