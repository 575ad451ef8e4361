use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("version control error: {0}")]
    VersionControl(String),
    #[error("authentication failure: {0}")]
    Authentication(String),
    #[error("backend failure: {0}")]
    Backend(String),
    #[error("no changes to summarize")]
    EmptyInput,
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
