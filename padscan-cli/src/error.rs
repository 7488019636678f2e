use std::io;

use padscan::PaddingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not serialize output: {0}")]
    OutputError(String),

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    PaddingError(#[from] PaddingError),
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::OutputError(value.to_string())
    }
}
