use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rayon::ThreadPoolBuildError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaddingError>;

#[derive(Error, Debug)]
pub enum PaddingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PaddingError {
    /// Attach the path to an I/O error, turning a missing file into
    /// [`PaddingError::NotFound`].
    pub(crate) fn at<P: AsRef<Path>>(path: P, err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(path.as_ref().to_path_buf()),
            _ => Self::Io(err),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<ThreadPoolBuildError> for PaddingError {
    fn from(value: ThreadPoolBuildError) -> Self {
        Self::Other(anyhow::anyhow!(value.to_string()))
    }
}
