use crate::counter::DEFAULT_CHUNK_SIZE;
use crate::errors::{PaddingError, Result};

/// Settings for a directory scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Minimum padding ratio, in `[0, 1]`, for a file to be reported
    pub threshold: f64,
    /// Worker threads; 0 means one per available core
    pub threads: usize,
    /// Block size for the backward padding scan
    pub chunk_size: usize,
    /// Leave out files whose name starts with a dot
    pub skip_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            threshold: 0.0,
            threads: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            skip_hidden: false,
        }
    }
}

impl ScanConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(PaddingError::InvalidArgument(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.chunk_size == 0 {
            return Err(PaddingError::InvalidArgument(
                "chunk size must be at least 1 byte".to_owned(),
            ));
        }
        Ok(())
    }

    /// Number of workers actually used for a scan
    pub fn worker_count(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}
