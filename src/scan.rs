use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::counter::{count_padding_chunked, PaddingReport};
use crate::errors::{PaddingError, Result};
use crate::source::{ByteSource, FileSource};

/// A file whose trailing padding reached the scan threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanFinding {
    pub path: PathBuf,
    pub total_length: u64,
    pub padding_length: u64,
}

impl ScanFinding {
    fn new(path: PathBuf, report: PaddingReport) -> Self {
        ScanFinding {
            path,
            total_length: report.total_length,
            padding_length: report.padding_length,
        }
    }

    pub fn report(&self) -> PaddingReport {
        PaddingReport::new(self.total_length, self.padding_length)
    }

    pub fn padding_ratio(&self) -> f64 {
        self.report().padding_ratio()
    }
}

/// A file that could not be examined
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Everything a directory scan produced.
///
/// Findings are listed in file name order, but callers should not depend
/// on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanOutcome {
    pub findings: Vec<ScanFinding>,
    pub failures: Vec<ScanFailure>,
    /// Files whose padding was counted
    pub examined: usize,
    /// Zero-length files, never reported
    pub skipped_empty: usize,
    /// Set when the scan stopped before every file was examined
    pub cancelled: bool,
}

enum FileOutcome {
    Padded(ScanFinding),
    Clean,
    Empty,
    Failed(ScanFailure),
    NotStarted,
}

/// Scans the immediate files of a directory for trailing padding.
///
/// Every file is handled by its own task on a pool owned by the scanner,
/// so concurrency is bounded by [`ScanConfig::worker_count`]. A file that
/// cannot be read is recorded in [`ScanOutcome::failures`] and the scan
/// carries on.
///
/// ## Examples
/// ```no_run
/// use padscan::{ScanConfig, Scanner};
///
/// let scanner = Scanner::new(ScanConfig::default().with_threshold(0.2))
///     .expect("Failed to build scanner");
/// let outcome = scanner.scan("path/to/downloads").expect("Failed to scan");
/// for finding in outcome.findings {
///     println!("{}: {}", finding.path.display(), finding.padding_length);
/// }
/// ```
pub struct Scanner {
    config: ScanConfig,
    pool: ThreadPool,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_count())
            .thread_name(|i| format!("padscan-worker-{}", i))
            .build()?;

        Ok(Scanner { config, pool })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn scan<P: AsRef<Path>>(&self, directory: P) -> Result<ScanOutcome> {
        self.scan_with_cancel(directory, &AtomicBool::new(false))
    }

    /// Scan `directory`, checking `cancel` before each file is started.
    ///
    /// Files already being examined when `cancel` is raised run to
    /// completion; their results are kept.
    pub fn scan_with_cancel<P: AsRef<Path>>(
        &self,
        directory: P,
        cancel: &AtomicBool,
    ) -> Result<ScanOutcome> {
        self.scan_with_progress(directory, cancel, |_| {})
    }

    /// Like [`Scanner::scan_with_cancel`], calling `progress` with the path
    /// of every file once it has been examined.
    ///
    /// `progress` runs on the worker threads and may raise `cancel`.
    pub fn scan_with_progress<P, F>(
        &self,
        directory: P,
        cancel: &AtomicBool,
        progress: F,
    ) -> Result<ScanOutcome>
    where
        P: AsRef<Path>,
        F: Fn(&Path) + Sync,
    {
        let directory = directory.as_ref();
        let metadata = fs::metadata(directory)
            .map_err(|e| PaddingError::at(directory, e))?;
        if !metadata.is_dir() {
            return Err(PaddingError::InvalidArgument(format!(
                "{} is not a directory",
                directory.display()
            )));
        }

        log::info!(
            "Scanning {} for padding (threshold {}, {} workers)",
            directory.display(),
            self.config.threshold,
            self.pool.current_num_threads()
        );

        let (candidates, mut failures) =
            discover_files(directory, self.config.skip_hidden);

        let chunk_size = self.config.chunk_size;
        let threshold = self.config.threshold;
        let outcomes: Vec<FileOutcome> = self.pool.install(|| {
            candidates
                .par_iter()
                .map(|path| {
                    if cancel.load(Ordering::Relaxed) {
                        return FileOutcome::NotStarted;
                    }
                    let outcome = examine(path, chunk_size, threshold);
                    progress(path.as_path());
                    outcome
                })
                .collect()
        });

        let mut outcome = ScanOutcome::default();
        for file in outcomes {
            match file {
                FileOutcome::Padded(finding) => {
                    outcome.examined += 1;
                    outcome.findings.push(finding);
                }
                FileOutcome::Clean => outcome.examined += 1,
                FileOutcome::Empty => outcome.skipped_empty += 1,
                FileOutcome::Failed(failure) => failures.push(failure),
                FileOutcome::NotStarted => outcome.cancelled = true,
            }
        }
        outcome.failures = failures;

        log::info!(
            "Scan of {} complete: {} findings, {} failures",
            directory.display(),
            outcome.findings.len(),
            outcome.failures.len()
        );
        Ok(outcome)
    }
}

/// Scan `directory` with default settings and the given threshold.
pub fn scan<P: AsRef<Path>>(
    directory: P,
    threshold: f64,
) -> Result<Vec<ScanFinding>> {
    let config = ScanConfig::default().with_threshold(threshold);
    let scanner = Scanner::new(config)?;
    Ok(scanner.scan(directory)?.findings)
}

/// Count padding of one file; never fails, failures become outcomes.
fn examine(path: &Path, chunk_size: usize, threshold: f64) -> FileOutcome {
    let result = FileSource::open(path).and_then(|mut source| {
        if source.is_empty() {
            return Ok(None);
        }
        count_padding_chunked(&mut source, chunk_size).map(Some)
    });

    match result {
        Ok(None) => {
            log::trace!("Ignoring empty file: {:?}", path);
            FileOutcome::Empty
        }
        Ok(Some(report)) => {
            log::trace!(
                "{:?}: {} of {} bytes are padding",
                path,
                report.padding_length,
                report.total_length
            );
            if report.is_padded() && report.padding_ratio() >= threshold {
                let finding = ScanFinding::new(path.to_path_buf(), report);
                FileOutcome::Padded(finding)
            } else {
                FileOutcome::Clean
            }
        }
        Err(e) => {
            log::warn!("Skipping {:?}: {}", path, e);
            FileOutcome::Failed(ScanFailure {
                path: path.to_path_buf(),
                error: e.to_string(),
            })
        }
    }
}

/// List the files directly inside `directory`.
///
/// Sub-directories are ignored. Symlinks are followed; one that cannot be
/// resolved is reported as a failure.
fn discover_files(
    directory: &Path,
    skip_hidden: bool,
) -> (Vec<PathBuf>, Vec<ScanFailure>) {
    log::debug!("Discovering files in {:?}", directory);

    let mut files = Vec::new();
    let mut failures = Vec::new();

    let entries = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in entries {
        match entry {
            Ok(entry) => {
                if skip_hidden && is_hidden(&entry) {
                    log::trace!("Ignoring hidden file: {:?}", entry.path());
                    continue;
                }
                match should_scan(&entry) {
                    Ok(true) => files.push(entry.into_path()),
                    Ok(false) => {
                        log::trace!("Ignoring non-file: {:?}", entry.path())
                    }
                    Err(e) => {
                        log::warn!("Skipping {:?}: {}", entry.path(), e);
                        failures.push(ScanFailure {
                            path: entry.into_path(),
                            error: e.to_string(),
                        });
                    }
                }
            }
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| directory.to_path_buf());
                log::warn!("Skipping {:?}: {}", path, e);
                failures.push(ScanFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    (files, failures)
}

fn should_scan(entry: &DirEntry) -> Result<bool> {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return Ok(true);
    }
    if file_type.is_symlink() {
        let target = fs::metadata(entry.path())
            .map_err(|e| PaddingError::at(entry.path(), e))?;
        return Ok(target.is_file());
    }
    Ok(false)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_string_lossy()
        .starts_with('.')
}
