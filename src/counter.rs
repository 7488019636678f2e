use std::path::Path;

use serde::Serialize;

use crate::errors::{PaddingError, Result};
use crate::source::{ByteSource, FileSource};

const KILOBYTE: usize = 1024;

/// Block size used when reading a source backwards
pub const DEFAULT_CHUNK_SIZE: usize = 64 * KILOBYTE;

/// Trailing padding measured on one source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PaddingReport {
    pub total_length: u64,
    pub padding_length: u64,
}

impl PaddingReport {
    pub fn new(total_length: u64, padding_length: u64) -> Self {
        debug_assert!(padding_length <= total_length);
        PaddingReport {
            total_length,
            padding_length,
        }
    }

    /// Length of the content preceding the padding
    pub fn content_length(&self) -> u64 {
        self.total_length - self.padding_length
    }

    /// Padding as a fraction of the total length, 0 for an empty source
    pub fn padding_ratio(&self) -> f64 {
        if self.total_length == 0 {
            return 0.0;
        }
        self.padding_length as f64 / self.total_length as f64
    }

    pub fn is_padded(&self) -> bool {
        self.padding_length > 0
    }
}

/// How padding is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Load the whole source, then scan it backwards
    Full,
    /// Read backwards in blocks of the given size
    Chunked(usize),
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Chunked(DEFAULT_CHUNK_SIZE)
    }
}

impl Strategy {
    pub fn count<S: ByteSource>(self, source: &mut S) -> Result<PaddingReport> {
        match self {
            Strategy::Full => count_padding_full(source),
            Strategy::Chunked(chunk_size) => {
                count_padding_chunked(source, chunk_size)
            }
        }
    }

    /// Open the file at `path` and count its padding.
    pub fn count_path<P: AsRef<Path>>(self, path: P) -> Result<PaddingReport> {
        let mut source = FileSource::open(path)?;
        self.count(&mut source)
    }
}

/// Number of zero bytes at the end of `bytes`
pub fn trailing_zeros(bytes: &[u8]) -> usize {
    match bytes.iter().rposition(|&b| b != 0) {
        Some(last) => bytes.len() - last - 1,
        None => bytes.len(),
    }
}

/// Count padding by reading the whole source into memory.
pub fn count_padding_full<S: ByteSource>(
    source: &mut S,
) -> Result<PaddingReport> {
    let total = source.len();
    let size = usize::try_from(total).map_err(|_| {
        PaddingError::InvalidArgument(format!(
            "source of {} bytes does not fit in memory",
            total
        ))
    })?;

    let mut buffer = vec![0u8; size];
    source.read_at(0, &mut buffer)?;

    let padding = trailing_zeros(&buffer) as u64;
    log::trace!("{} of {} bytes are padding", padding, total);
    Ok(PaddingReport::new(total, padding))
}

/// Count padding by reading the source backwards, `chunk_size` bytes at a
/// time, stopping at the first block that holds a non-zero byte.
pub fn count_padding_chunked<S: ByteSource>(
    source: &mut S,
    chunk_size: usize,
) -> Result<PaddingReport> {
    if chunk_size == 0 {
        return Err(PaddingError::InvalidArgument(
            "chunk size must be at least 1 byte".to_owned(),
        ));
    }

    let total = source.len();
    let capacity = usize::try_from(total)
        .map_or(chunk_size, |total| total.min(chunk_size));
    let mut buffer = vec![0u8; capacity];

    let mut end = total;
    let mut padding = 0u64;
    while end > 0 {
        let size = capacity.min(usize::try_from(end).unwrap_or(usize::MAX));
        let start = end - size as u64;
        let block = &mut buffer[..size];
        source.read_at(start, block)?;

        let zeros = trailing_zeros(block);
        padding += zeros as u64;
        log::trace!(
            "Block {}..{} ends with {} zero bytes",
            start,
            end,
            zeros
        );
        if zeros < size {
            break;
        }
        end = start;
    }

    Ok(PaddingReport::new(total, padding))
}

/// Count the padding of the file at `path` by reading it whole.
pub fn count_padding<P: AsRef<Path>>(path: P) -> Result<PaddingReport> {
    let path = path.as_ref();
    log::debug!("Counting padding of {} (full read)", path.display());

    let mut source = FileSource::open(path)?;
    count_padding_full(&mut source)
}

/// Count the padding of the file at `path` with the chunked strategy.
pub fn count_padding_chunked_path<P: AsRef<Path>>(
    path: P,
    chunk_size: usize,
) -> Result<PaddingReport> {
    log::debug!(
        "Counting padding of {} (chunks of {} bytes)",
        path.as_ref().display(),
        chunk_size
    );
    Strategy::Chunked(chunk_size).count_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;
    use quickcheck_macros::quickcheck;
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use tempdir::TempDir;

    fn padded(content: &[u8], padding: usize) -> Vec<u8> {
        let mut data = content.to_vec();
        data.resize(content.len() + padding, 0);
        data
    }

    #[rstest]
    #[case(&[], 0)]
    #[case(&[0, 0, 0], 3)]
    #[case(&[1, 2, 3], 0)]
    #[case(&[0, 7, 0, 0], 2)]
    #[case(&[9, 0], 1)]
    fn trailing_zeros_counts_tail_run(
        #[case] bytes: &[u8],
        #[case] expected: usize,
    ) {
        assert_eq!(trailing_zeros(bytes), expected);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(7)]
    #[case(64)]
    #[case(DEFAULT_CHUNK_SIZE)]
    fn chunked_matches_full_for_any_chunk_size(#[case] chunk_size: usize) {
        let data = padded(b"MZ\x90\x00\x03\x00\x00\x00\x04", 150);
        let full = count_padding_full(&mut SliceSource::new(&data)).unwrap();
        let chunked =
            count_padding_chunked(&mut SliceSource::new(&data), chunk_size)
                .unwrap();

        assert_eq!(full, chunked);
        assert_eq!(chunked.padding_length, 150);
        assert_eq!(chunked.content_length(), 9);
    }

    #[test]
    fn empty_source_has_no_padding() {
        let report =
            count_padding_chunked(&mut SliceSource::new(&[]), 16).unwrap();
        assert_eq!(report, PaddingReport::new(0, 0));
        assert_eq!(report.padding_ratio(), 0.0);
        assert!(!report.is_padded());
    }

    #[test]
    fn all_zero_source_is_entirely_padding() {
        let data = vec![0u8; 1000];
        let report =
            count_padding_chunked(&mut SliceSource::new(&data), 64).unwrap();
        assert_eq!(report.padding_length, 1000);
        assert_eq!(report.padding_ratio(), 1.0);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let err = count_padding_chunked(&mut SliceSource::new(&[0, 0]), 0)
            .unwrap_err();
        assert!(matches!(err, PaddingError::InvalidArgument(_)));
    }

    #[test]
    fn strategy_defaults_to_chunked() {
        assert_eq!(Strategy::default(), Strategy::Chunked(DEFAULT_CHUNK_SIZE));
    }

    #[test]
    fn path_variants_agree_on_disk() {
        let dir = TempDir::new("counter").unwrap();
        let path = dir.path().join("tail.bin");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&padded(&[0xAB; 70_000], 200_000)).unwrap();
        drop(file);

        let full = count_padding(&path).unwrap();
        let chunked =
            count_padding_chunked_path(&path, DEFAULT_CHUNK_SIZE).unwrap();
        assert_eq!(full, chunked);
        assert_eq!(full, PaddingReport::new(270_000, 200_000));
        assert_eq!(Strategy::Full.count_path(&path).unwrap(), full);
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = TempDir::new("counter_missing").unwrap();
        let path = dir.path().join("nothing-here");
        assert!(count_padding(&path).unwrap_err().is_not_found());
        assert!(count_padding_chunked_path(&path, 8)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn directory_is_rejected_by_both_path_variants() {
        let dir = TempDir::new("counter_dir").unwrap();

        let full = count_padding(dir.path()).unwrap_err();
        assert!(matches!(full, PaddingError::InvalidArgument(_)));
        let chunked =
            count_padding_chunked_path(dir.path(), DEFAULT_CHUNK_SIZE)
                .unwrap_err();
        assert!(matches!(chunked, PaddingError::InvalidArgument(_)));
    }

    #[quickcheck]
    fn prop_chunked_equals_full(data: Vec<u8>, padding: u8, chunk: u8) -> bool {
        let data = padded(&data, padding as usize);
        let chunk_size = chunk as usize + 1;
        let full = count_padding_full(&mut SliceSource::new(&data)).unwrap();
        let chunked =
            count_padding_chunked(&mut SliceSource::new(&data), chunk_size)
                .unwrap();
        full == chunked && full.padding_length >= padding as u64
    }
}
