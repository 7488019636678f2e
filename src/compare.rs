use std::path::Path;

use serde::Serialize;

use crate::counter::{
    count_padding_chunked, PaddingReport, DEFAULT_CHUNK_SIZE,
};
use crate::errors::{PaddingError, Result};
use crate::source::{ByteSource, FileSource};

/// Outcome of comparing two sources with their padding stripped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub equal: bool,
    pub left: PaddingReport,
    pub right: PaddingReport,
}

/// Compare the content of two sources, ignoring trailing zero padding.
///
/// Both sources are streamed `chunk_size` bytes at a time; the comparison
/// stops at the first differing chunk. When the content lengths differ no
/// content byte is read at all.
pub fn compare_sources<A: ByteSource, B: ByteSource>(
    left: &mut A,
    right: &mut B,
    chunk_size: usize,
) -> Result<ComparisonResult> {
    let left_report = count_padding_chunked(left, chunk_size)?;
    let right_report = count_padding_chunked(right, chunk_size)?;

    let content_length = left_report.content_length();
    if content_length != right_report.content_length() {
        log::debug!(
            "Content lengths differ: {} vs {}",
            content_length,
            right_report.content_length()
        );
        return Ok(ComparisonResult {
            equal: false,
            left: left_report,
            right: right_report,
        });
    }

    let capacity = usize::try_from(content_length)
        .map_or(chunk_size, |length| length.min(chunk_size));
    let mut left_buf = vec![0u8; capacity];
    let mut right_buf = vec![0u8; capacity];

    let mut offset = 0u64;
    let mut equal = true;
    while offset < content_length {
        let remaining = content_length - offset;
        let size =
            capacity.min(usize::try_from(remaining).unwrap_or(usize::MAX));
        left.read_at(offset, &mut left_buf[..size])?;
        right.read_at(offset, &mut right_buf[..size])?;

        if left_buf[..size] != right_buf[..size] {
            log::debug!(
                "Content differs within bytes {}..{}",
                offset,
                offset + size as u64
            );
            equal = false;
            break;
        }
        offset += size as u64;
    }

    Ok(ComparisonResult {
        equal,
        left: left_report,
        right: right_report,
    })
}

/// Compare two files, ignoring trailing zero padding on either side.
///
/// Fails with [`PaddingError::NotFound`] when either file is missing.
pub fn compare_ignoring_padding<P: AsRef<Path>, Q: AsRef<Path>>(
    left: P,
    right: Q,
) -> Result<ComparisonResult> {
    log::debug!(
        "Comparing {} with {} ignoring padding",
        left.as_ref().display(),
        right.as_ref().display()
    );

    let mut left = FileSource::open(left)?;
    let mut right = FileSource::open(right)?;
    compare_sources(&mut left, &mut right, DEFAULT_CHUNK_SIZE)
}

/// Whether two files hold the same content once padding is removed.
pub fn equal_ignoring_padding<P: AsRef<Path>, Q: AsRef<Path>>(
    left: P,
    right: Q,
) -> Result<bool> {
    compare_ignoring_padding(left, right).map(|result| result.equal)
}

/// Compare two files with a caller-chosen chunk size.
pub fn compare_paths_with_chunk<P: AsRef<Path>, Q: AsRef<Path>>(
    left: P,
    right: Q,
    chunk_size: usize,
) -> Result<ComparisonResult> {
    if chunk_size == 0 {
        return Err(PaddingError::InvalidArgument(
            "chunk size must be at least 1 byte".to_owned(),
        ));
    }
    let mut left = FileSource::open(left)?;
    let mut right = FileSource::open(right)?;
    compare_sources(&mut left, &mut right, chunk_size)
}
