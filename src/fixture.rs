//! Synthetic "poison" files: random content followed by zero padding.
//!
//! Only meant for exercising the detector. The default content comes from
//! [`fastrand`], which is not a cryptographic generator; pass another filler
//! to [`create_file_with_padding_using`] when that matters.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::counter::PaddingReport;
use crate::errors::{PaddingError, Result};

const WRITE_CHUNK: usize = 64 * 1024;

/// Split `total_size` into `(content, padding)` byte counts.
pub fn padding_split(total_size: u64, percentage: u8) -> Result<(u64, u64)> {
    if percentage > 100 {
        return Err(PaddingError::InvalidArgument(format!(
            "padding percentage must be between 0 and 100, got {}",
            percentage
        )));
    }

    let padding = (total_size as u128 * percentage as u128 / 100) as u64;
    Ok((total_size - padding, padding))
}

/// Create a file of `total_size` bytes whose last `percentage` percent are
/// zero padding, filling the rest with random bytes.
pub fn create_file_with_padding<P: AsRef<Path>>(
    path: P,
    total_size: u64,
    percentage: u8,
) -> Result<PaddingReport> {
    let mut rng = fastrand::Rng::new();
    create_file_with_padding_using(path, total_size, percentage, |buf| {
        rng.fill(buf)
    })
}

/// Same as [`create_file_with_padding`] with a caller-provided content
/// filler.
///
/// The last content byte is forced to be non-zero so that the padding
/// detected afterwards is exactly the requested padding.
pub fn create_file_with_padding_using<P, F>(
    path: P,
    total_size: u64,
    percentage: u8,
    mut filler: F,
) -> Result<PaddingReport>
where
    P: AsRef<Path>,
    F: FnMut(&mut [u8]),
{
    let (content_size, padding_size) = padding_split(total_size, percentage)?;
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path).map_err(|e| PaddingError::at(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut buffer = vec![0u8; WRITE_CHUNK];

    let mut remaining = content_size;
    while remaining > 0 {
        let size = usize::try_from(remaining)
            .map_or(WRITE_CHUNK, |remaining| remaining.min(WRITE_CHUNK));
        filler(&mut buffer[..size]);
        let block = &mut buffer[..size];
        remaining -= size as u64;
        if remaining == 0 {
            if let Some(last) = block.last_mut() {
                if *last == 0 {
                    *last = 1;
                }
            }
        }
        writer.write_all(block)?;
    }

    buffer.fill(0);
    let mut remaining = padding_size;
    while remaining > 0 {
        let size = usize::try_from(remaining)
            .map_or(WRITE_CHUNK, |remaining| remaining.min(WRITE_CHUNK));
        writer.write_all(&buffer[..size])?;
        remaining -= size as u64;
    }
    writer.flush()?;

    log::info!(
        "Created file '{}' with {} bytes of content and {} bytes of padding",
        path.display(),
        content_size,
        padding_size
    );
    Ok(PaddingReport::new(total_size, padding_size))
}
