use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::errors::{PaddingError, Result};

/// A readable, seekable run of bytes whose length is known up front.
///
/// The length must not change while an operation holds the source, and
/// reading the same range twice must yield the same bytes.
pub trait ByteSource {
    /// Total number of bytes in the source
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buf` with the bytes starting at `offset`.
    ///
    /// Reading past the end is an [`io::ErrorKind::UnexpectedEof`] error.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()>;
}

/// File-backed byte source.
///
/// The handle is owned by this struct and closed when it drops.
#[derive(Debug)]
pub struct FileSource {
    file: File,
    path: PathBuf,
    len: u64,
}

impl FileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::trace!("Opening byte source {}", path.display());

        let file = File::open(path).map_err(|e| PaddingError::at(path, e))?;
        let metadata = file
            .metadata()
            .map_err(|e| PaddingError::at(path, e))?;
        if !metadata.is_file() {
            return Err(PaddingError::InvalidArgument(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        Ok(FileSource {
            file,
            path: path.to_path_buf(),
            len: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf)
    }
}

/// Byte source over an in-memory slice.
#[derive(Debug, Clone, Copy)]
pub struct SliceSource<'a> {
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> ByteSource for SliceSource<'a> {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let start = usize::try_from(offset)
            .map_err(|_| io::Error::from(io::ErrorKind::UnexpectedEof))?;
        let end = start
            .checked_add(buf.len())
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "read out of bounds: offset={}, size={}, len={}",
                        offset,
                        buf.len(),
                        self.data.len()
                    ),
                )
            })?;
        buf.copy_from_slice(&self.data[start..end]);
        Ok(())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn len(&self) -> u64 {
        (**self).len()
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_at(offset, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempdir::TempDir;

    #[test]
    fn slice_source_reads_ranges() {
        let data = [0x4d, 0x5a, 0x90, 0x00];
        let mut source = SliceSource::new(&data);
        let mut buf = [0u8; 2];
        source.read_at(1, &mut buf).unwrap();
        assert_eq!(buf, [0x5a, 0x90]);
        assert_eq!(source.len(), 4);
    }

    #[test]
    fn slice_source_rejects_out_of_bounds() {
        let data = [1u8, 2];
        let mut source = SliceSource::new(&data);
        let mut buf = [0u8; 3];
        let err = source.read_at(0, &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn file_source_reports_length_and_bytes() {
        let dir = TempDir::new("file_source").unwrap();
        let path = dir.path().join("data.bin");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"padded\0\0\0").unwrap();
        drop(file);

        let mut source = FileSource::open(&path).unwrap();
        assert_eq!(source.len(), 9);
        assert_eq!(source.path(), path.as_path());

        let mut buf = [0xffu8; 3];
        source.read_at(6, &mut buf).unwrap();
        assert_eq!(buf, [0, 0, 0]);
    }

    #[test]
    fn file_source_missing_file_is_not_found() {
        let dir = TempDir::new("file_source_missing").unwrap();
        let err = FileSource::open(dir.path().join("absent.bin")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn file_source_rejects_directories() {
        let dir = TempDir::new("file_source_dir").unwrap();
        let err = FileSource::open(dir.path()).unwrap_err();
        assert!(matches!(err, PaddingError::InvalidArgument(_)));
    }
}
