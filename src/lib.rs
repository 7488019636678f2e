//! # padscan
//!
//! Detection of trailing zero-byte padding.
//!
//! Padding is the run of zero bytes that ends a file. Padding a binary with
//! zeros is a cheap way to make it look like another file of a known size,
//! so measuring it helps to spot disguised or tampered executables.
//!
//! - [`count_padding`] and [`count_padding_chunked`] measure the padding of a
//!   single file or [`ByteSource`].
//! - [`equal_ignoring_padding`] compares two files while disregarding the
//!   padding of either.
//! - [`Scanner`] examines every file of a directory on a bounded worker pool
//!   and reports those with a high padding ratio.
//! - [`fixture`] writes files with a known amount of padding.

pub mod compare;
pub mod config;
pub mod counter;
pub mod errors;
pub mod fixture;
pub mod scan;
pub mod source;

pub use compare::{
    compare_ignoring_padding, compare_paths_with_chunk, compare_sources,
    equal_ignoring_padding, ComparisonResult,
};
pub use config::ScanConfig;
pub use counter::{
    count_padding, count_padding_chunked, count_padding_chunked_path,
    count_padding_full, trailing_zeros, PaddingReport, Strategy,
    DEFAULT_CHUNK_SIZE,
};
pub use errors::{PaddingError, Result};
pub use fixture::{create_file_with_padding, create_file_with_padding_using};
pub use scan::{scan, ScanFailure, ScanFinding, ScanOutcome, Scanner};
pub use source::{ByteSource, FileSource, SliceSource};

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    #[test]
    fn log_macros_are_compiled_in_every_profile() {
        assert_eq!(log::STATIC_MAX_LEVEL, LevelFilter::Trace);
    }
}
