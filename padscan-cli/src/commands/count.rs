use std::io::{self, Write};
use std::path::PathBuf;

use padscan::{Strategy, DEFAULT_CHUNK_SIZE};

use super::percentage;
use crate::error::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "count", about = "Count the trailing padding of one file")]
pub struct Count {
    #[clap(value_parser, help = "Path to the file")]
    file: PathBuf,
    #[clap(long, action, help = "Read the whole file instead of chunks")]
    full: bool,
    #[clap(
        long,
        default_value_t = DEFAULT_CHUNK_SIZE,
        help = "Read block size in bytes"
    )]
    chunk_size: usize,
    #[clap(long, action, help = "Print the report as JSON")]
    json: bool,
}

impl Count {
    fn strategy(&self) -> Strategy {
        if self.full {
            Strategy::Full
        } else {
            Strategy::Chunked(self.chunk_size)
        }
    }

    pub fn run(&self) -> Result<(), AppError> {
        self.run_to(&mut io::stdout().lock())
    }

    fn run_to<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        let report = self.strategy().count_path(&self.file)?;

        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        } else {
            writeln!(
                out,
                "{}: {} of {} bytes are padding ({}), {} bytes of content",
                self.file.display(),
                report.padding_length,
                report.total_length,
                percentage(report.padding_ratio()),
                report.content_length()
            )?;
        }
        Ok(())
    }
}
