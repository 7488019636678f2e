use std::io::{self, Write};
use std::path::PathBuf;

use padscan::create_file_with_padding;

use crate::error::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(
    name = "poison",
    about = "Write a file of random content followed by zero padding"
)]
pub struct Poison {
    #[clap(value_parser, help = "Destination path")]
    path: PathBuf,
    #[clap(long, help = "Total size in bytes")]
    size: u64,
    #[clap(long, help = "Share of the file that is padding, 0 to 100")]
    percentage: u8,
}

impl Poison {
    pub fn run(&self) -> Result<(), AppError> {
        self.run_to(&mut io::stdout().lock())
    }

    fn run_to<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        let report =
            create_file_with_padding(&self.path, self.size, self.percentage)?;
        writeln!(
            out,
            "Created file '{}' with {} bytes of content and {} bytes of \
             padding.",
            self.path.display(),
            report.content_length(),
            report.padding_length
        )?;
        Ok(())
    }
}
