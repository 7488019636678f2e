use std::io::{self, Write};
use std::path::PathBuf;

use padscan::equal_ignoring_padding;

use crate::error::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(
    name = "compare",
    about = "Compare two files, ignoring trailing zero padding"
)]
pub struct Compare {
    #[clap(value_parser, help = "Reference file")]
    original: PathBuf,
    #[clap(value_parser, help = "File to check against the reference")]
    candidate: PathBuf,
}

impl Compare {
    pub fn run(&self) -> Result<(), AppError> {
        self.run_to(&mut io::stdout().lock())
    }

    fn run_to<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        if equal_ignoring_padding(&self.original, &self.candidate)? {
            writeln!(
                out,
                "{} is identical to {}, ignoring padding.",
                self.candidate.display(),
                self.original.display()
            )?;
        } else {
            writeln!(
                out,
                "{} differs from {}.",
                self.candidate.display(),
                self.original.display()
            )?;
        }
        Ok(())
    }
}
