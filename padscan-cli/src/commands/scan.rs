use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use padscan::{
    create_file_with_padding, ScanConfig, ScanOutcome, Scanner,
    DEFAULT_CHUNK_SIZE,
};

use super::percentage;
use crate::error::AppError;

const POISON_SIZE: u64 = 1024 * 1024;
const POISON_PERCENTAGE: u8 = 20;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "scan", about = "Report the padded files of a folder")]
pub struct Scan {
    #[clap(value_parser, help = "Path to the folder to scan")]
    folder: PathBuf,
    #[clap(
        long,
        default_value_t = 0.0,
        help = "Minimum padding ratio to report, between 0 and 1"
    )]
    threshold: f64,
    #[clap(
        long,
        default_value_t = 0,
        help = "Worker threads, 0 for one per core"
    )]
    threads: usize,
    #[clap(
        long,
        default_value_t = DEFAULT_CHUNK_SIZE,
        help = "Read block size in bytes"
    )]
    chunk_size: usize,
    #[clap(long, action, help = "Ignore files whose name starts with a dot")]
    skip_hidden: bool,
    #[clap(
        long,
        action,
        help = "Plant a 1 MiB sample with 20% padding while scanning"
    )]
    with_poison: bool,
    #[clap(long, action, help = "Print the outcome as JSON")]
    json: bool,
}

impl Scan {
    pub fn run(&self) -> Result<(), AppError> {
        self.run_to(&mut io::stdout().lock())
    }

    fn run_to<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        if !self.folder.exists() {
            writeln!(out, "The specified folder does not exist.")?;
            return Ok(());
        }

        let config = ScanConfig::default()
            .with_threshold(self.threshold)
            .with_threads(self.threads)
            .with_chunk_size(self.chunk_size)
            .with_skip_hidden(self.skip_hidden);
        let scanner = Scanner::new(config)?;

        // A file path is left to the scanner, which rejects it
        let poison = if self.with_poison && self.folder.is_dir() {
            Some(plant_poison(&self.folder)?)
        } else {
            None
        };

        if !self.json {
            writeln!(out, "Scanning files for significant padding...")?;
        }
        let outcome = scanner.scan(&self.folder);

        if let Some(poison) = poison {
            if poison.exists() {
                std::fs::remove_file(&poison)?;
            }
        }

        let outcome = outcome?;
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
        } else {
            write_outcome(out, &outcome)?;
            writeln!(out, "Scanning complete.")?;
        }
        Ok(())
    }
}

fn plant_poison(folder: &Path) -> Result<PathBuf, AppError> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let path = folder.join(format!("sample_{}.bin", millis));
    create_file_with_padding(&path, POISON_SIZE, POISON_PERCENTAGE)?;
    Ok(path)
}

fn write_outcome<W: Write>(
    out: &mut W,
    outcome: &ScanOutcome,
) -> io::Result<()> {
    for finding in &outcome.findings {
        let name = finding
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| finding.path.display().to_string());
        writeln!(
            out,
            "Padding {}: {} bytes of padding ({})",
            name,
            finding.padding_length,
            percentage(finding.padding_ratio())
        )?;
    }
    for failure in &outcome.failures {
        writeln!(
            out,
            "Skipped {}: {}",
            failure.path.display(),
            failure.error
        )?;
    }
    if outcome.cancelled {
        writeln!(out, "Scan was cancelled before every file was examined.")?;
    }
    Ok(())
}
