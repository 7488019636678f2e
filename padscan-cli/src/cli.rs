use crate::commands::Commands;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "padscan-cli")]
#[clap(about = "Detect trailing zero padding in files", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
