use clap::Parser;

use crate::cli::Cli;
use crate::error::AppError;

mod cli;
mod commands;
mod error;

fn main() {
    env_logger::init();

    let args = Cli::parse();

    if let Err(err) = run(args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: Cli) -> Result<(), AppError> {
    args.command.run()
}
