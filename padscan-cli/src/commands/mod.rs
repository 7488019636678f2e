use clap::Subcommand;

use crate::error::AppError;

mod compare;
mod count;
mod poison;
mod scan;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Scan(scan::Scan),
    Count(count::Count),
    Compare(compare::Compare),
    Poison(poison::Poison),
}

impl Commands {
    pub fn run(&self) -> Result<(), AppError> {
        match self {
            Commands::Scan(scan) => scan.run(),
            Commands::Count(count) => count.run(),
            Commands::Compare(compare) => compare.run(),
            Commands::Poison(poison) => poison.run(),
        }
    }
}

/// Padding as a percentage with two decimals
pub(crate) fn percentage(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_ratio_as_percentage() {
        assert_eq!(percentage(0.2), "20.00%");
        assert_eq!(percentage(1.0), "100.00%");
        assert_eq!(percentage(0.0), "0.00%");
    }
}
