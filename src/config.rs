use clap::Parser;
use std::path::PathBuf;

/// Generate a CSV of synthetic transactions, with a configurable share of
/// rows that break the downstream validator's bank-code, account or amount rules.
#[derive(Debug, Clone, Parser)]
#[command(name = "transaction_generator", version)]
pub struct GeneratorConfig {
    /// Total number of data rows
    #[arg(long, default_value_t = 100_000)]
    pub rows: u64,

    /// Output file path; missing parent directories are created
    #[arg(long, default_value = "transactions.csv")]
    pub out: PathBuf,

    /// Fraction of rows that are intentionally invalid, clamped to [0, 1]
    #[arg(long, default_value_t = 0.15, allow_negative_numbers = true)]
    pub invalid_rate: f64,

    /// Random seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}
