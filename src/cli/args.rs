use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Apply account creation and transfer commands to an in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "ledger-engine")]
#[command(
    about = "Apply account creation and transfer commands to an in-memory ledger",
    long_about = None
)]
pub struct CliArgs {
    /// Input CSV file with one command per row
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' applies commands in file order, 'async' runs transfers concurrently"
    )]
    pub strategy: StrategyType,

    /// Commands per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of commands per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Runtime worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads applying transfers (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Emit log lines as JSON objects
    #[arg(long = "log-json", help = "Write logs to stderr as JSON")]
    pub log_json: bool,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Build the async batch configuration
    ///
    /// Missing options take their defaults; zero values are replaced by
    /// `BatchConfig::new`.
    pub fn to_batch_config(&self) -> BatchConfig {
        match (self.batch_size, self.max_concurrent_batches) {
            (None, None) => BatchConfig::default(),
            (batch_size, max_concurrent) => {
                let default = BatchConfig::default();
                BatchConfig::new(
                    batch_size.unwrap_or(default.batch_size),
                    max_concurrent.unwrap_or(default.max_concurrent_batches),
                )
            }
        }
    }
}
