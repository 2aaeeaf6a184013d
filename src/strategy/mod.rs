//! Processing strategy module for command files
//!
//! A strategy is a complete pipeline: read a command file, apply every
//! command to a fresh ledger, write the final account report. Strategies are
//! selected at runtime from the CLI.

use crate::cli::StrategyType;
use crate::core::{Ledger, ProcessingSummary};
use crate::io::csv_format::write_accounts_csv;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete command pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Apply the commands in `input_path` and write the account report
    ///
    /// Rejected transfers and malformed rows are logged and skipped; they do
    /// not make this method fail.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - The async runtime cannot be started
    /// - The final listing fails (poisoned account lock)
    /// - The report cannot be written
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` only applies to the async strategy.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

/// Log the run summary and write the ledger's accounts as the report
pub(crate) fn write_report(
    ledger: &Ledger,
    summary: &ProcessingSummary,
    output: &mut dyn Write,
) -> Result<(), String> {
    summary.log();

    let accounts = ledger
        .list_accounts()
        .map_err(|e| format!("Failed to list accounts: {}", e))?;
    let total = ledger
        .total_balance()
        .map_err(|e| format!("Failed to total balances: {}", e))?;
    info!(accounts = accounts.len(), %total, "writing account report");

    write_accounts_csv(&accounts, output)
}
