//! Tokio-backed strategy
//!
//! The command file is read in fixed-size batches and each batch is handed to
//! a `BatchProcessor` running on a multi-threaded runtime:
//!
//! ```text
//! tokio::fs::File ─compat─▶ AsyncReader ─batch─▶ BatchProcessor ─▶ Arc<Ledger>
//!                                                     │
//!                        creates in order, transfers grouped by shared account
//! ```
//!
//! Batches are applied one after another. Inside a batch, creates keep file
//! order and groups of transfers with no account in common run in parallel,
//! so the report matches the sync strategy exactly.

use crate::core::{BatchProcessor, CommandEngine, Ledger, ProcessingSummary};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{write_report, ProcessingStrategy};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sizing for the async strategy
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Build a configuration from user-supplied values
    ///
    /// Zero values are replaced by the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid worker count, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Strategy applying batches of commands on a tokio runtime
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let ledger = Arc::new(Ledger::new());
        let processor = BatchProcessor::new(CommandEngine::new(Arc::clone(&ledger)));

        let summary = runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // csv-async reads futures-io, tokio files implement tokio-io
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut summary = ProcessingSummary::default();
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                debug!(commands = batch.len(), "processing batch");
                let results = processor.process_batch(batch).await;
                summary.merge(&results.iter().collect());
            }

            Ok::<_, String>(summary)
        })?;

        write_report(&ledger, &summary, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn run(content: &str, config: BatchConfig) -> String {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "{}", content).expect("write commands");
        let mut output = Vec::new();

        AsyncProcessingStrategy::new(config)
            .process(file.path(), &mut output)
            .expect("Processing failed");

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_async_strategy_successful_transfer() {
        let output = run(
            "type,name,source,receiver,amount\n\
             create,user1,,,1700.0\n\
             create,user2,,,2000.0\n\
             transfer,,0,1,200.0\n",
            BatchConfig::default(),
        );

        assert_eq!(
            output,
            "id,name,balance\n0,user1,1500.0000\n1,user2,2200.0000\n"
        );
    }

    #[test]
    fn test_async_strategy_missing_input_is_fatal() {
        let mut output = Vec::new();

        let err = AsyncProcessingStrategy::new(BatchConfig::new(10, 1))
            .process(Path::new("does/not/exist.csv"), &mut output)
            .unwrap_err();

        assert!(err.contains("Failed to open file"));
        assert!(err.contains("does/not/exist.csv"));
        assert!(output.is_empty());
    }

    #[test]
    fn test_async_strategy_chain_across_batch_boundaries() {
        // Batch size 2 splits creates and the dependent transfer chain
        let output = run(
            "type,name,source,receiver,amount\n\
             create,anna,,,100\n\
             create,john,,,0\n\
             transfer,,0,1,100\n\
             create,tom,,,0\n\
             transfer,,1,2,70\n\
             transfer,,1,0,20\n",
            BatchConfig::new(2, 4),
        );

        assert_eq!(
            output,
            "id,name,balance\n0,anna,20.0000\n1,john,10.0000\n2,tom,70.0000\n"
        );
    }

    #[test]
    fn test_async_strategy_keeps_shared_account_order_in_batch() {
        let output = run(
            "type,name,source,receiver,amount\n\
             create,anna,,,100\n\
             create,john,,,100\n\
             create,tom,,,100\n\
             transfer,,0,1,60\n\
             transfer,,0,2,40\n\
             transfer,,0,1,1\n\
             transfer,,2,1,100\n",
            BatchConfig::default(),
        );

        assert_eq!(
            output,
            "id,name,balance\n0,anna,0.0000\n1,john,260.0000\n2,tom,40.0000\n"
        );
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);

        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.max_concurrent_batches, num_cpus::get());
    }
}
