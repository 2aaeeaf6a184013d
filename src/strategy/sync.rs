//! Synchronous processing strategy
//!
//! Applies commands one at a time in file order on the calling thread. The
//! ledger is the same concurrent store the async strategy uses; this strategy
//! simply never has more than one caller.
//!
//! Memory use is O(accounts): the input is streamed row by row.

use crate::core::{CommandEngine, Ledger, ProcessingSummary};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{write_report, ProcessingStrategy};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use ledger_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy;
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("commands.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let ledger = Arc::new(Ledger::new());
        let engine = CommandEngine::new(Arc::clone(&ledger));

        let reader = SyncReader::new(input_path)?;

        let mut summary = ProcessingSummary::default();
        for result in reader {
            match result {
                Ok(record) => summary.record(&engine.process(&record)),
                Err(e) => warn!(error = %e, "skipping invalid command"),
            }
        }

        write_report(&ledger, &summary, output)
    }
}
