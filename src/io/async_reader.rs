//! Asynchronous CSV reader with batch interface
//!
//! Reads command records in batches for the async processing strategy.
//!
//! ```text
//! tokio::fs::File → compat → csv-async → AsyncReader → Vec<CommandRecord>
//!                                             ↓
//!                                    csv_format module
//!                               (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::CommandRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Streams the input; only the current batch is held in memory.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader over CSV data
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read up to `batch_size` valid command records
    ///
    /// Rows that fail to parse or convert are logged and skipped; they do
    /// not count towards the batch size.
    ///
    /// # Returns
    ///
    /// The converted records in file order. An empty vector means the end
    /// of the input was reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<CommandRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                    Ok(command_record) => batch.push(command_record),
                    Err(e) => warn!(error = %e, "skipping invalid command"),
                },
                Some(Err(e)) => warn!(error = %e, "skipping malformed CSV row"),
                None => break,
            }
        }

        batch
    }
}
