//! Synchronous CSV reader with iterator interface
//!
//! Streams command records from a file one row at a time, handing parsing
//! and validation to the csv_format module.
//!
//! ```no_run
//! use ledger_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("commands.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Applying command: {:?}", record),
//!         Err(e) => eprintln!("Skipping row: {}", e),
//!     }
//! }
//! ```
//!
//! Opening the file is the only fatal error. A bad row is yielded as an
//! `Err` carrying its line number and iteration carries on with the next
//! row.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::CommandRecord;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous command file reader
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    /// Data rows consumed so far (the header is line 1)
    line_num: usize,
}

impl SyncReader {
    /// Open a command file for streaming
    ///
    /// Fields are trimmed and short rows are accepted, so trailing empty
    /// columns may be left out.
    ///
    /// # Errors
    ///
    /// Returns a message naming the path if the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<CommandRecord, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.reader.deserialize::<CsvRecord>().next()?;
        self.line_num += 1;
        let line = self.line_num + 1;

        Some(match next {
            Ok(csv_record) => {
                convert_csv_record(csv_record).map_err(|e| format!("Line {}: {}", line, e))
            }
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}
