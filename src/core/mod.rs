//! Core business logic module
//!
//! This module contains the ledger and the components layered on it:
//! - `id_generator` - Atomic account id source
//! - `ledger` - Concurrent account registry (create, lookup, listing)
//! - `transfer` - Atomic transfers with id-ordered locking
//! - `traits` - Store abstraction the facade is written against
//! - `facade` - Caller-facing create/transfer service and outcome mapping
//! - `engine` - Command application and run summaries
//! - `async` - Concurrent batch processing on tokio

pub mod r#async;
pub mod engine;
pub mod facade;
pub mod id_generator;
pub mod ledger;
pub mod traits;
pub mod transfer;

pub use engine::{CommandEngine, CommandOutcome, ProcessingResult, ProcessingSummary};
pub use facade::{RejectReason, StatusCategory, TransferOutcome, TransferService};
pub use ledger::Ledger;
pub use r#async::BatchProcessor;
pub use traits::LedgerStore;
