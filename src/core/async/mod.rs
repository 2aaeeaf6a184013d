//! Asynchronous batch processing
//!
//! The ledger itself is thread-safe and synchronous; this module drives it
//! from tokio tasks so independent transfers in a batch are applied in
//! parallel.
//!
//! # Thread Safety
//!
//! - Transfers with no account in common proceed in parallel
//! - Transfers linked by a shared account keep file order
//! - No global locks - the ledger locks only the two accounts involved

pub mod batch_processor;

pub use batch_processor::{split_segments, BatchProcessor, Segment};
