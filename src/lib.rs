//! Concurrent In-Memory Ledger
//! # Overview
//!
//! This library keeps a set of named accounts with decimal balances and moves
//! funds between them atomically. Many threads may create accounts and
//! transfer between them at once; every account id is unique, no transfer is
//! ever half applied and the sum of all balances only changes when an account
//! is created.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, CommandRecord, LedgerError)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Ledger and the layers above it:
//!   - [`core::ledger`] - Account store, id generation and listing
//!   - [`core::transfer`] - Ordered two-lock transfer
//!   - [`core::facade`] - `TransferService` and caller-facing outcomes
//!   - [`core::engine`] - Command application and run summaries
//! - [`io`] - CSV command input and account report output
//! - [`strategy`] - Sync and async pipelines over a command file
//! - [`logging`] - tracing subscriber setup
//!
//! # Concurrency
//!
//! Each account carries its own lock. A transfer locks both of its accounts
//! in descending id order, so two transfers in opposite directions between
//! the same pair cannot deadlock. Listing takes every account lock in the
//! same order and therefore never observes a transfer in flight.
//!
//! # Example
//!
//! ```
//! use ledger_engine::{Ledger, LedgerError};
//! use rust_decimal::Decimal;
//!
//! let ledger = Ledger::new();
//! let anna = ledger.create_account("anna", Decimal::new(1000, 0)).unwrap();
//! let john = ledger.create_account("john", Decimal::new(2000, 0)).unwrap();
//!
//! ledger.transfer(anna, john, Decimal::new(250, 0)).unwrap();
//! assert!(matches!(
//!     ledger.transfer(anna, john, Decimal::new(5000, 0)),
//!     Err(LedgerError::InsufficientFunds { .. })
//! ));
//! assert_eq!(ledger.total_balance().unwrap(), Decimal::new(3000, 0));
//! ```

pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{
    CommandEngine, Ledger, LedgerStore, RejectReason, StatusCategory, TransferOutcome,
    TransferService,
};
pub use io::write_accounts_csv;
pub use types::{Account, AccountId, CommandRecord, CommandType, LedgerError};
