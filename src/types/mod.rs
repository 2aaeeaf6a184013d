//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account snapshots and identifiers
//! - `command`: Commands applied to the ledger
//! - `error`: Error types for the ledger

pub mod account;
pub mod command;
pub mod error;

pub use account::{Account, AccountId};
pub use command::{CommandRecord, CommandType};
pub use error::LedgerError;
