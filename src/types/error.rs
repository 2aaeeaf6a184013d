//! Error types for the ledger
//!
//! This module defines every error the ledger store can report.
//!
//! # Error Categories
//!
//! - **Rejections**: unknown account, insufficient funds, invalid amount. The
//!   caller did something the ledger refuses; store state is unchanged.
//! - **Internal failures**: arithmetic overflow, poisoned account lock,
//!   invariant violation. These indicate a fault on the ledger side.

use super::account::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
///
/// Each variant carries enough context to explain the failure without
/// looking at the store again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No account exists with the requested id
    ///
    /// Reported before any account lock is taken.
    #[error("There is no account with id = {id}")]
    UnknownAccount {
        /// The id that was looked up
        id: AccountId,
    },

    /// Source balance is below the requested amount
    ///
    /// The transfer is rejected in full; neither account changes.
    #[error("Insufficient funds on account {id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Source account id
        id: AccountId,
        /// Balance at check time
        balance: Decimal,
        /// Requested transfer amount
        requested: Decimal,
    },

    /// Transfer amount is negative
    #[error("Invalid transfer amount {amount}: must not be negative")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Balance arithmetic would overflow
    ///
    /// The transfer is rejected to keep both balances intact.
    #[error("Arithmetic overflow in {operation} for account {id}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account id
        id: AccountId,
    },

    /// An account's lock was poisoned by a panicking holder
    #[error("Lock for account {id} is poisoned")]
    LockPoisoned {
        /// Account id
        id: AccountId,
    },

    /// Internal consistency check failed
    ///
    /// Never expected under a correct implementation.
    #[error("Ledger invariant violated: {message}")]
    InvariantViolation {
        /// Description of the violated invariant
        message: String,
    },
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an UnknownAccount error
    pub fn unknown_account(id: AccountId) -> Self {
        LedgerError::UnknownAccount { id }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(id: AccountId, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            id,
            balance,
            requested,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, id: AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            id,
        }
    }

    /// Create a LockPoisoned error
    pub fn lock_poisoned(id: AccountId) -> Self {
        LedgerError::LockPoisoned { id }
    }

    /// Create an InvariantViolation error
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        LedgerError::InvariantViolation {
            message: message.into(),
        }
    }

    /// Whether this error is a caller-facing rejection
    ///
    /// Rejections leave the store untouched and can be fixed by the caller
    /// (valid id, more funds, non-negative amount). Everything else is an
    /// internal failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LedgerError::UnknownAccount { .. }
                | LedgerError::InsufficientFunds { .. }
                | LedgerError::InvalidAmount { .. }
        )
    }
}
