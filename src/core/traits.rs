//! Core trait for ledger storage
//!
//! This module defines the abstraction the transfer facade and the command
//! engine are written against, so a store instance is injected rather than
//! reached through a process-wide singleton.

use crate::core::ledger::Ledger;
use crate::types::{Account, AccountId, LedgerError};
use rust_decimal::Decimal;

/// Trait for a concurrent account store
///
/// All methods take `&self`: implementations synchronise internally and are
/// shared across threads behind an `Arc`.
pub trait LedgerStore: Send + Sync {
    /// Open an account and return its freshly assigned id
    fn create_account(&self, name: &str, balance: Decimal) -> Result<AccountId, LedgerError>;

    /// Snapshot of a single account
    fn get_account(&self, id: AccountId) -> Result<Account, LedgerError>;

    /// Snapshot of all accounts
    fn list_accounts(&self) -> Result<Vec<Account>, LedgerError>;

    /// Atomically move `amount` from `source` to `receiver`
    fn transfer(
        &self,
        source: AccountId,
        receiver: AccountId,
        amount: Decimal,
    ) -> Result<(), LedgerError>;
}

impl LedgerStore for Ledger {
    fn create_account(&self, name: &str, balance: Decimal) -> Result<AccountId, LedgerError> {
        Ledger::create_account(self, name, balance)
    }

    fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        Ledger::get_account(self, id)
    }

    fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        Ledger::list_accounts(self)
    }

    fn transfer(
        &self,
        source: AccountId,
        receiver: AccountId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        Ledger::transfer(self, source, receiver, amount)
    }
}
