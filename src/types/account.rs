//! Account-related types for the ledger
//!
//! This module defines the account snapshot handed out to callers and the
//! identifier type shared by every component.

use rust_decimal::Decimal;

/// Account identifier
///
/// Assigned by the ledger's id generator, starting at 0 and never reused.
pub type AccountId = u64;

/// Point-in-time view of an account
///
/// Returned by lookups and listings. It is a copy: later transfers do not
/// update it, so callers must not cache it across logical operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The account identifier
    pub id: AccountId,

    /// Display name, not required to be unique
    pub name: String,

    /// Balance as of the instant the snapshot was taken
    ///
    /// May be negative if the account was created with a negative
    /// initial balance; transfers never push it below zero.
    pub balance: Decimal,
}

impl Account {
    /// Create a new account snapshot
    ///
    /// # Arguments
    ///
    /// * `id` - The account identifier
    /// * `name` - The display name
    /// * `balance` - The balance to report
    pub fn new(id: AccountId, name: impl Into<String>, balance: Decimal) -> Self {
        Account {
            id,
            name: name.into(),
            balance,
        }
    }
}
