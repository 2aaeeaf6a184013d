//! Command types for the ledger pipeline
//!
//! This module defines the commands read from command files and fed through
//! the transfer facade: account creation and transfers between two accounts.

use super::account::AccountId;
use rust_decimal::Decimal;

/// Command types supported by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    /// Open a new account with an initial balance
    ///
    /// The ledger assigns the id; the command only carries the name and
    /// the starting balance.
    Create,

    /// Move an amount from a source account to a receiver account
    ///
    /// Either applied in full or not at all.
    Transfer,
}

/// A validated command ready to be applied to the ledger
#[derive(Debug, Clone, PartialEq)]
pub enum CommandRecord {
    /// Create an account named `name` holding `balance`
    Create { name: String, balance: Decimal },

    /// Transfer `amount` from `source` to `receiver`
    Transfer {
        source: AccountId,
        receiver: AccountId,
        amount: Decimal,
    },
}

impl CommandRecord {
    /// The type tag of this command
    pub fn command_type(&self) -> CommandType {
        match self {
            CommandRecord::Create { .. } => CommandType::Create,
            CommandRecord::Transfer { .. } => CommandType::Transfer,
        }
    }

    /// The two accounts a transfer touches, source first
    ///
    /// Used by the batch processor to keep every command that touches an
    /// account in file order. Creates touch no existing account.
    pub fn accounts(&self) -> Option<(AccountId, AccountId)> {
        match self {
            CommandRecord::Create { .. } => None,
            CommandRecord::Transfer {
                source, receiver, ..
            } => Some((*source, *receiver)),
        }
    }
}
