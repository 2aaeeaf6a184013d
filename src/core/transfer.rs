//! Atomic transfers with id-ordered locking
//!
//! A transfer holds the balance locks of both participating accounts for the
//! whole check-then-mutate section, so no reader can see the withdrawal
//! without the matching deposit.
//!
//! # Deadlock Freedom
//!
//! Transfers between the same two accounts are routinely issued in both
//! directions at once (A→B and B→A). If each took the lock of its own
//! source first, the two could each hold one lock and wait forever on the
//! other. Locks are therefore always taken by descending account id,
//! regardless of which side is the source. Ids are unique, so the order is
//! total and every transfer touching {X, Y} locks them the same way.
//!
//! Unknown ids are rejected before any lock is taken, and a self-transfer
//! locks its single account once.

use super::ledger::{AccountEntry, Ledger};
use crate::types::{AccountId, LedgerError};
use rust_decimal::Decimal;
use tracing::debug;

impl Ledger {
    /// Move `amount` from `source` to `receiver`
    ///
    /// Either both balances change or neither does.
    ///
    /// # Arguments
    ///
    /// * `source` - Account to withdraw from
    /// * `receiver` - Account to deposit into
    /// * `amount` - Non-negative amount to move
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Both balances were updated
    /// * `Err(LedgerError)` - Nothing was changed
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is negative
    /// - `UnknownAccount` if either id is not registered
    /// - `InsufficientFunds` if the source balance is below `amount`
    /// - `ArithmeticOverflow` if either new balance is out of range
    /// - `LockPoisoned` if an account lock is poisoned
    pub fn transfer(
        &self,
        source: AccountId,
        receiver: AccountId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }

        let source_entry = self.entry(source)?;
        let receiver_entry = self.entry(receiver)?;

        if source == receiver {
            return self_transfer(&source_entry, amount);
        }

        let (first, second) = lock_order(&source_entry, &receiver_entry);
        let first_guard = first.lock()?;
        let second_guard = second.lock()?;

        let (mut source_balance, mut receiver_balance) = if first.id == source {
            (first_guard, second_guard)
        } else {
            (second_guard, first_guard)
        };

        let available = *source_balance;
        if available < amount {
            debug!(source, receiver, %amount, %available, "insufficient funds");
            return Err(LedgerError::insufficient_funds(source, available, amount));
        }

        // Compute both sides before writing either
        let debited = source_balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("withdrawal", source))?;
        let credited = receiver_balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", receiver))?;

        *source_balance = debited;
        *receiver_balance = credited;

        debug!(source, receiver, %amount, "transfer applied");
        Ok(())
    }
}

/// Order two distinct accounts for locking: higher id first
fn lock_order<'a>(
    a: &'a AccountEntry,
    b: &'a AccountEntry,
) -> (&'a AccountEntry, &'a AccountEntry) {
    if a.id > b.id {
        (a, b)
    } else {
        (b, a)
    }
}

/// Transfer from an account to itself
///
/// Takes the single lock once. The funds check still applies, but the
/// balance is left as it was.
fn self_transfer(entry: &AccountEntry, amount: Decimal) -> Result<(), LedgerError> {
    let balance = entry.lock()?;
    if *balance < amount {
        return Err(LedgerError::insufficient_funds(entry.id, *balance, amount));
    }
    Ok(())
}
