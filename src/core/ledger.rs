//! Concurrent account registry
//!
//! This module provides the `Ledger`, the store that owns every account,
//! assigns identifiers and serves lookups and listings. The transfer
//! algorithm lives in the sibling `transfer` module as a second `impl` block.
//!
//! # Design
//!
//! ```text
//! Ledger
//!     ├── IdGenerator                              (atomic fetch-and-increment)
//!     └── DashMap<AccountId, Arc<AccountEntry>>    (sharded registry)
//!             └── AccountEntry { id, name, Mutex<Decimal> }
//! ```
//!
//! The registry map is only used to find an account. Balances are guarded
//! by a mutex stored alongside each record, so two transfers over disjoint
//! accounts never touch the same lock. Handles are `Arc`-cloned out of the
//! map before any balance lock is taken; a shard guard is never held while
//! waiting on an account.
//!
//! # Lock Order
//!
//! Every path that holds more than one balance lock acquires them by
//! descending account id. Transfers and `list_accounts` both follow it.

use super::id_generator::IdGenerator;
use crate::types::{Account, AccountId, LedgerError};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error};

/// A stored account: immutable identity plus a lock-protected balance
#[derive(Debug)]
pub(crate) struct AccountEntry {
    pub(crate) id: AccountId,
    pub(crate) name: String,
    pub(crate) balance: Mutex<Decimal>,
}

impl AccountEntry {
    fn new(id: AccountId, name: String, balance: Decimal) -> Self {
        Self {
            id,
            name,
            balance: Mutex::new(balance),
        }
    }

    /// Take exclusive access to the balance
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Decimal>, LedgerError> {
        self.balance
            .lock()
            .map_err(|_| LedgerError::lock_poisoned(self.id))
    }

    fn snapshot(&self, balance: Decimal) -> Account {
        Account::new(self.id, self.name.clone(), balance)
    }
}

/// Thread-safe in-memory ledger
///
/// Constructed once and shared by reference (`Arc<Ledger>` across threads).
/// All operations take `&self` except [`Ledger::reset`], which needs
/// exclusive access.
#[derive(Debug)]
pub struct Ledger {
    /// Registry of accounts by id
    accounts: DashMap<AccountId, Arc<AccountEntry>>,

    /// Source of fresh account ids
    ids: IdGenerator,
}

impl Ledger {
    /// Create an empty ledger whose first account gets id 0
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            ids: IdGenerator::new(),
        }
    }

    /// Open a new account and return its id
    ///
    /// The id comes from an atomic fetch-and-increment, so it is fresh and
    /// the insert is unconditional. The initial balance is stored as given,
    /// zero and negative values included.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name, not required to be unique
    /// * `balance` - Initial balance
    ///
    /// # Returns
    ///
    /// * `Ok(AccountId)` - The id of the new account
    /// * `Err(LedgerError::InvariantViolation)` - The id was already taken,
    ///   which would mean the generator is broken
    pub fn create_account(
        &self,
        name: impl Into<String>,
        balance: Decimal,
    ) -> Result<AccountId, LedgerError> {
        let id = self.ids.next_id();
        let entry = Arc::new(AccountEntry::new(id, name.into(), balance));

        if self.accounts.insert(id, entry).is_some() {
            error!(account = id, "account id assigned twice");
            return Err(LedgerError::invariant_violation(format!(
                "account id {} assigned twice",
                id
            )));
        }

        debug!(account = id, %balance, "account created");
        Ok(id)
    }

    /// Snapshot of a single account
    ///
    /// # Errors
    ///
    /// * `UnknownAccount` if no account has this id
    /// * `LockPoisoned` if the account's lock is poisoned
    pub fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        let entry = self.entry(id)?;
        let balance = entry.lock()?;
        Ok(entry.snapshot(*balance))
    }

    /// Snapshot of every account, sorted by id
    ///
    /// All balance locks are held together (taken in descending id order)
    /// while the copy is made, so the result never shows one side of a
    /// transfer without the other. Accounts created after the handles are
    /// collected are not included.
    pub fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let mut entries: Vec<Arc<AccountEntry>> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        entries.sort_unstable_by(|a, b| b.id.cmp(&a.id));

        let guards = entries
            .iter()
            .map(|entry| entry.lock())
            .collect::<Result<Vec<_>, _>>()?;

        let mut accounts: Vec<Account> = entries
            .iter()
            .zip(guards.iter())
            .map(|(entry, balance)| entry.snapshot(**balance))
            .collect();
        drop(guards);

        accounts.reverse();
        Ok(accounts)
    }

    /// Sum of all balances, taken from a consistent listing
    pub fn total_balance(&self) -> Result<Decimal, LedgerError> {
        self.list_accounts()?
            .iter()
            .try_fold(Decimal::ZERO, |total, account| {
                total
                    .checked_add(account.balance)
                    .ok_or_else(|| LedgerError::arithmetic_overflow("total", account.id))
            })
    }

    /// Number of accounts in the registry
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the registry holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Discard every account and rewind the id generator to 0
    ///
    /// Test harness only. `&mut self` guarantees no other operation is in
    /// flight, which makes the two steps atomic.
    #[cfg(any(test, feature = "test-util"))]
    pub fn reset(&mut self) {
        self.accounts.clear();
        self.ids.reset();
    }

    /// Clone the handle for `id` out of the registry
    pub(crate) fn entry(&self, id: AccountId) -> Result<Arc<AccountEntry>, LedgerError> {
        self.accounts
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LedgerError::unknown_account(id))
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
