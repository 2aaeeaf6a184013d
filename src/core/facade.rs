//! Transfer facade
//!
//! The thin caller-facing surface over a [`LedgerStore`]: create an account,
//! transfer between two accounts, and classify the result into an outcome
//! and a transport-level status category.
//!
//! Test-only store operations (reset) are deliberately not reachable from
//! here.

use crate::core::traits::LedgerStore;
use crate::types::{AccountId, LedgerError};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Why a transfer was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Source balance below the requested amount
    InsufficientFunds,
    /// Source or receiver id is not registered
    UnknownAccount,
    /// Negative amount
    InvalidAmount,
}

impl RejectReason {
    /// Map a ledger error to a rejection reason
    ///
    /// Returns `None` for internal failures.
    pub fn from_error(error: &LedgerError) -> Option<Self> {
        match error {
            LedgerError::InsufficientFunds { .. } => Some(RejectReason::InsufficientFunds),
            LedgerError::UnknownAccount { .. } => Some(RejectReason::UnknownAccount),
            LedgerError::InvalidAmount { .. } => Some(RejectReason::InvalidAmount),
            _ => None,
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::InsufficientFunds => "insufficient funds",
            RejectReason::UnknownAccount => "unknown account",
            RejectReason::InvalidAmount => "invalid amount",
        };
        f.write_str(text)
    }
}

/// Result of a transfer as seen by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    /// Both balances were updated
    Success,
    /// The ledger refused the transfer; nothing changed
    Rejected(RejectReason),
    /// The ledger hit an internal fault; nothing changed
    Failed(LedgerError),
}

impl TransferOutcome {
    /// Transport-level category for this outcome
    pub fn status(&self) -> StatusCategory {
        match self {
            TransferOutcome::Success => StatusCategory::Ok,
            TransferOutcome::Rejected(_) => StatusCategory::ClientRejected,
            TransferOutcome::Failed(_) => StatusCategory::ServerError,
        }
    }
}

impl From<Result<(), LedgerError>> for TransferOutcome {
    fn from(result: Result<(), LedgerError>) -> Self {
        match result {
            Ok(()) => TransferOutcome::Success,
            Err(e) => match RejectReason::from_error(&e) {
                Some(reason) => TransferOutcome::Rejected(reason),
                None => TransferOutcome::Failed(e),
            },
        }
    }
}

/// Status category a transport layer answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Ok,
    ClientRejected,
    ServerError,
}

impl StatusCategory {
    /// HTTP status code for this category
    pub fn status_code(&self) -> u16 {
        match self {
            StatusCategory::Ok => 200,
            StatusCategory::ClientRejected => 406,
            StatusCategory::ServerError => 500,
        }
    }
}

/// Caller-facing create/transfer service backed by a shared store
#[derive(Debug)]
pub struct TransferService<S: LedgerStore> {
    store: Arc<S>,
}

impl<S: LedgerStore> Clone for TransferService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: LedgerStore> TransferService<S> {
    /// Create a service over an injected store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The store this service writes to
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Open an account
    ///
    /// # Arguments
    ///
    /// * `name` - Account display name
    /// * `balance` - Initial balance, stored as given
    ///
    /// # Returns
    ///
    /// The id assigned to the new account. An error here means the store
    /// detected a broken invariant.
    pub fn create(&self, name: &str, balance: Decimal) -> Result<AccountId, LedgerError> {
        let id = self.store.create_account(name, balance)?;
        info!(account = id, name, %balance, "account opened");
        Ok(id)
    }

    /// Transfer `amount` from `source` to `receiver`
    ///
    /// Never returns an error: every ledger failure is folded into the
    /// outcome.
    pub fn transfer(
        &self,
        source: AccountId,
        receiver: AccountId,
        amount: Decimal,
    ) -> TransferOutcome {
        let result = self.store.transfer(source, receiver, amount);
        match &result {
            Ok(()) => debug!(source, receiver, %amount, "transfer succeeded"),
            Err(e) if e.is_rejection() => {
                info!(source, receiver, %amount, error = %e, "transfer rejected")
            }
            Err(e) => error!(source, receiver, %amount, error = %e, "transfer failed"),
        }
        TransferOutcome::from(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::Ledger;
    use crate::types::Account;
    use rstest::rstest;

    /// Store whose every operation fails with a lock fault
    struct BrokenStore;

    impl LedgerStore for BrokenStore {
        fn create_account(&self, _: &str, _: Decimal) -> Result<AccountId, LedgerError> {
            Err(LedgerError::invariant_violation("account id 0 assigned twice"))
        }

        fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
            Err(LedgerError::lock_poisoned(id))
        }

        fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
            Ok(vec![])
        }

        fn transfer(&self, source: AccountId, _: AccountId, _: Decimal) -> Result<(), LedgerError> {
            Err(LedgerError::lock_poisoned(source))
        }
    }

    fn service() -> TransferService<Ledger> {
        TransferService::new(Arc::new(Ledger::new()))
    }

    #[test]
    fn test_create_returns_sequential_ids() {
        let service = service();

        assert_eq!(service.create("user1", Decimal::new(17000, 1)).unwrap(), 0);
        assert_eq!(service.create("user2", Decimal::new(20000, 1)).unwrap(), 1);

        let account = service.store().get_account(0).unwrap();
        assert_eq!(account.name, "user1");
    }

    #[rstest]
    #[case::success(0, 1, Decimal::new(200, 0), TransferOutcome::Success)]
    #[case::insufficient_funds(
        1, 0, Decimal::new(3000, 0),
        TransferOutcome::Rejected(RejectReason::InsufficientFunds)
    )]
    #[case::unknown_source(7, 0, Decimal::ONE, TransferOutcome::Rejected(RejectReason::UnknownAccount))]
    #[case::unknown_receiver(0, 7, Decimal::ONE, TransferOutcome::Rejected(RejectReason::UnknownAccount))]
    #[case::negative_amount(
        0, 1, Decimal::NEGATIVE_ONE,
        TransferOutcome::Rejected(RejectReason::InvalidAmount)
    )]
    fn test_transfer_outcomes(
        #[case] source: AccountId,
        #[case] receiver: AccountId,
        #[case] amount: Decimal,
        #[case] expected: TransferOutcome,
    ) {
        let service = service();
        service.create("user1", Decimal::new(1700, 0)).unwrap();
        service.create("user2", Decimal::new(2000, 0)).unwrap();

        assert_eq!(service.transfer(source, receiver, amount), expected);
    }

    #[test]
    fn test_internal_fault_maps_to_failed() {
        let service = TransferService::new(Arc::new(BrokenStore));

        let outcome = service.transfer(3, 4, Decimal::ONE);

        assert_eq!(outcome, TransferOutcome::Failed(LedgerError::lock_poisoned(3)));
        assert_eq!(outcome.status(), StatusCategory::ServerError);
        assert!(service.create("anna", Decimal::ONE).is_err());
    }

    #[rstest]
    #[case::success(TransferOutcome::Success, StatusCategory::Ok, 200)]
    #[case::insufficient_funds(
        TransferOutcome::Rejected(RejectReason::InsufficientFunds),
        StatusCategory::ClientRejected,
        406
    )]
    #[case::unknown_account(
        TransferOutcome::Rejected(RejectReason::UnknownAccount),
        StatusCategory::ClientRejected,
        406
    )]
    #[case::failed(
        TransferOutcome::Failed(LedgerError::invariant_violation("x")),
        StatusCategory::ServerError,
        500
    )]
    fn test_status_mapping(
        #[case] outcome: TransferOutcome,
        #[case] category: StatusCategory,
        #[case] code: u16,
    ) {
        assert_eq!(outcome.status(), category);
        assert_eq!(outcome.status().status_code(), code);
    }

    #[test]
    fn test_reject_reason_display() {
        assert_eq!(RejectReason::InsufficientFunds.to_string(), "insufficient funds");
        assert_eq!(RejectReason::UnknownAccount.to_string(), "unknown account");
        assert_eq!(RejectReason::InvalidAmount.to_string(), "invalid amount");
    }
}
