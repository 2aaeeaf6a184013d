//! Command processing engine
//!
//! This module provides the `CommandEngine`, which applies parsed commands to
//! the ledger through the transfer facade, and `ProcessingSummary`, which
//! tallies what happened over a run.
//!
//! The engine only holds shared references, so one instance can be cloned
//! into as many worker tasks as needed.

use crate::core::facade::{TransferOutcome, TransferService};
use crate::core::traits::LedgerStore;
use crate::types::{AccountId, CommandRecord, LedgerError};
use std::sync::Arc;
use tracing::info;

/// What applying a single command produced
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A create command opened this account
    Created(AccountId),
    /// A transfer command finished with this outcome
    Transfer(TransferOutcome),
}

/// Result of processing a single command
///
/// Contains the original command and what it produced.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was processed
    pub record: CommandRecord,

    /// The outcome, or the error that stopped a create
    pub result: Result<CommandOutcome, LedgerError>,
}

/// Counters over a processing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    /// Accounts opened
    pub created: usize,
    /// Transfers applied
    pub succeeded: usize,
    /// Transfers refused by the ledger
    pub rejected: usize,
    /// Commands that hit an internal fault
    pub failed: usize,
}

impl ProcessingSummary {
    /// Count one processing result
    pub fn record(&mut self, result: &Result<CommandOutcome, LedgerError>) {
        match result {
            Ok(CommandOutcome::Created(_)) => self.created += 1,
            Ok(CommandOutcome::Transfer(TransferOutcome::Success)) => self.succeeded += 1,
            Ok(CommandOutcome::Transfer(TransferOutcome::Rejected(_))) => self.rejected += 1,
            Ok(CommandOutcome::Transfer(TransferOutcome::Failed(_))) | Err(_) => self.failed += 1,
        }
    }

    /// Fold in the counts of another summary
    pub fn merge(&mut self, other: &ProcessingSummary) {
        self.created += other.created;
        self.succeeded += other.succeeded;
        self.rejected += other.rejected;
        self.failed += other.failed;
    }

    /// Total number of commands counted
    pub fn total(&self) -> usize {
        self.created + self.succeeded + self.rejected + self.failed
    }

    /// Emit the summary as a log event
    pub fn log(&self) {
        info!(
            created = self.created,
            succeeded = self.succeeded,
            rejected = self.rejected,
            failed = self.failed,
            "processing finished"
        );
    }
}

impl<'a> FromIterator<&'a ProcessingResult> for ProcessingSummary {
    fn from_iter<I: IntoIterator<Item = &'a ProcessingResult>>(iter: I) -> Self {
        let mut summary = ProcessingSummary::default();
        for result in iter {
            summary.record(&result.result);
        }
        summary
    }
}

/// Applies commands to a ledger through the transfer facade
#[derive(Debug)]
pub struct CommandEngine<S: LedgerStore> {
    service: TransferService<S>,
}

impl<S: LedgerStore> Clone for CommandEngine<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<S: LedgerStore> CommandEngine<S> {
    /// Create an engine writing to `store`
    pub fn new(store: Arc<S>) -> Self {
        Self {
            service: TransferService::new(store),
        }
    }

    /// The store commands are applied to
    pub fn store(&self) -> &Arc<S> {
        self.service.store()
    }

    /// Apply a single command
    ///
    /// # Returns
    ///
    /// * `Ok(CommandOutcome::Created(id))` for a create
    /// * `Ok(CommandOutcome::Transfer(outcome))` for a transfer, whatever
    ///   the outcome; rejections are not errors at this level
    /// * `Err(LedgerError)` if a create hit an internal fault
    pub fn process(&self, record: &CommandRecord) -> Result<CommandOutcome, LedgerError> {
        match record {
            CommandRecord::Create { name, balance } => {
                self.service.create(name, *balance).map(CommandOutcome::Created)
            }
            CommandRecord::Transfer {
                source,
                receiver,
                amount,
            } => Ok(CommandOutcome::Transfer(
                self.service.transfer(*source, *receiver, *amount),
            )),
        }
    }

    /// Apply a command and keep it alongside its result
    pub fn process_record(&self, record: CommandRecord) -> ProcessingResult {
        let result = self.process(&record);
        ProcessingResult { record, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::facade::RejectReason;
    use crate::core::ledger::Ledger;
    use rust_decimal::Decimal;

    fn create(name: &str, balance: i64) -> CommandRecord {
        CommandRecord::Create {
            name: name.to_string(),
            balance: Decimal::new(balance, 0),
        }
    }

    fn transfer(source: AccountId, receiver: AccountId, amount: i64) -> CommandRecord {
        CommandRecord::Transfer {
            source,
            receiver,
            amount: Decimal::new(amount, 0),
        }
    }

    #[test]
    fn test_process_create_and_transfer() {
        let ledger = Arc::new(Ledger::new());
        let engine = CommandEngine::new(Arc::clone(&ledger));

        assert_eq!(
            engine.process(&create("user1", 1700)).unwrap(),
            CommandOutcome::Created(0)
        );
        assert_eq!(
            engine.process(&create("user2", 2000)).unwrap(),
            CommandOutcome::Created(1)
        );
        assert_eq!(
            engine.process(&transfer(0, 1, 200)).unwrap(),
            CommandOutcome::Transfer(TransferOutcome::Success)
        );

        assert_eq!(ledger.get_account(0).unwrap().balance, Decimal::new(1500, 0));
        assert_eq!(ledger.get_account(1).unwrap().balance, Decimal::new(2200, 0));
    }

    #[test]
    fn test_rejected_transfer_is_an_outcome_not_an_error() {
        let engine = CommandEngine::new(Arc::new(Ledger::new()));
        engine.process(&create("user1", 1700)).unwrap();

        let result = engine.process(&transfer(0, 5, 100));

        assert_eq!(
            result.unwrap(),
            CommandOutcome::Transfer(TransferOutcome::Rejected(RejectReason::UnknownAccount))
        );
    }

    #[test]
    fn test_summary_counts_results() {
        let engine = CommandEngine::new(Arc::new(Ledger::new()));
        let records = vec![
            create("anna", 1000),
            create("john", 2000),
            transfer(0, 1, 250),
            transfer(1, 0, 5000),
            transfer(0, 9, 1),
        ];

        let results: Vec<ProcessingResult> = records
            .into_iter()
            .map(|record| engine.process_record(record))
            .collect();
        let summary: ProcessingSummary = results.iter().collect();

        assert_eq!(
            summary,
            ProcessingSummary {
                created: 2,
                succeeded: 1,
                rejected: 2,
                failed: 0,
            }
        );
        assert_eq!(summary.total(), 5);
    }

    #[test]
    fn test_summary_merge() {
        let mut left = ProcessingSummary {
            created: 1,
            succeeded: 2,
            rejected: 3,
            failed: 0,
        };
        let right = ProcessingSummary {
            created: 4,
            succeeded: 0,
            rejected: 1,
            failed: 2,
        };

        left.merge(&right);

        assert_eq!(left.total(), 13);
        assert_eq!(left.failed, 2);
    }
}
