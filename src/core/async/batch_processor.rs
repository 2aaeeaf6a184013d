//! Batch processing with account-based grouping
//!
//! This module provides the `BatchProcessor` struct, which applies a batch of
//! commands to the ledger with as much parallelism as ordering allows.
//!
//! # Design
//!
//! A batch is cut into segments at every `create` command:
//!
//! ```text
//! [t, t, c, t, t, t, c, t]   (t = transfer, c = create)
//!  └─┬─┘  │  └──┬──┘  │  │
//!   run   │    run    │  run
//!      barrier     barrier
//! ```
//!
//! Creates are applied one at a time in file order, so ids come out exactly
//! as they would sequentially, and no transfer can overtake the create of an
//! account it names. Each run of transfers between two barriers is split into
//! groups: two transfers land in the same group when they are linked by a
//! chain of shared accounts (union-find over source and receiver). A group is
//! applied in file order on one tokio task; groups run concurrently.
//!
//! Transfers in different groups touch disjoint accounts, so the final
//! balances and every outcome match applying the whole batch in file order.
//!
//! # Thread Safety
//!
//! The processor is cloneable and can be safely shared across async tasks.
//! All internal state is behind `Arc` in the engine.

use std::collections::HashMap;

use crate::core::engine::{CommandEngine, ProcessingResult};
use crate::core::traits::LedgerStore;
use crate::types::{AccountId, CommandRecord, CommandType, LedgerError};
use tracing::error;

/// Disjoint sets of account ids (union-find)
#[derive(Debug, Default)]
struct AccountSets {
    parent: HashMap<AccountId, AccountId>,
}

impl AccountSets {
    /// Representative of the set holding `id`, adding `id` if unseen
    fn find(&mut self, id: AccountId) -> AccountId {
        let mut root = id;
        loop {
            let parent = *self.parent.entry(root).or_insert(root);
            if parent == root {
                break;
            }
            root = parent;
        }

        // Path compression
        let mut node = id;
        while node != root {
            node = self.parent.insert(node, root).unwrap_or(root);
        }

        root
    }

    /// Merge the sets holding `a` and `b`
    fn union(&mut self, a: AccountId, b: AccountId) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent.insert(root_a, root_b);
        }
    }
}

/// A slice of a batch with uniform ordering rules
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// A create command, applied alone
    Barrier(CommandRecord),
    /// Consecutive transfers that may run concurrently
    Run(Vec<CommandRecord>),
}

/// Cut a batch into barriers and transfer runs, keeping file order
pub fn split_segments(batch: Vec<CommandRecord>) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut run = Vec::new();

    for record in batch {
        match record.command_type() {
            CommandType::Create => {
                if !run.is_empty() {
                    segments.push(Segment::Run(std::mem::take(&mut run)));
                }
                segments.push(Segment::Barrier(record));
            }
            CommandType::Transfer => run.push(record),
        }
    }

    if !run.is_empty() {
        segments.push(Segment::Run(run));
    }

    segments
}

/// Batch processor with account-based grouping
#[derive(Debug)]
pub struct BatchProcessor<S: LedgerStore + 'static> {
    /// Shared command engine
    engine: CommandEngine<S>,
}

impl<S: LedgerStore + 'static> Clone for BatchProcessor<S> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl<S: LedgerStore + 'static> BatchProcessor<S> {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `engine` - Engine applying commands to the shared ledger
    pub fn new(engine: CommandEngine<S>) -> Self {
        Self { engine }
    }

    /// Split a run of transfers into groups with no account in common
    ///
    /// # Guarantees
    ///
    /// - Each command appears in exactly one group
    /// - Two transfers sharing an account, directly or through other
    ///   transfers of the run, are in the same group
    /// - Every group keeps file order; groups are ordered by their first
    ///   command
    pub fn group_by_accounts(&self, run: Vec<CommandRecord>) -> Vec<Vec<CommandRecord>> {
        let mut sets = AccountSets::default();
        for (source, receiver) in run.iter().filter_map(CommandRecord::accounts) {
            sets.union(source, receiver);
        }

        let mut groups: Vec<Vec<CommandRecord>> = Vec::new();
        let mut group_of_root: HashMap<AccountId, usize> = HashMap::new();

        for record in run {
            let index = match record.accounts() {
                Some((source, _)) => *group_of_root
                    .entry(sets.find(source))
                    .or_insert_with(|| {
                        groups.push(Vec::new());
                        groups.len() - 1
                    }),
                None => {
                    groups.push(Vec::new());
                    groups.len() - 1
                }
            };
            groups[index].push(record);
        }

        groups
    }

    /// Apply a group's commands sequentially, in order
    ///
    /// All commands are applied even if some are rejected; results keep the
    /// input order.
    pub async fn process_group(&self, records: Vec<CommandRecord>) -> Vec<ProcessingResult> {
        records
            .into_iter()
            .map(|record| self.engine.process_record(record))
            .collect()
    }

    /// Apply a run of transfers, one tokio task per account group
    ///
    /// If a task panics, every command of its group is reported as failed.
    /// Commands it applied before the panic stay applied.
    pub async fn process_run(&self, run: Vec<CommandRecord>) -> Vec<ProcessingResult> {
        let groups = self.group_by_accounts(run);

        let mut tasks = Vec::with_capacity(groups.len());
        for records in groups {
            let processor = self.clone();
            let submitted = records.clone();
            let task = tokio::spawn(async move { processor.process_group(records).await });
            tasks.push((submitted, task));
        }

        let mut results = Vec::new();
        for (submitted, task) in tasks {
            match task.await {
                Ok(group_results) => results.extend(group_results),
                Err(e) => {
                    error!(error = %e, commands = submitted.len(), "transfer task panicked");
                    let message = format!("transfer task panicked: {}", e);
                    results.extend(submitted.into_iter().map(|record| ProcessingResult {
                        record,
                        result: Err(LedgerError::invariant_violation(message.clone())),
                    }));
                }
            }
        }

        results
    }

    /// Process a batch of commands
    ///
    /// Barriers run inline in order; each transfer run completes before the
    /// next segment starts.
    ///
    /// # Returns
    ///
    /// One `ProcessingResult` per input command. Results within a run are
    /// ordered by group rather than by input position.
    pub async fn process_batch(&self, batch: Vec<CommandRecord>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(batch.len());

        for segment in split_segments(batch) {
            match segment {
                Segment::Barrier(record) => results.push(self.engine.process_record(record)),
                Segment::Run(run) => results.extend(self.process_run(run).await),
            }
        }

        results
    }
}
