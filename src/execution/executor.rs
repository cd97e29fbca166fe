//! Plan Executor
//!
//! Applies rename operations strictly in plan order, one at a time. There is
//! no atomicity across the batch: a failed rename is recorded and execution
//! moves on to the next operation. Nothing is retried or rolled back.
//!
//! The executor never decides to skip an operation itself. `Skipped` only
//! marks operations the caller chose not to submit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::plan::{RenameOperation, RenamePlan};

/// Outcome of a single operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum OperationOutcome {
    /// Rename completed
    Applied,
    /// Not submitted by the caller
    Skipped,
    /// The rename call failed; holds the underlying error text
    Failed(String),
}

impl OperationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, OperationOutcome::Applied)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, OperationOutcome::Failed(_))
    }
}

/// Outcome of one operation together with what it was
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    /// Index of the operation in the plan
    pub operation_index: usize,
    pub original: String,
    pub new: String,
    pub outcome: OperationOutcome,
}

/// Result of executing operations, one entry per operation attempted or
/// skipped, in plan order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub results: Vec<OperationResult>,
    /// Execution stopped early because the abort flag was raised
    pub aborted: bool,
}

impl ExecutionResult {
    pub fn applied_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_applied()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_failed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome == OperationOutcome::Skipped)
            .count()
    }

    /// No operation failed and the run was not aborted
    pub fn success(&self) -> bool {
        !self.aborted && self.failed_count() == 0
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &OperationOutcome> {
        self.results.iter().map(|r| &r.outcome)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Shared flag checked between operations to stop a run early
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Executes rename plans through a rename function
pub struct PlanExecutor<F> {
    rename: F,
    abort: Option<AbortFlag>,
}

impl<F> PlanExecutor<F>
where
    F: FnMut(&str, &str) -> io::Result<()>,
{
    pub fn new(rename: F) -> Self {
        Self {
            rename,
            abort: None,
        }
    }

    /// Stop between operations once `flag` is raised
    pub fn with_abort_flag(mut self, flag: AbortFlag) -> Self {
        self.abort = Some(flag);
        self
    }

    /// Attempt every operation in `plan`, in order
    pub fn execute(&mut self, plan: &RenamePlan) -> ExecutionResult {
        self.run(plan, None)
    }

    /// Attempt only the operations whose index is in `selected`; the rest
    /// are recorded as `Skipped`
    pub fn execute_selected(
        &mut self,
        plan: &RenamePlan,
        selected: &BTreeSet<usize>,
    ) -> ExecutionResult {
        self.run(plan, Some(selected))
    }

    fn run(&mut self, plan: &RenamePlan, selected: Option<&BTreeSet<usize>>) -> ExecutionResult {
        let mut result = ExecutionResult::default();

        for (idx, op) in plan.iter().enumerate() {
            if self.abort.as_ref().is_some_and(AbortFlag::is_aborted) {
                tracing::warn!(
                    attempted = result.len(),
                    total = plan.len(),
                    "Execution aborted"
                );
                result.aborted = true;
                break;
            }

            let submitted = selected.map_or(true, |s| s.contains(&idx));
            let outcome = if submitted {
                self.apply(op)
            } else {
                tracing::debug!(operation = %op.description(), "Skipping operation");
                OperationOutcome::Skipped
            };

            result.results.push(OperationResult {
                operation_index: idx,
                original: op.original.clone(),
                new: op.new.clone(),
                outcome,
            });
        }

        tracing::info!(
            applied = result.applied_count(),
            failed = result.failed_count(),
            skipped = result.skipped_count(),
            aborted = result.aborted,
            "Executed rename plan"
        );

        result
    }

    fn apply(&mut self, op: &RenameOperation) -> OperationOutcome {
        tracing::debug!(operation = %op.description(), "Executing operation");

        match (self.rename)(&op.original, &op.new) {
            Ok(()) => OperationOutcome::Applied,
            Err(e) => {
                tracing::warn!(operation = %op.description(), error = %e, "Operation failed");
                OperationOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Attempt every operation in `plan` through `rename`; see [`PlanExecutor`]
pub fn execute<F>(plan: &RenamePlan, rename: F) -> ExecutionResult
where
    F: FnMut(&str, &str) -> io::Result<()>,
{
    PlanExecutor::new(rename).execute(plan)
}
