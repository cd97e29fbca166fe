//! One renaming run: snapshot -> proposal -> validation -> decision -> execution.
//!
//! The run is split in two so the caller can show the preview and collect a
//! decision in between. Nothing on disk changes before `execute`.

use std::path::Path;
use uuid::Uuid;

use crate::ai::ProposalSource;
use crate::error::Result;
use crate::execution::{
    validate, AbortFlag, Decision, DirectoryFs, DirectorySnapshot, ExecutionPreview,
    ExecutionResult, PlanExecutor, PlanValidator, ValidationIssue, ValidationReport,
};
use crate::plan::RenamePlan;

/// A validated plan waiting for a decision
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub run_id: Uuid,
    pub snapshot: DirectorySnapshot,
    pub plan: RenamePlan,
    pub report: ValidationReport,
}

/// Capture the directory, ask `source` for a plan, and validate it
pub async fn prepare_run(
    dir: &Path,
    instruction: &str,
    source: &dyn ProposalSource,
) -> Result<PreparedRun> {
    let run_id = Uuid::new_v4();
    let snapshot = DirectorySnapshot::capture(dir)?;

    tracing::info!(
        run_id = %run_id,
        directory = %dir.display(),
        files = snapshot.len(),
        "Captured directory"
    );

    let plan = if snapshot.is_empty() {
        tracing::info!(run_id = %run_id, "No files to rename");
        RenamePlan::default()
    } else {
        source.propose(snapshot.files(), instruction).await?
    };

    let report = validate_against_disk(&snapshot, &plan);

    tracing::info!(
        run_id = %run_id,
        operations = plan.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "Validated proposal"
    );

    Ok(PreparedRun {
        run_id,
        snapshot,
        plan,
        report,
    })
}

/// Validate `plan` using the snapshot plus a live existence check, so targets
/// that appeared after the snapshot still count as existing
pub fn validate_against_disk(snapshot: &DirectorySnapshot, plan: &RenamePlan) -> ValidationReport {
    let fs_ops = DirectoryFs::new(&snapshot.directory);
    validate(snapshot, plan, |name| snapshot.contains(name) || fs_ops.exists(name))
}

impl PreparedRun {
    pub fn preview(&self) -> ExecutionPreview {
        ExecutionPreview::build(&self.plan, &self.report)
    }

    /// Issues that only show up once the plan is cut down to what `decision`
    /// selects, e.g. a kept rename whose target was cleared by a dropped one
    pub fn selection_issues(&self, decision: &Decision) -> Vec<ValidationIssue> {
        let Some(selected) = decision.selection(&self.plan, &self.report) else {
            return Vec::new();
        };

        let fs_ops = DirectoryFs::new(&self.snapshot.directory);
        PlanValidator::new(&self.snapshot)
            .validate_selection(&self.plan, &selected, |name| {
                self.snapshot.contains(name) || fs_ops.exists(name)
            })
            .into_iter()
            .filter(|issue| !self.report.issues.contains(issue))
            .collect()
    }

    /// Apply the operations selected by `decision`. Returns `None` on abort.
    pub fn execute(&self, decision: &Decision, abort: Option<AbortFlag>) -> Option<ExecutionResult> {
        let Some(selected) = decision.selection(&self.plan, &self.report) else {
            tracing::info!(run_id = %self.run_id, "Run aborted before execution");
            return None;
        };

        for issue in self.selection_issues(decision) {
            tracing::warn!(
                run_id = %self.run_id,
                operation = issue.operation_index + 1,
                "{}",
                issue.message
            );
        }

        tracing::info!(
            run_id = %self.run_id,
            submitted = selected.len(),
            total = self.plan.len(),
            "Executing rename plan"
        );

        let fs_ops = DirectoryFs::new(&self.snapshot.directory);
        let mut executor = PlanExecutor::new(|original: &str, new: &str| fs_ops.rename(original, new));
        if let Some(flag) = abort {
            executor = executor.with_abort_flag(flag);
        }

        Some(executor.execute_selected(&self.plan, &selected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenamerError;
    use crate::execution::OperationOutcome;
    use crate::plan::RenameOperation;
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Returns a fixed plan and records what it was asked
    struct FixedSource {
        plan: RenamePlan,
        seen: Mutex<Vec<String>>,
    }

    impl FixedSource {
        fn new(ops: &[(&str, &str)]) -> Self {
            Self {
                plan: RenamePlan::new(
                    ops.iter()
                        .map(|(o, n)| RenameOperation::new(*o, *n))
                        .collect(),
                ),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProposalSource for FixedSource {
        async fn propose(&self, files: &[String], _instruction: &str) -> std::result::Result<RenamePlan, RenamerError> {
            self.seen.lock().unwrap().extend(files.iter().cloned());
            Ok(self.plan.clone())
        }
    }

    #[tokio::test]
    async fn test_prepare_and_execute_safe_subset() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();

        let source = FixedSource::new(&[("a.txt", "a_final.txt"), ("c.txt", "c_final.txt")]);
        let run = prepare_run(dir.path(), "add suffix", &source).await.unwrap();

        assert_eq!(*source.seen.lock().unwrap(), vec!["a.txt", "b.txt"]);
        assert_eq!(run.report.error_count(), 1);
        assert_eq!(run.report.issues[0].message, "unknown original: c.txt");

        let result = run.execute(&Decision::ProceedSafe, None).unwrap();

        assert_eq!(result.results[0].outcome, OperationOutcome::Applied);
        assert_eq!(result.results[1].outcome, OperationOutcome::Skipped);
        assert!(dir.path().join("a_final.txt").exists());
        assert!(dir.path().join("b.txt").exists());
        assert!(!dir.path().join("a.txt").exists());
    }

    #[tokio::test]
    async fn test_abort_touches_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let source = FixedSource::new(&[("a.txt", "z.txt")]);
        let run = prepare_run(dir.path(), "rename", &source).await.unwrap();

        assert!(run.execute(&Decision::Abort, None).is_none());
        assert!(dir.path().join("a.txt").exists());
    }

    #[tokio::test]
    async fn test_empty_directory_skips_proposal() {
        let dir = tempdir().unwrap();
        let source = FixedSource::new(&[("a.txt", "b.txt")]);

        let run = prepare_run(dir.path(), "rename", &source).await.unwrap();

        assert!(run.plan.is_empty());
        assert!(source.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_is_input_error() {
        let dir = tempdir().unwrap();
        let source = FixedSource::new(&[]);

        let err = prepare_run(&dir.path().join("nope"), "rename", &source)
            .await
            .unwrap_err();
        assert!(matches!(err, RenamerError::Snapshot(_)));
    }

    #[tokio::test]
    async fn test_safe_run_reports_target_of_blocked_renamer() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "A").unwrap();
        fs::write(dir.path().join("b.txt"), "B").unwrap();

        let source = FixedSource::new(&[("b.txt", "sub/b.txt"), ("a.txt", "b.txt")]);
        let run = prepare_run(dir.path(), "rename", &source).await.unwrap();

        assert_eq!(run.report.error_count(), 1);
        let warnings: Vec<_> = run
            .report
            .warnings()
            .map(|i| (i.operation_index, i.message.as_str()))
            .collect();
        assert_eq!(warnings, vec![(1, "target already exists: b.txt")]);

        let preview = run.preview();
        assert_eq!(preview.entries[1].issues.len(), 1);
        assert!(run.selection_issues(&Decision::ProceedSafe).is_empty());
    }

    #[tokio::test]
    async fn test_subset_without_renamer_reports_existing_target() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "A").unwrap();
        fs::write(dir.path().join("b.txt"), "B").unwrap();

        let source = FixedSource::new(&[("b.txt", "c.txt"), ("a.txt", "b.txt")]);
        let run = prepare_run(dir.path(), "rename", &source).await.unwrap();
        assert!(run.report.is_clean());

        let subset = Decision::ProceedWithSubset(BTreeSet::from([1]));
        let issues = run.selection_issues(&subset);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].operation_index, 1);
        assert_eq!(issues[0].message, "target already exists: b.txt");

        assert!(run.selection_issues(&Decision::Proceed).is_empty());
        assert!(run.selection_issues(&Decision::Abort).is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "B");
    }

    #[test]
    fn test_live_probe_sees_files_outside_snapshot() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let snapshot = DirectorySnapshot::capture(dir.path()).unwrap();

        // Appears after the snapshot was taken
        fs::write(dir.path().join("out.txt"), "late").unwrap();

        let plan = RenamePlan::new(vec![RenameOperation::new("a.txt", "out.txt")]);
        let report = validate_against_disk(&snapshot, &plan);

        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.issues[0].message, "target already exists: out.txt");
    }
}
