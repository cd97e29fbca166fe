//! Confirmation boundary
//!
//! Between validation and execution the caller reviews an `ExecutionPreview`
//! and answers with a `Decision`. The decision is turned into the set of
//! operation indices that are actually submitted to the executor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::validator::{ValidationIssue, ValidationReport};
use crate::plan::RenamePlan;

/// What the caller wants done with a validated plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "indices", rename_all = "snake_case")]
pub enum Decision {
    /// Submit every operation, errors included
    Proceed,
    /// Submit only operations without validation errors
    ProceedSafe,
    /// Submit exactly these operations
    ProceedWithSubset(BTreeSet<usize>),
    /// Submit nothing
    Abort,
}

impl Decision {
    /// Indices to submit, or `None` on abort. Out-of-range indices are dropped.
    pub fn selection(&self, plan: &RenamePlan, report: &ValidationReport) -> Option<BTreeSet<usize>> {
        match self {
            Decision::Proceed => Some((0..plan.len()).collect()),
            Decision::ProceedSafe => Some(
                report
                    .safe_indices()
                    .into_iter()
                    .filter(|&i| i < plan.len())
                    .collect(),
            ),
            Decision::ProceedWithSubset(indices) => {
                Some(indices.iter().copied().filter(|&i| i < plan.len()).collect())
            }
            Decision::Abort => None,
        }
    }
}

/// One line of the preview shown before confirmation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEntry {
    pub operation_index: usize,
    pub original: String,
    pub new: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Has no validation errors
    pub safe: bool,
    pub issues: Vec<ValidationIssue>,
}

/// What would happen if the plan were executed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPreview {
    pub entries: Vec<PreviewEntry>,
    pub safe_count: usize,
    pub blocked_count: usize,
    pub warning_count: usize,
}

impl ExecutionPreview {
    pub fn build(plan: &RenamePlan, report: &ValidationReport) -> Self {
        let blocked = report.blocked_indices();

        let entries: Vec<PreviewEntry> = plan
            .iter()
            .enumerate()
            .map(|(idx, op)| PreviewEntry {
                operation_index: idx,
                original: op.original.clone(),
                new: op.new.clone(),
                reason: op.reason.clone(),
                safe: !blocked.contains(&idx),
                issues: report.issues_for(idx).cloned().collect(),
            })
            .collect();

        let safe_count = entries.iter().filter(|e| e.safe).count();

        Self {
            blocked_count: entries.len() - safe_count,
            safe_count,
            warning_count: report.warning_count(),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::snapshot::DirectorySnapshot;
    use crate::execution::validator::validate;
    use crate::plan::RenameOperation;
    use std::path::PathBuf;

    fn fixture() -> (RenamePlan, ValidationReport) {
        let snapshot = DirectorySnapshot::from_names(PathBuf::from("/t"), ["a.txt", "b.txt"]);
        let plan = RenamePlan::new(vec![
            RenameOperation::new("a.txt", "a_final.txt").with_reason("suffix"),
            RenameOperation::new("c.txt", "c_final.txt"),
            RenameOperation::new("b.txt", "b_final.txt"),
        ]);
        let report = validate(&snapshot, &plan, |name| snapshot.contains(name));
        (plan, report)
    }

    #[test]
    fn test_proceed_selects_everything() {
        let (plan, report) = fixture();
        let selected = Decision::Proceed.selection(&plan, &report).unwrap();
        assert_eq!(selected, BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn test_proceed_safe_excludes_errors() {
        let (plan, report) = fixture();
        let selected = Decision::ProceedSafe.selection(&plan, &report).unwrap();
        assert_eq!(selected, BTreeSet::from([0, 2]));
    }

    #[test]
    fn test_subset_drops_out_of_range() {
        let (plan, report) = fixture();
        let selected = Decision::ProceedWithSubset(BTreeSet::from([2, 9]))
            .selection(&plan, &report)
            .unwrap();
        assert_eq!(selected, BTreeSet::from([2]));
    }

    #[test]
    fn test_abort_selects_nothing() {
        let (plan, report) = fixture();
        assert!(Decision::Abort.selection(&plan, &report).is_none());
    }

    #[test]
    fn test_preview_counts() {
        let (plan, report) = fixture();
        let preview = ExecutionPreview::build(&plan, &report);

        assert_eq!(preview.entries.len(), 3);
        assert_eq!(preview.safe_count, 2);
        assert_eq!(preview.blocked_count, 1);
        assert!(!preview.entries[1].safe);
        assert_eq!(preview.entries[1].issues.len(), 1);
        assert_eq!(preview.entries[0].reason.as_deref(), Some("suffix"));
    }
}
