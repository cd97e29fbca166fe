//! Plan Validator
//!
//! Cross-checks a proposed `RenamePlan` against a `DirectorySnapshot` before
//! anything on disk is touched. Every operation is checked, and every issue is
//! reported in one pass: issues are ordered by operation (plan order) and then
//! by check, so the same inputs always produce the same report.
//!
//! Checks, per operation:
//! 1. unknown original (error)
//! 2. duplicate target (error, raised on every operation sharing the target)
//! 3. target already exists on disk and no error-free operation renames it away (warning)
//! 4. invalid target name (error)
//! 5. duplicate original (error)
//! 6. target is renamed away only by a later operation (warning)

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::snapshot::DirectorySnapshot;
use crate::plan::RenamePlan;

/// How serious a validation issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The operation is unsafe to execute as-is
    Error,
    /// Informational; never blocks execution
    Warning,
}

/// Type of problem detected for one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueKind {
    /// `original` is not a file in the snapshot
    UnknownOriginal { name: String },
    /// Another operation renames to the same `new`
    DuplicateTarget { name: String },
    /// `new` already exists and is not renamed away by the plan
    TargetExists { name: String },
    /// `new` cannot be used as a single file name
    InvalidTarget { name: String, problem: String },
    /// Another operation renames the same `original`
    DuplicateOriginal { name: String },
    /// `new` is renamed away, but only by an operation that runs afterwards
    TargetRenamedLater { name: String, by_operation: usize },
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::TargetExists { .. } | IssueKind::TargetRenamedLater { .. } => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    /// Get a human-readable description of the issue
    pub fn description(&self) -> String {
        match self {
            IssueKind::UnknownOriginal { name } => format!("unknown original: {}", name),
            IssueKind::DuplicateTarget { name } => format!("duplicate target: {}", name),
            IssueKind::TargetExists { name } => format!("target already exists: {}", name),
            IssueKind::InvalidTarget { name, problem } => {
                format!("invalid target name {:?}: {}", name, problem)
            }
            IssueKind::DuplicateOriginal { name } => format!("duplicate original: {}", name),
            IssueKind::TargetRenamedLater { name, by_operation } => format!(
                "target is renamed away only later in the plan: {} (operation {})",
                name,
                by_operation + 1
            ),
        }
    }
}

/// One problem found for one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Index of the operation in the plan
    pub operation_index: usize,
    pub severity: Severity,
    pub message: String,
    pub kind: IssueKind,
}

impl ValidationIssue {
    fn new(operation_index: usize, kind: IssueKind) -> Self {
        Self {
            operation_index,
            severity: kind.severity(),
            message: kind.description(),
            kind,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Every issue found for one plan against one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    /// Number of operations checked
    pub operations_checked: usize,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_error)
    }

    /// No issues of any severity
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues attached to one operation, in check order
    pub fn issues_for(&self, index: usize) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(move |i| i.operation_index == index)
    }

    /// Operations with at least one error
    pub fn blocked_indices(&self) -> BTreeSet<usize> {
        self.errors().map(|i| i.operation_index).collect()
    }

    /// Operations with no errors (warnings allowed)
    pub fn safe_indices(&self) -> BTreeSet<usize> {
        let blocked = self.blocked_indices();
        (0..self.operations_checked)
            .filter(|i| !blocked.contains(i))
            .collect()
    }
}

/// Why `name` cannot be used as a single file name component, if it can't
pub fn filename_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("name is empty");
    }
    if name.contains('/') || name.contains('\\') {
        return Some("name contains a path separator");
    }
    if name == "." || name == ".." {
        return Some("name refers to a directory");
    }
    if name.contains('\0') {
        return Some("name contains a NUL byte");
    }
    None
}

/// Validates rename plans against a captured snapshot
pub struct PlanValidator<'a> {
    snapshot: &'a DirectorySnapshot,
}

impl<'a> PlanValidator<'a> {
    pub fn new(snapshot: &'a DirectorySnapshot) -> Self {
        Self { snapshot }
    }

    /// Validate `plan`, probing the target directory through `exists_on_disk`.
    ///
    /// The probe is only called for targets that are valid file names.
    pub fn validate<F>(&self, plan: &RenamePlan, exists_on_disk: F) -> ValidationReport
    where
        F: Fn(&str) -> bool,
    {
        let mut target_counts: HashMap<&str, usize> = HashMap::new();
        let mut original_counts: HashMap<&str, usize> = HashMap::new();

        for op in plan.iter() {
            *target_counts.entry(op.new.as_str()).or_default() += 1;
            *original_counts.entry(op.original.as_str()).or_default() += 1;
        }

        // First error-free operation that renames each name away
        let mut first_rename_of: HashMap<&str, usize> = HashMap::new();

        for (idx, op) in plan.iter().enumerate() {
            let blocked = !self.snapshot.contains(&op.original)
                || target_counts.get(op.new.as_str()).copied().unwrap_or(0) > 1
                || filename_problem(&op.new).is_some()
                || original_counts.get(op.original.as_str()).copied().unwrap_or(0) > 1;
            if !blocked {
                first_rename_of.entry(op.original.as_str()).or_insert(idx);
            }
        }

        let mut issues = Vec::new();

        for (idx, op) in plan.iter().enumerate() {
            if !self.snapshot.contains(&op.original) {
                issues.push(ValidationIssue::new(
                    idx,
                    IssueKind::UnknownOriginal {
                        name: op.original.clone(),
                    },
                ));
            }

            if target_counts.get(op.new.as_str()).copied().unwrap_or(0) > 1 {
                issues.push(ValidationIssue::new(
                    idx,
                    IssueKind::DuplicateTarget {
                        name: op.new.clone(),
                    },
                ));
            }

            let problem = filename_problem(&op.new);
            let renamed_away_at = first_rename_of.get(op.new.as_str()).copied();

            if problem.is_none() && renamed_away_at.is_none() && exists_on_disk(&op.new) {
                issues.push(ValidationIssue::new(
                    idx,
                    IssueKind::TargetExists {
                        name: op.new.clone(),
                    },
                ));
            }

            if let Some(problem) = problem {
                issues.push(ValidationIssue::new(
                    idx,
                    IssueKind::InvalidTarget {
                        name: op.new.clone(),
                        problem: problem.to_string(),
                    },
                ));
            }

            if original_counts.get(op.original.as_str()).copied().unwrap_or(0) > 1 {
                issues.push(ValidationIssue::new(
                    idx,
                    IssueKind::DuplicateOriginal {
                        name: op.original.clone(),
                    },
                ));
            }

            if let Some(later) = renamed_away_at.filter(|&j| j > idx) {
                issues.push(ValidationIssue::new(
                    idx,
                    IssueKind::TargetRenamedLater {
                        name: op.new.clone(),
                        by_operation: later,
                    },
                ));
            }
        }

        let report = ValidationReport {
            issues,
            operations_checked: plan.len(),
        };

        tracing::debug!(
            operations = report.operations_checked,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Validated rename plan"
        );

        report
    }

    /// Validate only the `selected` operations, as if they made up the whole
    /// plan. Issue indices (including `by_operation`) refer to `plan`.
    ///
    /// A subset can expose problems the full plan hides, e.g. a target that
    /// was renamed away by an operation that is not selected.
    pub fn validate_selection<F>(
        &self,
        plan: &RenamePlan,
        selected: &BTreeSet<usize>,
        exists_on_disk: F,
    ) -> Vec<ValidationIssue>
    where
        F: Fn(&str) -> bool,
    {
        let indices: Vec<usize> = selected
            .iter()
            .copied()
            .filter(|&i| i < plan.len())
            .collect();
        let subset = RenamePlan::new(
            indices
                .iter()
                .filter_map(|&i| plan.get(i).cloned())
                .collect(),
        );

        self.validate(&subset, exists_on_disk)
            .issues
            .into_iter()
            .map(|issue| {
                let kind = match issue.kind {
                    IssueKind::TargetRenamedLater { name, by_operation } => {
                        IssueKind::TargetRenamedLater {
                            name,
                            by_operation: indices[by_operation],
                        }
                    }
                    other => other,
                };
                ValidationIssue::new(indices[issue.operation_index], kind)
            })
            .collect()
    }
}

/// Validate `plan` against `snapshot`; see [`PlanValidator::validate`]
pub fn validate<F>(snapshot: &DirectorySnapshot, plan: &RenamePlan, exists_on_disk: F) -> ValidationReport
where
    F: Fn(&str) -> bool,
{
    PlanValidator::new(snapshot).validate(plan, exists_on_disk)
}
