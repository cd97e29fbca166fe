use serde::{Deserialize, Serialize};

/// A single proposed rename inside the target directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOperation {
    /// Current file name (base name, no directory)
    pub original: String,
    /// Proposed file name (base name, no directory)
    pub new: String,
    /// Why the proposal source suggested this rename
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RenameOperation {
    pub fn new(original: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            new: new.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Get a human-readable description of the operation
    pub fn description(&self) -> String {
        format!("{} -> {}", self.original, self.new)
    }
}

/// The ordered list of operations proposed for one run.
///
/// Order is both display order and execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenamePlan {
    operations: Vec<RenameOperation>,
}

impl RenamePlan {
    pub fn new(operations: Vec<RenameOperation>) -> Self {
        Self { operations }
    }

    pub fn operations(&self) -> &[RenameOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RenameOperation> {
        self.operations.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenameOperation> {
        self.operations.iter()
    }

}

impl From<Vec<RenameOperation>> for RenamePlan {
    fn from(operations: Vec<RenameOperation>) -> Self {
        Self::new(operations)
    }
}

impl<'a> IntoIterator for &'a RenamePlan {
    type Item = &'a RenameOperation;
    type IntoIter = std::slice::Iter<'a, RenameOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}
