//! Error taxonomy
//!
//! Only input errors and proposal-source failures are `Err` values. Validation
//! issues and per-operation rename failures are carried as data in
//! `ValidationReport` and `ExecutionResult`.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to capture a directory snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to read directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One structurally invalid entry in a raw proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEntry {
    pub index: usize,
    pub reason: String,
}

impl std::fmt::Display for MalformedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entry {}: {}", self.index, self.reason)
    }
}

/// The proposal source returned something that is not a usable rename list
#[derive(Debug, Error)]
pub enum ProposalError {
    #[error("No JSON array found in response")]
    NoJson,

    #[error("Failed to parse proposal: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Proposal is not a list of operations")]
    NotAList,

    #[error("Malformed proposal ({} invalid entries): {}", .0.len(), join_entries(.0))]
    Malformed(Vec<MalformedEntry>),
}

fn join_entries(entries: &[MalformedEntry]) -> String {
    entries
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure talking to the proposal service
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No API key configured for {0}")]
    MissingApiKey(String),

    #[error("Credential store error: {0}")]
    Credentials(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Response contained no text")]
    EmptyResponse,
}

/// Top-level error for one renaming run
#[derive(Debug, Error)]
pub enum RenamerError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Proposal(#[from] ProposalError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = RenamerError> = std::result::Result<T, E>;
