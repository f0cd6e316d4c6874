//! Core data types shared across svcs
//!
//! ## Overview
//!
//! - **Identity**: [`Fingerprint`], the double SHA-256 digest naming a commit
//! - **Outcomes**: [`AddOutcome`], [`CommitOutcome`], [`CheckoutOutcome`] carry the
//!   user-input results of each command; their `Display` is the exact text shown
//!   to the user
//! - **Reports**: [`RestoreReport`] lists which files a checkout restored or missed
//! - **Configuration**: [`RepositoryConfig`] holds the tunables of a [`crate::Repository`]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Length of a fingerprint rendered as hex
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Identity of a tracked-file state
///
/// Computed by [`crate::fingerprint::compute_fingerprint`]. The hex form doubles as
/// the commit directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Wrap a raw 32-byte digest
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering, used as the commit id
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Result of tracking a new path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Path appended to the index
    Tracked(String),
    /// Exact same string is already in the index
    AlreadyTracked(String),
    /// Path does not exist on disk
    NotFound(String),
}

impl fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddOutcome::Tracked(path) => write!(f, "The file '{}' is tracked.", path),
            AddOutcome::AlreadyTracked(path) => {
                write!(f, "The file '{}' is already tracked.", path)
            }
            AddOutcome::NotFound(path) => write!(f, "Can't find '{}'.", path),
        }
    }
}

/// Result of a commit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new commit directory and log entry were written
    Committed(Fingerprint),
    /// The working state matches an existing commit
    NothingToCommit,
    /// No username configured
    MissingUsername,
    /// Nothing tracked
    EmptyIndex,
}

impl fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitOutcome::Committed(_) => f.write_str("Changes are committed."),
            CommitOutcome::NothingToCommit => f.write_str("Nothing to commit."),
            CommitOutcome::MissingUsername => f.write_str("Please, tell me who you are."),
            CommitOutcome::EmptyIndex => f.write_str("No files added to the index."),
        }
    }
}

/// Per-file results of restoring a commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Full id of the restored commit
    pub commit_id: String,
    /// Tracked paths overwritten from the snapshot
    pub restored: Vec<String>,
    /// Tracked paths absent from the snapshot
    pub missing: Vec<String>,
    /// Tracked paths whose copy failed, with the error text
    pub failed: Vec<(String, String)>,
}

impl RestoreReport {
    /// True when every tracked file was restored
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty()
    }
}

/// Result of a checkout attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Files were restored (possibly partially, see the report)
    Switched(RestoreReport),
    /// No commit matches the given id or prefix
    UnknownCommit,
    /// Nothing tracked
    EmptyIndex,
}

impl fmt::Display for CheckoutOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutOutcome::Switched(report) => {
                for path in &report.missing {
                    writeln!(f, "File '{}' not found in commit.", path)?;
                }
                for (path, reason) in &report.failed {
                    writeln!(f, "Failed to restore '{}': {}.", path, reason)?;
                }
                write!(f, "Switched to commit {}.", report.commit_id)
            }
            CheckoutOutcome::UnknownCommit => f.write_str("Commit does not exist."),
            CheckoutOutcome::EmptyIndex => f.write_str("No files in the index."),
        }
    }
}

/// Repository configuration
///
/// Built through [`crate::RepositoryBuilder`]; serializable so callers can keep
/// it alongside their own settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Name of the storage directory under the working directory
    pub storage_dir: String,
    /// Whether commit and checkout take the advisory storage lock
    pub locking: bool,
    /// Age after which an existing lock file is considered abandoned
    pub lock_stale_after: Duration,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            storage_dir: "vcs".to_string(),
            locking: true,
            lock_stale_after: Duration::from_secs(600),
        }
    }
}
