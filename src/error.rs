//! Error types for svcs
//!
//! Only system-level failures are errors. Conditions a user can fix by running
//! another command (no username, nothing tracked, unknown commit id) are reported
//! through the outcome types in [`crate::types`] instead, and never abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in svcs
pub type Result<T> = std::result::Result<T, SvcsError>;

/// Main error type for all svcs operations
#[derive(Debug, Error)]
pub enum SvcsError {
    /// I/O errors during storage bootstrap or bookkeeping
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A tracked file could not be read while computing a fingerprint
    #[error("Cannot read tracked file {path:?}: {source}")]
    UnreadableTrackedFile {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A commit directory with this id is already on disk
    #[error("Commit already exists: {0}")]
    CommitAlreadyExists(String),

    /// Copying a file into a commit snapshot failed
    #[error("Snapshot failed for {path:?}: {source}")]
    SnapshotFailed {
        /// Tracked path being copied
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Another process holds the storage lock
    #[error("Storage is locked by process {holder_pid} ({path:?})")]
    LockHeld {
        /// Lock file location
        path: PathBuf,
        /// PID recorded in the lock file (0 if unreadable)
        holder_pid: u32,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SvcsError {
    /// Create an internal error with a custom message
    pub fn internal(msg: impl Into<String>) -> Self {
        SvcsError::Internal(msg.into())
    }

    /// Create an invalid configuration error with a custom message
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        SvcsError::InvalidConfiguration(msg.into())
    }

    /// Check if this error is a lock conflict that a retry could clear
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SvcsError::LockHeld { .. })
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            SvcsError::LockHeld { path, holder_pid } => {
                format!(
                    "Another svcs process (pid {}) is working on this repository. \
                     Try again later, or remove {:?} if that process is gone.",
                    holder_pid, path
                )
            }
            SvcsError::UnreadableTrackedFile { path, .. } => {
                format!(
                    "Tracked file {:?} cannot be read. Restore it or check its permissions.",
                    path
                )
            }
            _ => self.to_string(),
        }
    }
}
