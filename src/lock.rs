//! Advisory lock around commit and checkout
//!
//! The lock is a file created with `create_new`, holding the owner's pid and
//! acquisition time as JSON. It is removed when the guard drops. A lock whose
//! holder process is gone is taken over at once. Where liveness cannot be checked,
//! and for lock files that cannot be parsed, the lock is taken over once it is
//! older than the configured staleness threshold.

use crate::error::{Result, SvcsError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Lock file content
#[derive(Debug, Serialize, Deserialize)]
struct LockContent {
    pid: u32,
    acquired_at: DateTime<Utc>,
}

/// Guard for the storage lock; released on drop
#[derive(Debug)]
pub struct StorageLock {
    path: PathBuf,
}

impl StorageLock {
    /// Acquire the lock at `path`
    ///
    /// # Errors
    ///
    /// - [`SvcsError::LockHeld`] if another live process holds the lock
    /// - [`SvcsError::Io`] if the lock file cannot be created or removed
    pub fn acquire(path: &Path, stale_after: Duration) -> Result<Self> {
        // One retry after clearing a stale lock
        for _ in 0..2 {
            match OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(mut file) => {
                    let content = LockContent {
                        pid: std::process::id(),
                        acquired_at: Utc::now(),
                    };
                    file.write_all(serde_json::to_string(&content)?.as_bytes())?;
                    debug!("Acquired storage lock {:?}", path);
                    return Ok(Self {
                        path: path.to_path_buf(),
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    let holder = read_holder(path);
                    if !is_stale(path, holder.as_ref(), stale_after) {
                        return Err(SvcsError::LockHeld {
                            path: path.to_path_buf(),
                            holder_pid: holder.map(|h| h.pid).unwrap_or(0),
                        });
                    }
                    warn!("Removing stale storage lock {:?}", path);
                    match fs::remove_file(path) {
                        Ok(()) => {}
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                        Err(e) => return Err(e.into()),
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(SvcsError::LockHeld {
            path: path.to_path_buf(),
            holder_pid: read_holder(path).map(|h| h.pid).unwrap_or(0),
        })
    }

    /// Location of the lock file
    pub fn location(&self) -> &Path {
        &self.path
    }
}

impl Drop for StorageLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Failed to release storage lock {:?}: {}", self.path, e);
        } else {
            debug!("Released storage lock {:?}", self.path);
        }
    }
}

fn read_holder(path: &Path) -> Option<LockContent> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

/// A lock is stale once its holder is gone. Age decides only when liveness is
/// unknown or the content is unparseable (then aged by modification time).
fn is_stale(path: &Path, holder: Option<&LockContent>, stale_after: Duration) -> bool {
    let age = match holder {
        Some(content) => match is_process_alive(content.pid) {
            Some(alive) => return !alive,
            None => (Utc::now() - content.acquired_at).to_std().ok(),
        },
        None => fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok()),
    };
    age.is_some_and(|age| age >= stale_after)
}

/// Check if process is alive
#[cfg(target_os = "linux")]
fn is_process_alive(pid: u32) -> Option<bool> {
    // Check /proc/<pid> directory exists
    Some(pid == std::process::id() || Path::new(&format!("/proc/{}", pid)).exists())
}

#[cfg(not(target_os = "linux"))]
fn is_process_alive(pid: u32) -> Option<bool> {
    // Only our own pid is known; anything else falls back to age
    (pid == std::process::id()).then_some(true)
}
