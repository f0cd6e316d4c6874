//! Commit snapshot storage
//!
//! Every commit is a plain directory under `commits/`, named by the hex
//! fingerprint of the tracked files it holds:
//!
//! ```text
//! vcs/commits/
//! └── <fingerprint>/
//!     ├── a.txt
//!     └── src/
//!         └── lib.rs
//! ```
//!
//! Directories are written once and never modified or removed. No manifest is
//! kept; which files a commit holds is whatever is present in its directory.
//!
//! ## Duplicate detection
//!
//! A commit is a duplicate if the directory named by its fingerprint exists, or if
//! recomputing the fingerprint of any stored commit over the *current* index gives
//! the same value. The second check is a linear scan over all commits and only runs
//! when the first one misses.
//!
//! ## Failure policy
//!
//! Snapshot creation is all-or-nothing from the caller's point of view: the first
//! failing copy aborts with an error, leaving the partial directory on disk.
//! Restoring is best-effort per file and reports what it could not do.

use crate::error::{Result, SvcsError};
use crate::fingerprint::{compute_fingerprint, CommitSnapshot};
use crate::types::{Fingerprint, RestoreReport};
use crate::utils;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, trace, warn};

/// Directory-per-commit snapshot store
#[derive(Debug, Clone)]
pub struct CommitStore {
    /// The `commits/` directory
    root: PathBuf,
}

impl CommitStore {
    /// Store rooted at `root` (the `commits/` directory)
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory of commit `id`
    pub fn commit_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Whether a commit directory named `id` exists
    ///
    /// Ids that are not lowercase hex never exist, so a crafted id cannot point
    /// outside the store.
    pub fn exists(&self, id: &str) -> bool {
        utils::is_hex_id(id) && self.commit_dir(id).is_dir()
    }

    /// Ids of all stored commits, sorted
    pub fn enumerate(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => ids.push(name),
                Err(name) => trace!("Skipping non UTF-8 entry {:?}", name),
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Find a stored commit whose content matches `fingerprint` under `files`
    ///
    /// Returns the id of the matching commit. A commit directory that lacks one of
    /// `files` cannot match and is skipped; any other read failure is an error.
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub fn find_duplicate(&self, fingerprint: &Fingerprint, files: &[String]) -> Result<Option<String>> {
        let id = fingerprint.to_hex();
        if self.exists(&id) {
            debug!("Commit {} already stored", id);
            return Ok(Some(id));
        }

        for existing in self.enumerate()? {
            let dir = self.commit_dir(&existing);
            match compute_fingerprint(files, &CommitSnapshot::new(&dir)) {
                Ok(stored) if stored == *fingerprint => {
                    debug!("Working tree matches commit {}", existing);
                    return Ok(Some(existing));
                }
                Ok(_) => {}
                Err(SvcsError::UnreadableTrackedFile { path, source })
                    if source.kind() == io::ErrorKind::NotFound =>
                {
                    trace!("Commit {} lacks {:?}, cannot match", existing, path);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }

    /// Write a new commit directory holding copies of `files` from `work_dir`
    ///
    /// # Errors
    ///
    /// - [`SvcsError::CommitAlreadyExists`] if the directory is already there
    /// - [`SvcsError::SnapshotFailed`] on the first file that cannot be copied
    #[instrument(skip(self, files, work_dir), fields(files = files.len()))]
    pub fn create(&self, fingerprint: &Fingerprint, files: &[String], work_dir: &Path) -> Result<PathBuf> {
        let id = fingerprint.to_hex();
        let dir = self.commit_dir(&id);

        match fs::create_dir(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(SvcsError::CommitAlreadyExists(id));
            }
            Err(e) => return Err(e.into()),
        }

        let mut bytes = 0u64;
        for tracked in files {
            let src = work_dir.join(tracked);
            let dst = utils::snapshot_path(&dir, tracked);
            bytes += utils::copy_file(&src, &dst).map_err(|err| SvcsError::SnapshotFailed {
                path: PathBuf::from(tracked),
                source: err,
            })?;
        }

        info!("Stored commit {} ({} files, {} bytes)", id, files.len(), bytes);
        Ok(dir)
    }

    /// Copy `files` from commit `id` back into `work_dir`
    ///
    /// Files absent from the snapshot are listed in [`RestoreReport::missing`];
    /// files that fail to copy are listed in [`RestoreReport::failed`]. Every file
    /// is attempted regardless.
    #[instrument(skip(self, files, work_dir), fields(files = files.len()))]
    pub fn restore(&self, id: &str, files: &[String], work_dir: &Path) -> RestoreReport {
        let dir = self.commit_dir(id);
        let mut report = RestoreReport {
            commit_id: id.to_string(),
            ..Default::default()
        };

        for tracked in files {
            let src = utils::snapshot_path(&dir, tracked);
            if !src.is_file() {
                warn!("{:?} not found in commit {}", tracked, id);
                report.missing.push(tracked.clone());
                continue;
            }

            match utils::copy_file(&src, &work_dir.join(tracked)) {
                Ok(_) => report.restored.push(tracked.clone()),
                Err(e) => {
                    warn!("Failed to restore {:?}: {}", tracked, e);
                    report.failed.push((tracked.clone(), e.to_string()));
                }
            }
        }

        info!(
            "Restored commit {} ({} restored, {} missing, {} failed)",
            id,
            report.restored.len(),
            report.missing.len(),
            report.failed.len()
        );
        report
    }

    /// Resolve a full id or a unique hex prefix to a stored commit id
    pub fn resolve(&self, id_or_prefix: &str) -> Result<Option<String>> {
        if !utils::is_hex_id(id_or_prefix) {
            return Ok(None);
        }
        if self.exists(id_or_prefix) {
            return Ok(Some(id_or_prefix.to_string()));
        }

        let mut matches = self
            .enumerate()?
            .into_iter()
            .filter(|id| id.starts_with(id_or_prefix));

        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(Some(id)),
            (Some(_), Some(_)) => {
                debug!("Prefix {} is ambiguous", id_or_prefix);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Location of the `commits/` directory
    pub fn location(&self) -> &Path {
        &self.root
    }
}
