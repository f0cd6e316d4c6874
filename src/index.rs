//! Tracked-file index
//!
//! The index is the ordered list of paths registered with `add`, persisted as
//! newline-joined text in `index.txt`. Order is insertion order and matters: it is
//! the order in which file bytes feed the fingerprint.
//!
//! Paths are compared as plain strings. `a.txt` and `./a.txt` are two different
//! entries.

use crate::error::Result;
use crate::types::AddOutcome;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Persistent, append-only list of tracked paths
#[derive(Debug, Clone)]
pub struct IndexStore {
    /// Location of `index.txt`
    path: PathBuf,
    /// Directory that tracked paths are relative to
    work_dir: PathBuf,
}

impl IndexStore {
    /// Index backed by `path`, resolving tracked paths against `work_dir`
    pub fn new(path: PathBuf, work_dir: PathBuf) -> Self {
        Self { path, work_dir }
    }

    /// Tracked paths in index order, or `None` if nothing is tracked yet
    pub fn list(&self) -> Result<Option<Vec<String>>> {
        let paths = self.paths()?;
        Ok(if paths.is_empty() { None } else { Some(paths) })
    }

    /// Tracked paths in index order (empty if nothing is tracked)
    pub fn paths(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(parse_index(&content))
    }

    /// Whether `tracked` is already in the index (exact string match)
    pub fn contains(&self, tracked: &str) -> Result<bool> {
        Ok(self.paths()?.iter().any(|p| p == tracked))
    }

    /// Start tracking `tracked`
    ///
    /// The path must exist relative to the working directory and must not be in
    /// the index yet. Either condition is reported through [`AddOutcome`] rather
    /// than as an error.
    pub fn add(&self, tracked: &str) -> Result<AddOutcome> {
        // A blank path would resolve to the working directory itself
        if tracked.trim().is_empty() || !self.work_dir.join(tracked).exists() {
            debug!("Refusing to track missing path {:?}", tracked);
            return Ok(AddOutcome::NotFound(tracked.to_string()));
        }

        let mut paths = self.paths()?;
        if paths.iter().any(|p| p == tracked) {
            return Ok(AddOutcome::AlreadyTracked(tracked.to_string()));
        }

        paths.push(tracked.to_string());
        fs::write(&self.path, paths.join("\n"))?;
        info!("Tracking {:?} ({} files in index)", tracked, paths.len());

        Ok(AddOutcome::Tracked(tracked.to_string()))
    }

    /// Location of the backing file
    pub fn location(&self) -> &Path {
        &self.path
    }
}

/// Split index text into paths, skipping blank lines
fn parse_index(content: &str) -> Vec<String> {
    content
        .trim()
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
