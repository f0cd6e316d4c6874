//! Commit identity computation
//!
//! A fingerprint identifies the content of all tracked files at once. The bytes of
//! every tracked file are streamed, in index order, through a single SHA-256
//! context; the resulting digest is hashed once more and that second digest is the
//! fingerprint:
//!
//! ```text
//! fingerprint = SHA-256( SHA-256( bytes(f1) || bytes(f2) || ... ) )
//! ```
//!
//! Because file boundaries are not encoded, the fingerprint depends on the order of
//! the index, and two files holding `ab` and `c` hash the same as one file holding
//! `abc`.
//!
//! The same computation runs over two kinds of [`ContentSource`]: the working tree
//! and a stored commit snapshot. Comparing the two is how duplicate commits are
//! detected.

use crate::error::{Result, SvcsError};
use crate::types::Fingerprint;
use crate::utils;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{instrument, trace};

/// Where the bytes of a tracked file come from
pub trait ContentSource {
    /// Resolve a tracked path to the file holding its bytes
    fn locate(&self, tracked: &str) -> PathBuf;
}

/// Tracked files as they currently are in the working directory
#[derive(Debug, Clone, Copy)]
pub struct WorkingTree<'a> {
    root: &'a Path,
}

impl<'a> WorkingTree<'a> {
    /// Working tree rooted at `root`
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }
}

impl ContentSource for WorkingTree<'_> {
    fn locate(&self, tracked: &str) -> PathBuf {
        self.root.join(tracked)
    }
}

/// Tracked files as stored inside a commit directory
#[derive(Debug, Clone, Copy)]
pub struct CommitSnapshot<'a> {
    dir: &'a Path,
}

impl<'a> CommitSnapshot<'a> {
    /// Snapshot stored at `dir`
    pub fn new(dir: &'a Path) -> Self {
        Self { dir }
    }
}

impl ContentSource for CommitSnapshot<'_> {
    fn locate(&self, tracked: &str) -> PathBuf {
        utils::snapshot_path(self.dir, tracked)
    }
}

/// Streaming accumulator behind [`compute_fingerprint`]
#[derive(Debug, Default)]
pub struct FingerprintHasher {
    hasher: Sha256,
}

impl FingerprintHasher {
    /// Fresh accumulator
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Feed raw bytes
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Feed the whole content of a file through an 8KB buffer
    pub fn update_file(&mut self, path: &Path) -> io::Result<u64> {
        let mut file = File::open(path)?;
        let mut buffer = vec![0u8; 8192];
        let mut total = 0u64;

        loop {
            let bytes_read = file.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            self.update(&buffer[..bytes_read]);
            total += bytes_read as u64;
        }

        Ok(total)
    }

    /// Finish: hash the accumulated digest a second time
    pub fn finalize(self) -> Fingerprint {
        let first = self.hasher.finalize();
        let second = Sha256::digest(first);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&second);
        Fingerprint::from_bytes(bytes)
    }
}

/// Compute the fingerprint of `files`, read from `source` in the given order
///
/// # Errors
///
/// - [`SvcsError::UnreadableTrackedFile`] if any file cannot be opened or read;
///   no file is ever skipped
#[instrument(skip_all, fields(files = files.len()))]
pub fn compute_fingerprint<S, P>(files: &[P], source: &S) -> Result<Fingerprint>
where
    S: ContentSource + ?Sized,
    P: AsRef<str>,
{
    let mut hasher = FingerprintHasher::new();

    for tracked in files {
        let path = source.locate(tracked.as_ref());
        let size = hasher
            .update_file(&path)
            .map_err(|err| SvcsError::UnreadableTrackedFile {
                path: path.clone(),
                source: err,
            })?;
        trace!("Hashed {:?} ({} bytes)", path, size);
    }

    Ok(hasher.finalize())
}
