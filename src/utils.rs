//! Utility functions for svcs
//!
//! ### File Operations
//! - Idempotent creation of storage directories and files
//! - Byte-for-byte copies that create missing parent directories
//!
//! ### Path Manipulation
//! - Mapping a tracked path to its location inside a commit snapshot
//!
//! ### Identifiers
//! - Validating user-supplied commit ids and prefixes

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::trace;

/// Create a directory (and parents) if it does not exist yet
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.is_dir() {
        trace!("Creating directory {:?}", path);
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Create an empty file if it does not exist yet
///
/// Existing files are left untouched, whatever their content.
pub fn ensure_file(path: &Path) -> io::Result<()> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            trace!("Created empty file {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e),
    }
}

/// Copy `src` to `dst`, truncating `dst` and creating its parent directories
///
/// Returns the number of bytes copied.
pub fn copy_file(src: &Path, dst: &Path) -> io::Result<u64> {
    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut reader = File::open(src)?;
    let mut writer = File::create(dst)?;
    io::copy(&mut reader, &mut writer)
}

/// Location of a tracked path inside a snapshot directory
///
/// Only normal components are kept, so `/etc/x`, `./x` and `../x` all land
/// inside `snapshot_root`.
pub fn snapshot_path(snapshot_root: &Path, tracked: &str) -> PathBuf {
    let mut path = snapshot_root.to_path_buf();
    for component in Path::new(tracked).components() {
        if let Component::Normal(part) = component {
            path.push(part);
        }
    }
    path
}

/// True when `s` is a non-empty string of lowercase hex digits
pub fn is_hex_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
