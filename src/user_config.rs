//! Username store
//!
//! `config.txt` holds the raw username and nothing else. It is overwritten
//! wholesale on every change.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Persistent username used as commit author
#[derive(Debug, Clone)]
pub struct UserConfig {
    path: PathBuf,
}

impl UserConfig {
    /// Config backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Trimmed username, or `None` if none is set
    pub fn username(&self) -> Result<Option<String>> {
        let raw = fs::read_to_string(&self.path)?;
        let name = raw.trim();
        Ok(if name.is_empty() { None } else { Some(name.to_string()) })
    }

    /// Replace the username
    pub fn set_username(&self, name: &str) -> Result<()> {
        fs::write(&self.path, name)?;
        info!("Username set to {:?}", name);
        Ok(())
    }

    /// Location of the backing file
    pub fn location(&self) -> &Path {
        &self.path
    }
}
