//! Append-only commit history
//!
//! `log.txt` holds one text record per commit, each followed by a blank line:
//!
//! ```text
//! commit <id>
//! Author: <username>
//! <message>
//!
//! ```
//!
//! Reading splits the whole file on blank-line separators and hands the blocks
//! back in file order, oldest first. The log is never consulted to decide whether
//! a commit is a duplicate.

use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Separator between log records
const RECORD_SEPARATOR: &str = "\n\n";

/// One history record before it is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Commit id (hex fingerprint)
    pub commit_id: String,
    /// Username at commit time
    pub author: String,
    /// Commit message
    pub message: String,
}

impl LogEntry {
    /// Build an entry, flattening the author and the message to one line each
    pub fn new(commit_id: impl Into<String>, author: &str, message: &str) -> Self {
        Self {
            commit_id: commit_id.into(),
            author: single_line(author.trim()),
            message: single_line(message),
        }
    }

    /// Text of the record, including its trailing separator
    pub fn render(&self) -> String {
        format!(
            "commit {}\nAuthor: {}\n{}{}",
            self.commit_id, self.author, self.message, RECORD_SEPARATOR
        )
    }
}

/// Append-only log backed by `log.txt`
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    /// Log backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one record
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        file.write_all(entry.render().as_bytes())?;
        debug!("Logged commit {}", entry.commit_id);
        Ok(())
    }

    /// Raw records in file order, oldest first
    pub fn entries(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(content
            .split(RECORD_SEPARATOR)
            .filter(|block| !block.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Location of the backing file
    pub fn location(&self) -> &Path {
        &self.path
    }
}

/// Replace line breaks so a field cannot introduce a record separator
fn single_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, HistoryLog) {
        let temp = TempDir::new().unwrap();
        let log = HistoryLog::new(temp.path().join("log.txt"));
        fs::write(log.location(), "").unwrap();
        (temp, log)
    }

    #[test]
    fn test_render_format() {
        let entry = LogEntry::new("abc", "  Alice\n", "first");
        assert_eq!(entry.render(), "commit abc\nAuthor: Alice\nfirst\n\n");
    }

    #[test]
    fn test_entries_in_file_order() {
        let (_temp, log) = setup();
        assert!(log.entries().unwrap().is_empty());

        log.append(&LogEntry::new("111", "Alice", "first")).unwrap();
        log.append(&LogEntry::new("222", "Bob", "second")).unwrap();

        let entries = log.entries().unwrap();
        assert_eq!(
            entries,
            vec![
                "commit 111\nAuthor: Alice\nfirst".to_string(),
                "commit 222\nAuthor: Bob\nsecond".to_string(),
            ]
        );
    }

    #[test]
    fn test_multiline_message_is_flattened() {
        let (_temp, log) = setup();
        log.append(&LogEntry::new("111", "Alice", "subject\n\nbody text\n")).unwrap();

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with("subject body text"));
    }

    #[test]
    fn test_multiline_author_is_flattened() {
        let (_temp, log) = setup();
        log.append(&LogEntry::new("111", "A\n\nB", "first")).unwrap();
        log.append(&LogEntry::new("222", "Bob", "second")).unwrap();

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], "commit 111\nAuthor: A B\nfirst");
    }
}
