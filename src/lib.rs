//! # svcs - a minimal local version control tool
//!
//! svcs tracks an explicit list of files, snapshots their content into commit
//! directories named by a content fingerprint, and restores those snapshots on
//! demand.
//!
//! ## Overview
//!
//! - `add` registers a path in the index
//! - `commit` fingerprints every tracked file; if no stored commit matches, the
//!   files are copied into `vcs/commits/<fingerprint>/` and a history record is
//!   appended
//! - `log` prints the history records, oldest first
//! - `checkout` copies the tracked files back out of a commit
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use svcs::{CheckoutOutcome, CommitOutcome, Repository};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Repository::open(".")?;
//! repo.set_username("Alice")?;
//! repo.add("notes.txt")?;
//!
//! let CommitOutcome::Committed(id) = repo.commit("first draft")? else {
//!     return Ok(());
//! };
//!
//! // ...edit notes.txt...
//!
//! if let CheckoutOutcome::Switched(report) = repo.checkout(&id.to_hex())? {
//!     println!("restored {} files", report.restored.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Concepts
//!
//! ### Fingerprints
//!
//! A commit is named by `SHA-256(SHA-256(all tracked bytes in index order))`,
//! hex-encoded. Identical content in the same index order always produces the same
//! name; reordering the index produces a different one. See [`fingerprint`].
//!
//! ### Duplicate commits
//!
//! A commit is skipped when its content matches any stored commit, not only the
//! latest one. See [`storage::CommitStore::find_duplicate`].
//!
//! ### Errors
//!
//! Operations return `Result<T, SvcsError>` for storage failures only. Everything a
//! user can fix by running another command comes back as an outcome value whose
//! `Display` is the message to show.
//!
//! ## Module Organization
//!
//! - [`repository`]: the [`Repository`] facade and its builder
//! - [`command`]: parsed commands and their dispatch
//! - [`fingerprint`]: commit identity computation
//! - [`storage`]: commit snapshot directories
//! - [`index`], [`user_config`], [`history`]: the text-file stores
//! - [`lock`]: advisory lock around commit and checkout
//! - [`types`], [`error`]: shared types

// Public API modules
pub mod command;
pub mod error;
pub mod fingerprint;
pub mod history;
pub mod index;
pub mod lock;
pub mod repository;
pub mod storage;
pub mod types;
pub mod user_config;

// Internal modules
mod utils;

// Re-export main types for convenience
pub use command::{dispatch, Command, HELP_MESSAGE};
pub use error::{Result, SvcsError};
pub use fingerprint::{compute_fingerprint, CommitSnapshot, ContentSource, WorkingTree};
pub use history::{HistoryLog, LogEntry};
pub use index::IndexStore;
pub use repository::{Repository, RepositoryBuilder};
pub use storage::CommitStore;
pub use types::*;
pub use user_config::UserConfig;
