//! Repository: the stores wired together
//!
//! A [`Repository`] owns the storage directory under a working directory and runs
//! every user-facing operation against it:
//!
//! ```text
//! <work_dir>/vcs/
//! ├── config.txt      # username
//! ├── index.txt       # tracked paths, one per line
//! ├── log.txt         # commit records separated by blank lines
//! └── commits/
//!     └── <fingerprint>/
//! ```
//!
//! Opening a repository creates any missing piece of that layout and leaves
//! existing files alone, so it is safe to open on every invocation.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use svcs::{CommitOutcome, Repository};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Repository::open(".")?;
//! repo.set_username("Alice")?;
//! repo.add("notes.txt")?;
//!
//! if let CommitOutcome::Committed(id) = repo.commit("first")? {
//!     println!("committed {}", id);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SvcsError};
use crate::fingerprint::{compute_fingerprint, WorkingTree};
use crate::history::{HistoryLog, LogEntry};
use crate::index::IndexStore;
use crate::lock::StorageLock;
use crate::storage::CommitStore;
use crate::types::*;
use crate::user_config::UserConfig;
use crate::utils;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Version-controlled working directory
#[derive(Debug)]
pub struct Repository {
    /// Directory tracked paths are relative to
    work_dir: PathBuf,
    /// `<work_dir>/<storage_dir>`
    storage_root: PathBuf,
    /// Configuration
    config: RepositoryConfig,
    /// Tracked paths
    index: IndexStore,
    /// Username
    user: UserConfig,
    /// Commit snapshots
    commits: CommitStore,
    /// Commit history
    history: HistoryLog,
}

impl Repository {
    /// Open (bootstrapping if needed) the repository in `work_dir` with defaults
    pub fn open(work_dir: impl Into<PathBuf>) -> Result<Self> {
        RepositoryBuilder::new().build(work_dir)
    }

    fn with_config(work_dir: PathBuf, config: RepositoryConfig) -> Result<Self> {
        let storage_root = work_dir.join(&config.storage_dir);
        let commits_dir = storage_root.join("commits");
        let config_path = storage_root.join("config.txt");
        let index_path = storage_root.join("index.txt");
        let log_path = storage_root.join("log.txt");

        utils::ensure_dir(&storage_root)?;
        utils::ensure_dir(&commits_dir)?;
        utils::ensure_file(&config_path)?;
        utils::ensure_file(&index_path)?;
        utils::ensure_file(&log_path)?;
        debug!("Storage ready at {:?}", storage_root);

        Ok(Self {
            index: IndexStore::new(index_path, work_dir.clone()),
            user: UserConfig::new(config_path),
            commits: CommitStore::new(commits_dir),
            history: HistoryLog::new(log_path),
            work_dir,
            storage_root,
            config,
        })
    }

    /// Configured username, if any
    pub fn username(&self) -> Result<Option<String>> {
        self.user.username()
    }

    /// Replace the username
    pub fn set_username(&self, name: &str) -> Result<()> {
        self.user.set_username(name)
    }

    /// Tracked paths in index order, or `None` if nothing is tracked
    pub fn tracked_files(&self) -> Result<Option<Vec<String>>> {
        self.index.list()
    }

    /// Start tracking `path`
    pub fn add(&self, path: &str) -> Result<AddOutcome> {
        self.index.add(path)
    }

    /// Fingerprint of the tracked files as they are now, or `None` if nothing is tracked
    pub fn fingerprint(&self) -> Result<Option<Fingerprint>> {
        match self.index.list()? {
            Some(files) => Ok(Some(compute_fingerprint(&files, &self.working_tree())?)),
            None => Ok(None),
        }
    }

    /// Snapshot the tracked files if they differ from every stored commit
    ///
    /// # Errors
    ///
    /// Any tracked file that cannot be read, or a snapshot that cannot be written,
    /// is an error. A failed snapshot leaves its partial directory in place.
    #[instrument(skip(self, message))]
    pub fn commit(&self, message: &str) -> Result<CommitOutcome> {
        let Some(author) = self.user.username()? else {
            return Ok(CommitOutcome::MissingUsername);
        };
        let Some(files) = self.index.list()? else {
            return Ok(CommitOutcome::EmptyIndex);
        };

        let _lock = self.lock()?;

        let fingerprint = compute_fingerprint(&files, &self.working_tree())?;
        if let Some(existing) = self.commits.find_duplicate(&fingerprint, &files)? {
            info!("Nothing to commit, matches {}", existing);
            return Ok(CommitOutcome::NothingToCommit);
        }

        self.commits.create(&fingerprint, &files, &self.work_dir)?;
        self.history
            .append(&LogEntry::new(fingerprint.to_hex(), &author, message))?;

        info!("Committed {} by {}", fingerprint, author);
        Ok(CommitOutcome::Committed(fingerprint))
    }

    /// Raw history records, oldest first
    pub fn history(&self) -> Result<Vec<String>> {
        self.history.entries()
    }

    /// Restore the tracked files from commit `id` (full id or unique prefix)
    #[instrument(skip(self))]
    pub fn checkout(&self, id: &str) -> Result<CheckoutOutcome> {
        let Some(commit_id) = self.commits.resolve(id)? else {
            return Ok(CheckoutOutcome::UnknownCommit);
        };
        let Some(files) = self.index.list()? else {
            return Ok(CheckoutOutcome::EmptyIndex);
        };

        let _lock = self.lock()?;
        let report = self.commits.restore(&commit_id, &files, &self.work_dir);
        Ok(CheckoutOutcome::Switched(report))
    }

    /// Directory tracked paths are relative to
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Storage directory (`<work_dir>/vcs` by default)
    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Active configuration
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Commit snapshot store
    pub fn commits(&self) -> &CommitStore {
        &self.commits
    }

    fn working_tree(&self) -> WorkingTree<'_> {
        WorkingTree::new(&self.work_dir)
    }

    fn lock(&self) -> Result<Option<StorageLock>> {
        if !self.config.locking {
            return Ok(None);
        }
        StorageLock::acquire(&self.storage_root.join("lock"), self.config.lock_stale_after).map(Some)
    }
}

/// Builder for [`Repository`]
///
/// # Default Values
///
/// - `storage_dir`: `vcs`
/// - `locking`: enabled
/// - `lock_stale_after`: 10 minutes
///
/// # Examples
///
/// ```rust,no_run
/// use svcs::RepositoryBuilder;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = RepositoryBuilder::new()
///     .storage_dir(".svcs")
///     .lock_stale_after(Duration::from_secs(30))
///     .build("./project")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RepositoryBuilder {
    config: RepositoryConfig,
}

impl RepositoryBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the storage directory inside the working directory
    pub fn storage_dir(mut self, name: impl Into<String>) -> Self {
        self.config.storage_dir = name.into();
        self
    }

    /// Enable or disable the advisory lock around commit and checkout
    pub fn locking(mut self, enabled: bool) -> Self {
        self.config.locking = enabled;
        self
    }

    /// Age after which a lock whose holder cannot be checked is taken over
    pub fn lock_stale_after(mut self, after: Duration) -> Self {
        self.config.lock_stale_after = after;
        self
    }

    /// Open the repository in `work_dir`
    ///
    /// # Errors
    ///
    /// - [`SvcsError::InvalidConfiguration`] if the storage directory name is not a
    ///   single plain path component
    /// - [`SvcsError::Io`] if the storage layout cannot be created
    pub fn build(self, work_dir: impl Into<PathBuf>) -> Result<Repository> {
        validate_storage_dir(&self.config.storage_dir)?;
        Repository::with_config(work_dir.into(), self.config)
    }
}

fn validate_storage_dir(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(SvcsError::invalid_configuration(format!(
            "storage directory must be a single directory name, got {:?}",
            name
        ))),
    }
}
