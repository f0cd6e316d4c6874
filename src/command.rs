//! Command dispatch
//!
//! The command line is parsed once into a [`Command`] and handed by value to
//! [`dispatch`], which runs it against a [`Repository`] and writes the user-facing
//! text to any writer. Handlers never look at the raw argument list.

use crate::error::Result;
use crate::repository::Repository;
use crate::types::CommitOutcome;
use std::io::Write;
use tracing::debug;

/// Summary printed for no arguments and `--help`
pub const HELP_MESSAGE: &str = "These are SVCS commands:
config     Get and set a username.
add        Add a file to the index.
log        Show commit logs.
commit     Save changes.
checkout   Restore a file.";

/// Printed before every history record
pub const LOG_DIVIDER: &str = "-----";

/// A parsed invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the command summary
    Help,
    /// Show or set the username
    Config {
        /// New username
        name: Option<String>,
    },
    /// List tracked files or track a new one
    Add {
        /// Path to track
        path: Option<String>,
    },
    /// Snapshot the tracked files
    Commit {
        /// Commit message
        message: Option<String>,
    },
    /// Print the commit history
    Log,
    /// Restore the tracked files from a commit
    Checkout {
        /// Commit id or unique prefix
        id: Option<String>,
    },
    /// Anything else
    Unknown(String),
}

/// Run `command` against `repo`, writing its output to `out`
///
/// User-input problems are printed and return `Ok`. Only storage failures
/// return `Err`.
pub fn dispatch<W: Write>(repo: &Repository, command: Command, out: &mut W) -> Result<()> {
    debug!("Dispatching {:?}", command);

    match command {
        Command::Help => writeln!(out, "{}", HELP_MESSAGE)?,

        Command::Config { name: None } => match repo.username()? {
            Some(name) => writeln!(out, "The username is {}.", name)?,
            None => writeln!(out, "{}", CommitOutcome::MissingUsername)?,
        },
        Command::Config { name: Some(name) } => {
            repo.set_username(&name)?;
            writeln!(out, "The username is {}.", name)?;
        }

        Command::Add { path: None } => match repo.tracked_files()? {
            Some(files) => {
                writeln!(out, "Tracked files:")?;
                for file in files {
                    writeln!(out, "{}", file)?;
                }
            }
            None => writeln!(out, "Add a file to the index.")?,
        },
        Command::Add { path: Some(path) } => writeln!(out, "{}", repo.add(&path)?)?,

        Command::Commit { message: None } => writeln!(out, "Message was not passed.")?,
        Command::Commit { message: Some(message) } => {
            writeln!(out, "{}", repo.commit(&message)?)?
        }

        Command::Log => {
            let entries = repo.history()?;
            if entries.is_empty() {
                writeln!(out, "No commits yet.")?;
            }
            for entry in entries {
                writeln!(out, "{}", LOG_DIVIDER)?;
                writeln!(out, "{}", entry)?;
            }
        }

        Command::Checkout { id: None } => writeln!(out, "Commit id was not passed.")?,
        Command::Checkout { id: Some(id) } => writeln!(out, "{}", repo.checkout(&id)?)?,

        Command::Unknown(verb) => writeln!(out, "'{}' is not a SVCS command.", verb)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run(repo: &Repository, command: Command) -> String {
        let mut out = Vec::new();
        dispatch(repo, command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_help_and_unknown() {
        let work = TempDir::new().unwrap();
        let repo = Repository::open(work.path()).unwrap();

        assert_eq!(run(&repo, Command::Help), format!("{}\n", HELP_MESSAGE));
        assert_eq!(
            run(&repo, Command::Unknown("push".into())),
            "'push' is not a SVCS command.\n"
        );
    }

    #[test]
    fn test_config_flow() {
        let work = TempDir::new().unwrap();
        let repo = Repository::open(work.path()).unwrap();

        assert_eq!(
            run(&repo, Command::Config { name: None }),
            "Please, tell me who you are.\n"
        );
        assert_eq!(
            run(&repo, Command::Config { name: Some("Alice".into()) }),
            "The username is Alice.\n"
        );
        assert_eq!(run(&repo, Command::Config { name: None }), "The username is Alice.\n");
    }

    #[test]
    fn test_add_flow() {
        let work = TempDir::new().unwrap();
        let repo = Repository::open(work.path()).unwrap();
        fs::write(work.path().join("a.txt"), "a").unwrap();
        fs::write(work.path().join("b.txt"), "b").unwrap();

        assert_eq!(run(&repo, Command::Add { path: None }), "Add a file to the index.\n");
        assert_eq!(
            run(&repo, Command::Add { path: Some("a.txt".into()) }),
            "The file 'a.txt' is tracked.\n"
        );
        assert_eq!(
            run(&repo, Command::Add { path: Some("a.txt".into()) }),
            "The file 'a.txt' is already tracked.\n"
        );
        assert_eq!(
            run(&repo, Command::Add { path: Some("missing.txt".into()) }),
            "Can't find 'missing.txt'.\n"
        );
        run(&repo, Command::Add { path: Some("b.txt".into()) });
        assert_eq!(
            run(&repo, Command::Add { path: None }),
            "Tracked files:\na.txt\nb.txt\n"
        );
    }

    #[test]
    fn test_commit_log_checkout_flow() {
        let work = TempDir::new().unwrap();
        let repo = Repository::open(work.path()).unwrap();
        fs::write(work.path().join("a.txt"), "v1").unwrap();

        assert_eq!(run(&repo, Command::Commit { message: None }), "Message was not passed.\n");
        assert_eq!(run(&repo, Command::Log), "No commits yet.\n");

        run(&repo, Command::Config { name: Some("Alice".into()) });
        assert_eq!(
            run(&repo, Command::Commit { message: Some("first".into()) }),
            "No files added to the index.\n"
        );

        run(&repo, Command::Add { path: Some("a.txt".into()) });
        assert_eq!(
            run(&repo, Command::Commit { message: Some("first".into()) }),
            "Changes are committed.\n"
        );
        assert_eq!(
            run(&repo, Command::Commit { message: Some("again".into()) }),
            "Nothing to commit.\n"
        );

        let id = repo.fingerprint().unwrap().unwrap().to_hex();
        assert_eq!(
            run(&repo, Command::Log),
            format!("-----\ncommit {}\nAuthor: Alice\nfirst\n", id)
        );

        fs::write(work.path().join("a.txt"), "v2").unwrap();
        assert_eq!(run(&repo, Command::Checkout { id: None }), "Commit id was not passed.\n");
        assert_eq!(
            run(&repo, Command::Checkout { id: Some("not-a-commit".into()) }),
            "Commit does not exist.\n"
        );
        assert_eq!(
            run(&repo, Command::Checkout { id: Some(id.clone()) }),
            format!("Switched to commit {}.\n", id)
        );
        assert_eq!(fs::read_to_string(work.path().join("a.txt")).unwrap(), "v1");
    }
}
