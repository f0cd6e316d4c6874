//! # svcs CLI
//!
//! ```bash
//! svcs config Alice        # set the username
//! svcs add notes.txt       # track a file
//! svcs commit "first"      # snapshot tracked files
//! svcs log                 # show history
//! svcs checkout <id>       # restore a snapshot
//! ```
//!
//! Storage lives in `./vcs` relative to the invocation directory. Set `SVCS_LOG`
//! (e.g. `SVCS_LOG=debug`) to see diagnostics on stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use std::ffi::OsString;
use std::io::{self, Write};
use svcs::{dispatch, Command, Repository, SvcsError};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// svcs - minimal local version control
#[derive(Parser)]
#[command(name = "svcs")]
#[command(disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Print the command summary
    #[arg(long)]
    help: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Get and set a username
    #[command(disable_help_flag = true)]
    Config {
        /// New username
        #[arg(allow_hyphen_values = true)]
        name: Option<String>,
        #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
        rest: Vec<String>,
    },

    /// Add a file to the index
    #[command(disable_help_flag = true)]
    Add {
        /// Path to track
        #[arg(allow_hyphen_values = true)]
        path: Option<String>,
        #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
        rest: Vec<String>,
    },

    /// Save changes
    #[command(disable_help_flag = true)]
    Commit {
        /// Commit message
        #[arg(allow_hyphen_values = true)]
        message: Option<String>,
        #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
        rest: Vec<String>,
    },

    /// Show commit logs
    #[command(disable_help_flag = true)]
    Log {
        #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
        rest: Vec<String>,
    },

    /// Restore a file
    #[command(disable_help_flag = true)]
    Checkout {
        /// Commit id or unique prefix
        #[arg(allow_hyphen_values = true)]
        id: Option<String>,
        #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
        rest: Vec<String>,
    },

    #[command(external_subcommand)]
    Other(Vec<OsString>),
}

/// Verbs with their own subcommand
const VERBS: [&str; 5] = ["config", "add", "commit", "log", "checkout"];

impl From<Cli> for Command {
    fn from(cli: Cli) -> Self {
        if cli.help {
            return Command::Help;
        }
        let (command, rest) = match cli.command {
            None => (Command::Help, Vec::new()),
            Some(Commands::Config { name, rest }) => (Command::Config { name }, rest),
            Some(Commands::Add { path, rest }) => (Command::Add { path }, rest),
            Some(Commands::Commit { message, rest }) => (Command::Commit { message }, rest),
            Some(Commands::Log { rest }) => (Command::Log, rest),
            Some(Commands::Checkout { id, rest }) => (Command::Checkout { id }, rest),
            Some(Commands::Other(args)) => {
                let verb = args
                    .first()
                    .map(|verb| verb.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (Command::Unknown(verb), Vec::new())
            }
        };
        if !rest.is_empty() {
            debug!("Ignoring surplus arguments {:?}", rest);
        }
        command
    }
}

/// Parse the command line, treating a leading token clap rejects as an unknown verb
fn parse_command(args: &[OsString]) -> Result<Command, clap::Error> {
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli.into()),
        Err(err) => {
            let first = args
                .get(1)
                .map(|arg| arg.to_string_lossy().into_owned())
                .unwrap_or_default();
            if first == "--help" {
                Ok(Command::Help)
            } else if VERBS.contains(&first.as_str()) {
                Err(err)
            } else {
                debug!("Treating {:?} as an unknown verb: {:?}", first, err.kind());
                Ok(Command::Unknown(first))
            }
        }
    }
}

fn main() {
    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SVCS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    // Disable colors if needed
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    let args: Vec<OsString> = std::env::args_os().collect();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(err) => {
            eprint!("{}", err.render());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(command) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        if let Some(err) = e.downcast_ref::<SvcsError>() {
            let hint = err.user_message();
            if hint != err.to_string() {
                eprintln!("{}", hint.dimmed());
            }
        }
        std::process::exit(1);
    }
}

/// Open the repository in the current directory and run one command
fn run(command: Command) -> anyhow::Result<()> {
    let repo = Repository::open(".").context("Failed to open the vcs storage directory")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch(&repo, command, &mut out)?;
    out.flush()?;
    Ok(())
}
