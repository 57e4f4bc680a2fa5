//! Command implementations for the gf CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod active;
pub mod apply;
pub mod basic;
pub mod check;
pub mod completions;
pub mod config;
pub mod filters;
pub mod kinds;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use dialoguer::Confirm;
use geofilter::{FilterStore, JsonFileMedium, NamedFilter};
use tracing::debug;

use crate::cli::Cli;
use config::{Config, EvaluateConfig};

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter parsing or validation error.
    #[error("filter error: {0}")]
    Filter(#[from] geofilter::FilterError),

    /// Filter store error.
    #[error("store error: {0}")]
    Store(#[from] geofilter::StoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The user declined, or could not be asked, to confirm.
    #[error("{0}")]
    Cancelled(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Store file override; `None` means the XDG default.
    pub store_path: Option<PathBuf>,
    /// Evaluation settings.
    pub evaluate: EvaluateConfig,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    ///
    /// Flags win over the config file; `NO_COLOR` disables colors as well.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        let color_allowed = config.output.color.unwrap_or(true) && std::env::var_os("NO_COLOR").is_none();
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && color_allowed,
            quiet: cli.quiet,
            verbose: cli.verbose,
            store_path: cli.store.clone().or_else(|| config.store.path.clone()),
            evaluate: config.evaluate.clone(),
        }
    }

    /// Opens the filter store this invocation works on.
    pub fn open_store(&self) -> Result<FilterStore<JsonFileMedium>> {
        let medium = match &self.store_path {
            Some(path) => JsonFileMedium::with_path(path.clone()),
            None => JsonFileMedium::new()?,
        };
        debug!(path = %medium.path().display(), "opening filter store");

        let store = FilterStore::open(medium)?;
        if !self.quiet && !self.json_output {
            for entry in store.invalid_entries() {
                eprintln!("Warning: stored filter '{}' is unreadable: {}", entry.name, entry.error);
            }
        }
        Ok(store)
    }
}

/// Parses a filter given on the command line, warning about skipped kinds.
pub fn parse_filter_arg(ctx: &CommandContext, config: &str) -> Result<NamedFilter> {
    let (filter, skipped) = NamedFilter::parse(config)?;
    if !skipped.is_empty() && !ctx.quiet {
        eprintln!("Warning: ignored unknown filter kinds: {}", skipped.join(", "));
    }
    Ok(filter)
}

/// Result of a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    /// Go ahead.
    Confirmed,
    /// The user said no.
    Aborted,
}

/// Asks the user to confirm `prompt`, unless `force` is set.
///
/// Without a terminal there is nobody to ask, so the operation is refused
/// with a hint to pass `--force`.
pub fn confirm(ctx: &CommandContext, prompt: &str, force: bool) -> Result<ConfirmResult> {
    if force {
        return Ok(ConfirmResult::Confirmed);
    }

    if ctx.json_output || !io::stdin().is_terminal() {
        return Err(CommandError::Cancelled(format!(
            "{prompt} Use --force to confirm."
        )));
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CommandError::Io(io::Error::other(e)))?;

    Ok(if confirmed {
        ConfirmResult::Confirmed
    } else {
        ConfirmResult::Aborted
    })
}
