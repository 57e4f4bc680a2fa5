//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the gf CLI.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use geofilter::ContextKind;

/// gf - build, store and apply geocache filters
#[derive(Parser, Debug)]
#[command(name = "gf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Filter store file (default: from config, then the XDG data dir)
    #[arg(long, global = true, env = "GF_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a filter config and describe it
    #[command(alias = "c")]
    Check {
        /// Filter config, optionally prefixed with `[name]`
        config: String,

        /// Fail if the config contains unknown filter kinds
        #[arg(long)]
        strict: bool,
    },

    /// Apply a filter to geocaches read from a JSON file
    #[command(alias = "a")]
    #[command(group(ArgGroup::new("source").required(true).args(["filter", "saved", "active"])))]
    Apply {
        /// JSON array of geocaches ("-" for stdin)
        caches: PathBuf,

        /// Filter config to apply
        #[arg(short, long)]
        filter: Option<String>,

        /// Name of a stored filter to apply
        #[arg(short, long)]
        saved: Option<String>,

        /// Apply the active filter of a context
        #[arg(long, value_enum)]
        active: Option<Context>,

        /// List every cache with its outcome instead of only the matches
        #[arg(long)]
        outcome: bool,

        /// Evaluate in parallel (true) or sequentially (false), overriding config
        #[arg(long)]
        parallel: Option<bool>,
    },

    /// Convert a filter to basic mode
    #[command(alias = "b")]
    Basic {
        /// Filter config, optionally prefixed with `[name]`
        config: String,

        /// Convert without asking when something would be lost
        #[arg(short, long)]
        force: bool,
    },

    /// List filter kinds
    #[command(alias = "k")]
    Kinds,

    /// Manage stored filters
    #[command(alias = "f")]
    Filters {
        #[command(subcommand)]
        command: Option<FiltersCommands>,
    },

    /// Manage active filters
    Active {
        /// Context the active filter applies to
        #[arg(long, value_enum, default_value = "live")]
        context: Context,

        #[command(subcommand)]
        command: Option<ActiveCommands>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Stored filter subcommands
#[derive(Subcommand, Debug)]
pub enum FiltersCommands {
    /// List stored filters
    #[command(alias = "ls")]
    List,

    /// Show a stored filter
    Show {
        /// Filter name
        name: String,
    },

    /// Store a filter under a name
    Save {
        /// Filter name
        name: String,

        /// Filter config
        config: String,

        /// Overwrite a different filter with the same name without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Delete a stored filter
    #[command(alias = "rm")]
    Delete {
        /// Filter name
        name: String,
    },
}

/// Active filter subcommands
#[derive(Subcommand, Debug)]
pub enum ActiveCommands {
    /// Show the active filter
    Show,

    /// Make a filter config active
    Set {
        /// Filter config, optionally prefixed with `[name]`
        config: String,
    },

    /// Make a stored filter active
    Use {
        /// Filter name
        name: String,
    },

    /// Clear the active filter
    Clear,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. "output.color")
        key: String,

        /// Configuration value
        value: String,
    },

    /// Show config file path
    Path,
}

/// Filter contexts
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Context {
    Live,
    Offline,
    Transient,
}

impl From<Context> for ContextKind {
    fn from(context: Context) -> Self {
        match context {
            Context::Live => ContextKind::Live,
            Context::Offline => ContextKind::Offline,
            Context::Transient => ContextKind::Transient,
        }
    }
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
