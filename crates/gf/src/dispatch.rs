//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands are split by whether they need a valid config file: `config`
//! and `completions` must keep working when the config is broken, so they
//! are dispatched before it is loaded.

use crate::cli::{ActiveCommands, Cli, Commands, ConfigCommands, Context, FiltersCommands, Shell};
use crate::commands::active::ActiveAction;
use crate::commands::apply::{ApplyOptions, FilterSource};
use crate::commands::filters::FiltersSaveOptions;
use crate::commands::{self, CommandContext, CommandError, Result};

/// A routed command, ready to run.
pub trait RunCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Commands that run without loading the config file.
pub enum StandaloneDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(Shell),
    Help,
}

impl<'a> StandaloneDispatch<'a> {
    /// Try to create a standalone dispatch from the CLI command.
    /// Returns None if the command needs the config.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(*shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl RunCommand for StandaloneDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(*shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("gf - build, store and apply geocache filters");
                    println!();
                    println!("Run 'gf --help' for usage information.");
                }
                Ok(())
            }
        }
    }
}

fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that use the config (store location, evaluation settings).
pub enum Dispatch<'a> {
    Check {
        config: &'a str,
        strict: bool,
    },
    Apply(ApplyOptions),
    Basic {
        config: &'a str,
        force: bool,
    },
    Kinds,
    Filters(&'a Option<FiltersCommands>),
    Active {
        context: Context,
        action: ActiveAction,
    },
}

impl<'a> Dispatch<'a> {
    /// Creates a dispatch from the CLI command.
    /// Returns None for standalone commands.
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        let dispatch = match cli.command.as_ref()? {
            Commands::Check { config, strict } => Self::Check {
                config,
                strict: *strict,
            },
            Commands::Apply {
                caches,
                filter,
                saved,
                active,
                outcome,
                parallel,
            } => {
                // clap's "source" group guarantees exactly one of these.
                let source = match (filter, saved, active) {
                    (Some(config), _, _) => FilterSource::Config(config.clone()),
                    (None, Some(name), _) => FilterSource::Saved(name.clone()),
                    (None, None, Some(context)) => FilterSource::Active((*context).into()),
                    (None, None, None) => return None,
                };
                Self::Apply(ApplyOptions {
                    source,
                    caches: caches.clone(),
                    outcome: *outcome,
                    parallel: *parallel,
                })
            }
            Commands::Basic { config, force } => Self::Basic {
                config,
                force: *force,
            },
            Commands::Kinds => Self::Kinds,
            Commands::Filters { command } => Self::Filters(command),
            Commands::Active { context, command } => Self::Active {
                context: *context,
                action: match command {
                    Some(ActiveCommands::Show) | None => ActiveAction::Show,
                    Some(ActiveCommands::Set { config }) => ActiveAction::Set(config.clone()),
                    Some(ActiveCommands::Use { name }) => ActiveAction::Use(name.clone()),
                    Some(ActiveCommands::Clear) => ActiveAction::Clear,
                },
            },
            Commands::Config { .. } | Commands::Completions { .. } => return None,
        };
        Some(dispatch)
    }
}

impl RunCommand for Dispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Check { config, strict } => commands::check::execute(ctx, config, *strict),
            Self::Apply(opts) => commands::apply::execute(ctx, opts),
            Self::Basic { config, force } => commands::basic::execute(ctx, config, *force),
            Self::Kinds => commands::kinds::execute(ctx),
            Self::Filters(command) => dispatch_filters(ctx, command),
            Self::Active { context, action } => {
                commands::active::execute(ctx, (*context).into(), action)
            }
        }
    }
}

fn dispatch_filters(ctx: &CommandContext, command: &Option<FiltersCommands>) -> Result<()> {
    match command {
        Some(FiltersCommands::List) | None => commands::filters::execute(ctx),
        Some(FiltersCommands::Show { name }) => commands::filters::execute_show(ctx, name),
        Some(FiltersCommands::Save {
            name,
            config,
            force,
        }) => {
            let opts = FiltersSaveOptions {
                name: name.clone(),
                config: config.clone(),
                force: *force,
            };
            commands::filters::execute_save(ctx, &opts)
        }
        Some(FiltersCommands::Delete { name }) => commands::filters::execute_delete(ctx, name),
    }
}
