use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::{load_config, Config};
use commands::{CommandContext, CommandError};
use dispatch::{Dispatch, RunCommand, StandaloneDispatch};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", error_json(&e));
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Logs go to stderr so stdout stays clean for tables and JSON.
/// `GF_LOG` takes an `EnvFilter` directive; `--verbose` raises the default.
fn init_logging(cli: &Cli) {
    let default = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("GF_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    // config and completions must work even when the config file is broken
    if let Some(dispatch) = StandaloneDispatch::try_from_cli(cli) {
        let config = load_config().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable config file");
            Config::default()
        });
        let ctx = CommandContext::from_cli(cli, &config);
        return dispatch.execute(&ctx);
    }

    let config = load_config()?;
    let ctx = CommandContext::from_cli(cli, &config);

    match Dispatch::from_cli(cli) {
        Some(dispatch) => dispatch.execute(&ctx),
        None => Err(CommandError::Config(format!(
            "unhandled command: {:?}",
            cli.command
        ))),
    }
}

/// Builds the JSON error document printed in `--json` mode.
fn error_json(e: &CommandError) -> String {
    let error_json = serde_json::json!({
        "error": {
            "code": error_code(e),
            "message": e.to_string(),
        }
    });
    serde_json::to_string_pretty(&error_json).unwrap_or_else(|_| error_json.to_string())
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Store(geofilter::StoreError::NotFound { .. }) => "NOT_FOUND",
        CommandError::Store(_) => "STORE_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Cancelled(_) => "CANCELLED",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Filter(_) => ExitCode::from(1),
        CommandError::Json(_) => ExitCode::from(1),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Store(geofilter::StoreError::NotFound { .. }) => ExitCode::from(4),
        CommandError::Store(_) => ExitCode::from(5),
        CommandError::Config(_) => ExitCode::from(5),
        CommandError::Cancelled(_) => ExitCode::from(6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geofilter::{FilterError, StoreError};

    fn not_found() -> CommandError {
        CommandError::Store(StoreError::NotFound {
            name: "mine".to_string(),
            suggestion: Some("Mine".to_string()),
        })
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(error_code(&not_found()), "NOT_FOUND");
        assert_eq!(error_code(&CommandError::Store(StoreError::BlankName)), "STORE_ERROR");
        assert_eq!(
            error_code(&CommandError::Filter(FilterError::invalid_parameter("x"))),
            "FILTER_ERROR"
        );
        assert_eq!(error_code(&CommandError::Cancelled("no".to_string())), "CANCELLED");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(error_exit_code(&not_found()), ExitCode::from(4));
        assert_eq!(
            error_exit_code(&CommandError::Store(StoreError::BlankName)),
            ExitCode::from(5)
        );
        assert_eq!(
            error_exit_code(&CommandError::Config("bad".to_string())),
            ExitCode::from(5)
        );
        assert_eq!(
            error_exit_code(&CommandError::Cancelled("no".to_string())),
            ExitCode::from(6)
        );
        assert_eq!(
            error_exit_code(&CommandError::Io(std::io::Error::other("disk"))),
            ExitCode::from(3)
        );
    }

    #[test]
    fn test_error_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&error_json(&not_found())).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(
            json["error"]["message"],
            "store error: filter 'mine' not found. Did you mean 'Mine'?"
        );
    }
}
