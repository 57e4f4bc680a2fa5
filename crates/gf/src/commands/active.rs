//! Active command implementation.
//!
//! Shows and changes the filter that is active in a context.

use geofilter::ContextKind;

use super::{parse_filter_arg, CommandContext, Result};
use crate::output::{format_active_filter_json, format_active_filter_table};

/// What to do with the active filter.
#[derive(Debug)]
pub enum ActiveAction {
    /// Print it.
    Show,
    /// Replace it with a config.
    Set(String),
    /// Replace it with a stored filter.
    Use(String),
    /// Remove it.
    Clear,
}

/// Executes the active command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or written, the config
/// does not parse, or a named filter does not exist.
pub fn execute(ctx: &CommandContext, context: ContextKind, action: &ActiveAction) -> Result<()> {
    let mut store = ctx.open_store()?;

    match action {
        ActiveAction::Show => {
            let filter = store.active(context)?;
            if ctx.json_output {
                println!("{}", format_active_filter_json(context, filter.as_ref())?);
            } else if !ctx.quiet {
                print!("{}", format_active_filter_table(context, filter.as_ref(), ctx.use_colors));
            }
        }
        ActiveAction::Set(config) => {
            let filter = parse_filter_arg(ctx, config)?;
            store.set_active(context, &filter)?;
            report_set(ctx, context, &filter)?;
        }
        ActiveAction::Use(name) => {
            let filter = store.require(name)?;
            store.set_active(context, &filter)?;
            report_set(ctx, context, &filter)?;
        }
        ActiveAction::Clear => {
            let cleared = store.clear_active(context)?;
            if ctx.json_output {
                let output = serde_json::json!({
                    "context": context.tag(),
                    "status": if cleared { "cleared" } else { "unchanged" },
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if !ctx.quiet {
                if cleared {
                    println!("Cleared the {context} filter.");
                } else {
                    println!("No {context} filter was active.");
                }
            }
        }
    }

    Ok(())
}

fn report_set(ctx: &CommandContext, context: ContextKind, filter: &geofilter::NamedFilter) -> Result<()> {
    if ctx.json_output {
        println!("{}", format_active_filter_json(context, Some(filter))?);
    } else if !ctx.quiet {
        let shown = if filter.has_blank_name() {
            filter.tree_config()
        } else {
            filter.name_for_display().to_string()
        };
        println!("Active {context} filter: {shown}");
    }
    Ok(())
}
