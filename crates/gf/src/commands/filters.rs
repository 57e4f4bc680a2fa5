//! Filters command implementation.
//!
//! Lists and manages named filters in the local filter store.

use geofilter::{FilterStore, NamedFilter, StorageMedium, StoreError};
use tracing::debug;

use super::{confirm, parse_filter_arg, CommandContext, ConfirmResult, Result};
use crate::output::{
    format_deleted_filter, format_filter_details_json, format_filter_details_table,
    format_filters_json, format_filters_table, format_saved_filter,
};

/// Executes the filters list command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let store = ctx.open_store()?;
    let filters = store.list();
    let invalid = store.invalid_entries();

    if ctx.json_output {
        println!("{}", format_filters_json(&filters, &invalid)?);
    } else if !ctx.quiet {
        print!("{}", format_filters_table(&filters, &invalid, ctx.use_colors));
    }

    Ok(())
}

// ============================================================================
// Filters Show Command
// ============================================================================

/// Executes the filters show command.
///
/// # Errors
///
/// Returns `StoreError::NotFound` (with a suggestion) for an unknown name and
/// `StoreError::InvalidFilter` for an unreadable entry.
pub fn execute_show(ctx: &CommandContext, name: &str) -> Result<()> {
    let store = ctx.open_store()?;
    let filter = store.require(name)?;

    if ctx.json_output {
        println!("{}", format_filter_details_json(&filter)?);
    } else if !ctx.quiet {
        print!("{}", format_filter_details_table(&filter, ctx.use_colors));
    }

    Ok(())
}

// ============================================================================
// Filters Save Command
// ============================================================================

/// Options for the filters save command.
#[derive(Debug)]
pub struct FiltersSaveOptions {
    /// Name to store the filter under.
    pub name: String,
    /// Filter config.
    pub config: String,
    /// Skip the overwrite confirmation.
    pub force: bool,
}

/// What a save did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// The name was new.
    Created,
    /// A different filter with the same name was replaced.
    Overwritten,
    /// The same filter was already stored under the name.
    Unchanged,
}

impl SaveStatus {
    /// Lower-case label for output.
    pub fn as_str(self) -> &'static str {
        match self {
            SaveStatus::Created => "created",
            SaveStatus::Overwritten => "overwritten",
            SaveStatus::Unchanged => "unchanged",
        }
    }
}

/// Result of a successful save.
#[derive(Debug)]
pub struct FilterSaveResult {
    /// The filter as stored.
    pub filter: NamedFilter,
    /// What happened.
    pub status: SaveStatus,
}

/// Stores `filter` under `name`, asking before replacing a different filter.
///
/// Returns `None` if the user declined.
pub fn save_with_confirmation<M: StorageMedium>(
    ctx: &CommandContext,
    store: &mut FilterStore<M>,
    name: &str,
    filter: &NamedFilter,
    force: bool,
) -> Result<Option<FilterSaveResult>> {
    let status = if store.exists_and_differs(name, filter) {
        let prompt = format!("A different filter named '{name}' exists. Overwrite it?");
        if confirm(ctx, &prompt, force)? == ConfirmResult::Aborted {
            return Ok(None);
        }
        SaveStatus::Overwritten
    } else if names_contain(store, name) {
        SaveStatus::Unchanged
    } else {
        SaveStatus::Created
    };

    let filter = store.save_as(name, filter)?;
    debug!(name, status = status.as_str(), "saved filter");
    Ok(Some(FilterSaveResult { filter, status }))
}

fn names_contain<M: StorageMedium>(store: &FilterStore<M>, name: &str) -> bool {
    store.names().contains(&name)
}

/// Executes the filters save command.
///
/// # Errors
///
/// Returns an error if the config does not parse, the name is blank, the
/// overwrite is refused or the store cannot be written.
pub fn execute_save(ctx: &CommandContext, opts: &FiltersSaveOptions) -> Result<()> {
    if opts.name.trim().is_empty() {
        return Err(StoreError::BlankName.into());
    }

    let filter = parse_filter_arg(ctx, &opts.config)?;
    let mut store = ctx.open_store()?;

    let Some(result) = save_with_confirmation(ctx, &mut store, &opts.name, &filter, opts.force)? else {
        if !ctx.quiet {
            eprintln!("Aborted.");
        }
        return Ok(());
    };

    if ctx.json_output {
        println!("{}", format_saved_filter(&result)?);
    } else if !ctx.quiet {
        match result.status {
            SaveStatus::Created => println!("Saved: {}", result.filter.name),
            SaveStatus::Overwritten => println!("Overwritten: {}", result.filter.name),
            SaveStatus::Unchanged => println!("Unchanged: {}", result.filter.name),
        }
        if ctx.verbose {
            println!("  Config: {}", result.filter.tree_config());
        }
    }

    Ok(())
}

// ============================================================================
// Filters Delete Command
// ============================================================================

/// Executes the filters delete command.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if there is no filter with this name.
pub fn execute_delete(ctx: &CommandContext, name: &str) -> Result<()> {
    let mut store = ctx.open_store()?;

    if !store.delete(name)? {
        return Err(StoreError::NotFound {
            name: name.to_string(),
            suggestion: geofilter::store::find_similar_name(name, store.names().into_iter()),
        }
        .into());
    }

    if ctx.json_output {
        println!("{}", format_deleted_filter(name)?);
    } else if !ctx.quiet {
        println!("Deleted: {name}");
    }

    Ok(())
}
