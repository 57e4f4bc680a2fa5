//! Kinds command implementation.
//!
//! Lists the leaf kinds a filter can use, in display order.

use geofilter::LeafKind;

use super::{CommandContext, Result};
use crate::output::{format_kinds_json, format_kinds_table};

/// Executes the kinds command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let kinds = LeafKind::sorted_for_display();

    if ctx.json_output {
        println!("{}", format_kinds_json(&kinds)?);
    } else if !ctx.quiet {
        print!("{}", format_kinds_table(&kinds, ctx.use_colors));
    }

    Ok(())
}
