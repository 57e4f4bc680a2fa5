//! Basic command implementation.
//!
//! Converts a filter to basic mode (type, difficulty and terrain ANDed
//! together), asking first when the conversion drops something.

use geofilter::filter::{basic_loss, to_basic_named, BasicLoss};
use geofilter::NamedFilter;

use super::{confirm, parse_filter_arg, CommandContext, ConfirmResult, Result};
use crate::output::{format_basic_json, format_basic_table};

/// Result of a basic mode conversion.
#[derive(Debug)]
pub struct BasicResult {
    /// The filter as given.
    pub original: NamedFilter,
    /// The converted filter.
    pub basic: NamedFilter,
    /// What the conversion dropped.
    pub loss: BasicLoss,
}

/// Converts `filter` without asking.
pub fn convert(filter: NamedFilter) -> BasicResult {
    let loss = basic_loss(&filter);
    let basic = to_basic_named(&filter);
    BasicResult {
        original: filter,
        basic,
        loss,
    }
}

/// Executes the basic command.
///
/// # Errors
///
/// Returns an error if the config does not parse, or if the conversion is
/// lossy and cannot be confirmed.
pub fn execute(ctx: &CommandContext, config: &str, force: bool) -> Result<()> {
    let result = convert(parse_filter_arg(ctx, config)?);

    if !result.loss.is_empty() {
        let prompt = format!(
            "Basic mode drops: {}. Continue?",
            result.loss.describe().join(", ")
        );
        if confirm(ctx, &prompt, force)? == ConfirmResult::Aborted {
            if !ctx.quiet {
                eprintln!("Aborted.");
            }
            return Ok(());
        }
    }

    if ctx.json_output {
        println!("{}", format_basic_json(&result)?);
    } else if !ctx.quiet {
        print!("{}", format_basic_table(&result, ctx.use_colors));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_lossless() {
        let filter = NamedFilter::from_config("AND(TYPE(multi),TERRAIN(-2))").unwrap();
        let result = convert(filter);

        assert!(result.loss.is_empty());
        assert_eq!(
            result.basic.tree_config(),
            "AND(TYPE(multi),DIFFICULTY(),TERRAIN(-2))"
        );
    }

    #[test]
    fn test_convert_lossy_lists_what_is_dropped() {
        let filter = NamedFilter::from_config("[evening]OR(TYPE(event),SIZE(micro))").unwrap();
        let result = convert(filter);

        assert!(!result.loss.is_empty());
        assert!(result.basic.name.is_empty());
        assert_eq!(
            result.loss.describe(),
            vec!["name 'evening'", "OR combination", "Size criterion"]
        );
        assert_eq!(result.original.name, "evening");
    }
}
