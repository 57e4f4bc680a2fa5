//! Check command implementation.
//!
//! Parses a filter config and reports its normalized form, mode and shape.

use geofilter::filter::is_basic_expressible;
use geofilter::{FilterError, LeafKind, NamedFilter};

use super::{CommandContext, Result};
use crate::output::{format_check_json, format_check_table};

/// Result of checking a config.
#[derive(Debug)]
pub struct CheckResult {
    /// The parsed filter.
    pub filter: NamedFilter,
    /// Unknown kinds that were skipped, as written.
    pub skipped: Vec<String>,
    /// Whether basic mode can edit the filter without loss.
    pub basic: bool,
}

impl CheckResult {
    /// Leaf kinds used by the filter, in display order, without duplicates.
    pub fn kinds(&self) -> Vec<LeafKind> {
        let mut kinds: Vec<LeafKind> = self
            .filter
            .tree
            .iter()
            .flat_map(|tree| tree.leaves())
            .map(|leaf| leaf.kind())
            .collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

/// Parses `config`; in strict mode any unknown kind is an error.
pub fn check(config: &str, strict: bool) -> Result<CheckResult> {
    let (filter, skipped) = NamedFilter::parse(config)?;
    if strict {
        if let Some(tag) = skipped.first() {
            return Err(FilterError::unknown_kind(tag.clone()).into());
        }
    }

    let basic = is_basic_expressible(&filter);
    Ok(CheckResult {
        filter,
        skipped,
        basic,
    })
}

/// Executes the check command.
///
/// # Errors
///
/// Returns a filter error if the config does not parse.
pub fn execute(ctx: &CommandContext, config: &str, strict: bool) -> Result<()> {
    let result = check(config, strict)?;

    if ctx.json_output {
        println!("{}", format_check_json(&result)?);
    } else if !ctx.quiet {
        print!("{}", format_check_table(&result, ctx.use_colors));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandError;

    #[test]
    fn test_check_basic_filter() {
        let result = check("and(terrain(-2), type(multi))", false).unwrap();
        assert!(result.basic);
        assert!(result.skipped.is_empty());
        assert_eq!(result.filter.tree_config(), "AND(TERRAIN(-2),TYPE(multi))");
        assert_eq!(result.kinds(), vec![LeafKind::Type, LeafKind::Terrain]);
    }

    #[test]
    fn test_check_named_filter_is_advanced() {
        let result = check("[weekend]TYPE(multi)", false).unwrap();
        assert_eq!(result.filter.name, "weekend");
        assert!(!result.basic);
    }

    #[test]
    fn test_check_reports_skipped_kinds() {
        let result = check("OR(TYPE(earth),LOGS(found,3))", false).unwrap();
        assert_eq!(result.skipped, vec!["LOGS"]);
        assert_eq!(result.filter.tree_config(), "OR(TYPE(earth))");
    }

    #[test]
    fn test_check_strict_rejects_unknown_kinds() {
        let err = check("OR(TYPE(earth),LOGS(found,3))", true).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Filter(FilterError::UnknownKind { ref tag }) if tag == "LOGS"
        ));
    }

    #[test]
    fn test_check_syntax_error() {
        let err = check("AND(TYPE(multi)", false).unwrap_err();
        assert!(matches!(err, CommandError::Filter(ref e) if e.is_parse_error()));
    }

    #[test]
    fn test_check_empty_config() {
        let result = check("", false).unwrap();
        assert!(result.filter.tree.is_none());
        assert!(result.kinds().is_empty());
    }
}
