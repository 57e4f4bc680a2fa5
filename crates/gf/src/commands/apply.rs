//! Apply command implementation.
//!
//! Evaluates a filter against geocaches read from a JSON array.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use geofilter::filter::FilterEvaluator;
use geofilter::geocache::Geocache;
use geofilter::{ContextKind, NamedFilter, Outcome, StoreError};
use tracing::debug;

use super::{parse_filter_arg, CommandContext, Result};
use crate::output::{format_apply_json, format_apply_table};

/// Where the filter to apply comes from.
#[derive(Debug)]
pub enum FilterSource {
    /// A config given on the command line.
    Config(String),
    /// A stored filter.
    Saved(String),
    /// The active filter of a context.
    Active(ContextKind),
}

/// Options for the apply command.
#[derive(Debug)]
pub struct ApplyOptions {
    /// The filter to apply.
    pub source: FilterSource,
    /// Geocache JSON file, `-` for stdin.
    pub caches: PathBuf,
    /// Report every record with its outcome.
    pub outcome: bool,
    /// Parallel evaluation override.
    pub parallel: Option<bool>,
}

/// Result of applying a filter.
#[derive(Debug)]
pub struct ApplyResult<'a> {
    /// The applied filter.
    pub filter: NamedFilter,
    /// Number of records read.
    pub total: usize,
    /// Number of matching records.
    pub matched: usize,
    /// Records to report, with their outcome.
    pub rows: Vec<(&'a Geocache, Outcome)>,
}

/// Reads a JSON array of geocaches from `path`, or stdin for `-`.
pub fn read_caches(path: &Path) -> Result<Vec<Geocache>> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&content)?)
}

/// Resolves the filter to apply.
fn resolve_filter(ctx: &CommandContext, source: &FilterSource) -> Result<NamedFilter> {
    match source {
        FilterSource::Config(config) => parse_filter_arg(ctx, config),
        FilterSource::Saved(name) => Ok(ctx.open_store()?.require(name)?),
        FilterSource::Active(context) => ctx.open_store()?.active(*context)?.ok_or_else(|| {
            StoreError::NotFound {
                name: format!("active {context} filter"),
                suggestion: None,
            }
            .into()
        }),
    }
}

/// Evaluates `filter` over `caches`.
///
/// With `all_outcomes`, every record is reported; otherwise only matches.
pub fn apply<'a>(
    filter: NamedFilter,
    caches: &'a [Geocache],
    all_outcomes: bool,
    parallel: bool,
) -> ApplyResult<'a> {
    let evaluator = FilterEvaluator::for_filter(&filter);

    let rows: Vec<(&Geocache, Outcome)> = if all_outcomes {
        evaluator.outcomes(caches)
    } else if parallel {
        evaluator
            .par_filter_records(caches)
            .into_iter()
            .map(|record| (record, Outcome::Match))
            .collect()
    } else {
        evaluator
            .filter_records(caches)
            .into_iter()
            .map(|record| (record, Outcome::Match))
            .collect()
    };

    let matched = rows.iter().filter(|(_, outcome)| outcome.is_match()).count();
    ApplyResult {
        filter,
        total: caches.len(),
        matched,
        rows,
    }
}

/// Executes the apply command.
///
/// # Errors
///
/// Returns an error if the filter cannot be resolved or the caches cannot
/// be read.
pub fn execute(ctx: &CommandContext, opts: &ApplyOptions) -> Result<()> {
    let filter = resolve_filter(ctx, &opts.source)?;
    let caches = read_caches(&opts.caches)?;

    let parallel = opts
        .parallel
        .unwrap_or_else(|| ctx.evaluate.use_parallel(caches.len()));
    debug!(records = caches.len(), parallel, "applying filter");

    let result = apply(filter, &caches, opts.outcome, parallel);

    if ctx.json_output {
        println!("{}", format_apply_json(&result)?);
    } else if !ctx.quiet {
        print!("{}", format_apply_table(&result, ctx.use_colors));
    }

    Ok(())
}
