//! Output formatting for filter inspection: check, basic and kinds.

use geofilter::LeafKind;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::commands::basic::BasicResult;
use crate::commands::check::CheckResult;

use super::helpers::{format_mode, format_tree, header, label};

/// JSON output structure for the check command.
#[derive(Serialize)]
pub struct CheckOutput<'a> {
    pub name: &'a str,
    pub config: String,
    pub transport: String,
    pub mode: &'static str,
    pub kinds: Vec<&'static str>,
    pub skipped: &'a [String],
    pub depth: usize,
    pub node_count: usize,
}

/// Formats a check result as JSON.
pub fn format_check_json(result: &CheckResult) -> Result<String, serde_json::Error> {
    let tree = result.filter.tree.as_ref();
    let output = CheckOutput {
        name: &result.filter.name,
        config: result.filter.tree_config(),
        transport: result.filter.to_config(),
        mode: if result.basic { "basic" } else { "advanced" },
        kinds: result.kinds().into_iter().map(LeafKind::tag).collect(),
        skipped: &result.skipped,
        depth: tree.map_or(0, |t| t.depth()),
        node_count: tree.map_or(0, |t| t.node_count()),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats a check result as a human-readable report.
pub fn format_check_table(result: &CheckResult, use_colors: bool) -> String {
    let mut output = String::new();

    if !result.filter.has_blank_name() {
        output.push_str(&format!(
            "{} {}\n",
            label("Filter:", use_colors),
            result.filter.name_for_display()
        ));
    }
    output.push_str(&format!(
        "{} {}\n",
        label("Config:", use_colors),
        result.filter.tree_config()
    ));
    output.push_str(&format!("Mode: {}\n", format_mode(result.basic, use_colors)));

    if let Some(tree) = &result.filter.tree {
        output.push_str(&format!(
            "Nodes: {} (depth {})\n",
            tree.node_count(),
            tree.depth()
        ));
    }

    if !result.skipped.is_empty() {
        let skipped = format!("Skipped unknown kinds: {}", result.skipped.join(", "));
        if use_colors {
            output.push_str(&format!("{}\n", skipped.yellow()));
        } else {
            output.push_str(&skipped);
            output.push('\n');
        }
    }

    output.push_str("Tree:\n");
    output.push_str(&format_tree(result.filter.tree.as_ref(), use_colors));
    output
}

/// JSON output structure for the basic command.
#[derive(Serialize)]
pub struct BasicOutput {
    pub config: String,
    pub lossless: bool,
    pub dropped: Vec<String>,
}

/// Formats a basic conversion as JSON.
pub fn format_basic_json(result: &BasicResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&BasicOutput {
        config: result.basic.tree_config(),
        lossless: result.loss.is_empty(),
        dropped: result.loss.describe(),
    })
}

/// Formats a basic conversion as a report.
pub fn format_basic_table(result: &BasicResult, use_colors: bool) -> String {
    let mut output = format!(
        "{} {}\n",
        label("Basic:", use_colors),
        result.basic.tree_config()
    );

    let dropped = result.loss.describe();
    if !dropped.is_empty() {
        output.push_str("Dropped:\n");
        for line in dropped {
            output.push_str(&format!("  - {line}\n"));
        }
    }
    output
}

/// JSON output structure for a leaf kind.
#[derive(Serialize)]
pub struct KindOutput {
    pub tag: &'static str,
    pub name: &'static str,
    pub basic: bool,
}

/// Formats leaf kinds as JSON.
pub fn format_kinds_json(kinds: &[LeafKind]) -> Result<String, serde_json::Error> {
    let output: Vec<KindOutput> = kinds
        .iter()
        .map(|kind| KindOutput {
            tag: kind.tag(),
            name: kind.display_name(),
            basic: kind.is_basic(),
        })
        .collect();

    serde_json::to_string_pretty(&output)
}

/// Formats leaf kinds as a table.
pub fn format_kinds_table(kinds: &[LeafKind], use_colors: bool) -> String {
    let mut output = header(&format!("{:<14} {:<18} {}", "Tag", "Name", "Basic"), use_colors);
    output.push('\n');

    for kind in kinds {
        let basic = if kind.is_basic() { "yes" } else { "" };
        output.push_str(&format!("{:<14} {:<18} {}\n", kind.tag(), kind.display_name(), basic));
    }
    output
}
