//! Common helper functions for output formatting.

use geofilter::filter::{FilterNode, LogicalOp};
use geofilter::Outcome;
use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a bold label, e.g. "Filter:".
pub fn label(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// Formats a table header line.
pub fn header(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// Formats an outcome for display.
pub fn format_outcome(outcome: Outcome, use_colors: bool) -> String {
    let text = outcome.label();
    if use_colors {
        match outcome {
            Outcome::Match => text.green().to_string(),
            Outcome::NoMatch => text.red().to_string(),
            Outcome::Inconclusive => text.yellow().to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Formats an optional rating, `-` when unknown.
pub fn format_rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| "-".to_string(), |r| format!("{r:.1}"))
}

/// Formats a filter mode.
pub fn format_mode(basic: bool, use_colors: bool) -> String {
    let text = if basic { "basic" } else { "advanced" };
    if use_colors && basic {
        text.cyan().to_string()
    } else {
        text.to_string()
    }
}

/// Renders a tree as an indented outline, one node per line.
pub fn format_tree(tree: Option<&FilterNode>, use_colors: bool) -> String {
    let mut output = String::new();
    match tree {
        Some(node) => push_node(&mut output, node, 1, use_colors),
        None => output.push_str("  (no filter, everything matches)\n"),
    }
    output
}

fn push_node(output: &mut String, node: &FilterNode, depth: usize, use_colors: bool) {
    let indent = "  ".repeat(depth);
    let line = match node {
        FilterNode::Leaf(_) => node.to_config(),
        FilterNode::Logical { op, children } if children.is_empty() => {
            let empty = if *op == LogicalOp::And { "matches all" } else { "matches none" };
            format!("{op} ({empty})")
        }
        FilterNode::Logical { op, .. } => op.to_string(),
        FilterNode::Not(_) => "NOT".to_string(),
        FilterNode::Inconclusive(_) => "INCONCLUSIVE".to_string(),
    };

    if use_colors && node.as_leaf().is_none() {
        output.push_str(&format!("{indent}{}\n", line.bold()));
    } else {
        output.push_str(&format!("{indent}{line}\n"));
    }

    for child in node.children() {
        push_node(output, child, depth + 1, use_colors);
    }
}
