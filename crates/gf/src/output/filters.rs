//! Stored and active filter output formatting.

use geofilter::filter::is_basic_expressible;
use geofilter::store::InvalidEntry;
use geofilter::{ContextKind, NamedFilter};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::commands::filters::FilterSaveResult;

use super::helpers::{format_mode, format_tree, header, label, truncate_str};

/// JSON output structure for a single filter.
#[derive(Serialize)]
pub struct FilterOutput<'a> {
    pub name: &'a str,
    pub config: String,
    pub mode: &'static str,
}

impl<'a> FilterOutput<'a> {
    fn new(filter: &'a NamedFilter) -> Self {
        Self {
            name: &filter.name,
            config: filter.tree_config(),
            mode: mode_label(filter),
        }
    }
}

/// JSON output structure for an unreadable stored filter.
#[derive(Serialize)]
pub struct InvalidFilterOutput<'a> {
    pub name: &'a str,
    pub config: &'a str,
    pub error: String,
}

/// JSON output structure for filters list command.
#[derive(Serialize)]
pub struct FiltersListOutput<'a> {
    pub filters: Vec<FilterOutput<'a>>,
    pub invalid: Vec<InvalidFilterOutput<'a>>,
}

/// Mode an editor would open the filter in.
fn mode_label(filter: &NamedFilter) -> &'static str {
    if is_basic_expressible(filter) {
        "basic"
    } else {
        "advanced"
    }
}

/// Formats filters as JSON.
pub fn format_filters_json(
    filters: &[NamedFilter],
    invalid: &[InvalidEntry],
) -> Result<String, serde_json::Error> {
    let output = FiltersListOutput {
        filters: filters.iter().map(FilterOutput::new).collect(),
        invalid: invalid
            .iter()
            .map(|entry| InvalidFilterOutput {
                name: &entry.name,
                config: &entry.config,
                error: entry.error.to_string(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats filters as a table.
pub fn format_filters_table(filters: &[NamedFilter], invalid: &[InvalidEntry], use_colors: bool) -> String {
    if filters.is_empty() && invalid.is_empty() {
        return "No filters found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&header(&format!("{:<25} {}", "Name", "Config"), use_colors));
    output.push('\n');

    for filter in filters {
        let name = truncate_str(filter.name_for_display(), 25);
        let config = truncate_str(&filter.tree_config(), 60);
        output.push_str(&format!("{:<25} {}\n", name, config));
    }

    for entry in invalid {
        let name = truncate_str(&entry.name, 25);
        let marker = if use_colors {
            "(unreadable)".red().to_string()
        } else {
            "(unreadable)".to_string()
        };
        output.push_str(&format!(
            "{:<25} {} {}\n",
            name,
            marker,
            truncate_str(&entry.config, 45)
        ));
    }

    output
}

/// JSON output structure for filter details (filters show command).
#[derive(Serialize)]
pub struct FilterDetailsOutput<'a> {
    pub name: &'a str,
    pub config: String,
    pub transport: String,
    pub mode: &'static str,
    pub depth: usize,
    pub node_count: usize,
}

/// Formats filter details as JSON (filters show command).
pub fn format_filter_details_json(filter: &NamedFilter) -> Result<String, serde_json::Error> {
    let output = FilterDetailsOutput {
        name: &filter.name,
        config: filter.tree_config(),
        transport: filter.to_config(),
        mode: mode_label(filter),
        depth: filter.tree.as_ref().map_or(0, |t| t.depth()),
        node_count: filter.tree.as_ref().map_or(0, |t| t.node_count()),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats filter details as a human-readable table (filters show command).
pub fn format_filter_details_table(filter: &NamedFilter, use_colors: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {}\n",
        label("Filter:", use_colors),
        filter.name_for_display()
    ));
    output.push_str(&format!("Config: {}\n", filter.tree_config()));
    output.push_str(&format!(
        "Mode: {}\n",
        format_mode(is_basic_expressible(filter), use_colors)
    ));
    output.push_str("Tree:\n");
    output.push_str(&format_tree(filter.tree.as_ref(), use_colors));

    output
}

/// JSON output structure for a saved filter.
#[derive(Serialize)]
pub struct SavedFilterOutput<'a> {
    pub name: &'a str,
    pub config: String,
    pub status: &'static str,
}

/// Formats a saved filter as JSON.
pub fn format_saved_filter(result: &FilterSaveResult) -> Result<String, serde_json::Error> {
    let output = SavedFilterOutput {
        name: &result.filter.name,
        config: result.filter.tree_config(),
        status: result.status.as_str(),
    };

    serde_json::to_string_pretty(&output)
}

/// JSON output structure for a deleted filter.
#[derive(Serialize)]
pub struct DeletedFilterOutput<'a> {
    pub name: &'a str,
    pub status: &'static str,
}

/// Formats a deleted filter as JSON.
pub fn format_deleted_filter(name: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&DeletedFilterOutput {
        name,
        status: "deleted",
    })
}

/// JSON output structure for the active filter of a context.
#[derive(Serialize)]
pub struct ActiveFilterOutput<'a> {
    pub context: ContextKind,
    pub filter: Option<FilterOutput<'a>>,
}

/// Formats the active filter of `context` as JSON.
pub fn format_active_filter_json(
    context: ContextKind,
    filter: Option<&NamedFilter>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ActiveFilterOutput {
        context,
        filter: filter.map(FilterOutput::new),
    })
}

/// Formats the active filter of `context` as a table.
pub fn format_active_filter_table(context: ContextKind, filter: Option<&NamedFilter>, use_colors: bool) -> String {
    let Some(filter) = filter else {
        return format!("No {context} filter is active.\n");
    };

    let mut output = format!("{} {}\n", label("Context:", use_colors), context);
    if !filter.has_blank_name() {
        output.push_str(&format!("Filter: {}\n", filter.name_for_display()));
    }
    output.push_str(&format!("Config: {}\n", filter.tree_config()));
    output
}
