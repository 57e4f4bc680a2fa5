//! Output formatting utilities for the gf CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by what is shown:
//!
//! - [`check`] - Filter inspection (check, basic, kinds)
//! - [`filters`] - Stored and active filters (list, show, save, delete)
//! - [`records`] - Evaluated geocaches (apply)
//! - [`helpers`] - Common formatting utilities (truncation, outcomes, tree outlines)

mod check;
mod filters;
pub mod helpers;
mod records;

// Inspection
pub use check::{
    format_basic_json, format_basic_table, format_check_json, format_check_table,
    format_kinds_json, format_kinds_table,
};

// Filters
pub use filters::{
    format_active_filter_json, format_active_filter_table, format_deleted_filter,
    format_filter_details_json, format_filter_details_table, format_filters_json,
    format_filters_table, format_saved_filter,
};

// Records
pub use records::{format_apply_json, format_apply_table};
