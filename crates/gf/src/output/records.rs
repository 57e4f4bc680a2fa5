//! Output formatting for evaluated geocaches.

use geofilter::geocache::Geocache;
use geofilter::Outcome;
use serde::Serialize;

use crate::commands::apply::ApplyResult;

use super::helpers::{format_outcome, format_rating, header, truncate_str};

const OUTCOME_WIDTH: usize = 14;

/// JSON output structure for one evaluated record.
#[derive(Serialize)]
pub struct RecordOutput<'a> {
    #[serde(flatten)]
    pub record: &'a Geocache,
    pub outcome: Outcome,
}

/// JSON output structure for the apply command.
#[derive(Serialize)]
pub struct ApplyOutput<'a> {
    pub filter: String,
    pub total: usize,
    pub matched: usize,
    pub records: Vec<RecordOutput<'a>>,
}

/// Formats an apply result as JSON.
pub fn format_apply_json(result: &ApplyResult<'_>) -> Result<String, serde_json::Error> {
    let output = ApplyOutput {
        filter: result.filter.to_config(),
        total: result.total,
        matched: result.matched,
        records: result
            .rows
            .iter()
            .map(|(record, outcome)| RecordOutput {
                record,
                outcome: *outcome,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats an apply result as a table with a summary line.
pub fn format_apply_table(result: &ApplyResult<'_>, use_colors: bool) -> String {
    let mut output = String::new();

    if result.rows.is_empty() {
        output.push_str("No geocaches matched.\n");
    } else {
        let line = format!(
            "{:<10} {:<12} {:<10} {:<4} {:<4} {:<14} {}",
            "Code", "Type", "Size", "D", "T", "Outcome", "Name"
        );
        output.push_str(&header(&line, use_colors));
        output.push('\n');

        for (record, outcome) in &result.rows {
            let cache_type = record.cache_type.map(|t| t.tag()).unwrap_or("-");
            let size = record.size.map(|s| s.tag()).unwrap_or("-");
            let name = truncate_str(record.name.as_deref().unwrap_or(""), 40);
            let outcome = if use_colors {
                pad_colored(*outcome, OUTCOME_WIDTH)
            } else {
                format!("{:<OUTCOME_WIDTH$}", outcome.label())
            };

            output.push_str(&format!(
                "{:<10} {:<12} {:<10} {:<4} {:<4} {} {}\n",
                record.geocode,
                cache_type,
                size,
                format_rating(record.difficulty),
                format_rating(record.terrain),
                outcome,
                name
            ));
        }
    }

    output.push_str(&format!(
        "\n{} of {} geocaches matched.\n",
        result.matched, result.total
    ));
    output
}

/// Colors an outcome label and pads it to `width`; escape codes would
/// otherwise count toward the format width.
fn pad_colored(outcome: Outcome, width: usize) -> String {
    let padding = " ".repeat(width.saturating_sub(outcome.label().len()));
    format!("{}{padding}", format_outcome(outcome, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::apply::apply;
    use geofilter::geocache::CacheType;
    use geofilter::NamedFilter;

    fn caches() -> Vec<Geocache> {
        vec![
            Geocache {
                name: Some("Old Mill".to_string()),
                cache_type: Some(CacheType::Multi),
                difficulty: Some(2.0),
                ..Geocache::new("GC1")
            },
            Geocache {
                cache_type: Some(CacheType::Earth),
                ..Geocache::new("GC2")
            },
        ]
    }

    #[test]
    fn test_apply_table() {
        let records = caches();
        let result = apply(NamedFilter::from_config("TYPE(multi)").unwrap(), &records, false, false);
        let table = format_apply_table(&result, false);

        assert!(table.contains("GC1"));
        assert!(table.contains("Old Mill"));
        assert!(table.contains("2.0"));
        assert!(!table.contains("GC2"));
        assert!(table.ends_with("1 of 2 geocaches matched.\n"));
    }

    #[test]
    fn test_apply_table_no_matches() {
        let records = caches();
        let result = apply(NamedFilter::from_config("TYPE(lab)").unwrap(), &records, false, false);
        let table = format_apply_table(&result, false);

        assert!(table.starts_with("No geocaches matched.\n"));
        assert!(table.ends_with("0 of 2 geocaches matched.\n"));
    }

    #[test]
    fn test_apply_json_flattens_records() {
        let records = caches();
        let result = apply(NamedFilter::from_config("[m]TYPE(multi)").unwrap(), &records, true, false);
        let json: serde_json::Value = serde_json::from_str(&format_apply_json(&result).unwrap()).unwrap();

        assert_eq!(json["filter"], "[m]TYPE(multi)");
        assert_eq!(json["matched"], 1);
        assert_eq!(json["records"][0]["geocode"], "GC1");
        assert_eq!(json["records"][0]["type"], "multi");
        assert_eq!(json["records"][0]["outcome"], "match");
        assert_eq!(json["records"][1]["outcome"], "no_match");
    }

    #[test]
    fn test_colored_outcome_keeps_padding() {
        let colored = pad_colored(Outcome::Match, OUTCOME_WIDTH);
        assert!(colored.ends_with(&" ".repeat(OUTCOME_WIDTH - "match".len())));
    }
}
