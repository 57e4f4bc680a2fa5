//! Config string writer and leaf parameter encodings.
//!
//! The writer is the inverse of [`ConfigParser`](super::ConfigParser): for
//! every tree `t`, parsing `to_config(&t)` yields a tree equal to `t`,
//! children in the same order.
//!
//! ```text
//! AND(TYPE(multi,mystery),DIFFICULTY(1-3),NOT(TERRAIN(4-)))
//! INCONCLUSIVE(OR(NAME(contains,'mill'),HIDDEN(2020-01-01,)))
//! ```

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;

use super::ast::{FilterNode, INCONCLUSIVE_TAG, NOT_TAG};
use super::error::{FilterError, FilterResult, ParseError};
use super::parser::ConfigParser;
use super::kind::LeafKind;
use super::leaf::{
    CountRange, DateRange, DistanceCriterion, LeafCriterion, RatingRange, StatusCriteria,
    TextMatch, TextMode,
};
use crate::geocache::{CacheSize, CacheType, Coordinates, StatusFlag};

/// Date format used for date parameters.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Marker parameter for case-sensitive text matches.
const CASE_SENSITIVE_FLAG: &str = "case";

impl FilterNode {
    /// Serializes this tree; see [`to_config`].
    pub fn to_config(&self) -> String {
        to_config(self)
    }

    /// Parses a config string, skipping unknown kinds.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Parse` for malformed input.
    pub fn from_config(config: &str) -> FilterResult<Option<FilterNode>> {
        ConfigParser::parse(config).map(|outcome| outcome.tree)
    }
}

/// Serializes a tree to its config string.
pub fn to_config(node: &FilterNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Serializes an optional tree; no tree is the empty string.
pub fn to_config_opt(node: Option<&FilterNode>) -> String {
    node.map(to_config).unwrap_or_default()
}

fn write_node(node: &FilterNode, out: &mut String) {
    match node {
        FilterNode::Leaf(criterion) => {
            out.push_str(criterion.kind().tag());
            out.push('(');
            out.push_str(&encode_params(criterion).join(","));
            out.push(')');
        }
        FilterNode::Logical { op, children } => {
            out.push_str(op.tag());
            out.push('(');
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_node(child, out);
            }
            out.push(')');
        }
        FilterNode::Not(inner) => write_wrapper(NOT_TAG, inner, out),
        FilterNode::Inconclusive(inner) => write_wrapper(INCONCLUSIVE_TAG, inner, out),
    }
}

fn write_wrapper(tag: &str, inner: &FilterNode, out: &mut String) {
    out.push_str(tag);
    out.push('(');
    write_node(inner, out);
    out.push(')');
}

/// Quotes a free-text parameter.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

fn format_range<T: Display>(min: Option<T>, max: Option<T>) -> String {
    let lo = min.map(|v| v.to_string()).unwrap_or_default();
    let hi = max.map(|v| v.to_string()).unwrap_or_default();
    format!("{lo}-{hi}")
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Encodes the parameters of a leaf, one string per parameter.
pub fn encode_params(criterion: &LeafCriterion) -> Vec<String> {
    match criterion {
        LeafCriterion::Type(types) => types.iter().map(|t| t.tag().to_string()).collect(),
        LeafCriterion::Size(sizes) => sizes.iter().map(|s| s.tag().to_string()).collect(),
        LeafCriterion::Difficulty(range) | LeafCriterion::Terrain(range) => {
            if range.is_open() {
                vec![]
            } else {
                vec![format_range(range.min(), range.max())]
            }
        }
        LeafCriterion::Favorites(range) => {
            if range.is_open() {
                vec![]
            } else {
                vec![format_range(range.min(), range.max())]
            }
        }
        LeafCriterion::Name(text)
        | LeafCriterion::Owner(text)
        | LeafCriterion::Description(text) => encode_text(text),
        LeafCriterion::Distance(distance) => {
            if *distance == DistanceCriterion::any() {
                return vec![];
            }
            let center = distance.center();
            vec![
                center.lat.to_string(),
                center.lon.to_string(),
                format_range(distance.min_km(), distance.max_km()),
            ]
        }
        LeafCriterion::Hidden(dates) => {
            if dates.is_open() {
                vec![]
            } else {
                vec![format_date(dates.from()), format_date(dates.to())]
            }
        }
        LeafCriterion::Status(status) => status
            .required()
            .map(|(flag, value)| format!("{}:{}", flag.tag(), if value { "yes" } else { "no" }))
            .collect(),
    }
}

fn encode_text(text: &TextMatch) -> Vec<String> {
    if *text == TextMatch::any() {
        return vec![];
    }
    let mut params = vec![text.mode().tag().to_string(), quote(text.value())];
    if text.case_sensitive() {
        params.push(CASE_SENSITIVE_FLAG.to_string());
    }
    params
}

/// Decodes the parameters of a leaf of `kind`.
///
/// # Errors
///
/// Returns `ParseError::MalformedParameter` when the parameters do not form a
/// valid criterion for `kind`.
pub fn decode_leaf(kind: LeafKind, params: &[String]) -> Result<LeafCriterion, ParseError> {
    let malformed = |reason: String| ParseError::malformed(kind.tag(), reason);
    let invalid = |err: FilterError| match err {
        FilterError::InvalidParameter { reason } => ParseError::malformed(kind.tag(), reason),
        other => ParseError::malformed(kind.tag(), other.to_string()),
    };

    match kind {
        LeafKind::Type => {
            let types = params
                .iter()
                .map(|p| {
                    CacheType::from_tag(p).ok_or_else(|| malformed(format!("unknown cache type '{p}'")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(LeafCriterion::types(types))
        }
        LeafKind::Size => {
            let sizes = params
                .iter()
                .map(|p| {
                    CacheSize::from_tag(p).ok_or_else(|| malformed(format!("unknown cache size '{p}'")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(LeafCriterion::sizes(sizes))
        }
        LeafKind::Difficulty | LeafKind::Terrain => {
            let (min, max) = match params {
                [] => (None, None),
                [range] => parse_range::<f64>(range).map_err(malformed)?,
                _ => return Err(malformed(format!("expected one range, got {}", params.len()))),
            };
            let range = RatingRange::new(min, max).map_err(invalid)?;
            Ok(if kind == LeafKind::Difficulty {
                LeafCriterion::Difficulty(range)
            } else {
                LeafCriterion::Terrain(range)
            })
        }
        LeafKind::Favorites => {
            let (min, max) = match params {
                [] => (None, None),
                [range] => parse_range::<u32>(range).map_err(malformed)?,
                _ => return Err(malformed(format!("expected one range, got {}", params.len()))),
            };
            Ok(LeafCriterion::Favorites(
                CountRange::new(min, max).map_err(invalid)?,
            ))
        }
        LeafKind::Name | LeafKind::Owner | LeafKind::Description => {
            let text = decode_text(params).map_err(malformed)?.map_err(invalid)?;
            Ok(match kind {
                LeafKind::Name => LeafCriterion::Name(text),
                LeafKind::Owner => LeafCriterion::Owner(text),
                _ => LeafCriterion::Description(text),
            })
        }
        LeafKind::Distance => {
            let distance = match params {
                [] => DistanceCriterion::any(),
                [lat, lon, range] => {
                    let lat = parse_number::<f64>(lat).map_err(malformed)?;
                    let lon = parse_number::<f64>(lon).map_err(malformed)?;
                    let (min, max) = parse_range::<f64>(range).map_err(malformed)?;
                    DistanceCriterion::new(Coordinates::new(lat, lon), min, max).map_err(invalid)?
                }
                _ => {
                    return Err(malformed(format!(
                        "expected latitude, longitude and range, got {} parameters",
                        params.len()
                    )))
                }
            };
            Ok(LeafCriterion::Distance(distance))
        }
        LeafKind::Hidden => {
            let (from, to) = match params {
                [] => (None, None),
                [from, to] => (
                    parse_date(from).map_err(malformed)?,
                    parse_date(to).map_err(malformed)?,
                ),
                _ => return Err(malformed(format!("expected two dates, got {}", params.len()))),
            };
            Ok(LeafCriterion::Hidden(DateRange::new(from, to).map_err(invalid)?))
        }
        LeafKind::Status => {
            let mut status = StatusCriteria::default();
            for param in params {
                let (flag, value) = param
                    .split_once(':')
                    .ok_or_else(|| malformed(format!("expected flag:yes|no, got '{param}'")))?;
                let flag = StatusFlag::from_tag(flag)
                    .ok_or_else(|| malformed(format!("unknown status flag '{flag}'")))?;
                if status.get(flag).is_some() {
                    return Err(malformed(format!("status flag '{}' given twice", flag.tag())));
                }
                status.set(flag, Some(parse_yes_no(value).map_err(malformed)?));
            }
            Ok(LeafCriterion::Status(status))
        }
    }
}

/// Decodes `[mode, value]` or `[mode, value, case]`; outer error is
/// structural, inner error is a domain violation.
fn decode_text(params: &[String]) -> Result<Result<TextMatch, FilterError>, String> {
    let (mode, value, case_sensitive) = match params {
        [] => return Ok(Ok(TextMatch::any())),
        [mode, value] => (mode, value, false),
        [mode, value, flag] if flag.eq_ignore_ascii_case(CASE_SENSITIVE_FLAG) => (mode, value, true),
        [_, _, flag] => return Err(format!("unknown text flag '{flag}'")),
        _ => return Err(format!("expected mode and value, got {} parameters", params.len())),
    };
    let mode = TextMode::from_tag(mode).ok_or_else(|| format!("unknown text mode '{mode}'"))?;
    Ok(TextMatch::new(mode, value.as_str(), case_sensitive))
}

fn parse_number<T: FromStr>(text: &str) -> Result<T, String> {
    text.parse::<T>()
        .map_err(|_| format!("'{text}' is not a valid number"))
}

/// Parses `min-max`; either side may be empty, a single value means an
/// exact match.
fn parse_range<T: FromStr + Copy>(text: &str) -> Result<(Option<T>, Option<T>), String> {
    let bound = |s: &str| -> Result<Option<T>, String> {
        if s.is_empty() {
            Ok(None)
        } else {
            parse_number(s).map(Some)
        }
    };

    match text.split_once('-') {
        Some((lo, hi)) => Ok((bound(lo)?, bound(hi)?)),
        None if text.is_empty() => Ok((None, None)),
        None => {
            let exact = parse_number(text)?;
            Ok((Some(exact), Some(exact)))
        }
    }
}

fn parse_date(text: &str) -> Result<Option<NaiveDate>, String> {
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(Some)
        .map_err(|_| format!("'{text}' is not a YYYY-MM-DD date"))
}

fn parse_yes_no(text: &str) -> Result<bool, String> {
    match text.to_ascii_lowercase().as_str() {
        "yes" | "true" => Ok(true),
        "no" | "false" => Ok(false),
        _ => Err(format!("expected yes or no, got '{text}'")),
    }
}
