//! Typed leaf criteria.
//!
//! Each [`LeafCriterion`] variant owns a parameter type whose constructor
//! validates the domain, so an out-of-range criterion can never reach a tree.
//! Every kind also has an unconstrained "match anything" form, produced by
//! [`LeafCriterion::any`].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};

use super::error::{FilterError, FilterResult};
use super::kind::LeafKind;
use crate::geocache::{CacheSize, CacheType, Coordinates, StatusFlag};

/// Lowest difficulty/terrain rating.
pub const RATING_MIN: f64 = 1.0;

/// Highest difficulty/terrain rating.
pub const RATING_MAX: f64 = 5.0;

/// An atomic predicate over one attribute of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafCriterion {
    /// Cache type is one of the set (empty set: any type).
    Type(BTreeSet<CacheType>),
    /// Difficulty rating range.
    Difficulty(RatingRange),
    /// Terrain rating range.
    Terrain(RatingRange),
    /// Container size is one of the set (empty set: any size).
    Size(BTreeSet<CacheSize>),
    /// Listing name text match.
    Name(TextMatch),
    /// Owner text match.
    Owner(TextMatch),
    /// Description text match.
    Description(TextMatch),
    /// Favorite point range.
    Favorites(CountRange),
    /// Distance from a fixed point.
    Distance(DistanceCriterion),
    /// Hidden date range.
    Hidden(DateRange),
    /// Required status flag values.
    Status(StatusCriteria),
}

impl LeafCriterion {
    /// Returns the unconstrained criterion for `kind`.
    pub fn any(kind: LeafKind) -> Self {
        match kind {
            LeafKind::Type => LeafCriterion::Type(BTreeSet::new()),
            LeafKind::Difficulty => LeafCriterion::Difficulty(RatingRange::any()),
            LeafKind::Terrain => LeafCriterion::Terrain(RatingRange::any()),
            LeafKind::Size => LeafCriterion::Size(BTreeSet::new()),
            LeafKind::Name => LeafCriterion::Name(TextMatch::any()),
            LeafKind::Owner => LeafCriterion::Owner(TextMatch::any()),
            LeafKind::Description => LeafCriterion::Description(TextMatch::any()),
            LeafKind::Favorites => LeafCriterion::Favorites(CountRange::any()),
            LeafKind::Distance => LeafCriterion::Distance(DistanceCriterion::any()),
            LeafKind::Hidden => LeafCriterion::Hidden(DateRange::any()),
            LeafKind::Status => LeafCriterion::Status(StatusCriteria::default()),
        }
    }

    /// Type criterion from any collection of types.
    pub fn types(types: impl IntoIterator<Item = CacheType>) -> Self {
        LeafCriterion::Type(types.into_iter().collect())
    }

    /// Size criterion from any collection of sizes.
    pub fn sizes(sizes: impl IntoIterator<Item = CacheSize>) -> Self {
        LeafCriterion::Size(sizes.into_iter().collect())
    }

    /// Difficulty criterion; see [`RatingRange::new`].
    pub fn difficulty(min: Option<f64>, max: Option<f64>) -> FilterResult<Self> {
        Ok(LeafCriterion::Difficulty(RatingRange::new(min, max)?))
    }

    /// Terrain criterion; see [`RatingRange::new`].
    pub fn terrain(min: Option<f64>, max: Option<f64>) -> FilterResult<Self> {
        Ok(LeafCriterion::Terrain(RatingRange::new(min, max)?))
    }

    /// The kind of this criterion.
    pub fn kind(&self) -> LeafKind {
        match self {
            LeafCriterion::Type(_) => LeafKind::Type,
            LeafCriterion::Difficulty(_) => LeafKind::Difficulty,
            LeafCriterion::Terrain(_) => LeafKind::Terrain,
            LeafCriterion::Size(_) => LeafKind::Size,
            LeafCriterion::Name(_) => LeafKind::Name,
            LeafCriterion::Owner(_) => LeafKind::Owner,
            LeafCriterion::Description(_) => LeafKind::Description,
            LeafCriterion::Favorites(_) => LeafKind::Favorites,
            LeafCriterion::Distance(_) => LeafKind::Distance,
            LeafCriterion::Hidden(_) => LeafKind::Hidden,
            LeafCriterion::Status(_) => LeafKind::Status,
        }
    }

    /// Returns true if this criterion accepts every record.
    pub fn is_unconstrained(&self) -> bool {
        match self {
            LeafCriterion::Type(set) => set.is_empty(),
            LeafCriterion::Size(set) => set.is_empty(),
            LeafCriterion::Difficulty(range) | LeafCriterion::Terrain(range) => range.is_open(),
            LeafCriterion::Name(text)
            | LeafCriterion::Owner(text)
            | LeafCriterion::Description(text) => text.is_empty(),
            LeafCriterion::Favorites(range) => range.is_open(),
            LeafCriterion::Distance(distance) => distance.is_open(),
            LeafCriterion::Hidden(dates) => dates.is_open(),
            LeafCriterion::Status(status) => status.is_empty(),
        }
    }
}

/// Validates one optional number for a range.
fn check_bound(value: Option<f64>, low: f64, high: f64, what: &str) -> FilterResult<()> {
    match value {
        Some(v) if !v.is_finite() => Err(FilterError::invalid_parameter(format!(
            "{what} must be a finite number"
        ))),
        Some(v) if v < low || v > high => Err(FilterError::invalid_parameter(format!(
            "{what} {v} is outside {low}..{high}"
        ))),
        _ => Ok(()),
    }
}

/// Rejects ranges whose lower bound exceeds the upper bound.
fn check_order<T: PartialOrd + std::fmt::Display>(min: Option<T>, max: Option<T>) -> FilterResult<()> {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => Err(FilterError::invalid_parameter(format!(
            "lower bound {lo} exceeds upper bound {hi}"
        ))),
        _ => Ok(()),
    }
}

/// Maps `-0.0` to `0.0`; a negative zero would be written as `-0`, which
/// collides with the range separator.
fn positive_zero(bound: Option<f64>) -> Option<f64> {
    bound.map(|v| if v == 0.0 { 0.0 } else { v })
}

/// Inclusive difficulty/terrain range within [`RATING_MIN`]..=[`RATING_MAX`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingRange {
    min: Option<f64>,
    max: Option<f64>,
}

impl RatingRange {
    /// A range with both ends open.
    pub fn any() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// Creates a range; `None` leaves that end open.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameter` if a bound is outside 1..5 or
    /// if `min > max`.
    pub fn new(min: Option<f64>, max: Option<f64>) -> FilterResult<Self> {
        check_bound(min, RATING_MIN, RATING_MAX, "rating")?;
        check_bound(max, RATING_MIN, RATING_MAX, "rating")?;
        check_order(min, max)?;
        Ok(Self {
            min: positive_zero(min),
            max: positive_zero(max),
        })
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Returns true if `value` lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |lo| value >= lo) && self.max.map_or(true, |hi| value <= hi)
    }
}

/// Inclusive range over a non-negative count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRange {
    min: Option<u32>,
    max: Option<u32>,
}

impl CountRange {
    pub fn any() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameter` if `min > max`.
    pub fn new(min: Option<u32>, max: Option<u32>) -> FilterResult<Self> {
        check_order(min, max)?;
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Option<u32> {
        self.min
    }

    pub fn max(&self) -> Option<u32> {
        self.max
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: u32) -> bool {
        self.min.map_or(true, |lo| value >= lo) && self.max.map_or(true, |hi| value <= hi)
    }
}

/// Distance in kilometers from a fixed center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceCriterion {
    center: Coordinates,
    min_km: Option<f64>,
    max_km: Option<f64>,
}

impl DistanceCriterion {
    /// Open range around the null island; matches everything.
    pub fn any() -> Self {
        Self {
            center: Coordinates::new(0.0, 0.0),
            min_km: None,
            max_km: None,
        }
    }

    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameter` for invalid coordinates,
    /// negative or non-finite distances, or `min_km > max_km`.
    pub fn new(center: Coordinates, min_km: Option<f64>, max_km: Option<f64>) -> FilterResult<Self> {
        if !center.is_valid() {
            return Err(FilterError::invalid_parameter(format!(
                "invalid center coordinates {},{}",
                center.lat, center.lon
            )));
        }
        check_bound(min_km, 0.0, f64::INFINITY, "distance")?;
        check_bound(max_km, 0.0, f64::INFINITY, "distance")?;
        check_order(min_km, max_km)?;
        Ok(Self {
            center,
            min_km: positive_zero(min_km),
            max_km: positive_zero(max_km),
        })
    }

    pub fn center(&self) -> Coordinates {
        self.center
    }

    pub fn min_km(&self) -> Option<f64> {
        self.min_km
    }

    pub fn max_km(&self) -> Option<f64> {
        self.max_km
    }

    pub fn is_open(&self) -> bool {
        self.min_km.is_none() && self.max_km.is_none()
    }

    /// Returns true if `point` lies within the distance band.
    pub fn contains(&self, point: &Coordinates) -> bool {
        let d = self.center.distance_km(point);
        self.min_km.map_or(true, |lo| d >= lo) && self.max_km.map_or(true, |hi| d <= hi)
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    pub fn any() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameter` if `from` is after `to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> FilterResult<Self> {
        check_order(from, to)?;
        Ok(Self { from, to })
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |lo| date >= lo) && self.to.map_or(true, |hi| date <= hi)
    }
}

/// How a [`TextMatch`] compares its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextMode {
    Contains,
    StartsWith,
    EndsWith,
    Equals,
    Regex,
}

impl TextMode {
    pub const ALL: [TextMode; 5] = [
        TextMode::Contains,
        TextMode::StartsWith,
        TextMode::EndsWith,
        TextMode::Equals,
        TextMode::Regex,
    ];

    /// The tag written in config strings.
    pub fn tag(self) -> &'static str {
        match self {
            TextMode::Contains => "contains",
            TextMode::StartsWith => "starts",
            TextMode::EndsWith => "ends",
            TextMode::Equals => "equals",
            TextMode::Regex => "regex",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.tag().eq_ignore_ascii_case(tag))
    }
}

/// A text predicate. An empty value matches anything.
#[derive(Debug, Clone)]
pub struct TextMatch {
    mode: TextMode,
    value: String,
    case_sensitive: bool,
    regex: Option<Regex>,
}

impl TextMatch {
    pub fn any() -> Self {
        Self {
            mode: TextMode::Contains,
            value: String::new(),
            case_sensitive: false,
            regex: None,
        }
    }

    /// Creates a text match, compiling the pattern in [`TextMode::Regex`].
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameter` if the regex does not compile.
    pub fn new(mode: TextMode, value: impl Into<String>, case_sensitive: bool) -> FilterResult<Self> {
        let value = value.into();
        let regex = match mode {
            TextMode::Regex if !value.is_empty() => Some(
                RegexBuilder::new(&value)
                    .case_insensitive(!case_sensitive)
                    .build()
                    .map_err(|e| FilterError::invalid_parameter(format!("invalid pattern: {e}")))?,
            ),
            _ => None,
        };
        Ok(Self {
            mode,
            value,
            case_sensitive,
            regex,
        })
    }

    pub fn mode(&self) -> TextMode {
        self.mode
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Applies the predicate to `text`.
    pub fn matches(&self, text: &str) -> bool {
        if self.value.is_empty() {
            return true;
        }
        if let Some(regex) = &self.regex {
            return regex.is_match(text);
        }

        let (haystack, needle) = if self.case_sensitive {
            (text.to_string(), self.value.clone())
        } else {
            (text.to_lowercase(), self.value.to_lowercase())
        };

        match self.mode {
            TextMode::Contains => haystack.contains(&needle),
            TextMode::StartsWith => haystack.starts_with(&needle),
            TextMode::EndsWith => haystack.ends_with(&needle),
            TextMode::Equals => haystack == needle,
            // Regex mode always carries a compiled pattern once the value is non-empty.
            TextMode::Regex => false,
        }
    }
}

impl PartialEq for TextMatch {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode
            && self.value == other.value
            && self.case_sensitive == other.case_sensitive
    }
}

/// Required values for status flags; `None` means "don't care".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCriteria {
    pub found: Option<bool>,
    pub disabled: Option<bool>,
    pub archived: Option<bool>,
    pub premium: Option<bool>,
}

impl StatusCriteria {
    /// The requirement for one flag.
    pub fn get(&self, flag: StatusFlag) -> Option<bool> {
        match flag {
            StatusFlag::Found => self.found,
            StatusFlag::Disabled => self.disabled,
            StatusFlag::Archived => self.archived,
            StatusFlag::Premium => self.premium,
        }
    }

    /// Sets the requirement for one flag.
    pub fn set(&mut self, flag: StatusFlag, required: Option<bool>) {
        let slot = match flag {
            StatusFlag::Found => &mut self.found,
            StatusFlag::Disabled => &mut self.disabled,
            StatusFlag::Archived => &mut self.archived,
            StatusFlag::Premium => &mut self.premium,
        };
        *slot = required;
    }

    /// Flags with a requirement, in config order.
    pub fn required(&self) -> impl Iterator<Item = (StatusFlag, bool)> + '_ {
        StatusFlag::ALL
            .into_iter()
            .filter_map(|flag| self.get(flag).map(|v| (flag, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.required().next().is_none()
    }
}
