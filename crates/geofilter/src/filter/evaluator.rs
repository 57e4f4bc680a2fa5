//! Tri-state filter evaluation against cache records.
//!
//! Every node evaluates to an [`Outcome`]. A leaf whose attribute is missing
//! from the record yields [`Outcome::Inconclusive`]; combinators propagate it
//! with Kleene semantics, and the INCONCLUSIVE wrapper turns it into a match.
//! A record is selected only when the root evaluates to [`Outcome::Match`].
//!
//! # Example
//!
//! ```
//! use geofilter::filter::{FilterEvaluator, FilterNode, Outcome};
//! use geofilter::geocache::Geocache;
//!
//! let tree = FilterNode::from_config("AND(TYPE(multi),DIFFICULTY(-3))").unwrap();
//! let evaluator = FilterEvaluator::new(tree.as_ref());
//!
//! let mut cache = Geocache::new("GC1");
//! cache.cache_type = Some(geofilter::geocache::CacheType::Multi);
//! // Difficulty is unknown, so the AND cannot decide.
//! assert_eq!(evaluator.evaluate(&cache), Outcome::Inconclusive);
//! assert!(!evaluator.matches(&cache));
//! ```

use rayon::prelude::*;
use serde::Serialize;

use super::ast::{FilterNode, LogicalOp};
use super::leaf::{LeafCriterion, StatusCriteria};
use crate::geocache::CacheRecord;
use crate::named::NamedFilter;

/// The result of evaluating a node against one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Match,
    NoMatch,
    Inconclusive,
}

impl Outcome {
    /// Converts a decided predicate.
    pub fn from_bool(matched: bool) -> Self {
        if matched {
            Outcome::Match
        } else {
            Outcome::NoMatch
        }
    }

    /// Three-valued conjunction.
    pub fn and(self, other: Outcome) -> Outcome {
        match (self, other) {
            (Outcome::NoMatch, _) | (_, Outcome::NoMatch) => Outcome::NoMatch,
            (Outcome::Match, Outcome::Match) => Outcome::Match,
            _ => Outcome::Inconclusive,
        }
    }

    /// Three-valued disjunction.
    pub fn or(self, other: Outcome) -> Outcome {
        match (self, other) {
            (Outcome::Match, _) | (_, Outcome::Match) => Outcome::Match,
            (Outcome::NoMatch, Outcome::NoMatch) => Outcome::NoMatch,
            _ => Outcome::Inconclusive,
        }
    }

    /// Three-valued negation; inconclusive stays inconclusive.
    pub fn negate(self) -> Outcome {
        match self {
            Outcome::Match => Outcome::NoMatch,
            Outcome::NoMatch => Outcome::Match,
            Outcome::Inconclusive => Outcome::Inconclusive,
        }
    }

    /// Treats an inconclusive result as a match.
    pub fn include_inconclusive(self) -> Outcome {
        match self {
            Outcome::Inconclusive => Outcome::Match,
            decided => decided,
        }
    }

    pub fn is_match(self) -> bool {
        self == Outcome::Match
    }

    /// Lower-case label for display.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Match => "match",
            Outcome::NoMatch => "no match",
            Outcome::Inconclusive => "inconclusive",
        }
    }
}

/// Evaluates `node` against `record`.
pub fn evaluate<R: CacheRecord + ?Sized>(node: &FilterNode, record: &R) -> Outcome {
    match node {
        FilterNode::Leaf(criterion) => evaluate_leaf(criterion, record),
        FilterNode::Logical {
            op: LogicalOp::And,
            children,
        } => {
            let mut result = Outcome::Match;
            for child in children {
                match evaluate(child, record) {
                    Outcome::NoMatch => return Outcome::NoMatch,
                    other => result = result.and(other),
                }
            }
            result
        }
        FilterNode::Logical {
            op: LogicalOp::Or,
            children,
        } => {
            let mut result = Outcome::NoMatch;
            for child in children {
                match evaluate(child, record) {
                    Outcome::Match => return Outcome::Match,
                    other => result = result.or(other),
                }
            }
            result
        }
        FilterNode::Not(inner) => evaluate(inner, record).negate(),
        FilterNode::Inconclusive(inner) => evaluate(inner, record).include_inconclusive(),
    }
}

/// Decides a leaf; a missing attribute is inconclusive unless the leaf is
/// unconstrained.
fn evaluate_leaf<R: CacheRecord + ?Sized>(criterion: &LeafCriterion, record: &R) -> Outcome {
    if criterion.is_unconstrained() {
        return Outcome::Match;
    }

    let decided = match criterion {
        LeafCriterion::Type(types) => record.cache_type().map(|t| types.contains(&t)),
        LeafCriterion::Size(sizes) => record.size().map(|s| sizes.contains(&s)),
        LeafCriterion::Difficulty(range) => record.difficulty().map(|d| range.contains(d)),
        LeafCriterion::Terrain(range) => record.terrain().map(|t| range.contains(t)),
        LeafCriterion::Name(text) => record.name().map(|n| text.matches(n)),
        LeafCriterion::Owner(text) => record.owner().map(|o| text.matches(o)),
        LeafCriterion::Description(text) => record.description().map(|d| text.matches(d)),
        LeafCriterion::Favorites(range) => record.favorites().map(|f| range.contains(f)),
        LeafCriterion::Distance(distance) => record.coords().map(|c| distance.contains(&c)),
        LeafCriterion::Hidden(dates) => record.hidden().map(|d| dates.contains(d)),
        LeafCriterion::Status(status) => return evaluate_status(status, record),
    };

    decided.map_or(Outcome::Inconclusive, Outcome::from_bool)
}

/// Every required flag must hold; an unknown flag is inconclusive.
fn evaluate_status<R: CacheRecord + ?Sized>(status: &StatusCriteria, record: &R) -> Outcome {
    status
        .required()
        .map(|(flag, wanted)| {
            record
                .flag(flag)
                .map_or(Outcome::Inconclusive, |actual| Outcome::from_bool(actual == wanted))
        })
        .fold(Outcome::Match, Outcome::and)
}

/// Evaluator for a single filter tree.
///
/// "No filter" selects every record.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    filter: Option<&'a FilterNode>,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new evaluator for an optional tree.
    pub fn new(filter: Option<&'a FilterNode>) -> Self {
        Self { filter }
    }

    /// Creates an evaluator for a named filter.
    pub fn for_filter(filter: &'a NamedFilter) -> Self {
        Self::new(filter.tree.as_ref())
    }

    /// Evaluates the root against `record`.
    pub fn evaluate<R: CacheRecord + ?Sized>(&self, record: &R) -> Outcome {
        self.filter
            .map_or(Outcome::Match, |root| evaluate(root, record))
    }

    /// Returns true if `record` is selected.
    pub fn matches<R: CacheRecord + ?Sized>(&self, record: &R) -> bool {
        self.evaluate(record).is_match()
    }

    /// Returns the selected records, in input order.
    pub fn filter_records<'b, R: CacheRecord>(&self, records: &'b [R]) -> Vec<&'b R> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }

    /// Like [`filter_records`](Self::filter_records), spread over the rayon
    /// pool. The tree is shared read-only; input order is preserved.
    pub fn par_filter_records<'b, R: CacheRecord + Sync>(&self, records: &'b [R]) -> Vec<&'b R> {
        records.par_iter().filter(|r| self.matches(*r)).collect()
    }

    /// Pairs every record with its outcome.
    pub fn outcomes<'b, R: CacheRecord>(&self, records: &'b [R]) -> Vec<(&'b R, Outcome)> {
        records.iter().map(|r| (r, self.evaluate(r))).collect()
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
