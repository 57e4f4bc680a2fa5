//! Filter expression trees: construction, config codec, evaluation and
//! basic/advanced mode reconciliation.
//!
//! A filter is a tree of [`FilterNode`]s. Leaves hold a typed
//! [`LeafCriterion`] over one geocache attribute; inner nodes combine their
//! children with AND/OR, negate a single child, or turn an inconclusive child
//! into a match.
//!
//! # Config Syntax
//!
//! Trees serialize to a compact, versionless string:
//!
//! - `AND(...)`, `OR(...)` - combinators over any number of children
//! - `NOT(x)` - negation of exactly one child
//! - `INCONCLUSIVE(x)` - treat "cannot decide" as a match
//! - `TYPE(multi,mystery)`, `SIZE(micro)` - value sets
//! - `DIFFICULTY(1-3)`, `TERRAIN(4-)`, `FAVORITES(-10)` - inclusive ranges
//! - `NAME(contains,'mill')`, `OWNER(equals,'Bob',case)` - text matches
//! - `DISTANCE(52.5,13.4,-5)` - kilometers from a point
//! - `HIDDEN(2020-01-01,)` - date range
//! - `STATUS(found:no,archived:no)` - status flags
//!
//! Tags are case-insensitive when read and written upper-case. Unknown tags
//! are skipped with their arguments.
//!
//! # Example
//!
//! ```
//! use geofilter::filter::{FilterEvaluator, FilterNode, Outcome};
//! use geofilter::geocache::{CacheType, Geocache};
//!
//! let tree = FilterNode::from_config("AND(TYPE(multi), NOT(TERRAIN(4-5)))")
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(tree.to_config(), "AND(TYPE(multi),NOT(TERRAIN(4-5)))");
//!
//! let cache = Geocache {
//!     cache_type: Some(CacheType::Multi),
//!     terrain: Some(2.0),
//!     ..Geocache::new("GC42")
//! };
//! assert_eq!(FilterEvaluator::new(Some(&tree)).evaluate(&cache), Outcome::Match);
//! ```

mod ast;
mod codec;
mod error;
mod evaluator;
mod kind;
pub mod leaf;
mod lexer;
mod parser;
mod reconcile;

pub use ast::{FilterNode, LogicalOp, INCONCLUSIVE_TAG, NOT_TAG};
pub use codec::{quote, to_config, to_config_opt};
pub use error::{FilterError, FilterResult, ParseError};
pub use evaluator::{evaluate, FilterEvaluator, Outcome};
pub use kind::LeafKind;
pub use leaf::{LeafCriterion, TextMode};
pub use parser::{ConfigParser, ParseOutcome, MAX_DEPTH};
pub use reconcile::{
    basic_loss, is_basic_expressible, to_advanced, to_basic, to_basic_named, BasicLoss, FilterForm,
};

#[cfg(test)]
mod tests;
