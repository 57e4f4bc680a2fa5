//! The filter expression tree.

use std::fmt;

use super::error::{FilterError, FilterResult};
use super::kind::LeafKind;
use super::leaf::LeafCriterion;

/// Combinator of a [`FilterNode::Logical`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    /// The tag written in config strings.
    pub fn tag(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A node of a filter expression tree.
///
/// Parents own their children exclusively; nodes are plain values and are
/// replaced rather than mutated when edited.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// An atomic predicate over one record attribute.
    Leaf(LeafCriterion),

    /// AND/OR over an ordered list of children (possibly empty).
    Logical {
        op: LogicalOp,
        children: Vec<FilterNode>,
    },

    /// Negation of exactly one child.
    Not(Box<FilterNode>),

    /// Turns an inconclusive result of its child into a match.
    Inconclusive(Box<FilterNode>),
}

/// Tag of a NOT node in config strings.
pub const NOT_TAG: &str = "NOT";

/// Tag of an INCONCLUSIVE node in config strings.
pub const INCONCLUSIVE_TAG: &str = "INCONCLUSIVE";

impl FilterNode {
    /// Creates a leaf node.
    pub fn leaf(criterion: LeafCriterion) -> Self {
        FilterNode::Leaf(criterion)
    }

    /// Creates an AND node over `children`.
    ///
    /// # Example
    ///
    /// ```
    /// use geofilter::filter::{FilterNode, LeafCriterion};
    /// use geofilter::geocache::CacheType;
    ///
    /// let node = FilterNode::and(vec![FilterNode::leaf(LeafCriterion::types([CacheType::Multi]))]);
    /// assert_eq!(node.children().len(), 1);
    /// ```
    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterNode::Logical {
            op: LogicalOp::And,
            children,
        }
    }

    /// Creates an OR node over `children`.
    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterNode::Logical {
            op: LogicalOp::Or,
            children,
        }
    }

    /// Wraps `inner` in a NOT node.
    pub fn negate(inner: FilterNode) -> Self {
        FilterNode::Not(Box::new(inner))
    }

    /// Wraps `inner` in an INCONCLUSIVE node.
    pub fn include_inconclusive(inner: FilterNode) -> Self {
        FilterNode::Inconclusive(Box::new(inner))
    }

    /// Builds a NOT node from a child list, as an editor would.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Structure` unless exactly one child is given.
    pub fn not_of(children: Vec<FilterNode>) -> FilterResult<Self> {
        Ok(Self::negate(single_child(NOT_TAG, children)?))
    }

    /// Builds an INCONCLUSIVE node from a child list.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Structure` unless exactly one child is given.
    pub fn inconclusive_of(children: Vec<FilterNode>) -> FilterResult<Self> {
        Ok(Self::include_inconclusive(single_child(
            INCONCLUSIVE_TAG,
            children,
        )?))
    }

    /// Returns the leaf criterion if this is a leaf.
    pub fn as_leaf(&self) -> Option<&LeafCriterion> {
        match self {
            FilterNode::Leaf(criterion) => Some(criterion),
            _ => None,
        }
    }

    /// The leaf kind, if this is a leaf.
    pub fn kind(&self) -> Option<LeafKind> {
        self.as_leaf().map(LeafCriterion::kind)
    }

    /// The direct children of this node.
    pub fn children(&self) -> &[FilterNode] {
        match self {
            FilterNode::Leaf(_) => &[],
            FilterNode::Logical { children, .. } => children,
            FilterNode::Not(inner) | FilterNode::Inconclusive(inner) => std::slice::from_ref(&**inner),
        }
    }

    /// All leaves of the tree in depth-first order.
    pub fn leaves(&self) -> Vec<&LeafCriterion> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafCriterion>) {
        match self {
            FilterNode::Leaf(criterion) => out.push(criterion),
            _ => {
                for child in self.children() {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Height of the tree; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(FilterNode::depth).max().unwrap_or(0)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(FilterNode::node_count).sum::<usize>()
    }
}

fn single_child(node: &'static str, mut children: Vec<FilterNode>) -> FilterResult<FilterNode> {
    if children.len() != 1 {
        return Err(FilterError::structure(node, children.len()));
    }
    Ok(children.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocache::CacheType;

    fn type_leaf() -> FilterNode {
        FilterNode::leaf(LeafCriterion::types([CacheType::Multi]))
    }

    #[test]
    fn test_not_of_requires_exactly_one_child() {
        assert_eq!(
            FilterNode::not_of(vec![]).unwrap_err(),
            FilterError::structure("NOT", 0)
        );
        assert_eq!(
            FilterNode::not_of(vec![type_leaf(), type_leaf()]).unwrap_err(),
            FilterError::structure("NOT", 2)
        );
        assert_eq!(
            FilterNode::not_of(vec![type_leaf()]).unwrap(),
            FilterNode::negate(type_leaf())
        );
    }

    #[test]
    fn test_inconclusive_of_requires_exactly_one_child() {
        assert!(matches!(
            FilterNode::inconclusive_of(vec![]),
            Err(FilterError::Structure { node: "INCONCLUSIVE", found: 0 })
        ));
        assert!(FilterNode::inconclusive_of(vec![type_leaf()]).is_ok());
    }

    #[test]
    fn test_children_and_leaves() {
        let tree = FilterNode::include_inconclusive(FilterNode::negate(FilterNode::and(vec![
            type_leaf(),
            FilterNode::or(vec![FilterNode::leaf(LeafCriterion::any(LeafKind::Terrain))]),
        ])));

        assert_eq!(tree.children().len(), 1);
        let kinds: Vec<LeafKind> = tree.leaves().iter().map(|l| l.kind()).collect();
        assert_eq!(kinds, vec![LeafKind::Type, LeafKind::Terrain]);
        assert_eq!(tree.depth(), 5);
        assert_eq!(tree.node_count(), 6);
    }

    #[test]
    fn test_kind_of_leaf_only() {
        assert_eq!(type_leaf().kind(), Some(LeafKind::Type));
        assert_eq!(FilterNode::negate(type_leaf()).kind(), None);
    }

    #[test]
    fn test_nodes_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FilterNode>();
        assert_send_sync::<LeafCriterion>();
    }

    #[test]
    fn test_empty_logical_is_allowed() {
        let node = FilterNode::or(vec![]);
        assert!(node.children().is_empty());
        assert_eq!(node.depth(), 1);
    }
}
