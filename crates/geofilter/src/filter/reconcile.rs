//! Basic/advanced mode reconciliation.
//!
//! Advanced mode edits any tree. Basic mode edits exactly one leaf of each
//! kind in [`LeafKind::BASIC`], ANDed together, with no name and no
//! wrappers. Switching to basic is a pure function over the tree; callers
//! check [`is_basic_expressible`] (or inspect [`basic_loss`]) first and ask
//! the user before switching when something would be dropped.

use super::ast::{FilterNode, LogicalOp};
use super::kind::LeafKind;
use super::leaf::LeafCriterion;
use crate::named::NamedFilter;

/// The editor's view of a tree: root flags plus the top-level items.
///
/// Canonical trees have the shape `[INCONCLUSIVE(] [NOT(] AND|OR(items) [)] [)]`.
/// A root that is not a combinator is treated as a single AND item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterForm {
    pub include_inconclusive: bool,
    pub inverse: bool,
    /// Items are ORed instead of ANDed.
    pub or: bool,
    pub items: Vec<FilterNode>,
}

impl FilterForm {
    /// Decomposes a tree.
    pub fn from_tree(tree: Option<&FilterNode>) -> Self {
        let mut form = Self::default();
        let Some(mut node) = tree else {
            return form;
        };

        if let FilterNode::Inconclusive(inner) = node {
            form.include_inconclusive = true;
            node = &**inner;
        }
        if let FilterNode::Not(inner) = node {
            form.inverse = true;
            node = &**inner;
        }
        match node {
            FilterNode::Logical { op, children } => {
                form.or = *op == LogicalOp::Or;
                form.items = children.clone();
            }
            other => form.items = vec![other.clone()],
        }
        form
    }

    /// Rebuilds the canonical tree; no items means no filter.
    pub fn to_tree(&self) -> Option<FilterNode> {
        if self.items.is_empty() {
            return None;
        }

        let mut node = if self.or {
            FilterNode::or(self.items.clone())
        } else {
            FilterNode::and(self.items.clone())
        };
        if self.inverse {
            node = FilterNode::negate(node);
        }
        if self.include_inconclusive {
            node = FilterNode::include_inconclusive(node);
        }
        Some(node)
    }

    /// Flags and items fit basic mode: no root flag set, only basic leaves,
    /// no kind twice.
    pub fn fits_basic(&self) -> bool {
        if self.include_inconclusive || self.inverse || self.or {
            return false;
        }

        let mut seen = Vec::with_capacity(LeafKind::BASIC.len());
        self.items.iter().all(|item| match item.as_leaf() {
            Some(leaf) if leaf.kind().is_basic() && !seen.contains(&leaf.kind()) => {
                seen.push(leaf.kind());
                true
            }
            _ => false,
        })
    }
}

/// Returns true if switching `filter` to basic mode loses nothing.
pub fn is_basic_expressible(filter: &NamedFilter) -> bool {
    filter.has_blank_name() && FilterForm::from_tree(filter.tree.as_ref()).fits_basic()
}

/// Converts a tree to its basic form: `AND(type, difficulty, terrain)`.
///
/// Each slot reuses the first top-level leaf of its kind unchanged, or the
/// unconstrained default if there is none. Everything else is discarded.
pub fn to_basic(tree: Option<&FilterNode>) -> FilterNode {
    let form = FilterForm::from_tree(tree);
    let slots = LeafKind::BASIC
        .into_iter()
        .map(|kind| {
            form.items
                .iter()
                .filter_map(FilterNode::as_leaf)
                .find(|leaf| leaf.kind() == kind)
                .cloned()
                .unwrap_or_else(|| LeafCriterion::any(kind))
        })
        .map(FilterNode::leaf)
        .collect();
    FilterNode::and(slots)
}

/// Converts a named filter to basic mode, clearing the name.
pub fn to_basic_named(filter: &NamedFilter) -> NamedFilter {
    NamedFilter::unnamed(Some(to_basic(filter.tree.as_ref())))
}

/// Switching to advanced mode keeps the tree as it is.
pub fn to_advanced(tree: Option<&FilterNode>) -> Option<FilterNode> {
    tree.cloned()
}

/// What a switch to basic mode would drop.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BasicLoss {
    /// The non-blank name that would be cleared.
    pub name: Option<String>,
    pub include_inconclusive: bool,
    pub inverse: bool,
    pub or: bool,
    /// Top-level items not reused by any basic slot, in order.
    pub dropped: Vec<FilterNode>,
}

impl BasicLoss {
    /// Returns true if the switch is lossless.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && !self.include_inconclusive
            && !self.inverse
            && !self.or
            && self.dropped.is_empty()
    }

    /// One line per lost feature, for confirmation prompts.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(name) = &self.name {
            lines.push(format!("name '{name}'"));
        }
        if self.include_inconclusive {
            lines.push("include inconclusive".to_string());
        }
        if self.inverse {
            lines.push("inverse (NOT)".to_string());
        }
        if self.or {
            lines.push("OR combination".to_string());
        }
        lines.extend(self.dropped.iter().map(describe_item));
        lines
    }
}

fn describe_item(item: &FilterNode) -> String {
    match item {
        FilterNode::Leaf(leaf) => format!("{} criterion", leaf.kind().display_name()),
        FilterNode::Logical { op, children } => {
            format!("nested {op} group ({} items)", children.len())
        }
        FilterNode::Not(_) => "nested NOT group".to_string(),
        FilterNode::Inconclusive(_) => "nested INCONCLUSIVE group".to_string(),
    }
}

/// Lists what [`to_basic_named`] would drop from `filter`.
pub fn basic_loss(filter: &NamedFilter) -> BasicLoss {
    let form = FilterForm::from_tree(filter.tree.as_ref());

    let mut used = Vec::with_capacity(LeafKind::BASIC.len());
    let dropped = form
        .items
        .iter()
        .filter(|item| match item.as_leaf() {
            Some(leaf) if leaf.kind().is_basic() && !used.contains(&leaf.kind()) => {
                used.push(leaf.kind());
                false
            }
            _ => true,
        })
        .cloned()
        .collect();

    BasicLoss {
        name: (!filter.has_blank_name()).then(|| filter.name.clone()),
        include_inconclusive: form.include_inconclusive,
        inverse: form.inverse,
        or: form.or,
        dropped,
    }
}
