//! Named filters and their transport config.
//!
//! A named filter travels as a single string: an optional `[name]` prefix
//! followed by the tree config, e.g. `[easy multis]AND(TYPE(multi),DIFFICULTY(-2))`.
//! Inside the brackets `]` and `\` are escaped with a backslash.

use crate::filter::{ConfigParser, FilterNode, FilterResult, ParseError, ParseOutcome};

/// A filter tree with a user-given name.
///
/// The name is the storage identity; two filters with the same name are
/// "the same filter" for overwrite purposes, and their serialized trees
/// decide whether an overwrite changes anything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedFilter {
    pub name: String,
    /// `None` means "no filter": every record passes.
    pub tree: Option<FilterNode>,
}

impl NamedFilter {
    pub fn new(name: impl Into<String>, tree: Option<FilterNode>) -> Self {
        Self {
            name: name.into(),
            tree,
        }
    }

    /// A filter without a name.
    pub fn unnamed(tree: Option<FilterNode>) -> Self {
        Self::new(String::new(), tree)
    }

    /// Returns true if the name is empty or whitespace only.
    pub fn has_blank_name(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// The name as shown to users.
    pub fn name_for_display(&self) -> &str {
        self.name.trim()
    }

    /// The serialized tree, without the name.
    pub fn tree_config(&self) -> String {
        self.tree.as_ref().map(FilterNode::to_config).unwrap_or_default()
    }

    /// The transport config: `[name]` prefix (if named) and the tree config.
    pub fn to_config(&self) -> String {
        let tree = self.tree_config();
        if self.name.is_empty() {
            return tree;
        }

        let mut out = String::with_capacity(self.name.len() + tree.len() + 2);
        out.push('[');
        for c in self.name.chars() {
            if c == ']' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push(']');
        out.push_str(&tree);
        out
    }

    /// Parses a transport config, skipping unknown kinds in the tree.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Parse` if the name prefix is unterminated or the
    /// tree config is malformed.
    pub fn from_config(config: &str) -> FilterResult<Self> {
        Self::parse(config).map(|(filter, _)| filter)
    }

    /// Like [`from_config`](Self::from_config), also returning the tags of
    /// skipped unknown kinds.
    ///
    /// # Errors
    ///
    /// See [`from_config`](Self::from_config).
    pub fn parse(config: &str) -> FilterResult<(Self, Vec<String>)> {
        let (name, rest) = split_name(config)?;
        let ParseOutcome { tree, skipped } = ConfigParser::parse(rest)?;
        Ok((Self { name, tree }, skipped))
    }
}

/// Splits off a leading `[name]`; no prefix yields an empty name.
fn split_name(config: &str) -> Result<(String, &str), ParseError> {
    let trimmed = config.trim_start();
    let Some(body) = trimmed.strip_prefix('[') else {
        return Ok((String::new(), config));
    };
    let start = config.len() - trimmed.len();

    let mut name = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            ']' => return Ok((name, &body[i + 1..])),
            '\\' => match chars.next() {
                Some((_, escaped)) => name.push(escaped),
                None => break,
            },
            _ => name.push(c),
        }
    }
    Err(ParseError::UnterminatedQuote { position: start })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterError, LeafCriterion};
    use crate::geocache::CacheType;

    fn multi_tree() -> FilterNode {
        FilterNode::and(vec![FilterNode::leaf(LeafCriterion::types([CacheType::Multi]))])
    }

    #[test]
    fn test_to_config_with_name() {
        let filter = NamedFilter::new("multis", Some(multi_tree()));
        assert_eq!(filter.to_config(), "[multis]AND(TYPE(multi))");
    }

    #[test]
    fn test_to_config_without_name() {
        let filter = NamedFilter::unnamed(Some(multi_tree()));
        assert_eq!(filter.to_config(), "AND(TYPE(multi))");
        assert_eq!(NamedFilter::default().to_config(), "");
    }

    #[test]
    fn test_name_escaping_roundtrip() {
        let filter = NamedFilter::new(r"odd ]name\ [x]", Some(multi_tree()));
        let config = filter.to_config();
        assert_eq!(config, r"[odd \]name\\ [x\]]AND(TYPE(multi))");
        assert_eq!(NamedFilter::from_config(&config).unwrap(), filter);
    }

    #[test]
    fn test_named_without_tree() {
        let filter = NamedFilter::from_config("[nothing]").unwrap();
        assert_eq!(filter.name, "nothing");
        assert!(filter.tree.is_none());
    }

    #[test]
    fn test_unterminated_name() {
        let err = NamedFilter::from_config("[broken AND()").unwrap_err();
        assert_eq!(
            err,
            FilterError::Parse(ParseError::UnterminatedQuote { position: 0 })
        );
    }

    #[test]
    fn test_parse_reports_skipped() {
        let (filter, skipped) = NamedFilter::parse("[x]OR(TYPE(multi),LOGS(5))").unwrap();
        assert_eq!(skipped, vec!["LOGS".to_string()]);
        assert_eq!(filter.tree.unwrap().children().len(), 1);
    }

    #[test]
    fn test_blank_name() {
        assert!(NamedFilter::new("  ", None).has_blank_name());
        assert!(!NamedFilter::new(" a ", None).has_blank_name());
        assert_eq!(NamedFilter::new(" a ", None).name_for_display(), "a");
    }
}
