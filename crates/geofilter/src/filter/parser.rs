//! Recursive descent parser for filter config strings.

use tracing::debug;

use super::ast::{FilterNode, LogicalOp, INCONCLUSIVE_TAG, NOT_TAG};
use super::codec::decode_leaf;
use super::error::{FilterError, FilterResult, ParseError};
use super::kind::LeafKind;
use super::lexer::{ConfigToken, Lexer, PositionedToken};

/// Result of a lenient parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// The parsed tree; `None` means "no filter".
    pub tree: Option<FilterNode>,
    /// Tags of nodes that were skipped because their kind is unknown, in
    /// input order.
    pub skipped: Vec<String>,
}

impl ParseOutcome {
    /// Returns true if nothing was dropped while parsing.
    pub fn is_lossless(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Deepest node nesting accepted; the root is at depth 1.
pub const MAX_DEPTH: usize = 100;

/// What a node tag names.
enum NodeTag {
    Logical(LogicalOp),
    Not,
    Inconclusive,
    Leaf(LeafKind),
    Unknown,
}

impl NodeTag {
    fn classify(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case(LogicalOp::And.tag()) {
            NodeTag::Logical(LogicalOp::And)
        } else if tag.eq_ignore_ascii_case(LogicalOp::Or.tag()) {
            NodeTag::Logical(LogicalOp::Or)
        } else if tag.eq_ignore_ascii_case(NOT_TAG) {
            NodeTag::Not
        } else if tag.eq_ignore_ascii_case(INCONCLUSIVE_TAG) {
            NodeTag::Inconclusive
        } else {
            LeafKind::from_tag(tag).map_or(NodeTag::Unknown, NodeTag::Leaf)
        }
    }
}

/// Parser for filter config strings.
///
/// # Grammar
///
/// ```text
/// config ::= "" | node
/// node   ::= TAG "(" args? ")"
/// args   ::= arg ("," arg)*
/// arg    ::= node | param
/// param  ::= bare | quoted | ""
/// ```
///
/// Combinators (`AND`, `OR`, `NOT`, `INCONCLUSIVE`) take node arguments,
/// leaves take parameters. Tags are case-insensitive.
///
/// Nodes whose tag is not known are skipped along with everything inside
/// their parentheses, so configs written by newer versions still load. A
/// `NOT` or `INCONCLUSIVE` whose only child was skipped is dropped as well.
///
/// Nesting deeper than [`MAX_DEPTH`] is rejected, which bounds the
/// recursion of every later walk over the tree.
///
/// # Example
///
/// ```
/// use geofilter::filter::ConfigParser;
///
/// let outcome = ConfigParser::parse("AND(TYPE(multi),ATTRIBUTES(wheelchair),TERRAIN(-2))").unwrap();
/// assert_eq!(outcome.skipped, vec!["ATTRIBUTES".to_string()]);
/// assert_eq!(outcome.tree.unwrap().children().len(), 2);
/// ```
pub struct ConfigParser {
    tokens: Vec<PositionedToken>,
    position: usize,
    strict: bool,
    skipped: Vec<String>,
    depth: usize,
}

impl ConfigParser {
    /// Parses a config string, skipping unknown kinds.
    ///
    /// The empty (or all-whitespace) string parses to "no filter".
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Parse` when the input is malformed. A parse
    /// either succeeds completely or fails; it never yields part of a tree.
    pub fn parse(input: &str) -> FilterResult<ParseOutcome> {
        Self::run(input, false)
    }

    /// Parses a config string, refusing to drop anything.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigParser::parse`], plus `FilterError::UnknownKind` for
    /// the first tag this version does not know.
    pub fn parse_strict(input: &str) -> FilterResult<Option<FilterNode>> {
        Self::run(input, true).map(|outcome| outcome.tree)
    }

    fn run(input: &str, strict: bool) -> FilterResult<ParseOutcome> {
        let tokens = Lexer::new(input).tokenize()?;
        if tokens.is_empty() {
            return Ok(ParseOutcome {
                tree: None,
                skipped: Vec::new(),
            });
        }

        let mut parser = Self {
            tokens,
            position: 0,
            strict,
            skipped: Vec::new(),
            depth: 0,
        };
        let tree = parser.parse_node()?;

        if let Some(remaining) = parser.peek() {
            return Err(ParseError::TrailingInput {
                position: remaining.position,
            }
            .into());
        }

        Ok(ParseOutcome {
            tree,
            skipped: parser.skipped,
        })
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&PositionedToken> {
        self.tokens.get(self.position)
    }

    fn peek_token(&self) -> Option<&ConfigToken> {
        self.peek().map(|t| &t.token)
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Option<PositionedToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn unexpected(token: &PositionedToken) -> ParseError {
        ParseError::unexpected_token(token.token.describe(), token.position)
    }

    /// Consumes a node tag.
    fn expect_tag(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Some(PositionedToken {
                token: ConfigToken::Word(tag),
                ..
            }) => Ok(tag),
            Some(other) => Err(Self::unexpected(&other)),
            None => Err(ParseError::UnexpectedEndOfInput),
        }
    }

    fn expect_open_paren(&mut self) -> Result<(), ParseError> {
        match self.advance() {
            Some(PositionedToken {
                token: ConfigToken::OpenParen,
                ..
            }) => Ok(()),
            Some(other) => Err(Self::unexpected(&other)),
            None => Err(ParseError::UnexpectedEndOfInput),
        }
    }

    /// Consumes the `,` or `)` after an argument; returns true on `)`.
    fn expect_separator(&mut self) -> Result<bool, ParseError> {
        match self.advance() {
            Some(PositionedToken {
                token: ConfigToken::Comma,
                ..
            }) => Ok(false),
            Some(PositionedToken {
                token: ConfigToken::CloseParen,
                ..
            }) => Ok(true),
            Some(other) => Err(Self::unexpected(&other)),
            None => Err(ParseError::UnclosedParenthesis),
        }
    }

    /// Consumes `)` if it is next; used for empty argument lists.
    fn eat_close_paren(&mut self) -> bool {
        if self.peek_token() == Some(&ConfigToken::CloseParen) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Parses one node. `Ok(None)` means the node was skipped.
    fn parse_node(&mut self) -> FilterResult<Option<FilterNode>> {
        if self.depth == MAX_DEPTH {
            let position = self.peek().map_or(0, |t| t.position);
            return Err(ParseError::TooDeep { position }.into());
        }
        self.depth += 1;
        let node = self.parse_tagged_node();
        self.depth -= 1;
        node
    }

    fn parse_tagged_node(&mut self) -> FilterResult<Option<FilterNode>> {
        let tag = self.expect_tag()?;

        match NodeTag::classify(&tag) {
            NodeTag::Logical(op) => {
                self.expect_open_paren()?;
                let children = self.parse_children()?;
                Ok(Some(FilterNode::Logical {
                    op,
                    children: children.into_iter().flatten().collect(),
                }))
            }
            NodeTag::Not => Ok(self.parse_wrapper(NOT_TAG)?.map(FilterNode::negate)),
            NodeTag::Inconclusive => Ok(self
                .parse_wrapper(INCONCLUSIVE_TAG)?
                .map(FilterNode::include_inconclusive)),
            NodeTag::Leaf(kind) => {
                self.expect_open_paren()?;
                let params = self.parse_params()?;
                Ok(Some(FilterNode::leaf(decode_leaf(kind, &params)?)))
            }
            NodeTag::Unknown => {
                if self.strict {
                    return Err(FilterError::unknown_kind(tag));
                }
                self.skip_balanced()?;
                debug!(tag = %tag, "skipping unknown filter kind");
                self.skipped.push(tag);
                Ok(None)
            }
        }
    }

    /// Parses the argument list of NOT or INCONCLUSIVE.
    fn parse_wrapper(&mut self, tag: &'static str) -> FilterResult<Option<FilterNode>> {
        self.expect_open_paren()?;
        let mut children = self.parse_children()?;
        if children.len() != 1 {
            return Err(ParseError::WrongArity {
                tag,
                found: children.len(),
            }
            .into());
        }
        Ok(children.remove(0))
    }

    /// Parses node arguments up to and including `)`. Skipped nodes are
    /// kept as `None` so wrapper arity is checked against what was written.
    fn parse_children(&mut self) -> FilterResult<Vec<Option<FilterNode>>> {
        let mut children = Vec::new();
        if self.eat_close_paren() {
            return Ok(children);
        }
        loop {
            children.push(self.parse_node()?);
            if self.expect_separator()? {
                return Ok(children);
            }
        }
    }

    /// Parses leaf parameters up to and including `)`.
    fn parse_params(&mut self) -> Result<Vec<String>, ParseError> {
        let mut params = Vec::new();
        if self.eat_close_paren() {
            return Ok(params);
        }
        loop {
            let param = match self.peek_token() {
                Some(ConfigToken::Word(word)) => Some(word.clone()),
                Some(ConfigToken::Quoted(text)) => Some(text.clone()),
                // An empty parameter: the separator follows directly.
                Some(ConfigToken::Comma | ConfigToken::CloseParen) => None,
                Some(ConfigToken::OpenParen) => {
                    let token = self.tokens[self.position].clone();
                    return Err(Self::unexpected(&token));
                }
                None => return Err(ParseError::UnclosedParenthesis),
            };
            match param {
                Some(value) => {
                    self.position += 1;
                    params.push(value);
                }
                None => params.push(String::new()),
            }
            if self.expect_separator()? {
                return Ok(params);
            }
        }
    }

    /// Skips a parenthesized argument list of any content.
    fn skip_balanced(&mut self) -> Result<(), ParseError> {
        self.expect_open_paren()?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance() {
                Some(PositionedToken {
                    token: ConfigToken::OpenParen,
                    ..
                }) => depth += 1,
                Some(PositionedToken {
                    token: ConfigToken::CloseParen,
                    ..
                }) => depth -= 1,
                Some(_) => {}
                None => return Err(ParseError::UnclosedParenthesis),
            }
        }
        Ok(())
    }
}
