//! Error types for filter construction and config parsing.

use thiserror::Error;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while building or parsing a filter tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A NOT or INCONCLUSIVE node was built with the wrong number of children.
    #[error("{node} requires exactly one child, got {found}")]
    Structure {
        /// The node tag (`NOT` or `INCONCLUSIVE`).
        node: &'static str,
        /// The number of children supplied.
        found: usize,
    },

    /// A leaf parameter is outside its domain.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Human readable description of the violated constraint.
        reason: String,
    },

    /// The config string is malformed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A tag that this version does not know was met by the strict parser.
    #[error("unknown filter kind: {tag}")]
    UnknownKind {
        /// The unrecognized tag, as written.
        tag: String,
    },
}

impl FilterError {
    /// Creates a structure (arity) error.
    pub fn structure(node: &'static str, found: usize) -> Self {
        FilterError::Structure { node, found }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        FilterError::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Creates an unknown kind error.
    pub fn unknown_kind(tag: impl Into<String>) -> Self {
        FilterError::UnknownKind { tag: tag.into() }
    }

    /// Returns true if this error means the input could not be parsed at all.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, FilterError::Parse(_))
    }
}

/// Reasons a config string is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A character that cannot start any token.
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Byte offset in the input.
        position: usize,
    },

    /// A quoted parameter or filter name was never closed.
    #[error("unterminated quote starting at position {position}")]
    UnterminatedQuote {
        /// Byte offset of the opening quote.
        position: usize,
    },

    /// A token that is not valid at this point of the grammar.
    #[error("unexpected token {token} at position {position}")]
    UnexpectedToken {
        /// Debug rendering of the token.
        token: String,
        /// Byte offset in the input.
        position: usize,
    },

    /// The input ended in the middle of a node.
    #[error("unexpected end of config")]
    UnexpectedEndOfInput,

    /// An opening parenthesis without its closing partner.
    #[error("unclosed parenthesis")]
    UnclosedParenthesis,

    /// Tokens left over after the root node.
    #[error("trailing input at position {position}")]
    TrailingInput {
        /// Byte offset of the first unconsumed token.
        position: usize,
    },

    /// Leaf parameters that do not decode for the declared kind.
    #[error("malformed {tag} parameters: {reason}")]
    MalformedParameter {
        /// The leaf tag.
        tag: String,
        /// What went wrong.
        reason: String,
    },

    /// NOT or INCONCLUSIVE written with zero or several children.
    #[error("{tag} takes exactly one child, found {found}")]
    WrongArity {
        /// The wrapper tag.
        tag: &'static str,
        /// Number of children written.
        found: usize,
    },

    /// Nodes nested deeper than the parser accepts.
    #[error("filter nested too deeply at position {position} (limit {})", super::parser::MAX_DEPTH)]
    TooDeep {
        /// Byte offset of the first node past the limit.
        position: usize,
    },
}

impl ParseError {
    /// Creates an unexpected token error.
    pub fn unexpected_token(token: impl Into<String>, position: usize) -> Self {
        ParseError::UnexpectedToken {
            token: token.into(),
            position,
        }
    }

    /// Creates a malformed parameter error.
    pub fn malformed(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::MalformedParameter {
            tag: tag.into(),
            reason: reason.into(),
        }
    }
}
