//! Lexer (tokenizer) for filter config strings.

use std::iter::Peekable;
use std::str::CharIndices;

use super::error::ParseError;

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: ConfigToken,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// A token in a config string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigToken {
    /// A bare word: node tags and unquoted parameters.
    Word(String),

    /// A single-quoted parameter, with escapes resolved.
    Quoted(String),

    /// Opening parenthesis `(`.
    OpenParen,

    /// Closing parenthesis `)`.
    CloseParen,

    /// Argument separator `,`.
    Comma,
}

impl ConfigToken {
    /// Renders the token for error messages.
    pub fn describe(&self) -> String {
        match self {
            ConfigToken::Word(word) => format!("'{word}'"),
            ConfigToken::Quoted(text) => format!("quoted '{text}'"),
            ConfigToken::OpenParen => "'('".to_string(),
            ConfigToken::CloseParen => "')'".to_string(),
            ConfigToken::Comma => "','".to_string(),
        }
    }
}

/// Returns true for characters allowed in a bare word.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '+' | '-')
}

/// Lexer for tokenizing config strings.
pub struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            len: input.len(),
        }
    }

    /// Current byte offset.
    fn position(&mut self) -> usize {
        self.chars.peek().map_or(self.len, |&(i, _)| i)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some((_, c)) = self.chars.next_if(|&(_, c)| is_word_char(c)) {
            word.push(c);
        }
        word
    }

    /// Reads a `'...'` string; the opening quote is at `start`.
    fn read_quoted(&mut self, start: usize) -> Result<String, ParseError> {
        self.chars.next();

        let mut text = String::new();
        loop {
            match self.chars.next() {
                Some((_, '\'')) => return Ok(text),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, escaped)) => text.push(escaped),
                    None => return Err(ParseError::UnterminatedQuote { position: start }),
                },
                Some((_, c)) => text.push(c),
                None => return Err(ParseError::UnterminatedQuote { position: start }),
            }
        }
    }

    /// Returns the next token, `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnexpectedCharacter` for a character that cannot
    /// start a token and `ParseError::UnterminatedQuote` for an open quote.
    pub fn next_token(&mut self) -> Result<Option<PositionedToken>, ParseError> {
        self.skip_whitespace();

        let position = self.position();
        let Some(&(_, c)) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match c {
            '(' => {
                self.chars.next();
                ConfigToken::OpenParen
            }
            ')' => {
                self.chars.next();
                ConfigToken::CloseParen
            }
            ',' => {
                self.chars.next();
                ConfigToken::Comma
            }
            '\'' => ConfigToken::Quoted(self.read_quoted(position)?),
            c if is_word_char(c) => ConfigToken::Word(self.read_word()),
            other => {
                return Err(ParseError::UnexpectedCharacter {
                    character: other,
                    position,
                })
            }
        };

        Ok(Some(PositionedToken { token, position }))
    }

    /// Tokenizes the whole input.
    ///
    /// # Errors
    ///
    /// Fails on the first character that cannot be tokenized.
    pub fn tokenize(mut self) -> Result<Vec<PositionedToken>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<ConfigToken> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_tokenize_leaf() {
        assert_eq!(
            tokens("DIFFICULTY(1-3)"),
            vec![
                ConfigToken::Word("DIFFICULTY".into()),
                ConfigToken::OpenParen,
                ConfigToken::Word("1-3".into()),
                ConfigToken::CloseParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_skips_whitespace() {
        assert_eq!(
            tokens("  AND ( TYPE(multi) ,\tNOT(x) )\n"),
            tokens("AND(TYPE(multi),NOT(x))")
        );
    }

    #[test]
    fn test_tokenize_quoted_with_escapes() {
        assert_eq!(
            tokens(r"NAME(contains,'it\'s (a) test\\')"),
            vec![
                ConfigToken::Word("NAME".into()),
                ConfigToken::OpenParen,
                ConfigToken::Word("contains".into()),
                ConfigToken::Comma,
                ConfigToken::Quoted(r"it's (a) test\".into()),
                ConfigToken::CloseParen,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let toks = Lexer::new("OR( X )").tokenize().unwrap();
        let positions: Vec<usize> = toks.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("TYPE(multi)&").tokenize().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedCharacter {
                character: '&',
                position: 11
            }
        );
    }

    #[test]
    fn test_unterminated_quote() {
        let err = Lexer::new("NAME(contains,'abc").tokenize().unwrap_err();
        assert_eq!(err, ParseError::UnterminatedQuote { position: 14 });
    }
}
