//! Token types for the filter lexer.

use std::fmt;

use super::Span;

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Unsigned decimal literal without leading zero (e.g., 42)
    Number(i64),
    /// Double-quoted string with escapes resolved (e.g., "hello")
    String(String),
    /// One of the configured separator characters
    Separator(char),
    /// Index of a keyword in the lexer's keyword table
    Operator(usize),
    /// Any other run of non-whitespace, non-separator characters
    Symbol(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number {n}"),
            Self::String(s) => write!(f, "string {s:?}"),
            Self::Separator(c) => write!(f, "separator '{c}'"),
            Self::Operator(index) => write!(f, "operator #{index}"),
            Self::Symbol(s) => write!(f, "symbol {s}"),
        }
    }
}

/// A token with its span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source text.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the starting code-point offset of the token.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.span.start
    }

    /// Returns true if this is the given separator.
    #[must_use]
    pub fn is_separator(&self, separator: char) -> bool {
        self.kind == TokenKind::Separator(separator)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.span.start)
    }
}
