//! Lexer error types.

/// A lexical error. The lexer stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// A number with a leading zero, or one that does not fit in `i64`.
    #[error("invalid number: {reason}")]
    InvalidNumber {
        /// Start of the offending number.
        position: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Input ended inside a quoted string.
    #[error("unclosed string")]
    UnclosedString {
        /// Position of the opening quote.
        position: usize,
    },
}

impl LexError {
    /// Returns the position the error refers to.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::InvalidNumber { position, .. } | Self::UnclosedString { position } => *position,
        }
    }
}
