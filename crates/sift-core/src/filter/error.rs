//! Error types for filter compilation.

use std::fmt;

use super::{Operator, ValueType};
use crate::lexer::LexError;

/// Boxed error returned by date parsers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while building a compiler or parsing a filter.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// The filter text is not a valid predicate for the schema.
    #[error(
        "invalid expression: {cause}{}",
        .position.map(|p| format!(" at position {p}")).unwrap_or_default()
    )]
    InvalidExpression {
        /// What was wrong.
        cause: ExprErrorKind,
        /// Code-point offset of the offending token, when known.
        position: Option<usize>,
    },

    /// The schema handed to the compiler is unusable.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

impl FilterError {
    pub(crate) const fn at(cause: ExprErrorKind, position: usize) -> Self {
        Self::InvalidExpression {
            cause,
            position: Some(position),
        }
    }

    /// Returns true if the error is caused by user input rather than by the
    /// schema.
    #[must_use]
    pub const fn is_invalid_expression(&self) -> bool {
        matches!(self, Self::InvalidExpression { .. })
    }

    /// Returns the cause of an `InvalidExpression`.
    #[must_use]
    pub const fn cause(&self) -> Option<&ExprErrorKind> {
        match self {
            Self::InvalidExpression { cause, .. } => Some(cause),
            Self::InvalidSchema(_) => None,
        }
    }

    /// Returns the position of the offending token, when known.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::InvalidExpression { position, .. } => *position,
            Self::InvalidSchema(_) => None,
        }
    }
}

impl From<LexError> for FilterError {
    fn from(error: LexError) -> Self {
        let position = error.position();
        Self::at(ExprErrorKind::Lex(error), position)
    }
}

/// The specific reason an expression was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ExprErrorKind {
    /// Input ended where a token was required.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// The lexer rejected the input.
    #[error(transparent)]
    Lex(LexError),

    /// A bare symbol that is not a schema field.
    #[error("unknown symbol {0:?}")]
    UnknownSymbol(String),

    /// A token that does not fit the grammar at this point.
    #[error("unexpected {0}")]
    UnexpectedToken(String),

    /// An operator applied to the wrong number of arguments.
    #[error("{operator} expects {expected} argument(s), found {found}")]
    Arity {
        /// The operator.
        operator: Operator,
        /// Accepted argument count.
        expected: Arity,
        /// Number of arguments given.
        found: usize,
    },

    /// Operand types do not satisfy the operator's rule.
    #[error("type mismatch in {context}: {detail}")]
    TypeMismatch {
        /// The operator keyword, or `list` for a bare list.
        context: &'static str,
        /// What was expected.
        detail: String,
    },

    /// A parenthesized list with no elements.
    #[error("unexpected empty list")]
    EmptyList,

    /// The schema's date parser rejected the input.
    #[error("failed to parse date {input:?}: {source}")]
    InvalidDate {
        /// The string given to `DATE`.
        input: String,
        /// The parser's error.
        source: BoxError,
    },

    /// The root expression is not a predicate.
    #[error("expected predicate expression, found {0}")]
    ExpectedPredicate(ValueType),

    /// Lists or operator calls are nested deeper than the configured limit.
    #[error("expression is nested too deeply: at most {max} levels allowed")]
    TooDeep {
        /// Configured limit.
        max: usize,
    },

    /// The filter exceeds the configured length limit.
    #[error("filter is too long: {len} characters, at most {max} allowed")]
    TooLong {
        /// Length of the input in characters.
        len: usize,
        /// Configured limit.
        max: usize,
    },
}

/// Number of arguments an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many.
    Exactly(usize),
    /// This many or more.
    AtLeast(usize),
}

impl Arity {
    /// Returns true if `n` arguments are accepted.
    #[must_use]
    pub const fn accepts(self, n: usize) -> bool {
        match self {
            Self::Exactly(expected) => n == expected,
            Self::AtLeast(min) => n >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "{n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
