//! Filter Lexer
//!
//! A single-pass state machine that turns filter text into tokens: numbers,
//! quoted strings, separators, keyword operators and bare symbols.

mod error;
mod span;
mod token;
mod tokenizer;

pub use error::LexError;
pub use span::Span;
pub use token::{Token, TokenKind};
pub use tokenizer::Lexer;
