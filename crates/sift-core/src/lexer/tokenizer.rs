//! Filter tokenizer implementation.

use std::iter::Peekable;
use std::str::Chars;

use tracing::trace;

use super::{LexError, Span, Token, TokenKind};
use crate::trie::{Keywords, Trie};

/// The quote character delimiting string literals.
const QUOTE: char = '"';
/// The escape character inside string literals.
const ESCAPE: char = '\\';

/// Scanner state for the token being built.
#[derive(Debug, Clone, Copy)]
enum State<'a> {
    Idle,
    Number,
    String { escaped: bool },
    /// Live trie node reached by the characters consumed so far.
    Operator(&'a Trie<char, usize>),
    Symbol,
}

/// A lexer that tokenizes filter input one token at a time.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    keywords: &'a Keywords,
    separators: &'a [char],
    /// The current code-point position.
    pos: usize,
    /// Set once input is exhausted or an error was returned.
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over `input` recognizing `keywords` as operators and
    /// `separators` as single-character tokens.
    #[must_use]
    pub fn new(input: &'a str, keywords: &'a Keywords, separators: &'a [char]) -> Self {
        Self {
            chars: input.chars().peekable(),
            keywords,
            separators,
            pos: 0,
            done: input.is_empty(),
        }
    }

    fn is_separator(&self, c: char) -> bool {
        self.separators.contains(&c)
    }

    /// Consumes the current character.
    fn bump(&mut self) {
        if self.chars.next().is_some() {
            self.pos += 1;
        }
    }

    fn fail(&mut self, error: LexError) -> Result<Option<Token>, LexError> {
        self.done = true;
        Err(error)
    }

    fn emit(&self, kind: TokenKind, start: usize) -> Result<Option<Token>, LexError> {
        let token = Token::new(kind, Span::new(start, self.pos));
        trace!(token = %token, "lexed token");
        Ok(Some(token))
    }

    fn emit_number(&mut self, buf: &str, start: usize) -> Result<Option<Token>, LexError> {
        match buf.parse::<i64>() {
            Ok(n) => self.emit(TokenKind::Number(n), start),
            Err(e) => self.fail(LexError::InvalidNumber {
                position: start,
                reason: e.to_string(),
            }),
        }
    }

    /// Emits the keyword ending at `node`, or a symbol if `node` is only a
    /// prefix of some keyword.
    fn emit_operator(
        &self,
        node: &Trie<char, usize>,
        buf: String,
        start: usize,
    ) -> Result<Option<Token>, LexError> {
        match Keywords::index_at(node) {
            Some(index) => self.emit(TokenKind::Operator(index), start),
            None => self.emit(TokenKind::Symbol(buf), start),
        }
    }

    /// Scans the next token.
    ///
    /// Returns `Ok(None)` once input is exhausted. After an error the lexer is
    /// fused and keeps returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a `LexError` for a number with a leading zero or out of `i64`
    /// range, and for a string that is never closed.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        if self.done {
            return Ok(None);
        }
        let keywords = self.keywords;
        let mut state = State::Idle;
        let mut buf = String::new();
        let mut start = self.pos;

        while let Some(&c) = self.chars.peek() {
            match state {
                State::Idle => {
                    if self.is_separator(c) {
                        start = self.pos;
                        self.bump();
                        return self.emit(TokenKind::Separator(c), start);
                    }
                    start = self.pos;
                    if c == QUOTE {
                        state = State::String { escaped: false };
                    } else if c.is_ascii_digit() {
                        if c == '0' {
                            return self.fail(LexError::InvalidNumber {
                                position: start,
                                reason: String::from("leading zero"),
                            });
                        }
                        buf.push(c);
                        state = State::Number;
                    } else if let Some(node) = keywords.root().node_for(&c) {
                        buf.push(c);
                        state = State::Operator(node);
                    } else if !c.is_whitespace() {
                        buf.push(c);
                        state = State::Symbol;
                    }
                    self.bump();
                }
                State::String { escaped } => {
                    self.bump();
                    if c == QUOTE && !escaped {
                        return self.emit(TokenKind::String(buf), start);
                    }
                    if c == ESCAPE && !escaped {
                        state = State::String { escaped: true };
                    } else {
                        buf.push(c);
                        state = State::String { escaped: false };
                    }
                }
                State::Number => {
                    if c.is_ascii_digit() {
                        buf.push(c);
                        self.bump();
                    } else if c.is_whitespace() {
                        let token = self.emit_number(&buf, start);
                        self.bump();
                        return token;
                    } else if self.is_separator(c) {
                        return self.emit_number(&buf, start);
                    } else {
                        buf.push(c);
                        self.bump();
                        state = State::Symbol;
                    }
                }
                State::Operator(node) => {
                    if let Some(next) = node.node_for(&c) {
                        buf.push(c);
                        self.bump();
                        state = State::Operator(next);
                    } else if c.is_whitespace() {
                        let token = self.emit_operator(node, buf, start);
                        self.bump();
                        return token;
                    } else if self.is_separator(c) {
                        return self.emit_operator(node, buf, start);
                    } else {
                        buf.push(c);
                        self.bump();
                        state = State::Symbol;
                    }
                }
                State::Symbol => {
                    if self.is_separator(c) {
                        return self.emit(TokenKind::Symbol(buf), start);
                    }
                    if c.is_whitespace() {
                        let token = self.emit(TokenKind::Symbol(buf), start);
                        self.bump();
                        return token;
                    }
                    buf.push(c);
                    self.bump();
                }
            }
        }

        self.done = true;
        match state {
            State::Idle => Ok(None),
            State::String { .. } => self.fail(LexError::UnclosedString { position: start }),
            State::Number => self.emit_number(&buf, start),
            State::Operator(node) => self.emit_operator(node, buf, start),
            State::Symbol => self.emit(TokenKind::Symbol(buf), start),
        }
    }

    /// Tokenizes the entire input.
    ///
    /// # Errors
    ///
    /// Returns the first `LexError` encountered.
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
