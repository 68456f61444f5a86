//! Schema and recursive-descent compiler for filter expressions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::error::{Arity, BoxError, ExprErrorKind, FilterError, Result};
use super::expr::{ColumnRef, Comparison, Expr};
use super::{Operator, ValueType};
use crate::lexer::{Lexer, Span, Token, TokenKind};
use crate::trie::Keywords;

const OPEN_PAREN: char = '(';
const CLOSE_PAREN: char = ')';
const COMMA: char = ',';

/// Separator characters of the filter language.
pub const SEPARATORS: [char; 3] = [OPEN_PAREN, CLOSE_PAREN, COMMA];

/// Default `chrono` format for `DATE("...")` arguments.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default limit on nested lists and operator calls.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Function turning the argument of `DATE("...")` into a date.
pub type DateParser = Box<dyn Fn(&str) -> std::result::Result<NaiveDate, BoxError> + Send + Sync>;

/// The fields a filter may reference.
pub struct Schema {
    table: Arc<str>,
    fields: HashMap<String, ValueType>,
    parse_date: DateParser,
}

impl Schema {
    /// Creates a schema for `table`.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidSchema` if the table name is empty or a
    /// field is declared as `BOOL`, a nested array, or an array of `BOOL`.
    pub fn new<I, K, F>(table: impl Into<String>, fields: I, parse_date: F) -> Result<Self>
    where
        I: IntoIterator<Item = (K, ValueType)>,
        K: Into<String>,
        F: Fn(&str) -> std::result::Result<NaiveDate, BoxError> + Send + Sync + 'static,
    {
        let table: String = table.into();
        if table.is_empty() {
            return Err(FilterError::InvalidSchema(String::from(
                "table name must not be empty",
            )));
        }
        let mut map = HashMap::new();
        for (name, ty) in fields {
            let name: String = name.into();
            if !ty.is_field_type() {
                return Err(FilterError::InvalidSchema(format!(
                    "field {name:?} cannot have type {ty}"
                )));
            }
            map.insert(name, ty);
        }
        Ok(Self {
            table: Arc::from(table),
            fields: map,
            parse_date: Box::new(parse_date),
        })
    }

    /// Creates a schema whose dates are parsed with a `chrono` format string.
    ///
    /// # Errors
    ///
    /// Same as `Schema::new`.
    pub fn with_date_format<I, K>(
        table: impl Into<String>,
        fields: I,
        format: impl Into<String>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, ValueType)>,
        K: Into<String>,
    {
        let format: String = format.into();
        Self::new(table, fields, move |s: &str| {
            NaiveDate::parse_from_str(s, &format).map_err(BoxError::from)
        })
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the declared type of a field.
    #[must_use]
    pub fn field_type(&self, name: &str) -> Option<&ValueType> {
        self.fields.get(name)
    }

    /// Returns the declared fields.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ValueType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Runs the schema's date parser.
    ///
    /// # Errors
    ///
    /// Returns whatever the date parser returns.
    pub fn parse_date(&self, input: &str) -> std::result::Result<NaiveDate, BoxError> {
        (self.parse_date)(input)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("table", &self.table)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Compiles filter text into typed expressions for one schema.
///
/// A compiler is read-only after construction and can be shared between
/// threads; every `parse` call uses its own lexer.
#[derive(Debug)]
pub struct Compiler {
    schema: Schema,
    keywords: Keywords,
    max_len: Option<usize>,
    max_depth: usize,
}

impl Compiler {
    /// Creates a compiler for the given table, fields and date parser.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidSchema` for unusable field types.
    pub fn new<I, K, F>(table: impl Into<String>, fields: I, parse_date: F) -> Result<Self>
    where
        I: IntoIterator<Item = (K, ValueType)>,
        K: Into<String>,
        F: Fn(&str) -> std::result::Result<NaiveDate, BoxError> + Send + Sync + 'static,
    {
        Ok(Self::from_schema(Schema::new(table, fields, parse_date)?))
    }

    /// Creates a compiler over an existing schema.
    #[must_use]
    pub fn from_schema(schema: Schema) -> Self {
        Self {
            schema,
            keywords: Operator::keywords(),
            max_len: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Rejects filters longer than `max` characters before lexing them.
    #[must_use]
    pub fn with_max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    /// Rejects filters whose lists and operator calls nest deeper than `max`.
    #[must_use]
    pub fn with_max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }

    /// Returns the schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns a lexer over `input` configured for the filter language.
    #[must_use]
    pub fn lexer<'a>(&'a self, input: &'a str) -> Lexer<'a> {
        Lexer::new(input, &self.keywords, &SEPARATORS)
    }

    /// Parses `text` into a predicate expression.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidExpression` if the text is malformed,
    /// references unknown fields, is ill-typed, or is not a predicate.
    pub fn parse(&self, text: &str) -> Result<Expr> {
        let result = self.parse_predicate(text);
        match &result {
            Ok(expr) => debug!(
                table = %self.schema.table,
                len = text.len(),
                ty = %expr.value_type(),
                "parsed filter"
            ),
            Err(e) => debug!(table = %self.schema.table, error = %e, "rejected filter"),
        }
        result
    }

    fn parse_predicate(&self, text: &str) -> Result<Expr> {
        if let Some(max) = self.max_len {
            let len = text.chars().count();
            if len > max {
                return Err(FilterError::InvalidExpression {
                    cause: ExprErrorKind::TooLong { len, max },
                    position: None,
                });
            }
        }
        let mut parser = Parser {
            schema: &self.schema,
            lexer: self.lexer(text),
            end: text.chars().count(),
            depth: 0,
            max_depth: self.max_depth,
        };
        let root = parser.parse_expr()?;
        if let Some(token) = parser.next()? {
            return Err(unexpected(&token));
        }
        match root.value_type() {
            ValueType::Bool => Ok(root),
            other => Err(FilterError::at(
                ExprErrorKind::ExpectedPredicate(other),
                root.span().start,
            )),
        }
    }
}

/// Per-call parser state.
struct Parser<'a> {
    schema: &'a Schema,
    lexer: Lexer<'a>,
    /// Input length, reported for errors at end of input.
    end: usize,
    /// Number of open lists enclosing the current token.
    depth: usize,
    max_depth: usize,
}

impl Parser<'_> {
    fn next(&mut self) -> Result<Option<Token>> {
        Ok(self.lexer.next_token()?)
    }

    fn expect_next(&mut self) -> Result<Token> {
        self.next()?
            .ok_or_else(|| FilterError::at(ExprErrorKind::UnexpectedEnd, self.end))
    }

    fn expect_separator(&mut self, separator: char) -> Result<Span> {
        let token = self.expect_next()?;
        if token.is_separator(separator) {
            Ok(token.span)
        } else {
            Err(unexpected(&token))
        }
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let token = self.expect_next()?;
        self.parse_from(token)
    }

    fn parse_from(&mut self, token: Token) -> Result<Expr> {
        let span = token.span;
        match token.kind {
            TokenKind::Number(value) => Ok(Expr::Number { value, span }),
            TokenKind::String(value) => Ok(Expr::String { value, span }),
            TokenKind::Symbol(name) => {
                let Some(ty) = self.schema.field_type(&name) else {
                    return Err(FilterError::at(ExprErrorKind::UnknownSymbol(name), span.start));
                };
                Ok(Expr::Column {
                    column: ColumnRef {
                        table: Arc::clone(&self.schema.table),
                        ty: ty.clone(),
                        name,
                    },
                    span,
                })
            }
            TokenKind::Separator(OPEN_PAREN) => self.parse_array(span),
            TokenKind::Separator(COMMA | CLOSE_PAREN) => Err(unexpected(&token)),
            TokenKind::Separator(c) => unreachable!("unexpected separator {c:?} from lexer"),
            TokenKind::Operator(index) => {
                let Some(op) = Operator::from_index(index) else {
                    unreachable!("operator index {index} outside the keyword table");
                };
                self.parse_operator(op, span)
            }
        }
    }

    /// Parses comma-separated expressions up to and including `)`. The
    /// opening parenthesis at `open` has already been consumed.
    fn parse_list(&mut self, open: Span) -> Result<Vec<Expr>> {
        if self.depth >= self.max_depth {
            return Err(FilterError::at(
                ExprErrorKind::TooDeep {
                    max: self.max_depth,
                },
                open.start,
            ));
        }
        self.depth += 1;
        let items = self.parse_items();
        self.depth -= 1;
        items
    }

    fn parse_items(&mut self) -> Result<Vec<Expr>> {
        let first = self.expect_next()?;
        if first.is_separator(CLOSE_PAREN) {
            return Err(FilterError::at(ExprErrorKind::EmptyList, first.span.start));
        }
        let mut items = vec![self.parse_from(first)?];
        loop {
            let token = self.expect_next()?;
            match token.kind {
                TokenKind::Separator(CLOSE_PAREN) => return Ok(items),
                TokenKind::Separator(COMMA) => items.push(self.parse_expr()?),
                _ => return Err(unexpected(&token)),
            }
        }
    }

    fn parse_array(&mut self, span: Span) -> Result<Expr> {
        let items = self.parse_list(span)?;
        let item_type = items[0].value_type();
        if item_type.is_array() {
            return Err(type_mismatch("list", "nested lists are not supported", span));
        }
        if let Some(other) = items.iter().find(|item| item.value_type() != item_type) {
            return Err(type_mismatch(
                "list",
                format!("expected {item_type}, found {}", other.value_type()),
                span,
            ));
        }
        Ok(Expr::Array {
            item_type,
            items,
            span,
        })
    }

    /// Parses `( args )` after an operator keyword and checks the count.
    fn parse_args(&mut self, op: Operator, span: Span, arity: Arity) -> Result<Vec<Expr>> {
        let open = self.expect_separator(OPEN_PAREN)?;
        let args = self.parse_list(open)?;
        if arity.accepts(args.len()) {
            Ok(args)
        } else {
            Err(FilterError::at(
                ExprErrorKind::Arity {
                    operator: op,
                    expected: arity,
                    found: args.len(),
                },
                span.start,
            ))
        }
    }

    fn parse_unary(&mut self, op: Operator, span: Span) -> Result<Expr> {
        let mut args = self.parse_args(op, span, Arity::Exactly(1))?;
        Ok(args.remove(0))
    }

    fn parse_binary(&mut self, op: Operator, span: Span) -> Result<(Expr, Expr)> {
        let mut args = self.parse_args(op, span, Arity::Exactly(2))?.into_iter();
        match (args.next(), args.next()) {
            (Some(left), Some(right)) => Ok((left, right)),
            _ => unreachable!("arity was checked"),
        }
    }

    fn parse_operator(&mut self, op: Operator, span: Span) -> Result<Expr> {
        match op {
            Operator::Equal => self.parse_comparison(op, Comparison::Equal, span),
            Operator::Greater => self.parse_comparison(op, Comparison::Greater, span),
            Operator::Less => self.parse_comparison(op, Comparison::Less, span),
            Operator::GreaterOrEqual => {
                self.parse_comparison(op, Comparison::GreaterOrEqual, span)
            }
            Operator::LessOrEqual => self.parse_comparison(op, Comparison::LessOrEqual, span),
            Operator::In => {
                let (left, right) = self.parse_binary(op, span)?;
                let expected = ValueType::array_of(left.value_type());
                if right.value_type() != expected {
                    return Err(type_mismatch(
                        op.keyword(),
                        format!("expected {expected}, found {}", right.value_type()),
                        span,
                    ));
                }
                Ok(Expr::In {
                    left: Box::new(left),
                    right: Box::new(right),
                    span,
                })
            }
            Operator::And | Operator::Or => {
                let args = self.parse_args(op, span, Arity::AtLeast(2))?;
                if let Some(arg) = args.iter().find(|arg| !arg.is_predicate()) {
                    return Err(type_mismatch(
                        op.keyword(),
                        format!("expected BOOL, found {}", arg.value_type()),
                        span,
                    ));
                }
                Ok(if op == Operator::And {
                    Expr::And { args, span }
                } else {
                    Expr::Or { args, span }
                })
            }
            Operator::Not => {
                let arg = self.parse_unary(op, span)?;
                if !arg.is_predicate() {
                    return Err(type_mismatch(
                        op.keyword(),
                        format!("expected BOOL, found {}", arg.value_type()),
                        span,
                    ));
                }
                Ok(Expr::Not {
                    arg: Box::new(arg),
                    span,
                })
            }
            Operator::Like => {
                let (left, right) = self.parse_binary(op, span)?;
                let column = expect_column(op, left, span)?;
                let pattern = expect_string(op, right, span)?;
                Ok(Expr::Like {
                    column,
                    pattern,
                    span,
                })
            }
            Operator::AnyLike => {
                let (left, right) = self.parse_binary(op, span)?;
                let column = expect_column(op, left, span)?;
                let expected = ValueType::array_of(ValueType::String);
                if column.ty != expected {
                    return Err(type_mismatch(
                        op.keyword(),
                        format!("expected {expected} column, found {}", column.ty),
                        span,
                    ));
                }
                let pattern = expect_string(op, right, span)?;
                Ok(Expr::AnyElementLike {
                    column,
                    pattern,
                    span,
                })
            }
            Operator::Date => {
                let arg = self.parse_unary(op, span)?;
                let input = expect_string(op, arg, span)?;
                match self.schema.parse_date(&input) {
                    Ok(value) => Ok(Expr::Date { value, span }),
                    Err(source) => Err(FilterError::at(
                        ExprErrorKind::InvalidDate { input, source },
                        span.start,
                    )),
                }
            }
        }
    }

    fn parse_comparison(&mut self, op: Operator, cmp: Comparison, span: Span) -> Result<Expr> {
        let (left, right) = self.parse_binary(op, span)?;
        if left.value_type() != right.value_type() {
            return Err(type_mismatch(
                op.keyword(),
                format!("{} and {}", left.value_type(), right.value_type()),
                span,
            ));
        }
        Ok(Expr::Compare {
            op: cmp,
            left: Box::new(left),
            right: Box::new(right),
            span,
        })
    }
}

fn describe(token: &Token) -> String {
    match &token.kind {
        TokenKind::Operator(index) => Operator::from_index(*index).map_or_else(
            || token.kind.to_string(),
            |op| format!("operator {op}"),
        ),
        kind => kind.to_string(),
    }
}

fn unexpected(token: &Token) -> FilterError {
    FilterError::at(ExprErrorKind::UnexpectedToken(describe(token)), token.position())
}

fn type_mismatch(context: &'static str, detail: impl Into<String>, span: Span) -> FilterError {
    FilterError::at(
        ExprErrorKind::TypeMismatch {
            context,
            detail: detail.into(),
        },
        span.start,
    )
}

fn expect_column(op: Operator, expr: Expr, span: Span) -> Result<ColumnRef> {
    match expr {
        Expr::Column { column, .. } => Ok(column),
        other => Err(type_mismatch(
            op.keyword(),
            format!("expected a field, found {}", other.value_type()),
            span,
        )),
    }
}

fn expect_string(op: Operator, expr: Expr, span: Span) -> Result<String> {
    match expr {
        Expr::String { value, .. } => Ok(value),
        other => Err(type_mismatch(
            op.keyword(),
            format!("expected a string literal, found {}", other.value_type()),
            span,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiler() -> Compiler {
        Compiler::new(
            "song",
            [
                ("id", ValueType::Number),
                ("artist", ValueType::String),
                ("releaseDate", ValueType::Date),
                ("lyrics", ValueType::array_of(ValueType::String)),
            ],
            |s: &str| NaiveDate::parse_from_str(s, DEFAULT_DATE_FORMAT).map_err(BoxError::from),
        )
        .expect("valid schema")
    }

    fn cause(text: &str) -> ExprErrorKind {
        match compiler().parse(text) {
            Err(FilterError::InvalidExpression { cause, .. }) => cause,
            other => panic!("Expected invalid expression for: {text}\nGot: {other:?}"),
        }
    }

    #[test]
    fn test_schema_rejects_bool_field() {
        let err = Schema::with_date_format("song", [("flag", ValueType::Bool)], DEFAULT_DATE_FORMAT)
            .expect_err("bool field");
        assert!(matches!(err, FilterError::InvalidSchema(_)));
    }

    #[test]
    fn test_schema_rejects_empty_table() {
        let err = Schema::with_date_format("", [("id", ValueType::Number)], DEFAULT_DATE_FORMAT)
            .expect_err("empty table");
        assert!(matches!(err, FilterError::InvalidSchema(_)));
    }

    #[test]
    fn test_schema_debug_hides_parser() {
        let schema =
            Schema::with_date_format("song", [("id", ValueType::Number)], DEFAULT_DATE_FORMAT)
                .expect("valid schema");
        assert!(format!("{schema:?}").starts_with("Schema { table: \"song\""));
    }

    #[test]
    fn test_column_carries_table() {
        let expr = compiler().parse("EQ(id, 1)").expect("parse");
        let Expr::Compare { left, .. } = expr else {
            panic!("Expected comparison");
        };
        let Expr::Column { column, span } = *left else {
            panic!("Expected column");
        };
        assert_eq!(column.table(), "song");
        assert_eq!(column.name(), "id");
        assert_eq!(column.value_type(), &ValueType::Number);
        assert_eq!(span, Span::new(3, 5));
    }

    #[test]
    fn test_unexpected_end_reports_input_length() {
        let err = compiler().parse("EQ(1,").expect_err("incomplete");
        assert!(matches!(err.cause(), Some(ExprErrorKind::UnexpectedEnd)));
        assert_eq!(err.position(), Some(5));
    }

    #[test]
    fn test_arity_error_names_operator() {
        assert!(matches!(
            cause("EQ(1)"),
            ExprErrorKind::Arity {
                operator: Operator::Equal,
                expected: Arity::Exactly(2),
                found: 1
            }
        ));
        assert!(matches!(
            cause("AND(EQ(1, 1))"),
            ExprErrorKind::Arity {
                operator: Operator::And,
                expected: Arity::AtLeast(2),
                found: 1
            }
        ));
    }

    #[test]
    fn test_operator_without_parens() {
        assert!(matches!(cause("NOT EQ(1, 1)"), ExprErrorKind::UnexpectedToken(_)));
    }

    #[test]
    fn test_depth_limit_is_configurable() {
        let shallow = compiler().with_max_depth(2);
        assert!(shallow.parse("NOT(EQ(1, 1))").is_ok());
        let err = shallow.parse("NOT(NOT(EQ(1, 1)))").expect_err("too deep");
        assert!(matches!(
            err.cause(),
            Some(ExprErrorKind::TooDeep { max: 2 })
        ));
        assert_eq!(err.position(), Some(10));
    }

    #[test]
    fn test_nested_list_rejected() {
        assert!(matches!(
            cause("IN(1, ((1), (2)))"),
            ExprErrorKind::TypeMismatch { context: "list", .. }
        ));
    }

    #[test]
    fn test_date_parser_failure_is_wrapped() {
        match cause(r#"EQ(releaseDate, DATE("01.02.2020"))"#) {
            ExprErrorKind::InvalidDate { input, .. } => assert_eq!(input, "01.02.2020"),
            other => panic!("Expected date error, got {other:?}"),
        }
    }
}
