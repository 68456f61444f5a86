//! Typed filter expressions and their SQL rendering.

use std::sync::Arc;

use chrono::NaiveDate;

use super::ValueType;
use crate::builder::{quote_identifier, SqlValue};
use crate::lexer::Span;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
}

impl Comparison {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::Greater => ">",
            Self::Less => "<",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
        }
    }
}

/// A reference to a schema field.
///
/// Only the compiler creates these, after checking the name against the
/// schema, so the name is safe to splice into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub(crate) table: Arc<str>,
    pub(crate) name: String,
    pub(crate) ty: ValueType,
}

impl ColumnRef {
    /// Returns the table the column belongs to.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared field type.
    #[must_use]
    pub const fn value_type(&self) -> &ValueType {
        &self.ty
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(&quote_identifier(&self.table));
        out.push('.');
        out.push_str(&quote_identifier(&self.name));
    }
}

/// A typed filter expression.
///
/// Trees are built by `Compiler::parse` and are immutable afterwards. Each node
/// keeps the span of the token that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Integer literal.
    Number { value: i64, span: Span },
    /// String literal.
    String { value: String, span: Span },
    /// Date produced by `DATE("...")`.
    Date { value: NaiveDate, span: Span },
    /// Bare parenthesized list; all items share `item_type`.
    Array {
        item_type: ValueType,
        items: Vec<Expr>,
        span: Span,
    },
    /// Schema field.
    Column { column: ColumnRef, span: Span },
    /// `NOT(arg)`.
    Not { arg: Box<Expr>, span: Span },
    /// `EQ`, `GT`, `LT`, `GTE`, `LTE`.
    Compare {
        op: Comparison,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    /// `IN(left, right)` where `right` is a list or an array column.
    In {
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    /// `LIKE(column, pattern)`, case-insensitive.
    Like {
        column: ColumnRef,
        pattern: String,
        span: Span,
    },
    /// `ALIKE(column, pattern)`: some element of an array-of-string column
    /// matches, case-insensitive.
    AnyElementLike {
        column: ColumnRef,
        pattern: String,
        span: Span,
    },
    /// `AND(a, b, ...)`.
    And { args: Vec<Expr>, span: Span },
    /// `OR(a, b, ...)`.
    Or { args: Vec<Expr>, span: Span },
}

impl Expr {
    /// Returns the static type of the expression.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Number { .. } => ValueType::Number,
            Self::String { .. } => ValueType::String,
            Self::Date { .. } => ValueType::Date,
            Self::Array { item_type, .. } => ValueType::array_of(item_type.clone()),
            Self::Column { column, .. } => column.ty.clone(),
            Self::Not { .. }
            | Self::Compare { .. }
            | Self::In { .. }
            | Self::Like { .. }
            | Self::AnyElementLike { .. }
            | Self::And { .. }
            | Self::Or { .. } => ValueType::Bool,
        }
    }

    /// Returns the span of the token that produced this node.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Number { span, .. }
            | Self::String { span, .. }
            | Self::Date { span, .. }
            | Self::Array { span, .. }
            | Self::Column { span, .. }
            | Self::Not { span, .. }
            | Self::Compare { span, .. }
            | Self::In { span, .. }
            | Self::Like { span, .. }
            | Self::AnyElementLike { span, .. }
            | Self::And { span, .. }
            | Self::Or { span, .. } => *span,
        }
    }

    /// Returns true if the expression is a predicate.
    #[must_use]
    pub fn is_predicate(&self) -> bool {
        self.value_type() == ValueType::Bool
    }

    /// Writes the SQL fragment for this expression into `out`.
    ///
    /// Every literal is appended to `params` and referenced by a positional
    /// placeholder numbered after the list's new length; the extended list is
    /// returned. Nothing from the filter text is written into `out` except
    /// field names that were checked against the schema.
    #[must_use]
    pub fn render_into(&self, out: &mut String, mut params: Vec<SqlValue>) -> Vec<SqlValue> {
        match self {
            Self::Number { value, .. } => bind(out, params, SqlValue::Int(*value)),
            Self::String { value, .. } => bind(out, params, SqlValue::Text(value.clone())),
            Self::Date { value, .. } => bind(out, params, SqlValue::Date(*value)),
            Self::Array { items, .. } => render_list(out, params, items, ", "),
            Self::Column { column, .. } => {
                column.render_into(out);
                params
            }
            Self::Not { arg, .. } => {
                out.push_str("NOT (");
                params = arg.render_into(out, params);
                out.push(')');
                params
            }
            Self::Compare {
                op, left, right, ..
            } => {
                params = left.render_into(out, params);
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                right.render_into(out, params)
            }
            Self::In { left, right, .. } => {
                params = left.render_into(out, params);
                if let Self::Column { column, .. } = right.as_ref() {
                    out.push_str(" = ANY(");
                    column.render_into(out);
                    out.push(')');
                    params
                } else {
                    out.push_str(" IN ");
                    right.render_into(out, params)
                }
            }
            Self::Like {
                column, pattern, ..
            } => {
                column.render_into(out);
                out.push_str(" ILIKE ");
                bind(out, params, SqlValue::Text(pattern.clone()))
            }
            Self::AnyElementLike {
                column, pattern, ..
            } => {
                out.push_str("EXISTS (SELECT 1 FROM unnest(");
                column.render_into(out);
                out.push_str(") AS element WHERE element ILIKE ");
                params = bind(out, params, SqlValue::Text(pattern.clone()));
                out.push(')');
                params
            }
            Self::And { args, .. } => render_list(out, params, args, " AND "),
            Self::Or { args, .. } => render_list(out, params, args, " OR "),
        }
    }

    /// Renders into a fresh buffer and parameter list.
    #[must_use]
    pub fn to_sql(&self) -> (String, Vec<SqlValue>) {
        let mut sql = String::new();
        let params = self.render_into(&mut sql, Vec::new());
        (sql, params)
    }
}

fn bind(out: &mut String, mut params: Vec<SqlValue>, value: SqlValue) -> Vec<SqlValue> {
    params.push(value);
    out.push_str(&SqlValue::placeholder(params.len()));
    params
}

fn render_list(
    out: &mut String,
    mut params: Vec<SqlValue>,
    items: &[Expr],
    separator: &str,
) -> Vec<SqlValue> {
    out.push('(');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        params = item.render_into(out, params);
    }
    out.push(')');
    params
}
