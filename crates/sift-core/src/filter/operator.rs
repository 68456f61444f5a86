//! Operator keywords of the filter language.

use std::fmt;

use crate::trie::Keywords;

/// Filter operators, in keyword-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    In,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    And,
    Or,
    Not,
    Like,
    AnyLike,
    Date,
}

impl Operator {
    /// All operators; the position of each is its keyword index.
    pub const ALL: [Self; 12] = [
        Self::Equal,
        Self::In,
        Self::Greater,
        Self::Less,
        Self::GreaterOrEqual,
        Self::LessOrEqual,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Like,
        Self::AnyLike,
        Self::Date,
    ];

    /// Returns the keyword spelling (case-sensitive).
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Equal => "EQ",
            Self::In => "IN",
            Self::Greater => "GT",
            Self::Less => "LT",
            Self::GreaterOrEqual => "GTE",
            Self::LessOrEqual => "LTE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Like => "LIKE",
            Self::AnyLike => "ALIKE",
            Self::Date => "DATE",
        }
    }

    /// Looks up the operator for a keyword index produced by the lexer.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Builds the lexer keyword table for all operators.
    #[must_use]
    pub fn keywords() -> Keywords {
        let words = Self::ALL.map(|op| op.keyword());
        Keywords::new(&words)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (index, op) in Operator::ALL.iter().enumerate() {
            assert_eq!(Operator::from_index(index), Some(*op));
        }
        assert_eq!(Operator::from_index(Operator::ALL.len()), None);
    }

    #[test]
    fn test_keywords_table_matches_order() {
        let keywords = Operator::keywords();
        let node = "GTE"
            .chars()
            .try_fold(keywords.root(), |node, c| node.node_for(&c))
            .expect("GTE is in the table");
        assert_eq!(
            Keywords::index_at(node).and_then(Operator::from_index),
            Some(Operator::GreaterOrEqual)
        );
    }
}
