//! Value types of filter expressions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The static type of a field or expression.
///
/// `Bool` is only ever synthesized by predicates; it is never a field type.
/// `Array` never nests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueType {
    /// Signed 64-bit integer.
    Number,
    /// Text.
    String,
    /// Calendar date.
    Date,
    /// Result of a predicate.
    Bool,
    /// Array of a non-array type.
    Array(Box<ValueType>),
}

impl ValueType {
    /// Creates an array type over `item`.
    #[must_use]
    pub fn array_of(item: Self) -> Self {
        Self::Array(Box::new(item))
    }

    /// Returns true for array types.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the element type of an array type.
    #[must_use]
    pub fn item_type(&self) -> Option<&Self> {
        match self {
            Self::Array(item) => Some(item),
            _ => None,
        }
    }

    /// Returns true if this type may be declared for a schema field.
    #[must_use]
    pub fn is_field_type(&self) -> bool {
        match self {
            Self::Number | Self::String | Self::Date => true,
            Self::Bool => false,
            Self::Array(item) => !item.is_array() && **item != Self::Bool,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => f.write_str("NUMBER"),
            Self::String => f.write_str("STRING"),
            Self::Date => f.write_str("DATE"),
            Self::Bool => f.write_str("BOOL"),
            Self::Array(item) => write!(f, "ARRAY({item})"),
        }
    }
}

/// Error returned when a type name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value type {0:?}")]
pub struct UnknownValueType(pub String);

impl FromStr for ValueType {
    type Err = UnknownValueType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name.to_ascii_uppercase().as_str() {
            "NUMBER" => return Ok(Self::Number),
            "STRING" => return Ok(Self::String),
            "DATE" => return Ok(Self::Date),
            "BOOL" => return Ok(Self::Bool),
            _ => {}
        }
        let inner = name
            .get(..6)
            .filter(|prefix| prefix.eq_ignore_ascii_case("ARRAY("))
            .and_then(|_| name[6..].strip_suffix(')'))
            .ok_or_else(|| UnknownValueType(String::from(s)))?;
        match inner.parse::<Self>()? {
            Self::Array(_) => Err(UnknownValueType(String::from(s))),
            item => Ok(Self::array_of(item)),
        }
    }
}

impl TryFrom<String> for ValueType {
    type Error = UnknownValueType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        value.to_string()
    }
}
