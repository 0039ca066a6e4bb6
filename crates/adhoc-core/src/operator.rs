//! Ad hoc filter operators and their Databend spelling.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Comparison operator offered by the dashboard's ad hoc filter picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// `>`
    GreaterThan,
    /// `<`
    LessThan,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `=~`, pattern match
    Matches,
    /// `!~`, negated pattern match
    NotMatches,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 6] = [
        FilterOperator::GreaterThan,
        FilterOperator::LessThan,
        FilterOperator::Equal,
        FilterOperator::NotEqual,
        FilterOperator::Matches,
        FilterOperator::NotMatches,
    ];

    /// The symbol the dashboard sends for this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            FilterOperator::GreaterThan => ">",
            FilterOperator::LessThan => "<",
            FilterOperator::Equal => "=",
            FilterOperator::NotEqual => "!=",
            FilterOperator::Matches => "=~",
            FilterOperator::NotMatches => "!~",
        }
    }

    /// The operator as Databend spells it.
    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOperator::Matches => "LIKE",
            FilterOperator::NotMatches => "NOT LIKE",
            other => other.symbol(),
        }
    }

    /// Look up an operator by its dashboard symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for FilterOperator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FilterOperator::from_symbol(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "Invalid filter operator: {}. Must be one of >, <, =, !=, =~, !~",
                s
            ))
        })
    }
}

impl Serialize for FilterOperator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.symbol())
    }
}

/// Translate a raw operator symbol to Databend syntax.
///
/// `=~` becomes `LIKE` and `!~` becomes `NOT LIKE`; anything else is
/// returned as given.
pub fn convert_operator(operator: &str) -> Cow<'_, str> {
    match FilterOperator::from_symbol(operator) {
        Some(op) => Cow::Borrowed(op.to_sql()),
        None => Cow::Borrowed(operator),
    }
}
