//! The ad hoc filter value object as sent by the dashboard host.

use crate::operator::FilterOperator;
use serde::{Deserialize, Serialize};

/// Connective used when a filter does not name one.
pub const DEFAULT_CONDITION: &str = "AND";

/// A key/operator/value constraint picked by a dashboard viewer.
///
/// Every field is optional on the wire. A filter missing its key, operator or
/// value is invalid and is skipped when filters are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdHocFilter {
    /// Column name, optionally qualified as `table.column`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<FilterOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Connective joining this filter to the next one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl AdHocFilter {
    pub fn new(key: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            operator: Some(operator),
            value: Some(value.into()),
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// A filter is usable only when key, operator and value are all present.
    pub fn is_valid(&self) -> bool {
        self.key.is_some() && self.operator.is_some() && self.value.is_some()
    }

    /// Table named by a dotted key (`logs.host` -> `logs`).
    pub fn table(&self) -> Option<&str> {
        let key = self.key.as_deref()?;
        key.split_once('.').map(|(table, _)| table)
    }

    /// Column the filter constrains.
    ///
    /// For dotted keys this is the second segment only, so `a.b.c` yields `b`.
    pub fn column(&self) -> Option<&str> {
        let key = self.key.as_deref()?;
        Some(key.split('.').nth(1).unwrap_or(key))
    }

    /// Connective to the next filter, defaulting to `AND`.
    pub fn condition_or_default(&self) -> &str {
        self.condition.as_deref().unwrap_or(DEFAULT_CONDITION)
    }
}

/// Render a filter value as a SQL literal.
///
/// Values that read as a finite number are emitted bare in canonical form
/// (`"42"` -> `42`, `" 1.50 "` -> `1.5`); everything else is wrapped in single
/// quotes as-is. Quotes inside the value are not escaped.
///
/// Stricter than the JavaScript dashboard host, which reads `""` and `"  "`
/// as `0` and `"0x10"` as `16`; here all three stay quoted strings.
pub fn render_value(value: &str) -> String {
    match parse_number(value) {
        Some(n) if n == 0.0 => "0".to_string(),
        Some(n) => n.to_string(),
        None => format!("'{}'", value),
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
