use crate::errors::CliError;
use adhoc_core::{AdHocFilter, QueryContext};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// A dashboard panel as described in a YAML file.
///
/// ```yaml
/// sql: SELECT * FROM "logs" WHERE $__timeFilter(ts)
/// table: logs
/// filters:
///   - key: logs.host
///     operator: "="
///     value: web1
/// time_range:
///   from: 2024-01-15T00:00:00Z
///   to: 2024-01-16T00:00:00Z
/// interval_secs: 60
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PanelConfig {
    pub sql: String,
    /// Target table; derived from `sql` when absent
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub filters: Vec<AdHocFilter>,
    /// Dashboard time range; macros are only expanded when set
    #[serde(default)]
    pub time_range: Option<PanelTimeRange>,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PanelTimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl PanelConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_config(path)?;
        let config: PanelConfig = parse_config(path, &content)?;

        if let Some(range) = config.time_range {
            if range.from > range.to {
                return Err(CliError::InvalidTimeRange {
                    from: range.from.to_rfc3339(),
                    to: range.to.to_rfc3339(),
                }
                .into());
            }
        }

        Ok(config)
    }

    /// Macro context for this panel, if it carries a time range.
    pub fn query_context(&self) -> Option<QueryContext> {
        self.time_range.map(|range| {
            QueryContext::new(range.from, range.to, Duration::from_secs(self.interval_secs))
        })
    }
}

/// Load a list of ad hoc filters from a YAML or JSON file.
pub fn load_filters(path: &Path) -> Result<Vec<AdHocFilter>> {
    let content = read_config(path)?;
    parse_config(path, &content)
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        CliError::ConfigLoadError {
            path: path.to_path_buf(),
            source: e.into(),
        }
        .into()
    })
}

fn parse_config<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
    serde_yaml::from_str(content).map_err(|e| {
        CliError::ConfigLoadError {
            path: path.to_path_buf(),
            source: e.into(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use adhoc_core::FilterOperator;

    #[test]
    fn test_parse_panel() {
        let yaml = r#"
sql: SELECT * FROM "logs" WHERE level = 'ERROR'
table: logs
filters:
  - key: logs.host
    operator: "=~"
    value: web%
    condition: OR
  - key: status
    operator: ">"
    value: "499"
"#;
        let config: PanelConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.table.as_deref(), Some("logs"));
        assert_eq!(config.filters.len(), 2);
        assert_eq!(config.filters[0].operator, Some(FilterOperator::Matches));
        assert_eq!(config.filters[0].condition.as_deref(), Some("OR"));
        assert_eq!(config.filters[1].value.as_deref(), Some("499"));
        assert!(config.time_range.is_none());
        assert_eq!(config.interval_secs, 1);
        assert!(config.query_context().is_none());
    }

    #[test]
    fn test_parse_panel_with_time_range() {
        let yaml = r#"
sql: SELECT * FROM "logs" WHERE $__timeFilter(ts)
time_range:
  from: 2014-11-12T11:45:26Z
  to: 2015-11-12T11:45:26Z
interval_secs: 20
"#;
        let config: PanelConfig = serde_yaml::from_str(yaml).unwrap();
        let ctx = config.query_context().unwrap();
        assert_eq!(ctx.time_range.from.timestamp(), 1415792726);
        assert_eq!(ctx.time_range.to.timestamp(), 1447328726);
        assert_eq!(ctx.interval_secs(), 20);
        assert!(config.filters.is_empty());
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        let yaml = r#"
sql: SELECT 1
filters:
  - key: status
    operator: "<>"
    value: "1"
"#;
        let err = serde_yaml::from_str::<PanelConfig>(yaml).unwrap_err();
        assert!(err.to_string().contains("Invalid filter operator"));
    }
}
