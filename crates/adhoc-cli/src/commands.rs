//! Implementations behind the `adhoc` subcommands.
//!
//! Each command takes already-loaded inputs and returns the text to print, so
//! the binary only handles argument parsing and I/O.

use crate::errors::{text_range_to_line_col, CliError};
use adhoc_core::{interpolate, AdHocFilter, FilterApplicator, QueryContext};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info};

/// Apply `filters` to `sql`, targeting `table` or the table derived from `sql`.
///
/// With no filters or an empty query there is nothing to merge, so no table
/// is required. When `ctx` is given, time macros are expanded after the
/// filters are merged.
pub fn apply(
    sql: &str,
    filters: &[AdHocFilter],
    table: Option<&str>,
    ctx: Option<&QueryContext>,
) -> Result<String> {
    let mut applicator = FilterApplicator::new();
    match table {
        Some(table) => applicator.set_target_table(table),
        None if filters.is_empty() || sql.is_empty() => {}
        None => applicator
            .set_target_table_from_query(sql)
            .map_err(|_| table_not_resolved(sql))?,
    }
    info!(
        table = applicator.target_table(),
        filters = filters.len(),
        "Applying ad hoc filters"
    );

    let filtered = applicator.apply(sql, filters);
    if filtered == sql {
        debug!("Query unchanged by ad hoc filters");
    }

    match ctx {
        Some(ctx) => interpolate(&filtered, ctx).context("Failed to expand time macros"),
        None => Ok(filtered),
    }
}

/// Name the table `sql` reads from.
pub fn table(sql: &str) -> Result<String> {
    adhoc_parser::resolve_table(sql).ok_or_else(|| table_not_resolved(sql).into())
}

/// Build a macro context from RFC 3339 bounds and an interval in seconds.
pub fn query_context(from: &str, to: &str, interval_secs: u64) -> Result<QueryContext> {
    let from = parse_timestamp(from)?;
    let to = parse_timestamp(to)?;
    if from > to {
        return Err(CliError::InvalidTimeRange {
            from: from.to_rfc3339(),
            to: to.to_rfc3339(),
        }
        .into());
    }
    Ok(QueryContext::new(from, to, Duration::from_secs(interval_secs)))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|source| {
            CliError::InvalidTimestamp {
                value: value.to_string(),
                source,
            }
            .into()
        })
}

/// Describe why table resolution failed, using parse errors when there are any.
fn table_not_resolved(sql: &str) -> CliError {
    let parse_result = adhoc_parser::parse(sql);
    let mut diagnostics: Vec<String> = parse_result
        .errors
        .iter()
        .map(|error| {
            let (line, col) = text_range_to_line_col(sql, error.range);
            format!("  {}:{}: {}", line + 1, col + 1, error.message)
        })
        .collect();
    if diagnostics.is_empty() {
        diagnostics.push("  query has no table in its FROM clause".to_string());
    }
    CliError::TableNotResolved { diagnostics }
}
