//! Injection of ad hoc filters into dashboard SQL.
//!
//! Filters are rendered to a boolean expression and spliced in right after
//! the `"<table>" WHERE` anchor of the query text. The query is never
//! re-formatted: when the anchor is missing, or the query does not mention
//! the target table at all, the SQL comes back untouched.

use crate::error::FilterError;
use crate::filter::{render_value, AdHocFilter};
use crate::reporter::{Reporter, TracingReporter};
use crate::resolver::{ParserTableResolver, TableResolver};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Applies ad hoc filters to the queries of one editing context.
///
/// The target table is either set explicitly or derived from a query via the
/// [`TableResolver`]. A dotted key on the first filter (`logs.host`) overrides
/// it for a single [`apply`](FilterApplicator::apply) call.
///
/// # Example
/// ```
/// use adhoc_core::{AdHocFilter, FilterApplicator, FilterOperator};
///
/// let mut applicator = FilterApplicator::new();
/// applicator.set_target_table("logs");
///
/// let filters = [AdHocFilter::new("host", FilterOperator::Equal, "web1")];
/// let sql = applicator.apply(r#"SELECT * FROM "logs" WHERE level = 'ERROR'"#, &filters);
/// assert_eq!(sql, r#"SELECT * FROM "logs" WHERE ( host = 'web1' ) AND level = 'ERROR'"#);
/// ```
#[derive(Debug, Clone)]
pub struct FilterApplicator<R = ParserTableResolver, P = TracingReporter> {
    target_table: String,
    resolver: R,
    reporter: P,
}

impl FilterApplicator {
    pub fn new() -> Self {
        Self {
            target_table: String::new(),
            resolver: ParserTableResolver,
            reporter: TracingReporter,
        }
    }
}

impl Default for FilterApplicator {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, P> FilterApplicator<R, P>
where
    R: TableResolver,
    P: Reporter,
{
    /// Swap the table resolver, keeping the current target table.
    pub fn with_resolver<R2: TableResolver>(self, resolver: R2) -> FilterApplicator<R2, P> {
        FilterApplicator {
            target_table: self.target_table,
            resolver,
            reporter: self.reporter,
        }
    }

    /// Swap the diagnostic sink, keeping the current target table.
    pub fn with_reporter<P2: Reporter>(self, reporter: P2) -> FilterApplicator<R, P2> {
        FilterApplicator {
            target_table: self.target_table,
            resolver: self.resolver,
            reporter,
        }
    }

    pub fn target_table(&self) -> &str {
        &self.target_table
    }

    pub fn reporter(&self) -> &P {
        &self.reporter
    }

    pub fn set_target_table(&mut self, table: impl Into<String>) {
        self.target_table = table.into();
    }

    /// Derive the target table from `sql`.
    ///
    /// On failure the stored table is cleared, the condition is reported and
    /// [`FilterError::TableNotFound`] is returned.
    pub fn set_target_table_from_query(&mut self, sql: &str) -> Result<(), FilterError> {
        self.target_table = self.resolver.resolve(sql).unwrap_or_default();
        if self.target_table.is_empty() {
            self.reporter.unresolved_table(sql);
            return Err(FilterError::TableNotFound);
        }
        debug!(table = %self.target_table, "Resolved ad hoc filter target table");
        Ok(())
    }

    /// Merge `filters` into the WHERE clause of `sql`.
    ///
    /// Returns `sql` unchanged when there is nothing to apply, when the query
    /// does not mention the target table, or when the `"<table>" WHERE`
    /// anchor is absent. Invalid filters are reported and skipped.
    pub fn apply(&self, sql: &str, filters: &[AdHocFilter]) -> String {
        let Some(first) = filters.first() else {
            return sql.to_string();
        };
        if sql.is_empty() {
            return sql.to_string();
        }

        let table = first.table().unwrap_or(self.target_table.as_str());
        if table.is_empty() {
            debug!("No target table set, skipping ad hoc filters");
            return sql.to_string();
        }
        if !mentions_table(sql, table) {
            debug!(table, "Query does not reference target table, skipping ad hoc filters");
            return sql.to_string();
        }

        let expression = self.build_expression(filters);
        if expression.is_empty() {
            return sql.to_string();
        }

        inject(sql, table, &expression)
    }

    /// Render the valid filters as one expression.
    ///
    /// Each filter contributes ` <column> <operator> <value> <connective>`.
    /// The connective is left off when a filter's position among the valid
    /// filters equals the index of the last filter in the input list.
    fn build_expression(&self, filters: &[AdHocFilter]) -> String {
        let last = filters.len() - 1;

        filters
            .iter()
            .filter(|filter| {
                let valid = filter.is_valid();
                if !valid {
                    self.reporter.invalid_filter(filter);
                }
                valid
            })
            .enumerate()
            .filter_map(|(i, filter)| {
                let column = filter.column()?;
                let operator = filter.operator?;
                let value = filter.value.as_deref()?;
                let connective = if i == last {
                    ""
                } else {
                    filter.condition_or_default()
                };
                Some(format!(
                    " {} {} {} {}",
                    column,
                    operator.to_sql(),
                    render_value(value),
                    connective
                ))
            })
            .collect()
    }
}

/// Whether `table` occurs in `sql` as a whole word, ignoring case.
fn mentions_table(sql: &str, table: &str) -> bool {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(table)))
        .map(|re| re.is_match(sql))
        .unwrap_or(false)
}

fn has_where(sql: &str) -> bool {
    static RE_WHERE: OnceLock<Regex> = OnceLock::new();
    RE_WHERE
        .get_or_init(|| Regex::new(r"(?i)WHERE").expect("Invalid regex"))
        .is_match(sql)
}

/// Splice `expression` after every `"<table>" WHERE` anchor.
fn inject(sql: &str, table: &str, expression: &str) -> String {
    let connective = if has_where(sql) { "AND" } else { "" };
    let anchor = format!("\"{}\" WHERE", table);
    if !sql.contains(&anchor) {
        debug!(anchor = %anchor, "Injection anchor not found, query left unchanged");
        return sql.to_string();
    }

    let replacement = format!("{} ({}) {}", anchor, expression, connective);
    sql.replace(&anchor, &replacement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::FilterOperator;
    use crate::reporter::{CollectingReporter, Diagnostic};

    fn applicator_for(table: &str) -> FilterApplicator {
        let mut applicator = FilterApplicator::new();
        applicator.set_target_table(table);
        applicator
    }

    #[test]
    fn test_mentions_table_whole_word() {
        assert!(mentions_table(r#"SELECT * FROM "logs""#, "logs"));
        assert!(mentions_table("select * from LOGS", "logs"));
        assert!(!mentions_table("SELECT * FROM logs_archive", "logs"));
        assert!(!mentions_table("SELECT * FROM syslogs", "logs"));
    }

    #[test]
    fn test_mentions_table_escapes_metacharacters() {
        assert!(mentions_table("SELECT * FROM a.b", "a.b"));
        assert!(!mentions_table("SELECT * FROM axb", "a.b"));
    }

    #[test]
    fn test_single_filter() {
        let out = applicator_for("logs").apply(
            r#"SELECT * FROM "logs" WHERE level = 'ERROR'"#,
            &[AdHocFilter::new("host", FilterOperator::Equal, "web1")],
        );
        assert_eq!(
            out,
            r#"SELECT * FROM "logs" WHERE ( host = 'web1' ) AND level = 'ERROR'"#
        );
    }

    #[test]
    fn test_where_detection_is_case_insensitive() {
        // Lower-case `where` still counts as an existing WHERE, but only the
        // exact anchor spelling is rewritten.
        let sql = r#"SELECT * FROM "logs" where level = 'ERROR'"#;
        let out = applicator_for("logs").apply(
            sql,
            &[AdHocFilter::new("host", FilterOperator::Equal, "web1")],
        );
        assert_eq!(out, sql);
    }

    #[test]
    fn test_every_anchor_is_rewritten() {
        let sql = r#"SELECT * FROM "logs" WHERE a = 1 UNION ALL SELECT * FROM "logs" WHERE b = 2"#;
        let out = applicator_for("logs").apply(
            sql,
            &[AdHocFilter::new("host", FilterOperator::NotEqual, "x")],
        );
        assert_eq!(out.matches(r#""logs" WHERE ( host != 'x' ) AND"#).count(), 2);
    }

    #[test]
    fn test_expression_is_inserted_literally() {
        let out = applicator_for("logs").apply(
            r#"SELECT * FROM "logs" WHERE 1 = 1"#,
            &[AdHocFilter::new("msg", FilterOperator::Matches, "$1%")],
        );
        assert_eq!(out, r#"SELECT * FROM "logs" WHERE ( msg LIKE '$1%' ) AND 1 = 1"#);
    }

    #[test]
    fn test_invalid_filters_are_reported() {
        let reporter = CollectingReporter::new();
        let mut applicator = FilterApplicator::new().with_reporter(&reporter);
        applicator.set_target_table("logs");

        let invalid = AdHocFilter {
            key: Some("host".into()),
            ..Default::default()
        };
        let out = applicator.apply(
            r#"SELECT * FROM "logs" WHERE 1 = 1"#,
            &[invalid.clone(), AdHocFilter::new("level", FilterOperator::Equal, "ERROR")],
        );

        assert_eq!(reporter.diagnostics(), vec![Diagnostic::InvalidFilter(invalid)]);
        // The valid filter now sits at index 0, not the last input index.
        assert_eq!(
            out,
            r#"SELECT * FROM "logs" WHERE ( level = 'ERROR' AND) AND 1 = 1"#
        );
    }

    #[test]
    fn test_all_invalid_leaves_query_unchanged() {
        let sql = r#"SELECT * FROM "logs" WHERE 1 = 1"#;
        let out = applicator_for("logs").apply(sql, &[AdHocFilter::default()]);
        assert_eq!(out, sql);
    }

    #[test]
    fn test_set_target_table_from_query() {
        let mut applicator = FilterApplicator::new();
        applicator
            .set_target_table_from_query(r#"SELECT * FROM "logs" WHERE 1 = 1"#)
            .unwrap();
        assert_eq!(applicator.target_table(), "logs");
    }

    #[test]
    fn test_unresolvable_query_clears_table_and_reports() {
        let reporter = CollectingReporter::new();
        let mut applicator = FilterApplicator::new().with_reporter(&reporter);
        applicator.set_target_table("logs");

        let err = applicator.set_target_table_from_query("SELECT 1").unwrap_err();
        assert_eq!(err, FilterError::TableNotFound);
        assert_eq!(
            err.to_string(),
            "could not determine target table from query; specify it explicitly"
        );
        assert_eq!(applicator.target_table(), "");
        assert_eq!(
            reporter.diagnostics(),
            vec![Diagnostic::UnresolvedTable("SELECT 1".into())]
        );
    }

    #[test]
    fn test_empty_resolution_is_a_failure() {
        let mut applicator = FilterApplicator::new().with_resolver(|_: &str| Some(String::new()));
        assert_eq!(
            applicator.set_target_table_from_query(r#"SELECT * FROM "logs""#),
            Err(FilterError::TableNotFound)
        );
    }
}
