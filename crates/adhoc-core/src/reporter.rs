//! Diagnostic sinks for problems that do not abort filter application.

use crate::filter::AdHocFilter;
use std::sync::Mutex;
use tracing::{error, warn};

/// Receives diagnostics raised while applying filters.
pub trait Reporter {
    /// A filter was dropped because it lacks a key, operator or value.
    fn invalid_filter(&self, filter: &AdHocFilter);

    /// No table could be derived from `sql`.
    fn unresolved_table(&self, sql: &str);
}

/// Default reporter: emits diagnostics as tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn invalid_filter(&self, filter: &AdHocFilter) {
        warn!(?filter, "Invalid ad hoc filter will be ignored");
    }

    fn unresolved_table(&self, sql: &str) {
        error!(sql, "Failed to get table from ad hoc query");
    }
}

/// A diagnostic recorded by [`CollectingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    InvalidFilter(AdHocFilter),
    UnresolvedTable(String),
}

/// Keeps diagnostics in memory so callers can surface them later.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Drain and return the recorded diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    fn push(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Reporter for CollectingReporter {
    fn invalid_filter(&self, filter: &AdHocFilter) {
        self.push(Diagnostic::InvalidFilter(filter.clone()));
    }

    fn unresolved_table(&self, sql: &str) {
        self.push(Diagnostic::UnresolvedTable(sql.to_string()));
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn invalid_filter(&self, filter: &AdHocFilter) {
        (**self).invalid_filter(filter)
    }

    fn unresolved_table(&self, sql: &str) {
        (**self).unresolved_table(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::FilterOperator;
    use tracing_test::traced_test;

    #[test]
    fn test_collecting_reporter_records_in_order() {
        let reporter = CollectingReporter::new();
        let filter = AdHocFilter {
            key: Some("host".into()),
            ..Default::default()
        };
        reporter.invalid_filter(&filter);
        reporter.unresolved_table("SELECT 1");

        assert_eq!(
            reporter.diagnostics(),
            vec![
                Diagnostic::InvalidFilter(filter),
                Diagnostic::UnresolvedTable("SELECT 1".into()),
            ]
        );
        assert_eq!(reporter.take().len(), 2);
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    #[traced_test]
    fn test_tracing_reporter_logs_invalid_filter() {
        let filter = AdHocFilter {
            operator: Some(FilterOperator::Equal),
            ..Default::default()
        };
        TracingReporter.invalid_filter(&filter);
        assert!(logs_contain("Invalid ad hoc filter will be ignored"));
    }

    #[test]
    #[traced_test]
    fn test_tracing_reporter_logs_unresolved_table() {
        TracingReporter.unresolved_table("SHOW TABLES");
        assert!(logs_contain("Failed to get table from ad hoc query"));
    }
}
