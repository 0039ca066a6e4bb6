//! adhoc-core - ad hoc dashboard filters for Databend SQL
//!
//! Takes the SQL of a dashboard panel plus the key/operator/value filters a
//! viewer picked and merges those filters into the query's WHERE clause. The
//! rewrite is textual: filters are spliced in after the `"<table>" WHERE`
//! anchor and the rest of the query is left byte-for-byte intact.
//!
//! The [`macros`] module expands the `$__timeFilter(...)` family of time
//! macros against the dashboard's time range.

pub mod applicator;
pub mod error;
pub mod filter;
pub mod macros;
pub mod operator;
pub mod reporter;
pub mod resolver;

pub use applicator::FilterApplicator;
pub use error::{FilterError, MacroError};
pub use filter::{render_value, AdHocFilter};
pub use macros::{interpolate, QueryContext, TimeRange};
pub use operator::{convert_operator, FilterOperator};
pub use reporter::{CollectingReporter, Diagnostic, Reporter, TracingReporter};
pub use resolver::{ParserTableResolver, TableResolver};
