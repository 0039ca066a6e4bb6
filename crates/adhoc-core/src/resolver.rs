//! Table resolution seam.

/// Finds the table a query reads from.
///
/// Returning `None` or an empty string both mean the table could not be
/// determined.
pub trait TableResolver {
    fn resolve(&self, sql: &str) -> Option<String>;
}

impl<F> TableResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, sql: &str) -> Option<String> {
        self(sql)
    }
}

/// Resolver backed by the lossless SQL parser.
///
/// Follows CTE references and derived tables down to the first base table of
/// the outermost FROM clause.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserTableResolver;

impl TableResolver for ParserTableResolver {
    fn resolve(&self, sql: &str) -> Option<String> {
        adhoc_parser::resolve_table(sql)
    }
}
