//! Table resolution: which table does a dashboard query read from?
//!
//! The answer is the first base table of the outermost FROM clause. Derived
//! tables and CTE references are followed until a real table name is found.

use crate::ast::{Cte, File, SelectStmt, WithClause};
use crate::parse;

/// Stop following derived tables and CTEs after this many hops.
const MAX_DEPTH: usize = 16;

/// Return the name of the table `sql` queries, or `None` if it cannot be
/// determined.
///
/// Quotes are removed and schema qualifiers dropped, so
/// `SELECT * FROM "db"."logs"` resolves to `logs`.
///
/// # Example
/// ```
/// use adhoc_parser::resolve_table;
///
/// assert_eq!(resolve_table(r#"SELECT * FROM "logs" WHERE level = 'ERROR'"#).as_deref(), Some("logs"));
/// assert_eq!(resolve_table("SELECT 1"), None);
/// ```
pub fn resolve_table(sql: &str) -> Option<String> {
    let parse_result = parse(sql);
    let file = File::cast(parse_result.syntax())?;

    let scope = Scope::default().with(file.with_clause());
    let stmt = file.select_stmt()?;
    table_of(&stmt, &scope, 0)
}

/// CTEs visible at a point in the query, outermost first
#[derive(Debug, Clone, Default)]
struct Scope {
    ctes: Vec<Cte>,
}

impl Scope {
    fn with(&self, with_clause: Option<WithClause>) -> Self {
        let mut ctes = self.ctes.clone();
        if let Some(with_clause) = with_clause {
            ctes.extend(with_clause.ctes());
        }
        Self { ctes }
    }

    /// Find a CTE by name, innermost and latest declaration first.
    ///
    /// Also returns the scope its body resolves in: only the CTEs declared
    /// before it, so a CTE never sees itself or later siblings.
    fn lookup(&self, name: &str) -> Option<(&Cte, Scope)> {
        let index = self
            .ctes
            .iter()
            .rposition(|cte| cte.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))?;
        let body_scope = Scope {
            ctes: self.ctes[..index].to_vec(),
        };
        Some((&self.ctes[index], body_scope))
    }
}

fn table_of(stmt: &SelectStmt, scope: &Scope, depth: usize) -> Option<String> {
    if depth > MAX_DEPTH {
        return None;
    }

    let table_ref = stmt.from_clause()?.table_refs().next()?;

    if let Some(subquery) = table_ref.subquery() {
        let inner = scope.with(subquery.with_clause());
        return table_of(&subquery.select_stmt()?, &inner, depth + 1);
    }

    let name = table_ref.name()?;
    if !name.is_qualified() {
        if let Some((cte, body_scope)) = scope.lookup(name.table()) {
            let inner = body_scope.with(cte.with_clause());
            return table_of(&cte.select_stmt()?, &inner, depth + 1);
        }
    }

    let table = name.table();
    if table.is_empty() || table.starts_with(['"', '`']) {
        None
    } else {
        Some(table.to_string())
    }
}
