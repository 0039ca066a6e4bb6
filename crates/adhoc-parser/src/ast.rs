/// Typed AST wrappers over Rowan CST
use crate::syntax_kind::{SyntaxNode, SyntaxToken};
use crate::SyntaxKind::*;
use rowan::TextRange;

/// Root file node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct File(SyntaxNode);

impl File {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == FILE {
            Some(Self(node))
        } else {
            None
        }
    }

    pub fn with_clause(&self) -> Option<WithClause> {
        self.0.children().find_map(WithClause::cast)
    }

    /// First SELECT of the statement (the left side of any UNION)
    pub fn select_stmt(&self) -> Option<SelectStmt> {
        self.0.children().find_map(SelectStmt::cast)
    }

    /// Every SELECT joined by UNION at the top level
    pub fn select_stmts(&self) -> impl Iterator<Item = SelectStmt> + '_ {
        self.0.children().filter_map(SelectStmt::cast)
    }
}

/// WITH clause
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WithClause(SyntaxNode);

impl WithClause {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == WITH_CLAUSE {
            Some(Self(node))
        } else {
            None
        }
    }

    pub fn ctes(&self) -> impl Iterator<Item = Cte> + '_ {
        self.0.children().filter_map(Cte::cast)
    }
}

/// Common table expression: name AS (query)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cte(SyntaxNode);

impl Cte {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == CTE {
            Some(Self(node))
        } else {
            None
        }
    }

    /// CTE name, unquoted
    pub fn name(&self) -> Option<String> {
        first_name_token(&self.0).map(|t| unquote_ident(t.text()))
    }

    pub fn with_clause(&self) -> Option<WithClause> {
        self.0.children().find_map(WithClause::cast)
    }

    pub fn select_stmt(&self) -> Option<SelectStmt> {
        self.0.children().find_map(SelectStmt::cast)
    }
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectStmt(SyntaxNode);

impl SelectStmt {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == SELECT_STMT {
            Some(Self(node))
        } else {
            None
        }
    }

    pub fn select_list(&self) -> Option<SelectList> {
        self.0.children().find_map(SelectList::cast)
    }

    pub fn from_clause(&self) -> Option<FromClause> {
        self.0.children().find_map(FromClause::cast)
    }

    pub fn where_clause(&self) -> Option<WhereClause> {
        self.0.children().find_map(WhereClause::cast)
    }

    pub fn text_range(&self) -> TextRange {
        self.0.text_range()
    }
}

/// SELECT list (columns)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectList(SyntaxNode);

impl SelectList {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == SELECT_LIST {
            Some(Self(node))
        } else {
            None
        }
    }

    pub fn items(&self) -> impl Iterator<Item = SelectItem> + '_ {
        self.0.children().filter_map(SelectItem::cast)
    }
}

/// SELECT item (column or expression with optional alias)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectItem(SyntaxNode);

impl SelectItem {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == SELECT_ITEM {
            Some(Self(node))
        } else {
            None
        }
    }

    /// Get the expression node for this select item
    pub fn expression(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    /// The alias following the expression, with or without AS
    pub fn alias(&self) -> Option<String> {
        trailing_alias(&self.0)
    }

    pub fn is_wildcard(&self) -> bool {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == STAR)
    }
}

/// FROM clause
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FromClause(SyntaxNode);

impl FromClause {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == FROM_CLAUSE {
            Some(Self(node))
        } else {
            None
        }
    }

    pub fn table_refs(&self) -> impl Iterator<Item = TableRef> + '_ {
        self.0.children().filter_map(TableRef::cast)
    }

    pub fn joins(&self) -> impl Iterator<Item = JoinClause> + '_ {
        self.0.children().filter_map(JoinClause::cast)
    }

    /// Get the text range of this FROM clause
    pub fn text_range(&self) -> TextRange {
        self.0.text_range()
    }
}

/// JOIN clause (JOIN type + table + condition)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinClause(SyntaxNode);

impl JoinClause {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == JOIN_CLAUSE {
            Some(Self(node))
        } else {
            None
        }
    }

    /// Get the JOIN type (INNER, LEFT, RIGHT, FULL, CROSS)
    /// Returns None for bare JOIN (defaults to INNER)
    pub fn join_type(&self) -> Option<JoinType> {
        for token in self.0.children_with_tokens().filter_map(|e| e.into_token()) {
            match token.kind() {
                INNER_KW => return Some(JoinType::Inner),
                LEFT_KW => return Some(JoinType::Left),
                RIGHT_KW => return Some(JoinType::Right),
                FULL_KW => return Some(JoinType::Full),
                CROSS_KW => return Some(JoinType::Cross),
                _ => continue,
            }
        }
        None
    }

    /// Get the table reference being joined
    pub fn table_ref(&self) -> Option<TableRef> {
        self.0.children().find_map(TableRef::cast)
    }
}

/// JOIN type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

/// Table reference: a (possibly qualified) name, a table function or a subquery
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef(SyntaxNode);

impl TableRef {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == TABLE_REF {
            Some(Self(node))
        } else {
            None
        }
    }

    /// Check if this is a table function like numbers(10)
    pub fn is_function_call(&self) -> bool {
        self.0.children().any(|n| n.kind() == FUNCTION_CALL)
    }

    pub fn subquery(&self) -> Option<Subquery> {
        self.0.children().find_map(Subquery::cast)
    }

    /// The referenced table name; None for subqueries, table functions and
    /// template variables
    pub fn name(&self) -> Option<TableName> {
        if self.is_function_call() || self.subquery().is_some() {
            return None;
        }

        let mut parts = Vec::new();
        let mut expect_part = true;
        for token in self.0.children_with_tokens().filter_map(|e| e.into_token()) {
            match token.kind() {
                IDENT | QUOTED_IDENT if expect_part => {
                    parts.push(unquote_ident(token.text()));
                    expect_part = false;
                }
                DOT => expect_part = true,
                k if k.is_trivia() => {}
                // Anything else ends the name (alias, AS, variable)
                _ => break,
            }
        }

        if parts.is_empty() {
            None
        } else {
            Some(TableName { parts })
        }
    }

    pub fn alias(&self) -> Option<String> {
        trailing_alias(&self.0)
    }
}

/// Dotted table name split into its unquoted parts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    parts: Vec<String>,
}

impl TableName {
    /// The last segment (the table itself)
    pub fn table(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or_default()
    }

    /// Everything before the table segment, if qualified
    pub fn qualifier(&self) -> Option<String> {
        if self.parts.len() > 1 {
            Some(self.parts[..self.parts.len() - 1].join("."))
        } else {
            None
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.parts.len() > 1
    }
}

/// Parenthesized query: (SELECT ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subquery(SyntaxNode);

impl Subquery {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == SUBQUERY {
            Some(Self(node))
        } else {
            None
        }
    }

    pub fn with_clause(&self) -> Option<WithClause> {
        self.0.children().find_map(WithClause::cast)
    }

    pub fn select_stmt(&self) -> Option<SelectStmt> {
        self.0.children().find_map(SelectStmt::cast)
    }
}

/// WHERE clause
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WhereClause(SyntaxNode);

impl WhereClause {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == WHERE_CLAUSE {
            Some(Self(node))
        } else {
            None
        }
    }

    pub fn expression(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    /// Get the text range of this WHERE clause
    pub fn text_range(&self) -> TextRange {
        self.0.text_range()
    }

    /// Get the full text of this WHERE clause
    pub fn text(&self) -> String {
        self.0.text().to_string()
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr(SyntaxNode);

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == EXPRESSION {
            Some(Self(node))
        } else {
            None
        }
    }

    /// Get the full text of this expression
    pub fn text(&self) -> String {
        self.0.text().to_string()
    }

    /// Function calls anywhere inside this expression, outermost first
    pub fn function_calls(&self) -> impl Iterator<Item = FunctionCall> + '_ {
        self.0.descendants().filter_map(FunctionCall::cast)
    }
}

/// Function call: name(args), including dashboard macros like $__timeFilter(ts)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionCall(SyntaxNode);

impl FunctionCall {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == FUNCTION_CALL {
            Some(Self(node))
        } else {
            None
        }
    }

    /// The called name, qualified names joined with dots
    pub fn name(&self) -> Option<String> {
        let parts: Vec<String> = self
            .0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| matches!(t.kind(), IDENT | QUOTED_IDENT | VARIABLE | DOT))
            .map(|t| t.text().to_string())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }

    pub fn is_macro(&self) -> bool {
        self.name().is_some_and(|n| n.starts_with("$__"))
    }
}

/// Strip quotes from a quoted identifier; doubled quotes collapse to one.
/// Bare identifiers are returned unchanged.
pub fn unquote_ident(text: &str) -> String {
    match (text.chars().next(), text.chars().last()) {
        (Some(open @ ('"' | '`')), Some(close)) if open == close && text.len() >= 2 => {
            let inner = &text[1..text.len() - 1];
            let doubled: String = [open, open].iter().collect();
            inner.replace(&doubled, &open.to_string())
        }
        _ => text.to_string(),
    }
}

fn first_name_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind().is_name())
}

/// Name token that directly follows the main element of a select item or
/// table reference
fn trailing_alias(node: &SyntaxNode) -> Option<String> {
    let mut seen_body = false;
    let mut after_dot = false;
    let mut last_name = None;

    for element in node.children_with_tokens() {
        match element {
            rowan::NodeOrToken::Node(n) if n.kind() != ERROR => {
                seen_body = true;
                last_name = None;
            }
            rowan::NodeOrToken::Node(_) => {}
            rowan::NodeOrToken::Token(t) => match t.kind() {
                k if k.is_trivia() => {}
                DOT => after_dot = true,
                IDENT | QUOTED_IDENT | VARIABLE if !seen_body || after_dot => {
                    seen_body = true;
                    after_dot = false;
                }
                IDENT | QUOTED_IDENT => last_name = Some(unquote_ident(t.text())),
                _ => {}
            },
        }
    }

    last_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn file(sql: &str) -> File {
        File::cast(parse(sql).syntax()).expect("should have FILE node")
    }

    #[test]
    fn test_unquote_ident() {
        assert_eq!(unquote_ident("\"logs\""), "logs");
        assert_eq!(unquote_ident("`my table`"), "my table");
        assert_eq!(unquote_ident("\"a\"\"b\""), "a\"b");
        assert_eq!(unquote_ident("plain"), "plain");
        assert_eq!(unquote_ident("\""), "\"");
    }

    #[test]
    fn test_table_name_parts() {
        let file = file("SELECT * FROM \"db\".\"logs\" AS l");
        let from = file.select_stmt().unwrap().from_clause().unwrap();
        let table_ref = from.table_refs().next().unwrap();
        let name = table_ref.name().unwrap();

        assert_eq!(name.table(), "logs");
        assert_eq!(name.qualifier().as_deref(), Some("db"));
        assert!(name.is_qualified());
        assert_eq!(table_ref.alias().as_deref(), Some("l"));
    }

    #[test]
    fn test_implicit_table_alias() {
        let file = file("SELECT * FROM events e, users");
        let from = file.select_stmt().unwrap().from_clause().unwrap();
        let refs: Vec<_> = from.table_refs().collect();

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name().unwrap().table(), "events");
        assert_eq!(refs[0].alias().as_deref(), Some("e"));
        assert_eq!(refs[1].alias(), None);
    }

    #[test]
    fn test_select_item_alias() {
        let file = file("SELECT count(*) AS total, host h, level FROM logs");
        let items: Vec<_> = file.select_stmt().unwrap().select_list().unwrap().items().collect();

        assert_eq!(items[0].alias().as_deref(), Some("total"));
        assert_eq!(items[1].alias().as_deref(), Some("h"));
        assert_eq!(items[2].alias(), None);
    }

    #[test]
    fn test_table_function_has_no_name() {
        let file = file("SELECT number FROM numbers(10)");
        let from = file.select_stmt().unwrap().from_clause().unwrap();
        let table_ref = from.table_refs().next().unwrap();

        assert!(table_ref.is_function_call());
        assert_eq!(table_ref.name(), None);
    }

    #[test]
    fn test_join_types() {
        let file = file("SELECT * FROM a JOIN b ON a.id = b.id CROSS JOIN c");
        let from = file.select_stmt().unwrap().from_clause().unwrap();
        let joins: Vec<_> = from.joins().collect();

        assert_eq!(joins.len(), 2);
        assert_eq!(joins[0].join_type(), None);
        assert_eq!(joins[1].join_type(), Some(JoinType::Cross));
        assert_eq!(joins[1].table_ref().unwrap().name().unwrap().table(), "c");
    }

    #[test]
    fn test_macro_function_calls() {
        let file = file("SELECT * FROM logs WHERE $__timeFilter(ts) AND lower(host) = 'a'");
        let expr = file.select_stmt().unwrap().where_clause().unwrap().expression().unwrap();
        let calls: Vec<_> = expr.function_calls().collect();

        assert_eq!(calls.len(), 2);
        assert!(calls[0].is_macro());
        assert_eq!(calls[1].name().as_deref(), Some("lower"));
    }

    #[test]
    fn test_union_selects() {
        let file = file("SELECT a FROM x UNION ALL SELECT a FROM y");
        assert_eq!(file.select_stmts().count(), 2);
    }
}
