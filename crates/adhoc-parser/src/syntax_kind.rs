/// Token and node types for dashboard SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // Keywords
    SELECT_KW,
    FROM_KW,
    WHERE_KW,
    GROUP_KW,
    BY_KW,
    AS_KW,
    AND_KW,
    OR_KW,
    NOT_KW,
    IS_KW,
    NULL_KW,
    LIKE_KW,
    IN_KW,
    BETWEEN_KW,
    EXISTS_KW,
    CASE_KW,
    WHEN_KW,
    THEN_KW,
    ELSE_KW,
    END_KW,
    JOIN_KW,
    INNER_KW,
    LEFT_KW,
    RIGHT_KW,
    FULL_KW,
    OUTER_KW,
    CROSS_KW,
    ON_KW,
    USING_KW,
    HAVING_KW,
    ORDER_KW,
    LIMIT_KW,
    OFFSET_KW,
    DISTINCT_KW,
    ALL_KW,
    ASC_KW,
    DESC_KW,
    WITH_KW,
    UNION_KW,

    // Operators & punctuation
    LPAREN,       // (
    RPAREN,       // )
    LBRACKET,     // [
    RBRACKET,     // ]
    COMMA,        // ,
    DOT,          // .
    SEMICOLON,    // ;
    STAR,         // *
    EQ,           // =
    NE,           // != or <>
    LT,           // <
    GT,           // >
    LE,           // <=
    GE,           // >=
    PLUS,         // +
    MINUS,        // -
    DIVIDE,       // /
    INT_DIVIDE,   // //
    PERCENT,      // %
    CONCAT,       // ||
    DOUBLE_COLON, // ::
    TILDE_MATCH,  // =~ or !~ (dashboard operators, never valid SQL)

    // Literals & identifiers
    STRING,       // 'value'
    QUOTED_IDENT, // "name" or `name`
    NUMBER,       // 123, 3.14
    IDENT,        // column_name, table_name
    VARIABLE,     // $var, ${var}, $__macro
    WHITESPACE,   // spaces, tabs, newlines
    COMMENT,      // -- comment or /* comment */

    // Composite nodes
    FILE,            // Root node
    WITH_CLAUSE,     // WITH name AS (...), ...
    CTE,             // Single common table expression
    SELECT_STMT,     // SELECT ... FROM ... WHERE ...
    SELECT_LIST,     // column1, column2, *
    SELECT_ITEM,     // column or expression with optional alias
    FROM_CLAUSE,     // FROM table, table JOIN table
    TABLE_REF,       // Table reference (name, function or subquery)
    JOIN_CLAUSE,     // Complete JOIN clause with type and condition
    JOIN_CONDITION,  // ON expr or USING (cols)
    WHERE_CLAUSE,    // WHERE expression
    GROUP_BY_CLAUSE, // GROUP BY column1, column2
    HAVING_CLAUSE,   // HAVING expression
    ORDER_BY_CLAUSE, // ORDER BY column1 DESC
    LIMIT_CLAUSE,    // LIMIT n OFFSET m
    EXPRESSION,      // Generic expression
    BINARY_EXPR,     // left op right
    FUNCTION_CALL,   // COUNT(*), $__timeFilter(ts)
    ARG_LIST,        // (arg1, arg2)
    CASE_EXPR,       // CASE WHEN ... THEN ... END
    SUBQUERY,        // (SELECT ...)

    // Error handling
    ERROR, // Invalid syntax

    // Special
    EOF, // End of file
}

use SyntaxKind::*;

impl SyntaxKind {
    pub fn is_keyword(&self) -> bool {
        (*self as u16) <= (UNION_KW as u16)
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self, WHITESPACE | COMMENT)
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, STRING | NUMBER | NULL_KW)
    }

    /// Identifier-like tokens: bare or quoted names
    pub fn is_name(&self) -> bool {
        matches!(self, IDENT | QUOTED_IDENT)
    }

    /// Keywords that start a new clause of a SELECT statement
    pub fn is_clause_start(&self) -> bool {
        matches!(
            self,
            FROM_KW
                | WHERE_KW
                | GROUP_KW
                | HAVING_KW
                | ORDER_KW
                | LIMIT_KW
                | OFFSET_KW
                | UNION_KW
                | SEMICOLON
        )
    }

    pub fn is_join_start(&self) -> bool {
        matches!(
            self,
            JOIN_KW | INNER_KW | LEFT_KW | RIGHT_KW | FULL_KW | CROSS_KW
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// The language type for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SqlLanguage {}

impl rowan::Language for SqlLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::EOF as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Convenient type aliases
pub type SyntaxNode = rowan::SyntaxNode<SqlLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<SqlLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<SqlLanguage>;
