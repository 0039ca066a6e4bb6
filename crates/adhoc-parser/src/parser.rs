/// Parser implementation with error recovery
use crate::lexer::{tokenize, Token};
use crate::syntax_kind::{SqlLanguage, SyntaxKind};
use crate::SyntaxKind::*;
use rowan::{GreenNode, GreenNodeBuilder, TextRange};

/// Result of parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub green_node: GreenNode,
    pub errors: Vec<ParseError>,
}

impl Parse {
    pub fn syntax(&self) -> rowan::SyntaxNode<SqlLanguage> {
        rowan::SyntaxNode::new_root(self.green_node.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

/// Parse input text into a CST
pub fn parse(input: &str) -> Parse {
    let tokens = tokenize(input);
    let mut parser = Parser::new(input, &tokens);
    parser.parse_file();
    parser.finish()
}

struct Parser<'a> {
    input: &'a str,
    tokens: &'a [Token],
    pos: usize,
    offset: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            input,
            tokens,
            pos: 0,
            offset: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green_node: self.builder.finish(),
            errors: self.errors,
        }
    }

    /// Current token kind
    fn current(&self) -> SyntaxKind {
        self.tokens.get(self.pos).map(|t| t.kind).unwrap_or(EOF)
    }

    /// Check if at specific token kind
    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Check if at any of the given kinds
    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    /// Kind of the first non-trivia token after the current one
    fn peek_non_trivia(&self) -> SyntaxKind {
        self.tokens
            .iter()
            .skip(self.pos + 1)
            .map(|t| t.kind)
            .find(|k| !k.is_trivia())
            .unwrap_or(EOF)
    }

    /// Advance to next token, consuming trivia
    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            let token = self.tokens[self.pos];
            if !token.terminated {
                let what = if token.kind == STRING {
                    "string literal"
                } else {
                    "quoted identifier"
                };
                self.error(format!("Unterminated {}", what));
            }
            let text = &self.input[self.offset..self.offset + token.len];
            self.builder.token(token.kind.into(), text);
            self.offset += token.len;
            self.pos += 1;
        }
    }

    /// Skip trivia (whitespace, comments)
    fn skip_trivia(&mut self) {
        while self.current().is_trivia() {
            self.advance();
        }
    }

    /// Expect a specific token kind, report error if not present
    fn expect(&mut self, kind: SyntaxKind) -> bool {
        self.skip_trivia();
        if self.at(kind) {
            self.advance();
            true
        } else {
            self.error(format!("Expected {:?}, found {:?}", kind, self.current()));
            false
        }
    }

    /// Expect a bare or quoted name
    fn expect_name(&mut self) -> bool {
        self.skip_trivia();
        if self.current().is_name() {
            self.advance();
            true
        } else {
            self.error(format!("Expected identifier, found {:?}", self.current()));
            false
        }
    }

    /// Start a composite node
    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    /// Start a composite node at a checkpoint (for lookahead/backtracking)
    fn start_node_at(&mut self, checkpoint: rowan::Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    /// Finish current node
    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Report a parse error
    fn error(&mut self, message: String) {
        let start = self.offset as u32;
        let end = (self.offset + self.tokens.get(self.pos).map(|t| t.len).unwrap_or(0)) as u32;
        self.errors.push(ParseError {
            message,
            range: TextRange::new(start.into(), end.into()),
        });
    }

    /// Synchronize to one of the given tokens (error recovery)
    fn sync_to(&mut self, kinds: &[SyntaxKind]) {
        while !self.at(EOF) && !self.at_any(kinds) {
            self.start_node(ERROR);
            self.advance();
            self.finish_node();
        }
    }

    /// Paren-aware recovery: wrap tokens in ERROR nodes until one of `kinds`
    /// (or a closing paren) shows up outside any nested group. With
    /// `clause_boundary`, keywords that open a new clause also stop recovery.
    fn recover(&mut self, kinds: &[SyntaxKind], clause_boundary: bool) {
        self.skip_trivia();
        let mut depth = 0usize;
        let mut reported = false;

        while !self.at(EOF) {
            let kind = self.current();
            if depth == 0
                && (kind == RPAREN
                    || self.at_any(kinds)
                    || (clause_boundary && kind.is_clause_start()))
            {
                break;
            }
            if !reported && !kind.is_trivia() {
                self.error(format!("Unexpected {:?}", kind));
                reported = true;
            }
            match kind {
                LPAREN => depth += 1,
                RPAREN => depth -= 1,
                _ => {}
            }
            self.start_node(ERROR);
            self.advance();
            self.finish_node();
        }
    }

    // ===== Parsing rules =====

    fn parse_file(&mut self) {
        self.start_node(FILE);

        self.skip_trivia();

        if self.at_any(&[SELECT_KW, WITH_KW]) {
            self.parse_query();
        } else if !self.at(EOF) {
            self.error("Expected SELECT statement".to_string());
            self.sync_to(&[EOF]);
        }

        // Consume trailing semicolons and anything after them
        while !self.at(EOF) {
            self.advance();
        }

        self.finish_node();
    }

    /// [WITH ...] SELECT ... [UNION [ALL] SELECT ...]*
    fn parse_query(&mut self) {
        self.skip_trivia();
        if self.at(WITH_KW) {
            self.parse_with_clause();
        }

        self.skip_trivia();
        if self.at(SELECT_KW) {
            self.parse_select_stmt();
        } else {
            self.error(format!("Expected SELECT, found {:?}", self.current()));
            return;
        }

        self.skip_trivia();
        while self.at(UNION_KW) {
            self.advance();
            self.skip_trivia();
            if self.at_any(&[ALL_KW, DISTINCT_KW]) {
                self.advance();
            }
            self.skip_trivia();
            if self.at(SELECT_KW) {
                self.parse_select_stmt();
            } else if self.at(LPAREN) {
                self.parse_subquery();
            } else {
                self.error("Expected SELECT after UNION".to_string());
            }
            self.skip_trivia();
        }
    }

    fn parse_with_clause(&mut self) {
        self.start_node(WITH_CLAUSE);
        self.expect(WITH_KW);

        loop {
            self.parse_cte();

            self.skip_trivia();
            if self.at(COMMA) {
                self.advance();
            } else {
                break;
            }
        }

        self.finish_node();
    }

    fn parse_cte(&mut self) {
        self.start_node(CTE);
        self.expect_name();

        // Optional column list: name (a, b) AS (...)
        self.skip_trivia();
        if self.at(LPAREN) {
            self.advance();
            self.recover(&[], false);
            self.expect(RPAREN);
        }

        self.expect(AS_KW);
        if self.expect(LPAREN) {
            self.parse_query();
            self.recover(&[], false);
            self.expect(RPAREN);
        }

        self.finish_node();
    }

    fn parse_select_stmt(&mut self) {
        self.start_node(SELECT_STMT);

        // SELECT [DISTINCT | ALL]
        self.expect(SELECT_KW);
        self.skip_trivia();
        if self.at_any(&[DISTINCT_KW, ALL_KW]) {
            self.advance();
        }

        // Select list
        self.parse_select_list();

        // FROM clause
        self.skip_trivia();
        if self.at(FROM_KW) {
            self.parse_from_clause();
        }

        // WHERE clause
        self.skip_trivia();
        if self.at(WHERE_KW) {
            self.parse_where_clause();
        }

        // GROUP BY clause
        self.skip_trivia();
        if self.at(GROUP_KW) {
            self.parse_group_by_clause();
        }

        // HAVING clause
        self.skip_trivia();
        if self.at(HAVING_KW) {
            self.parse_having_clause();
        }

        // ORDER BY clause
        self.skip_trivia();
        if self.at(ORDER_KW) {
            self.parse_order_by_clause();
        }

        // LIMIT / OFFSET
        self.skip_trivia();
        if self.at_any(&[LIMIT_KW, OFFSET_KW]) {
            self.parse_limit_clause();
        }

        self.finish_node();
    }

    fn parse_select_list(&mut self) {
        self.start_node(SELECT_LIST);

        // Parse comma-separated select items
        loop {
            self.parse_select_item();

            self.skip_trivia();
            if self.at(COMMA) {
                self.advance();
            } else {
                break;
            }
        }

        self.finish_node();
    }

    fn parse_select_item(&mut self) {
        self.start_node(SELECT_ITEM);
        self.skip_trivia();

        if self.at(STAR) {
            self.advance();
        } else {
            self.parse_expression();

            // Optional alias, with or without AS
            self.skip_trivia();
            if self.at(AS_KW) {
                self.advance();
                self.expect_name();
            } else if self.current().is_name() {
                self.advance();
            }
        }

        self.recover(&[COMMA], true);
        self.finish_node();
    }

    fn parse_from_clause(&mut self) {
        self.start_node(FROM_CLAUSE);

        self.expect(FROM_KW);

        loop {
            self.parse_table_ref();

            self.skip_trivia();
            if self.at(COMMA) {
                self.advance();
            } else {
                break;
            }
        }

        self.skip_trivia();
        while self.current().is_join_start() {
            self.parse_join_clause();
            self.skip_trivia();
        }

        self.recover(&[], true);
        self.finish_node();
    }

    fn parse_table_ref(&mut self) {
        self.start_node(TABLE_REF);
        self.skip_trivia();

        if self.at(LPAREN) && matches!(self.peek_non_trivia(), SELECT_KW | WITH_KW) {
            self.parse_subquery();
        } else if self.current().is_name() {
            // Use builder checkpoint for proper lookahead
            let checkpoint = self.builder.checkpoint();
            self.advance();
            self.skip_trivia();

            // Qualified name: db.schema.table
            while self.at(DOT) {
                self.advance();
                self.expect_name();
                self.skip_trivia();
            }

            if self.at(LPAREN) {
                // Table function: numbers(10)
                self.start_node_at(checkpoint, FUNCTION_CALL);
                self.parse_arg_list();
                self.finish_node();
            }
        } else if self.at(VARIABLE) {
            self.advance();
        } else {
            self.error("Expected table reference".to_string());
        }

        // Optional alias
        self.skip_trivia();
        if self.at(AS_KW) {
            self.advance();
            self.expect_name();
        } else if self.current().is_name() {
            self.advance();
        }

        self.finish_node();
    }

    fn parse_join_clause(&mut self) {
        self.start_node(JOIN_CLAUSE);

        // [INNER | LEFT | RIGHT | FULL | CROSS] [OUTER] JOIN
        if self.at_any(&[INNER_KW, LEFT_KW, RIGHT_KW, FULL_KW, CROSS_KW]) {
            self.advance();
            self.skip_trivia();
        }
        if self.at(OUTER_KW) {
            self.advance();
        }
        self.expect(JOIN_KW);

        self.parse_table_ref();

        self.skip_trivia();
        if self.at(ON_KW) {
            self.start_node(JOIN_CONDITION);
            self.advance();
            self.parse_expression();
            self.finish_node();
        } else if self.at(USING_KW) {
            self.start_node(JOIN_CONDITION);
            self.advance();
            if self.expect(LPAREN) {
                loop {
                    self.expect_name();
                    self.skip_trivia();
                    if self.at(COMMA) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                self.expect(RPAREN);
            }
            self.finish_node();
        }

        self.finish_node();
    }

    fn parse_subquery(&mut self) {
        self.start_node(SUBQUERY);
        self.expect(LPAREN);
        self.parse_query();
        self.recover(&[], false);
        self.expect(RPAREN);
        self.finish_node();
    }

    fn parse_where_clause(&mut self) {
        self.start_node(WHERE_CLAUSE);
        self.expect(WHERE_KW);
        self.parse_expression();
        self.recover(&[], true);
        self.finish_node();
    }

    fn parse_group_by_clause(&mut self) {
        self.start_node(GROUP_BY_CLAUSE);
        self.expect(GROUP_KW);
        self.expect(BY_KW);

        // Parse comma-separated column list
        loop {
            self.parse_expression();
            self.recover(&[COMMA], true);

            if self.at(COMMA) {
                self.advance();
            } else {
                break;
            }
        }

        self.finish_node();
    }

    fn parse_having_clause(&mut self) {
        self.start_node(HAVING_CLAUSE);
        self.expect(HAVING_KW);
        self.parse_expression();
        self.recover(&[], true);
        self.finish_node();
    }

    fn parse_order_by_clause(&mut self) {
        self.start_node(ORDER_BY_CLAUSE);
        self.expect(ORDER_KW);
        self.expect(BY_KW);

        loop {
            self.parse_expression();
            self.skip_trivia();
            if self.at_any(&[ASC_KW, DESC_KW]) {
                self.advance();
            }
            self.recover(&[COMMA], true);

            if self.at(COMMA) {
                self.advance();
            } else {
                break;
            }
        }

        self.finish_node();
    }

    fn parse_limit_clause(&mut self) {
        self.start_node(LIMIT_CLAUSE);

        if self.at(LIMIT_KW) {
            self.advance();
            self.parse_expression();
            // MySQL-style LIMIT offset, count
            self.skip_trivia();
            if self.at(COMMA) {
                self.advance();
                self.parse_expression();
            }
        }

        self.skip_trivia();
        if self.at(OFFSET_KW) {
            self.advance();
            self.parse_expression();
        }

        self.recover(&[], true);
        self.finish_node();
    }

    fn parse_expression(&mut self) {
        self.start_node(EXPRESSION);
        self.skip_trivia();

        self.parse_or_expr();

        self.finish_node();
    }

    fn parse_or_expr(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_and_expr();

        while self.at(OR_KW) {
            self.start_node_at(checkpoint, BINARY_EXPR);
            self.advance();
            self.skip_trivia();
            self.parse_and_expr();
            self.finish_node();
        }
    }

    fn parse_and_expr(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_not_expr();

        while self.at(AND_KW) {
            self.start_node_at(checkpoint, BINARY_EXPR);
            self.advance();
            self.skip_trivia();
            self.parse_not_expr();
            self.finish_node();
        }
    }

    fn parse_not_expr(&mut self) {
        if self.at(NOT_KW) {
            self.advance();
            self.skip_trivia();
            self.parse_not_expr();
        } else {
            self.parse_comparison_expr();
        }
    }

    fn parse_comparison_expr(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_additive_expr();

        loop {
            if self.at_any(&[EQ, NE, LT, GT, LE, GE, TILDE_MATCH]) {
                self.start_node_at(checkpoint, BINARY_EXPR);
                self.advance();
                self.skip_trivia();
                self.parse_additive_expr();
                self.finish_node();
            } else if self.at(IS_KW) {
                // IS [NOT] NULL / IS [NOT] expr
                self.start_node_at(checkpoint, BINARY_EXPR);
                self.advance();
                self.skip_trivia();
                if self.at(NOT_KW) {
                    self.advance();
                    self.skip_trivia();
                }
                self.parse_additive_expr();
                self.finish_node();
            } else if self.at_any(&[LIKE_KW, IN_KW, BETWEEN_KW])
                || (self.at(NOT_KW)
                    && matches!(self.peek_non_trivia(), LIKE_KW | IN_KW | BETWEEN_KW))
            {
                self.start_node_at(checkpoint, BINARY_EXPR);
                if self.at(NOT_KW) {
                    self.advance();
                    self.skip_trivia();
                }
                self.parse_predicate_tail();
                self.finish_node();
            } else {
                break;
            }
        }
    }

    /// The part of LIKE / IN / BETWEEN after the keyword's left operand
    fn parse_predicate_tail(&mut self) {
        match self.current() {
            LIKE_KW => {
                self.advance();
                self.skip_trivia();
                self.parse_additive_expr();
            }
            IN_KW => {
                self.advance();
                self.skip_trivia();
                if self.at(LPAREN) && matches!(self.peek_non_trivia(), SELECT_KW | WITH_KW) {
                    self.parse_subquery();
                    self.skip_trivia();
                } else if self.at(LPAREN) {
                    self.parse_arg_list();
                    self.skip_trivia();
                } else {
                    // IN $values
                    self.parse_additive_expr();
                }
            }
            BETWEEN_KW => {
                self.advance();
                self.skip_trivia();
                self.parse_additive_expr();
                self.expect(AND_KW);
                self.skip_trivia();
                self.parse_additive_expr();
            }
            _ => {}
        }
    }

    fn parse_additive_expr(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_multiplicative_expr();

        while self.at_any(&[PLUS, MINUS, CONCAT]) {
            self.start_node_at(checkpoint, BINARY_EXPR);
            self.advance();
            self.skip_trivia();
            self.parse_multiplicative_expr();
            self.finish_node();
        }
    }

    fn parse_multiplicative_expr(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_unary_expr();

        while self.at_any(&[STAR, DIVIDE, INT_DIVIDE, PERCENT]) {
            self.start_node_at(checkpoint, BINARY_EXPR);
            self.advance();
            self.skip_trivia();
            self.parse_unary_expr();
            self.finish_node();
        }
    }

    fn parse_unary_expr(&mut self) {
        if self.at_any(&[MINUS, PLUS]) {
            self.advance();
            self.skip_trivia();
            self.parse_unary_expr();
        } else {
            self.parse_postfix_expr();
        }
    }

    fn parse_postfix_expr(&mut self) {
        self.parse_primary_expr();

        loop {
            if self.at(DOUBLE_COLON) {
                // PostgreSQL-style cast: expr::type
                self.advance();
                self.expect_name();
                self.skip_trivia();
                if self.at(LPAREN) {
                    self.parse_arg_list();
                    self.skip_trivia();
                }
            } else if self.at(LBRACKET) {
                // Map / array access: attrs['key']
                self.advance();
                self.parse_expression();
                self.expect(RBRACKET);
                self.skip_trivia();
            } else {
                break;
            }
        }
    }

    fn parse_primary_expr(&mut self) {
        self.skip_trivia();

        if self.at(LPAREN) {
            if matches!(self.peek_non_trivia(), SELECT_KW | WITH_KW) {
                self.parse_subquery();
            } else {
                // Parenthesized expression or tuple
                self.advance();
                loop {
                    self.parse_expression();
                    self.recover(&[COMMA], false);
                    if self.at(COMMA) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                self.expect(RPAREN);
            }
        } else if self.at(EXISTS_KW) {
            self.advance();
            self.skip_trivia();
            self.parse_primary_expr();
        } else if self.at(CASE_KW) {
            self.parse_case_expr();
        } else if self.current().is_name() || self.at(VARIABLE) {
            // Could be column reference, qualified name, or function call
            let checkpoint = self.builder.checkpoint();
            self.advance(); // consume first name
            self.skip_trivia();

            while self.at(DOT) {
                // table.column or table.*
                self.advance();
                self.skip_trivia();
                if self.at(STAR) {
                    self.advance();
                } else {
                    self.expect_name();
                }
                self.skip_trivia();
            }

            if self.at(LPAREN) {
                self.start_node_at(checkpoint, FUNCTION_CALL);
                self.parse_arg_list();
                self.finish_node();
            }
        } else if self.current().is_literal() || self.at(STAR) {
            self.advance();
        } else {
            self.error(format!("Expected expression, found {:?}", self.current()));
        }

        self.skip_trivia();
    }

    fn parse_case_expr(&mut self) {
        self.start_node(CASE_EXPR);
        self.expect(CASE_KW);
        self.skip_trivia();

        // Simple CASE: CASE expr WHEN ...
        if !self.at(WHEN_KW) {
            self.parse_expression();
        }

        while self.at(WHEN_KW) {
            self.advance();
            self.parse_expression();
            self.expect(THEN_KW);
            self.parse_expression();
        }

        if self.at(ELSE_KW) {
            self.advance();
            self.parse_expression();
        }

        self.recover(&[END_KW], false);
        self.expect(END_KW);
        self.finish_node();
    }

    fn parse_arg_list(&mut self) {
        self.start_node(ARG_LIST);
        self.expect(LPAREN);
        self.skip_trivia();

        if !self.at(RPAREN) {
            loop {
                self.skip_trivia();
                if self.at_any(&[DISTINCT_KW, ALL_KW]) {
                    self.advance();
                }
                self.parse_expression();

                // CAST(x AS type), EXTRACT(epoch FROM ts) and friends
                self.recover(&[COMMA], false);
                if self.at(COMMA) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.expect(RPAREN);
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax_kind::SyntaxNode;

    fn has_node(root: &SyntaxNode, kind: SyntaxKind) -> bool {
        root.descendants().any(|n| n.kind() == kind)
    }

    #[test]
    fn test_parse_is_lossless() {
        let sql = "SELECT a, count(*) AS n\nFROM \"logs\" l -- trailing\nWHERE level = 'ERROR' GROUP BY a;";
        let parse = parse(sql);
        assert_eq!(parse.syntax().text().to_string(), sql);
    }

    #[test]
    fn test_simple_select_has_no_errors() {
        let parse = parse("SELECT host, level FROM logs WHERE level = 'ERROR' ORDER BY host DESC LIMIT 10");
        assert!(parse.errors.is_empty(), "{:?}", parse.errors);
        let root = parse.syntax();
        assert!(has_node(&root, FROM_CLAUSE));
        assert!(has_node(&root, WHERE_CLAUSE));
        assert!(has_node(&root, ORDER_BY_CLAUSE));
        assert!(has_node(&root, LIMIT_CLAUSE));
    }

    #[test]
    fn test_cte_and_join() {
        let sql = "WITH recent AS (SELECT * FROM events WHERE ts > now()) \
                   SELECT * FROM recent r LEFT OUTER JOIN users u ON r.user_id = u.id";
        let parse = parse(sql);
        assert!(parse.errors.is_empty(), "{:?}", parse.errors);
        let root = parse.syntax();
        assert!(has_node(&root, WITH_CLAUSE));
        assert!(has_node(&root, CTE));
        assert!(has_node(&root, JOIN_CLAUSE));
        assert!(has_node(&root, JOIN_CONDITION));
    }

    #[test]
    fn test_macros_and_predicates() {
        let sql = "SELECT $__timeInterval(ts) AS t, count(*) FROM \"logs\" \
                   WHERE $__timeFilter(ts) AND host IN ('a', 'b') AND msg NOT LIKE '%x%' \
                   AND v BETWEEN 1 AND 2 AND x IS NOT NULL GROUP BY t ORDER BY t";
        let parse = parse(sql);
        assert!(parse.errors.is_empty(), "{:?}", parse.errors);
    }

    #[test]
    fn test_recovers_from_unknown_syntax() {
        let sql = "SELECT ts - INTERVAL 1 DAY FROM logs WHERE x = 1";
        let parse = parse(sql);
        assert!(!parse.errors.is_empty());
        let root = parse.syntax();
        assert!(has_node(&root, FROM_CLAUSE));
        assert!(has_node(&root, WHERE_CLAUSE));
        assert_eq!(root.text().to_string(), sql);
    }

    #[test]
    fn test_function_args_with_keywords() {
        let sql = "SELECT CAST(x AS INT), EXTRACT(epoch FROM ts) FROM t";
        let parse = parse(sql);
        let root = parse.syntax();
        let from = root
            .descendants()
            .find(|n| n.kind() == FROM_CLAUSE)
            .expect("should have FROM clause");
        assert_eq!(from.text().to_string().trim(), "FROM t");
    }

    #[test]
    fn test_unterminated_quotes_are_errors() {
        let parse_result = parse("SELECT * FROM `a");
        assert_eq!(parse_result.errors.len(), 1);
        assert_eq!(parse_result.errors[0].message, "Unterminated quoted identifier");
        assert_eq!(
            parse_result.errors[0].range,
            TextRange::new(14.into(), 16.into())
        );

        let parse_result = parse("SELECT * FROM logs WHERE level = 'ERROR");
        assert_eq!(parse_result.errors.len(), 1);
        assert_eq!(parse_result.errors[0].message, "Unterminated string literal");
    }

    #[test]
    fn test_not_a_select() {
        let parse = parse("SHOW TABLES");
        assert_eq!(parse.errors.len(), 1);
        assert!(!has_node(&parse.syntax(), SELECT_STMT));
    }
}
