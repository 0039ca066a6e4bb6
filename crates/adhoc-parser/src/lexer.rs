/// Lexer for dashboard SQL, including template variables such as `$__timeFilter`
use crate::syntax_kind::SyntaxKind;
use crate::SyntaxKind::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub len: usize,
    /// False for a string or quoted identifier that runs into end of input
    pub terminated: bool,
}

/// Tokenize input text into a stream of tokens
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        if token.kind == EOF {
            break;
        }
        tokens.push(token);
    }

    tokens
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    terminated: bool,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            terminated: true,
        }
    }

    fn next_token(&mut self) -> Token {
        if self.at_eof() {
            return Token {
                kind: EOF,
                len: 0,
                terminated: true,
            };
        }

        self.terminated = true;

        let start = self.pos;
        let c = self.current_char();

        let kind = match c {
            // Whitespace
            c if c.is_whitespace() => self.consume_whitespace(),

            // Comments
            '-' if self.peek_char() == Some('-') => self.consume_line_comment(),
            '/' if self.peek_char() == Some('*') => self.consume_block_comment(),

            // Operators & punctuation
            '(' => self.single(LPAREN),
            ')' => self.single(RPAREN),
            '[' => self.single(LBRACKET),
            ']' => self.single(RBRACKET),
            ',' => self.single(COMMA),
            '.' => self.single(DOT),
            ';' => self.single(SEMICOLON),
            '*' => self.single(STAR),
            '+' => self.single(PLUS),
            '-' => self.single(MINUS),
            '%' => self.single(PERCENT),
            '/' if self.peek_char() == Some('/') => self.double(INT_DIVIDE),
            '/' => self.single(DIVIDE),
            '|' if self.peek_char() == Some('|') => self.double(CONCAT),
            '=' if self.peek_char() == Some('~') => self.double(TILDE_MATCH),
            '=' => self.single(EQ),
            '!' if self.peek_char() == Some('=') => self.double(NE),
            '!' if self.peek_char() == Some('~') => self.double(TILDE_MATCH),
            '<' if self.peek_char() == Some('>') => self.double(NE),
            '<' if self.peek_char() == Some('=') => self.double(LE),
            '<' => self.single(LT),
            '>' if self.peek_char() == Some('=') => self.double(GE),
            '>' => self.single(GT),
            ':' if self.peek_char() == Some(':') => self.double(DOUBLE_COLON),

            // Strings and quoted identifiers
            '\'' => self.consume_quoted('\'', STRING),
            '"' => self.consume_quoted('"', QUOTED_IDENT),
            '`' => self.consume_quoted('`', QUOTED_IDENT),

            // Template variables
            '$' => self.consume_variable(),

            // Numbers
            c if c.is_ascii_digit() => self.consume_number(),

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => self.consume_ident_or_keyword(),

            // Unknown character
            _ => {
                self.advance();
                ERROR
            }
        };

        Token {
            kind,
            len: self.pos - start,
            terminated: self.terminated,
        }
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += self.current_char().len_utf8();
        }
    }

    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.advance();
        kind
    }

    fn double(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.advance();
        self.advance();
        kind
    }

    fn consume_whitespace(&mut self) -> SyntaxKind {
        while !self.at_eof() && self.current_char().is_whitespace() {
            self.advance();
        }
        WHITESPACE
    }

    fn consume_line_comment(&mut self) -> SyntaxKind {
        // Consume --
        self.advance();
        self.advance();

        while !self.at_eof() && self.current_char() != '\n' {
            self.advance();
        }

        COMMENT
    }

    fn consume_block_comment(&mut self) -> SyntaxKind {
        // Consume /*
        self.advance();
        self.advance();

        while !self.at_eof() {
            if self.current_char() == '*' && self.peek_char() == Some('/') {
                self.advance();
                self.advance();
                break;
            }
            self.advance();
        }

        COMMENT
    }

    /// Quoted text; a doubled quote character is an escaped quote
    fn consume_quoted(&mut self, quote: char, kind: SyntaxKind) -> SyntaxKind {
        // Consume opening quote
        self.advance();

        while !self.at_eof() {
            let c = self.current_char();
            if c == quote {
                if self.peek_char() == Some(quote) {
                    self.advance();
                    self.advance();
                    continue;
                }
                self.advance();
                return kind;
            }
            if c == '\\' && quote == '\'' {
                // Skip escaped character
                self.advance();
            }
            self.advance();
        }

        self.terminated = false;
        kind
    }

    /// `$name`, `${name}` or `${name:format}`
    fn consume_variable(&mut self) -> SyntaxKind {
        // Consume $
        self.advance();

        if self.current_char() == '{' {
            while !self.at_eof() && self.current_char() != '}' {
                self.advance();
            }
            self.advance();
            return VARIABLE;
        }

        if !(self.current_char().is_alphanumeric() || self.current_char() == '_') {
            return ERROR;
        }

        while !self.at_eof() && (self.current_char().is_alphanumeric() || self.current_char() == '_')
        {
            self.advance();
        }

        VARIABLE
    }

    fn consume_number(&mut self) -> SyntaxKind {
        while self.current_char().is_ascii_digit() {
            self.advance();
        }

        // Handle decimal point
        if self.current_char() == '.' && self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // consume '.'
            while self.current_char().is_ascii_digit() {
                self.advance();
            }
        }

        // Exponent
        if matches!(self.current_char(), 'e' | 'E') {
            let rest = &self.input[self.pos + 1..];
            let digits = rest.strip_prefix(['+', '-']).unwrap_or(rest);
            if digits.starts_with(|c: char| c.is_ascii_digit()) {
                self.advance(); // consume 'e'
                if matches!(self.current_char(), '+' | '-') {
                    self.advance();
                }
                while self.current_char().is_ascii_digit() {
                    self.advance();
                }
            }
        }

        NUMBER
    }

    fn consume_ident_or_keyword(&mut self) -> SyntaxKind {
        let start = self.pos;

        while self.current_char().is_alphanumeric() || self.current_char() == '_' {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        keyword_or_ident(text)
    }
}

fn keyword_or_ident(text: &str) -> SyntaxKind {
    match text.to_uppercase().as_str() {
        "SELECT" => SELECT_KW,
        "FROM" => FROM_KW,
        "WHERE" => WHERE_KW,
        "GROUP" => GROUP_KW,
        "BY" => BY_KW,
        "AS" => AS_KW,
        "AND" => AND_KW,
        "OR" => OR_KW,
        "NOT" => NOT_KW,
        "IS" => IS_KW,
        "NULL" => NULL_KW,
        "LIKE" => LIKE_KW,
        "IN" => IN_KW,
        "BETWEEN" => BETWEEN_KW,
        "EXISTS" => EXISTS_KW,
        "CASE" => CASE_KW,
        "WHEN" => WHEN_KW,
        "THEN" => THEN_KW,
        "ELSE" => ELSE_KW,
        "END" => END_KW,
        "JOIN" => JOIN_KW,
        "INNER" => INNER_KW,
        "LEFT" => LEFT_KW,
        "RIGHT" => RIGHT_KW,
        "FULL" => FULL_KW,
        "OUTER" => OUTER_KW,
        "CROSS" => CROSS_KW,
        "ON" => ON_KW,
        "USING" => USING_KW,
        "HAVING" => HAVING_KW,
        "ORDER" => ORDER_KW,
        "LIMIT" => LIMIT_KW,
        "OFFSET" => OFFSET_KW,
        "DISTINCT" => DISTINCT_KW,
        "ALL" => ALL_KW,
        "ASC" => ASC_KW,
        "DESC" => DESC_KW,
        "WITH" => WITH_KW,
        "UNION" => UNION_KW,
        _ => IDENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_basic_sql() {
        let input = "SELECT user_id FROM events";
        let tokens = tokenize(input);

        assert_eq!(tokens[0].kind, SELECT_KW);
        assert_eq!(tokens[1].kind, WHITESPACE);
        assert_eq!(tokens[2].kind, IDENT); // user_id
        assert_eq!(tokens[3].kind, WHITESPACE);
        assert_eq!(tokens[4].kind, FROM_KW);
        assert_eq!(tokens[5].kind, WHITESPACE);
        assert_eq!(tokens[6].kind, IDENT); // events
    }

    #[test]
    fn test_quoted_identifiers_are_not_strings() {
        assert_eq!(
            kinds(r#"SELECT * FROM "logs" WHERE level = 'ERROR'"#),
            vec![SELECT_KW, STAR, FROM_KW, QUOTED_IDENT, WHERE_KW, IDENT, EQ, STRING]
        );
        assert_eq!(kinds("`my table`"), vec![QUOTED_IDENT]);
    }

    #[test]
    fn test_doubled_quote_stays_in_string() {
        let tokens = tokenize("'it''s' x");
        assert_eq!(tokens[0].kind, STRING);
        assert_eq!(tokens[0].len, 7);
    }

    #[test]
    fn test_template_variables() {
        assert_eq!(
            kinds("WHERE $__timeFilter(ts) AND host = ${host}"),
            vec![WHERE_KW, VARIABLE, LPAREN, IDENT, RPAREN, AND_KW, IDENT, EQ, VARIABLE]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("a <> b != c // 2 || d =~ e !~ f :: g"),
            vec![
                IDENT, NE, IDENT, NE, IDENT, INT_DIVIDE, NUMBER, CONCAT, IDENT, TILDE_MATCH,
                IDENT, TILDE_MATCH, IDENT, DOUBLE_COLON, IDENT
            ]
        );
    }

    #[test]
    fn test_comment() {
        let input = "-- This is a comment\nSELECT /* inline */ 1";
        let tokens = tokenize(input);

        assert_eq!(tokens[0].kind, COMMENT);
        assert_eq!(tokens[1].kind, WHITESPACE); // newline
        assert_eq!(tokens[2].kind, SELECT_KW);
        assert_eq!(tokens[4].kind, COMMENT);
        assert_eq!(tokens[6].kind, NUMBER);
    }

    #[test]
    fn test_number_with_exponent() {
        let tokens = tokenize("1.5e-3e");
        assert_eq!(tokens[0].kind, NUMBER);
        assert_eq!(tokens[0].len, 6);
        assert_eq!(tokens[1].kind, IDENT);
    }

    #[test]
    fn test_token_lengths_cover_input() {
        let input = "SELECT 'unterminated";
        let total: usize = tokenize(input).iter().map(|t| t.len).sum();
        assert_eq!(total, input.len());
    }

    #[test]
    fn test_unterminated_quotes_are_flagged() {
        let tokens = tokenize("SELECT * FROM `a");
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, QUOTED_IDENT);
        assert!(!last.terminated);

        let tokens = tokenize(r#"SELECT 'x' FROM "a""b""#);
        assert!(tokens.iter().all(|t| t.terminated));

        // A doubled quote at end of input is an escape, not a close
        let tokens = tokenize(r#"FROM "a"""#);
        assert!(!tokens.last().unwrap().terminated);
    }
}
