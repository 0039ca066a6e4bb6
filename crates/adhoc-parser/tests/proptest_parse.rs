//! Property-based tests for the parser and table resolution
//!
//! Generated dashboard queries must always resolve to the table in their FROM
//! clause, and no input may make the parser panic or drop text.

use adhoc_parser::{parse, resolve_table};
use proptest::prelude::*;

// ===== Generators =====

/// Identifiers that can never collide with a keyword
fn arb_table() -> impl Strategy<Value = String> {
    "t_[a-z0-9_]{0,8}"
}

fn arb_column() -> impl Strategy<Value = String> {
    "c_[a-z0-9_]{0,8}"
}

/// Table reference as it appears in SQL: bare, double-quoted or qualified
fn arb_table_ref(table: String) -> impl Strategy<Value = String> {
    prop_oneof![
        Just(table.clone()),
        Just(format!("\"{}\"", table)),
        Just(format!("`{}`", table)),
        Just(format!("\"default\".\"{}\"", table)),
        Just(format!("{} AS alias_t", table)),
    ]
}

fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i64..10_000).prop_map(|n| n.to_string()),
        "[a-zA-Z0-9 ]{0,12}".prop_map(|s| format!("'{}'", s)),
        Just("$__timeFrom()".to_string()),
    ]
}

fn arb_predicate() -> impl Strategy<Value = String> {
    let op = prop_oneof![Just("="), Just("!="), Just("<"), Just(">="), Just("LIKE")];
    (arb_column(), op, arb_value()).prop_map(|(col, op, value)| format!("{} {} {}", col, op, value))
}

fn arb_where() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        prop::collection::vec(arb_predicate(), 1..4)
            .prop_map(|preds| format!(" WHERE {}", preds.join(" AND "))),
        Just(" WHERE $__timeFilter(ts)".to_string()),
    ]
}

fn arb_tail() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        arb_column().prop_map(|c| format!(" GROUP BY {} ORDER BY {} DESC", c, c)),
        (1u32..500).prop_map(|n| format!(" LIMIT {}", n)),
    ]
}

/// A dashboard query together with the table it reads
fn arb_dashboard_query() -> impl Strategy<Value = (String, String)> {
    arb_table().prop_flat_map(|table| {
        (
            Just(table.clone()),
            prop::collection::vec(arb_column(), 1..4),
            arb_table_ref(table),
            arb_where(),
            arb_tail(),
        )
            .prop_map(|(table, cols, table_ref, where_clause, tail)| {
                let sql = format!(
                    "SELECT {} FROM {}{}{}",
                    cols.join(", "),
                    table_ref,
                    where_clause,
                    tail
                );
                (sql, table)
            })
    })
}

// ===== Properties =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: generated queries resolve to their FROM table
    #[test]
    fn prop_resolves_generated_table((sql, table) in arb_dashboard_query()) {
        prop_assert_eq!(resolve_table(&sql), Some(table));
    }

    /// Property: wrapping a query in a derived table keeps the resolution
    #[test]
    fn prop_derived_table_resolves((sql, table) in arb_dashboard_query()) {
        let wrapped = format!("SELECT * FROM ({}) AS sub", sql);
        prop_assert_eq!(resolve_table(&wrapped), Some(table));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Property: Parser never panics on arbitrary strings
    #[test]
    fn prop_parser_never_panics_arbitrary(s in "\\PC{0,100}") {
        let _ = parse(&s);
        let _ = resolve_table(&s);
    }

    /// Property: the syntax tree reproduces the input exactly
    #[test]
    fn prop_parse_is_lossless(s in "\\PC{0,100}") {
        let parse_result = parse(&s);
        prop_assert_eq!(parse_result.syntax().text().to_string(), s);
    }
}

#[test]
fn test_resolve_grafana_logs_panel() {
    let sql = r#"SELECT ts AS time, host, message
FROM "logs"
WHERE $__timeFilter(ts) AND level = 'ERROR'
ORDER BY time DESC
LIMIT 1000"#;
    assert_eq!(resolve_table(sql).as_deref(), Some("logs"));
}
