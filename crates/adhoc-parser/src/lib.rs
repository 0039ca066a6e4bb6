/// adhoc-parser - Rowan-based parser for dashboard SQL
///
/// This crate provides a standalone parser for the SQL panels send to
/// Databend, including Grafana-style template variables such as
/// `$__timeFilter(ts)` and `${host}`.
///
/// The parser is built on Rowan, providing:
/// - Lossless concrete syntax tree (CST)
/// - Error recovery (parse incomplete/invalid code)
/// - Position tracking for diagnostics
///
/// Its main consumer is [`resolve_table`], which finds the table a query
/// targets so ad hoc filters can be bound to it.
pub mod syntax_kind;
pub mod lexer;
pub mod parser;
pub mod ast;
pub mod table;

pub use syntax_kind::SyntaxKind;
pub use parser::{parse, Parse, ParseError};
pub use ast::*;
pub use table::resolve_table;

/// Re-export Rowan types for convenience
pub use rowan::TextRange;
