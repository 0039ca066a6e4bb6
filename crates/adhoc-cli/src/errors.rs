use adhoc_parser::TextRange;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to load configuration file: {path}\n{source}")]
    ConfigLoadError {
        path: PathBuf,
        source: anyhow::Error,
    },

    #[error("No query given.\nHint: Pass --sql or point --config at a panel file with a 'sql' entry.")]
    MissingQuery,

    #[error("Invalid timestamp '{value}': expected RFC 3339, e.g. 2024-01-15T00:00:00Z")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid time range: from ({from}) is after to ({to})")]
    InvalidTimeRange { from: String, to: String },

    #[error("Could not determine the table this query reads from:\n{}\n\nHint: Pass --table explicitly", diagnostics.join("\n"))]
    TableNotResolved { diagnostics: Vec<String> },
}

/// Helper to convert TextRange to line/column for error messages
pub fn text_range_to_line_col(text: &str, range: TextRange) -> (u32, u32) {
    let offset: usize = range.start().into();
    let mut line = 0u32;
    let mut col = 0u32;

    for (idx, ch) in text.char_indices() {
        if idx >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    (line, col)
}
