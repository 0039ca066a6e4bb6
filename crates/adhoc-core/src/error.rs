//! Error types for filter application and macro expansion.

use thiserror::Error;

/// Errors raised while configuring a [`FilterApplicator`](crate::FilterApplicator).
///
/// Applying filters never fails; only deriving the target table can.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The resolver could not name a table for the query.
    #[error("could not determine target table from query; specify it explicitly")]
    TableNotFound,
}

/// Errors raised while expanding `$__` time macros.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MacroError {
    /// The macro needs a column argument but none was given.
    #[error("macro '$__{name}' expects a column argument")]
    MissingArgument { name: String },

    /// The argument list was opened but never closed.
    #[error("unterminated argument list for macro '$__{name}'")]
    Unterminated { name: String },
}

impl MacroError {
    /// Create a missing argument error.
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::MissingArgument { name: name.into() }
    }

    /// Create an unterminated argument list error.
    pub fn unterminated(name: impl Into<String>) -> Self {
        Self::Unterminated { name: name.into() }
    }
}
