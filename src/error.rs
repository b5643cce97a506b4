//! Error types for pgsqlfmt.

use thiserror::Error;

/// The main error type for formatting operations.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The SQL parser rejected the input. The parser's message is kept as is.
    #[error(transparent)]
    Parse(#[from] sqlparser::parser::ParserError),

    /// A parser enum value outside the set the formatter knows a keyword for.
    #[error("Unknown {kind}: '{value}'")]
    UnknownEnum { kind: &'static str, value: String },

    /// A statement kind or clause the styled emitters cannot host.
    #[error("Unsupported {0}")]
    Unsupported(String),

    /// Invalid style configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rust source that could not be parsed for SQL constants.
    #[error("Rust source error: {0}")]
    Rust(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    /// Create an unknown enum value error.
    pub fn unknown_enum(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownEnum {
            kind,
            value: value.into(),
        }
    }

    /// Create an unsupported construct error.
    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::Unsupported(what.into())
    }
}

/// Result type alias for formatting operations.
pub type FmtResult<T> = Result<T, FormatError>;
