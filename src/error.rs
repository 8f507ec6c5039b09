//! Error types for untex library.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for untex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for untex library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while loading a document.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document has no `\begin{document}` ... `\end{document}` pair.
    #[error("Malformed document '{document}': missing {missing}")]
    MalformedDocument {
        /// Name of the offending document.
        document: String,
        /// The delimiter that could not be located.
        missing: Delimiter,
    },

    /// Document bytes are not valid UTF-8.
    #[error("Text encoding error: {0}")]
    Encoding(String),

    /// Pipeline configuration is invalid or could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Body delimiters searched for by the body extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `\begin{document}`
    Begin,
    /// `\end{document}` after the begin marker
    End,
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Begin => write!(f, "\\begin{{document}}"),
            Delimiter::End => write!(f, "\\end{{document}}"),
        }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}
