//! Error types for QueryTutor.

use std::fmt;

/// The main error type for QueryTutor operations.
///
/// Query generation itself never fails: unmet construct preconditions
/// degrade to explanatory results instead of errors. This type covers
/// the surrounding machinery (loading datasets, registering rows,
/// parsing construct names).
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// CSV parsing error
    Csv(String),

    /// JSON parsing error
    Json(String),

    /// File extension not recognized as a loadable dataset format
    UnsupportedFormat(String),

    /// Row arity does not match the table's declared columns
    SchemaMismatch {
        /// Table being appended to
        table: String,
        /// Declared column count
        expected: usize,
        /// Values in the offending row
        found: usize,
    },

    /// Construct name not recognized by the target backend
    UnknownConstruct(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Csv(msg) => write!(f, "CSV error: {}", msg),
            Error::Json(msg) => write!(f, "JSON error: {}", msg),
            Error::UnsupportedFormat(ext) => write!(f, "Unsupported dataset format: {}", ext),
            Error::SchemaMismatch {
                table,
                expected,
                found,
            } => write!(
                f,
                "Row has {} values but table '{}' declares {} columns",
                found, table, expected
            ),
            Error::UnknownConstruct(name) => write!(f, "Unknown query construct: {}", name),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// A specialized `Result` type for QueryTutor operations.
pub type Result<T> = std::result::Result<T, Error>;
