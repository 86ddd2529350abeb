//! Error types for filter parsing

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Filter recognition faults
///
/// These never cross [`crate::parse_filter`] or [`crate::extract_filter_params`];
/// they are logged and turned into `None` there.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Lex error at position {position}: {message}")]
    Lex { message: String, position: usize },

    #[error("Expected {expected}, got {found} at position {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("Expected {expected}, but reached end of input")]
    UnexpectedEof { expected: String },

    #[error("Expression too deeply nested (max depth: {max})")]
    TooDeep { max: usize },
}

impl Error {
    /// Character offset the fault was detected at, if known
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Lex { position, .. } | Error::UnexpectedToken { position, .. } => {
                Some(*position)
            }
            Error::UnexpectedEof { .. } | Error::TooDeep { .. } => None,
        }
    }
}
