//! Error types for the MOO parser toolkit.

use thiserror::Error;

// Re-export Location from moo-ast
pub use moo_ast::Location;

/// All errors that can occur in this crate
#[derive(Error, Debug)]
pub enum MooError {
    #[error("Parse error at line {}, column {}: {message}", location.line, location.column)]
    ParseError {
        message: String,
        location: Location,
    },

    #[error("Object loader error: {message}")]
    LoadError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<moo_ast::ParseError> for MooError {
    fn from(err: moo_ast::ParseError) -> Self {
        let location = err.location().unwrap_or_default();
        MooError::ParseError {
            message: err.to_string(),
            location,
        }
    }
}

/// Result type alias for MOO parsing operations
pub type Result<T> = std::result::Result<T, MooError>;
