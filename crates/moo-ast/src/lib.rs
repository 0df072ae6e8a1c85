//! Lexer, parser, and AST for the MOO programming language.
//!
//! The grammar tables live in the `moo-grammar` crate; this crate turns
//! source text into the typed AST in [`ast`].
//!
//! # Example
//!
//! ```rust
//! let program = moo_ast::parse("player:tell(\"hello\");").unwrap();
//! match &program.body {
//!     moo_ast::ProgramBody::Statements(stmts) => assert_eq!(stmts.len(), 1),
//!     _ => unreachable!(),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::*;
pub use moo_grammar::{language, Grammar, GrammarError, Keyword};
pub use parser::parse;

/// Location in source code (1-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, byte_offset: usize) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }
}

/// Errors produced while lexing or parsing MOO source.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to load the Moo grammar")]
    Grammar(#[from] GrammarError),

    #[error("syntax error at line {line}, column {column}")]
    SyntaxError {
        line: usize,
        column: usize,
        byte_range: std::ops::Range<usize>,
    },

    #[error("{message} at line {line}, column {column}")]
    UnexpectedToken {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("unterminated string literal starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("unterminated block comment starting at line {line}, column {column}")]
    UnterminatedComment { line: usize, column: usize },

    #[error("integer literal '{text}' out of range at line {line}, column {column}")]
    IntegerOutOfRange {
        text: String,
        line: usize,
        column: usize,
    },

    #[error("invalid binding pattern at line {line}, column {column}: {message}")]
    InvalidPattern {
        message: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// Location the error points at, if it carries one.
    pub fn location(&self) -> Option<Location> {
        match self {
            ParseError::Grammar(_) | ParseError::UnexpectedEof { .. } => None,
            ParseError::SyntaxError { line, column, byte_range } => {
                Some(Location::new(*line, *column, byte_range.start))
            }
            ParseError::UnexpectedToken { line, column, .. }
            | ParseError::UnterminatedString { line, column }
            | ParseError::UnterminatedComment { line, column }
            | ParseError::IntegerOutOfRange { line, column, .. }
            | ParseError::InvalidPattern { line, column, .. } => {
                Some(Location::new(*line, *column, 0))
            }
        }
    }
}
