//! moo - A parser toolkit for the MOO programming language
//!
//! Parses MOO verb code and object-definition (objdef) files into a typed
//! AST:
//! - Full statement and expression grammar, including scatter patterns,
//!   lambdas, flyweights, and try expressions
//! - Object definition files with properties, verbs, and slots
//! - 1-indexed source locations on every node and error
//!
//! # Example
//!
//! ```rust
//! let program = moo::parse("for dude in (players) dude:tell(\"hi\"); endfor").unwrap();
//!
//! match &program.body {
//!     moo::ProgramBody::Statements(stmts) => assert_eq!(stmts.len(), 1),
//!     _ => unreachable!(),
//! }
//! ```

// Public modules
pub mod error;
pub mod loader;

pub use error::{MooError, Result};
pub use loader::ObjDefLoader;
pub use moo_ast::{
    language, Expression, Grammar, GrammarError, Location, ObjectDefinition, ParseError,
    Program, ProgramBody, Statement,
};

/// Parse MOO source into a [`Program`].
///
/// A source unit beginning with the `object` keyword parses as an object
/// definition; anything else parses as a statement list.
///
/// # Example
///
/// ```rust
/// let program = moo::parse("player:tell(\"hello\");").unwrap();
/// assert!(matches!(program.body, moo::ProgramBody::Statements(_)));
/// ```
pub fn parse(source: &str) -> Result<Program> {
    Ok(moo_ast::parse(source)?)
}

/// Parse an objdef source unit into an [`ObjectDefinition`].
///
/// # Example
///
/// ```rust
/// let def = moo::parse_objdef("object rock\n  name: \"a rock\"\nendobject").unwrap();
/// assert_eq!(def.name, "rock");
/// ```
pub fn parse_objdef(source: &str) -> Result<ObjectDefinition> {
    let program = moo_ast::parse(source)?;
    match program.body {
        ProgramBody::Object(def) => Ok(def),
        ProgramBody::Statements(_) => Err(MooError::ParseError {
            message: "source is not an object definition file".to_string(),
            location: program.location,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_statements() {
        let program = parse("x = 1; y = x + 1;").unwrap();
        match program.body {
            ProgramBody::Statements(stmts) => assert_eq!(stmts.len(), 2),
            _ => panic!("expected statements"),
        }
    }

    #[test]
    fn test_parse_objdef_rejects_plain_code() {
        let result = parse_objdef("x = 1;");
        assert!(matches!(result, Err(MooError::ParseError { .. })));
    }

    #[test]
    fn test_parse_error_carries_location() {
        let err = parse("if (x a; endif").unwrap_err();
        match err {
            MooError::ParseError { location, .. } => assert_eq!(location.line, 1),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
