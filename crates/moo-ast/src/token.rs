//! Token types for the MOO lexer.

use moo_grammar::Keyword;

use crate::Location;

/// Token kinds produced by the lexer.
///
/// Whitespace and comments are trivia and never reach the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier: `[A-Za-z_][A-Za-z0-9_]*`
    Ident,
    /// Integer literal
    Int,
    /// Float literal: `1.5`, `.5`, `1e5`, `2.5e-3`
    Float,
    /// Double-quoted string literal (value holds the decoded text)
    Str,
    /// Object id: `#123`, `#-5`, `#name` (value holds the part after `#`)
    ObjId,
    /// Builtin error code: `E_TYPE`, `E_PERM`, ... (value is uppercased)
    ErrCode,
    /// Reserved word (matched case-insensitively)
    Keyword(Keyword),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `..`
    DotDot,
    /// `:`
    Colon,
    /// `->` - map entry separator
    Arrow,
    /// `=>` - lambda body / try fallback marker
    FatArrow,
    /// `=`
    Assign,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!` - logical not, also the try-expression code separator
    Bang,
    /// `|.` - bitwise or
    BitOr,
    /// `&.` - bitwise and
    BitAnd,
    /// `^.` - bitwise xor
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `^` - exponentiation
    Caret,
    /// `?` - conditional operator, also optional-binding marker
    Question,
    /// `|` - conditional alternative separator
    Pipe,
    /// `@` - splat / scatter / rest marker
    At,
    /// `$` - system property sigil or range-end marker
    Dollar,
    /// `` ` `` - try-expression open
    Backtick,
    /// `'` - symbol sigil and try-expression close
    Quote,
    /// End of file
    Eof,
}

impl TokenKind {
    /// Source spelling for binary-operator-capable tokens, used to consult
    /// the grammar's operator table.
    pub fn operator_str(self) -> Option<&'static str> {
        Some(match self {
            TokenKind::OrOr => "||",
            TokenKind::AndAnd => "&&",
            TokenKind::Eq => "==",
            TokenKind::Ne => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::Keyword(Keyword::In) => "in",
            TokenKind::BitOr => "|.",
            TokenKind::BitAnd => "&.",
            TokenKind::BitXor => "^.",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Caret => "^",
            _ => return None,
        })
    }
}

/// A token with its kind, source value, and location.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            value: value.into(),
            location,
        }
    }
}
