//! The embedded grammar tables.

use crate::{Assoc, BinaryOperator, GrammarTables, Keyword};

const KEYWORDS: &[(&str, Keyword)] = &[
    ("if", Keyword::If),
    ("elseif", Keyword::Elseif),
    ("else", Keyword::Else),
    ("endif", Keyword::Endif),
    ("while", Keyword::While),
    ("endwhile", Keyword::Endwhile),
    ("for", Keyword::For),
    ("endfor", Keyword::Endfor),
    ("in", Keyword::In),
    ("fork", Keyword::Fork),
    ("endfork", Keyword::Endfork),
    ("try", Keyword::Try),
    ("except", Keyword::Except),
    ("finally", Keyword::Finally),
    ("endtry", Keyword::Endtry),
    ("any", Keyword::Any),
    ("begin", Keyword::Begin),
    ("end", Keyword::End),
    ("let", Keyword::Let),
    ("const", Keyword::Const),
    ("global", Keyword::Global),
    ("break", Keyword::Break),
    ("continue", Keyword::Continue),
    ("return", Keyword::Return),
    ("fn", Keyword::Fn),
    ("endfn", Keyword::Endfn),
    ("pass", Keyword::Pass),
    ("true", Keyword::True),
    ("false", Keyword::False),
    ("object", Keyword::Object),
    ("endobject", Keyword::Endobject),
    ("property", Keyword::Property),
    ("verb", Keyword::Verb),
    ("endverb", Keyword::Endverb),
];

// Levels 3..=9; assignment (1), conditional (2), unary (10) and postfix
// (11+) live outside the table.
const OPERATORS: &[BinaryOperator] = &[
    BinaryOperator { token: "||", precedence: 3, assoc: Assoc::Left },
    BinaryOperator { token: "&&", precedence: 3, assoc: Assoc::Left },
    BinaryOperator { token: "==", precedence: 4, assoc: Assoc::Left },
    BinaryOperator { token: "!=", precedence: 4, assoc: Assoc::Left },
    BinaryOperator { token: "<", precedence: 4, assoc: Assoc::Left },
    BinaryOperator { token: "<=", precedence: 4, assoc: Assoc::Left },
    BinaryOperator { token: ">", precedence: 4, assoc: Assoc::Left },
    BinaryOperator { token: ">=", precedence: 4, assoc: Assoc::Left },
    BinaryOperator { token: "in", precedence: 4, assoc: Assoc::Left },
    BinaryOperator { token: "|.", precedence: 5, assoc: Assoc::Left },
    BinaryOperator { token: "&.", precedence: 5, assoc: Assoc::Left },
    BinaryOperator { token: "^.", precedence: 5, assoc: Assoc::Left },
    BinaryOperator { token: "<<", precedence: 6, assoc: Assoc::Left },
    BinaryOperator { token: ">>", precedence: 6, assoc: Assoc::Left },
    BinaryOperator { token: "+", precedence: 7, assoc: Assoc::Left },
    BinaryOperator { token: "-", precedence: 7, assoc: Assoc::Left },
    BinaryOperator { token: "*", precedence: 8, assoc: Assoc::Left },
    BinaryOperator { token: "/", precedence: 8, assoc: Assoc::Left },
    BinaryOperator { token: "%", precedence: 8, assoc: Assoc::Left },
    BinaryOperator { token: "^", precedence: 9, assoc: Assoc::Right },
];

const ERROR_CODES: &[&str] = &[
    "E_NONE", "E_TYPE", "E_DIV", "E_PERM", "E_PROPNF", "E_VERBNF", "E_VARNF",
    "E_INVIND", "E_RECMOVE", "E_MAXREC", "E_RANGE", "E_ARGS", "E_NACC",
    "E_INVARG", "E_QUOTA", "E_FLOAT", "E_ASSERT",
];

/// The full embedded grammar.
pub const TABLES: GrammarTables = GrammarTables {
    keywords: KEYWORDS,
    operators: OPERATORS,
    error_codes: ERROR_CODES,
};
