//! Hand-written lexer for MOO source code.
//!
//! Single-mode byte scanner with maximal munch for multi-character
//! operators. Whitespace and comments (`// ...`, `/* ... */`) are trivia
//! and are skipped. Identifiers are classified against the grammar handle:
//! error code, then keyword (case-insensitive), then plain identifier.

use moo_grammar::Grammar;

use crate::token::{Token, TokenKind};
use crate::{Location, ParseError};

/// Tokenize a source string into a sequence of tokens ending with `Eof`.
pub fn tokenize(source: &str, grammar: Grammar) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer::new(source, grammar);
    lexer.tokenize()
}

struct Lexer<'a> {
    text: &'a str,
    source: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
    grammar: Grammar,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str, grammar: Grammar) -> Self {
        Self {
            text,
            source: text.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
            grammar,
        }
    }

    fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_trivia()?;
            if self.pos >= self.source.len() {
                break;
            }
            tokens.push(self.next_token()?);
        }

        let eof_loc = Location::new(self.line, self.col, self.pos);
        tokens.push(Token::new(TokenKind::Eof, "", eof_loc));

        Ok(tokens)
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            while self.pos < self.source.len() {
                match self.source[self.pos] {
                    b' ' | b'\t' | b'\r' | b'\n' => self.advance_one(),
                    _ => break,
                }
            }

            if self.looking_at(b"//") {
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.advance_one();
                }
                continue;
            }

            if self.looking_at(b"/*") {
                let start = Location::new(self.line, self.col, self.pos);
                self.advance_n(2);
                loop {
                    if self.pos >= self.source.len() {
                        return Err(ParseError::UnterminatedComment {
                            line: start.line,
                            column: start.column,
                        });
                    }
                    if self.looking_at(b"*/") {
                        self.advance_n(2);
                        break;
                    }
                    self.advance_one();
                }
                continue;
            }

            return Ok(());
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let loc = Location::new(self.line, self.col, self.pos);
        let ch = self.source[self.pos];

        match ch {
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => Ok(self.lex_word(loc)),
            b'0'..=b'9' => self.lex_number(loc),
            b'"' => self.lex_string(loc),
            b'#' => self.lex_object_id(loc),

            b'.' => {
                if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
                    self.lex_number(loc)
                } else if self.peek_at(1) == Some(b'.') {
                    Ok(self.emit(TokenKind::DotDot, "..", loc))
                } else {
                    Ok(self.emit(TokenKind::Dot, ".", loc))
                }
            }

            b'=' => match self.peek_at(1) {
                Some(b'=') => Ok(self.emit(TokenKind::Eq, "==", loc)),
                Some(b'>') => Ok(self.emit(TokenKind::FatArrow, "=>", loc)),
                _ => Ok(self.emit(TokenKind::Assign, "=", loc)),
            },

            b'!' => match self.peek_at(1) {
                Some(b'=') => Ok(self.emit(TokenKind::Ne, "!=", loc)),
                _ => Ok(self.emit(TokenKind::Bang, "!", loc)),
            },

            b'<' => match self.peek_at(1) {
                Some(b'=') => Ok(self.emit(TokenKind::Le, "<=", loc)),
                Some(b'<') => Ok(self.emit(TokenKind::Shl, "<<", loc)),
                _ => Ok(self.emit(TokenKind::Lt, "<", loc)),
            },

            b'>' => match self.peek_at(1) {
                Some(b'=') => Ok(self.emit(TokenKind::Ge, ">=", loc)),
                Some(b'>') => Ok(self.emit(TokenKind::Shr, ">>", loc)),
                _ => Ok(self.emit(TokenKind::Gt, ">", loc)),
            },

            b'&' => match self.peek_at(1) {
                Some(b'&') => Ok(self.emit(TokenKind::AndAnd, "&&", loc)),
                Some(b'.') => Ok(self.emit(TokenKind::BitAnd, "&.", loc)),
                _ => self.error_at(loc),
            },

            b'|' => match self.peek_at(1) {
                Some(b'|') => Ok(self.emit(TokenKind::OrOr, "||", loc)),
                Some(b'.') => Ok(self.emit(TokenKind::BitOr, "|.", loc)),
                _ => Ok(self.emit(TokenKind::Pipe, "|", loc)),
            },

            b'^' => match self.peek_at(1) {
                Some(b'.') => Ok(self.emit(TokenKind::BitXor, "^.", loc)),
                _ => Ok(self.emit(TokenKind::Caret, "^", loc)),
            },

            b'-' => match self.peek_at(1) {
                Some(b'>') => Ok(self.emit(TokenKind::Arrow, "->", loc)),
                _ => Ok(self.emit(TokenKind::Minus, "-", loc)),
            },

            b'+' => Ok(self.emit(TokenKind::Plus, "+", loc)),
            b'*' => Ok(self.emit(TokenKind::Star, "*", loc)),
            b'/' => Ok(self.emit(TokenKind::Slash, "/", loc)),
            b'%' => Ok(self.emit(TokenKind::Percent, "%", loc)),

            b'(' => Ok(self.emit(TokenKind::LParen, "(", loc)),
            b')' => Ok(self.emit(TokenKind::RParen, ")", loc)),
            b'{' => Ok(self.emit(TokenKind::LBrace, "{", loc)),
            b'}' => Ok(self.emit(TokenKind::RBrace, "}", loc)),
            b'[' => Ok(self.emit(TokenKind::LBracket, "[", loc)),
            b']' => Ok(self.emit(TokenKind::RBracket, "]", loc)),
            b';' => Ok(self.emit(TokenKind::Semicolon, ";", loc)),
            b',' => Ok(self.emit(TokenKind::Comma, ",", loc)),
            b':' => Ok(self.emit(TokenKind::Colon, ":", loc)),
            b'?' => Ok(self.emit(TokenKind::Question, "?", loc)),
            b'@' => Ok(self.emit(TokenKind::At, "@", loc)),
            b'$' => Ok(self.emit(TokenKind::Dollar, "$", loc)),
            b'`' => Ok(self.emit(TokenKind::Backtick, "`", loc)),
            b'\'' => Ok(self.emit(TokenKind::Quote, "'", loc)),

            _ => self.error_at(loc),
        }
    }

    /// Identifier, keyword, or error code.
    fn lex_word(&mut self, loc: Location) -> Token {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.advance_one();
        }
        let word = &self.text[start..self.pos];

        if self.grammar.is_error_code(word) {
            return Token::new(TokenKind::ErrCode, word.to_ascii_uppercase(), loc);
        }
        if let Some(kw) = self.grammar.keyword(word) {
            return Token::new(TokenKind::Keyword(kw), word, loc);
        }
        Token::new(TokenKind::Ident, word, loc)
    }

    /// Integer or float. Entered on a digit or on `.` followed by a digit.
    ///
    /// `1..2` must yield `Int DotDot Int`, so a dot only extends the number
    /// when the byte after it is a digit.
    fn lex_number(&mut self, loc: Location) -> Result<Token, ParseError> {
        let start = self.pos;
        let mut is_float = false;

        if self.source[self.pos] == b'.' {
            is_float = true;
            self.advance_one();
        }
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            self.advance_one();
        }

        if !is_float
            && self.source.get(self.pos) == Some(&b'.')
            && self.peek_at(1).is_some_and(|b| b.is_ascii_digit())
        {
            is_float = true;
            self.advance_one();
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
                self.advance_one();
            }
        }

        if matches!(self.source.get(self.pos), Some(b'e') | Some(b'E')) {
            let mut ahead = 1;
            if matches!(self.peek_at(1), Some(b'+') | Some(b'-')) {
                ahead = 2;
            }
            if self.peek_at(ahead).is_some_and(|b| b.is_ascii_digit()) {
                is_float = true;
                self.advance_n(ahead);
                while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
                    self.advance_one();
                }
            }
        }

        let text = &self.text[start..self.pos];
        let kind = if is_float { TokenKind::Float } else { TokenKind::Int };
        Ok(Token::new(kind, text, loc))
    }

    /// Double-quoted string with backslash escapes. The token value holds
    /// the decoded text. Strings do not span lines.
    fn lex_string(&mut self, loc: Location) -> Result<Token, ParseError> {
        self.advance_one(); // opening quote
        let mut value = String::new();
        let mut chars = self.text[self.pos..].char_indices();

        loop {
            let Some((offset, ch)) = chars.next() else {
                return Err(ParseError::UnterminatedString {
                    line: loc.line,
                    column: loc.column,
                });
            };
            match ch {
                '"' => {
                    self.advance_n(offset + 1);
                    break;
                }
                '\n' => {
                    return Err(ParseError::UnterminatedString {
                        line: loc.line,
                        column: loc.column,
                    });
                }
                '\\' => {
                    let Some((_, esc)) = chars.next() else {
                        return Err(ParseError::UnterminatedString {
                            line: loc.line,
                            column: loc.column,
                        });
                    };
                    match esc {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        other => value.push(other),
                    }
                }
                other => value.push(other),
            }
        }

        Ok(Token::new(TokenKind::Str, value, loc))
    }

    /// Object id: `#123`, `#-5`, or `#name`. Lexed as one token; the value
    /// holds everything after `#`.
    fn lex_object_id(&mut self, loc: Location) -> Result<Token, ParseError> {
        self.advance_one(); // '#'
        let start = self.pos;

        if self.source.get(self.pos) == Some(&b'-') {
            self.advance_one();
        }
        if self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
                self.advance_one();
            }
            return Ok(Token::new(TokenKind::ObjId, &self.text[start..self.pos], loc));
        }

        if self.pos > start {
            // consumed '-' but no digits followed
            return self.error_at(loc);
        }

        if self.pos < self.source.len() && is_ident_start(self.source[self.pos]) {
            while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
                self.advance_one();
            }
            return Ok(Token::new(TokenKind::ObjId, &self.text[start..self.pos], loc));
        }

        self.error_at(loc)
    }

    fn error_at<T>(&self, loc: Location) -> Result<T, ParseError> {
        Err(ParseError::SyntaxError {
            line: loc.line,
            column: loc.column,
            byte_range: loc.byte_offset..loc.byte_offset + 1,
        })
    }

    fn emit(&mut self, kind: TokenKind, literal: &'static str, loc: Location) -> Token {
        self.advance_n(literal.len());
        Token::new(kind, literal, loc)
    }

    fn looking_at(&self, pattern: &[u8]) -> bool {
        self.source[self.pos..].starts_with(pattern)
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.source.get(self.pos + ahead).copied()
    }

    /// Advance position by one byte, updating line/column tracking.
    fn advance_one(&mut self) {
        if self.pos < self.source.len() {
            if self.source[self.pos] == b'\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance_one();
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_')
}

fn is_ident_continue(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_')
}
