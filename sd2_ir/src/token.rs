//! Cooked tokens emitted by `sd2_lexer`.

use crate::interner::Name;
use crate::location::Location;
use std::fmt;

/// A single lexed token with its fully resolved payload and location.
#[derive(Clone, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
    /// Whether whitespace or a comment separated this token from whatever
    /// came before it. Needed to tell a column-adjacent `@` (e.g. a
    /// constructor tag or foreign-code marker directly after a name/literal)
    /// from one with intervening whitespace (E4003, E4004).
    pub preceded_by_trivia: bool,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, location: Location) -> Self {
        Token {
            kind,
            location,
            preceded_by_trivia: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_trivia(mut self, preceded_by_trivia: bool) -> Self {
        self.preceded_by_trivia = preceded_by_trivia;
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.location)
    }
}

/// Token kinds produced by the lexer (spec.md §3's "Token" data model).
///
/// Identifier text is interned (identifiers repeat heavily as keys, keywords,
/// and dotted-name components); string and foreign-code payloads are stored
/// as plain decoded `String`s since each occurrence is typically unique.
#[derive(Clone, Debug)]
pub enum TokenKind {
    /// Plain identifier: `[A-Za-z_][A-Za-z0-9_-]*`, not `true`/`false`/`null`.
    Ident(Name),
    /// Backtick-quoted identifier: arbitrary text excluding backtick/newline.
    BacktickIdent(Name),
    /// Decoded string literal content (simple or triple-quoted).
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    /// Foreign-code body; delimiters already stripped, interior preserved
    /// byte-exact.
    At(String),
    Newline,
    Eof,

    // Structural tokens.
    LBrace,   // {
    RBrace,   // }
    LBracket, // [
    RBracket, // ]
    LParen,   // (
    RParen,   // )
    Comma,    // ,
    Colon,    // :
    Equal,    // =
    Dot,      // .
    Lt,       // <
    Gt,       // >
    Hash,     // #
    HashBang, // #!
    Bang,     // !
    Pipe,     // |
}

impl TokenKind {
    /// Human-readable name for diagnostics (`"identifier"`, `` "`{`" ``, ...).
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::BacktickIdent(_) => "backtick identifier",
            TokenKind::String(_) => "string literal",
            TokenKind::Int(_) => "integer literal",
            TokenKind::Float(_) => "float literal",
            TokenKind::Bool(_) => "boolean literal",
            TokenKind::Null => "null literal",
            TokenKind::At(_) => "foreign-code block",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of input",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Equal => "`=`",
            TokenKind::Dot => "`.`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::Hash => "`#`",
            TokenKind::HashBang => "`#!`",
            TokenKind::Bang => "`!`",
            TokenKind::Pipe => "`|`",
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, TokenKind::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    #[test]
    fn describe_gives_backtick_names_for_structural_tokens() {
        assert_eq!(TokenKind::LBrace.describe(), "`{`");
        assert_eq!(TokenKind::Pipe.describe(), "`|`");
    }

    #[test]
    fn is_eof_only_true_for_eof() {
        assert!(TokenKind::Eof.is_eof());
        assert!(!TokenKind::Newline.is_eof());
    }

    #[test]
    fn token_display_includes_location() {
        let tok = Token::new(TokenKind::Newline, Location::new(2, 1, 10));
        assert_eq!(format!("{tok}"), "Newline @ 2:1");
    }
}
