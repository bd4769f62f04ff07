//! Cooking layer: turns `sd2_lexer_core::RawToken`s into `sd2_ir::Token`s.
//!
//! ```text
//! source → RawScanner (sd2_lexer_core) → RawToken → Lexer::cook → Token
//! ```
//!
//! Each `RawTag` category has a dedicated cooking path:
//! - Structural tags map 1:1 with no data.
//! - Identifiers: reserved-word lookup, then intern.
//! - Numbers: strip underscores, parse to `i64`/`f64`.
//! - Strings: decode escapes (simple) or dedent/normalize (triple-quoted).
//! - Error-shaped raw tags become `ErrorRecord`s with their stable `ErrorCode`.

mod cook_escape;
mod dedent;
mod keywords;
mod numbers;

use keywords::Reserved;
use sd2_diagnostic::{ErrorCode, ErrorRecord};
use sd2_ir::{Location, StringInterner, Token, TokenKind};
use sd2_lexer_core::{CharSource, Cursor, RawLocation, RawScanner, RawTag};

fn to_location(raw: RawLocation) -> Location {
    Location::new(raw.line, raw.column, raw.offset)
}

/// Cooks a stream of `sd2_ir::Token`s from a pull-based character source.
///
/// Owns the [`StringInterner`] that backs `TokenKind::Ident`/`BacktickIdent`;
/// `sd2_parse` resolves those handles through [`Lexer::interner`] when it
/// needs the text (e.g. to build a `QualifiedName`).
pub struct Lexer<S> {
    raw: RawScanner<S>,
    interner: StringInterner,
}

impl<S: CharSource> Lexer<S> {
    pub fn new(source: S) -> Self {
        Lexer {
            raw: RawScanner::new(Cursor::new(source)),
            interner: StringInterner::new(),
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Produce the next cooked token, or the lexical error that blocks it.
    pub fn next(&mut self) -> Result<Token, ErrorRecord> {
        let raw = self.raw.next_token();
        let location = to_location(raw.location);
        let preceded_by_trivia = raw.preceded_by_trivia;
        let kind = self.cook(raw, location)?;
        Ok(Token::new(kind, location).with_trivia(preceded_by_trivia))
    }

    fn cook(
        &mut self,
        raw: sd2_lexer_core::RawToken,
        location: Location,
    ) -> Result<TokenKind, ErrorRecord> {
        match raw.tag {
            RawTag::Eof => Ok(TokenKind::Eof),
            RawTag::Newline => Ok(TokenKind::Newline),
            RawTag::LBrace => Ok(TokenKind::LBrace),
            RawTag::RBrace => Ok(TokenKind::RBrace),
            RawTag::LBracket => Ok(TokenKind::LBracket),
            RawTag::RBracket => Ok(TokenKind::RBracket),
            RawTag::LParen => Ok(TokenKind::LParen),
            RawTag::RParen => Ok(TokenKind::RParen),
            RawTag::Comma => Ok(TokenKind::Comma),
            RawTag::Colon => Ok(TokenKind::Colon),
            RawTag::Equal => Ok(TokenKind::Equal),
            RawTag::Dot => Ok(TokenKind::Dot),
            RawTag::Lt => Ok(TokenKind::Lt),
            RawTag::Gt => Ok(TokenKind::Gt),
            RawTag::Hash => Ok(TokenKind::Hash),
            RawTag::HashBang => Ok(TokenKind::HashBang),
            RawTag::Bang => Ok(TokenKind::Bang),
            RawTag::Pipe => Ok(TokenKind::Pipe),

            RawTag::Ident => match keywords::lookup(&raw.text) {
                Some(Reserved::True) => Ok(TokenKind::Bool(true)),
                Some(Reserved::False) => Ok(TokenKind::Bool(false)),
                Some(Reserved::Null) => Ok(TokenKind::Null),
                None => Ok(TokenKind::Ident(self.interner.intern(&raw.text))),
            },
            RawTag::Backtick => Ok(TokenKind::BacktickIdent(self.interner.intern(&raw.text))),

            RawTag::SimpleString => Ok(TokenKind::String(cook_escape::unescape_simple_string(
                &raw.text,
            ))),
            RawTag::TripleString => Ok(TokenKind::String(dedent::normalize_triple_string(
                &raw.text,
            ))),
            RawTag::At => Ok(TokenKind::At(raw.text)),

            RawTag::Int => Ok(TokenKind::Int(numbers::parse_decimal_int(&raw.text))),
            RawTag::Float => Ok(TokenKind::Float(numbers::parse_float(&raw.text))),
            RawTag::HexInt => Ok(TokenKind::Int(numbers::parse_radix_int(&raw.text, 16))),
            RawTag::BinInt => Ok(TokenKind::Int(numbers::parse_radix_int(&raw.text, 2))),

            RawTag::UnterminatedBacktick => Err(ErrorRecord::new(
                ErrorCode::E6002,
                "backtick identifier not closed before newline or end of input",
                location,
            )),
            RawTag::UnterminatedForeign => Err(ErrorRecord::new(
                ErrorCode::E4001,
                "foreign code block not closed before its delimiter",
                location,
            )),
            RawTag::BadForeignDelimiter => Err(ErrorRecord::new(
                ErrorCode::E4002,
                "`@` must be followed by one of `\"`, `'`, `[`, `{`",
                location,
            )),
            RawTag::SignedRadixPrefix => Err(ErrorRecord::new(
                ErrorCode::E7001,
                "sign not allowed before a hex or binary literal",
                location,
            )),
            RawTag::SignedNonDigit => Err(ErrorRecord::new(
                ErrorCode::E7002,
                format!("`{}` must be immediately followed by a digit", raw.text),
                location,
            )),
            RawTag::Unknown => Err(ErrorRecord::new(
                ErrorCode::E1000,
                format!("unexpected character {:?}", raw.text),
                location,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SliceSource {
        units: Vec<u16>,
        pos: usize,
    }

    impl CharSource for SliceSource {
        fn next_code_unit(&mut self) -> i32 {
            if self.pos >= self.units.len() {
                return -1;
            }
            let u = self.units[self.pos];
            self.pos += 1;
            i32::from(u)
        }
    }

    fn lexer_over(text: &str) -> Lexer<SliceSource> {
        Lexer::new(SliceSource {
            units: text.encode_utf16().collect(),
            pos: 0,
        })
    }

    fn collect_kinds(text: &str) -> Vec<TokenKind> {
        let mut lexer = lexer_over(text);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next().expect("lex error in test fixture");
            let eof = tok.kind.is_eof();
            out.push(tok.kind);
            if eof {
                break;
            }
        }
        out
    }

    #[test]
    fn classifies_reserved_words() {
        let kinds = collect_kinds("true false null");
        assert!(matches!(kinds[0], TokenKind::Bool(true)));
        assert!(matches!(kinds[1], TokenKind::Bool(false)));
        assert!(matches!(kinds[2], TokenKind::Null));
    }

    #[test]
    fn interns_plain_identifiers() {
        let mut lexer = lexer_over("widget widget");
        let a = lexer.next().unwrap();
        let b = lexer.next().unwrap();
        match (a.kind, b.kind) {
            (TokenKind::Ident(n1), TokenKind::Ident(n2)) => assert_eq!(n1, n2),
            other => panic!("expected two idents, got {other:?}"),
        }
    }

    #[test]
    fn backtick_reserved_word_is_a_plain_backtick_ident() {
        let mut lexer = lexer_over("`true`");
        let tok = lexer.next().unwrap();
        match tok.kind {
            TokenKind::BacktickIdent(name) => {
                assert_eq!(lexer.interner().resolve(name), "true");
            }
            other => panic!("expected BacktickIdent, got {other:?}"),
        }
    }

    #[test]
    fn decodes_simple_string_escapes() {
        let kinds = collect_kinds(r#""a\nb""#);
        assert!(matches!(&kinds[0], TokenKind::String(s) if s == "a\nb"));
    }

    #[test]
    fn dedents_triple_quoted_string() {
        let kinds = collect_kinds("\"\"\"\n  hello\n  world\n  \"\"\"");
        assert!(matches!(&kinds[0], TokenKind::String(s) if s == "hello\nworld\n"));
    }

    #[test]
    fn parses_numbers() {
        let kinds = collect_kinds("120 3.5 0x1A");
        assert!(matches!(kinds[0], TokenKind::Int(120)));
        assert!(matches!(kinds[1], TokenKind::Float(f) if f == 3.5));
        assert!(matches!(kinds[2], TokenKind::Int(0x1A)));
    }

    #[test]
    fn unterminated_backtick_is_e6002() {
        let mut lexer = lexer_over("`abc\n");
        let err = lexer.next().unwrap_err();
        assert_eq!(err.code, ErrorCode::E6002);
    }

    #[test]
    fn signed_radix_prefix_is_e7001() {
        let mut lexer = lexer_over("+0x1");
        let err = lexer.next().unwrap_err();
        assert_eq!(err.code, ErrorCode::E7001);
    }

    #[test]
    fn dash_prefixed_identifier_is_e7002() {
        let mut lexer = lexer_over("-foo");
        let err = lexer.next().unwrap_err();
        assert_eq!(err.code, ErrorCode::E7002);
    }

    #[test]
    fn bad_foreign_delimiter_is_e4002() {
        let mut lexer = lexer_over("@x");
        let err = lexer.next().unwrap_err();
        assert_eq!(err.code, ErrorCode::E4002);
    }
}
