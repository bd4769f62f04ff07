//! Hand-written raw scanner producing [`RawToken`]s.
//!
//! Operates on a [`Cursor`] over a pull-based [`CharSource`] and performs all
//! scanning that is purely structural and keyword-agnostic: identifiers,
//! numbers, strings (simple and triple-quoted), backtick identifiers, and
//! foreign-code blocks. It does not resolve keywords, decode escapes, parse
//! numeric text into `i64`/`f64`, or dedent triple-quoted content — those are
//! deferred to the cooking layer (`sd2_lexer`).

use crate::char_source::CharSource;
use crate::cursor::Cursor;
use crate::raw_location::RawLocation;
use crate::tag::{RawTag, RawToken};

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Scanner over a pull-based character source.
pub struct RawScanner<S> {
    cursor: Cursor<S>,
}

impl<S: CharSource> RawScanner<S> {
    pub fn new(cursor: Cursor<S>) -> Self {
        RawScanner { cursor }
    }

    /// Produce the next raw token.
    ///
    /// Returns `RawTag::Eof` once the source is exhausted; subsequent calls
    /// continue to return `Eof`. The returned token's `preceded_by_trivia`
    /// reflects whether whitespace or a comment was skipped right before it,
    /// which the cooking layer needs for the `@`-adjacency rules (E4003,
    /// E4004).
    pub fn next_token(&mut self) -> RawToken {
        let had_trivia = self.skip_trivia();
        let start = self.cursor.location();
        self.scan_token(start).with_trivia(had_trivia)
    }

    fn scan_token(&mut self, start: RawLocation) -> RawToken {
        match self.cursor.current() {
            None => RawToken::new(RawTag::Eof, String::new(), start),
            Some('\n') => {
                self.cursor.advance();
                RawToken::new(RawTag::Newline, String::new(), start)
            }
            Some(c) if c == '+' || c == '-' || c.is_ascii_digit() => self.number(start),
            Some(c) if is_ident_start(c) => self.identifier(start),
            Some('`') => self.backtick(start),
            Some('"') => self.string(start),
            Some('@') => self.foreign(start),
            Some('{') => self.single(start, RawTag::LBrace),
            Some('}') => self.single(start, RawTag::RBrace),
            Some('[') => self.single(start, RawTag::LBracket),
            Some(']') => self.single(start, RawTag::RBracket),
            Some('(') => self.single(start, RawTag::LParen),
            Some(')') => self.single(start, RawTag::RParen),
            Some(',') => self.single(start, RawTag::Comma),
            Some(':') => self.single(start, RawTag::Colon),
            Some('=') => self.single(start, RawTag::Equal),
            Some('.') => self.single(start, RawTag::Dot),
            Some('<') => self.single(start, RawTag::Lt),
            Some('>') => self.single(start, RawTag::Gt),
            Some('!') => self.single(start, RawTag::Bang),
            Some('|') => self.single(start, RawTag::Pipe),
            Some('#') => self.hash(start),
            Some(_) => {
                let c = self.cursor.advance().unwrap();
                RawToken::new(RawTag::Unknown, c.to_string(), start)
            }
        }
    }

    // --- Trivia --------------------------------------------------------

    /// Skips spaces, tabs, `\r`, line comments, and block comments. Newlines
    /// are never skipped here — they are significant tokens. Returns whether
    /// anything was skipped.
    fn skip_trivia(&mut self) -> bool {
        let mut skipped = false;
        loop {
            match self.cursor.current() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.cursor.advance();
                    skipped = true;
                }
                Some('/') if self.cursor.peek() == Some('/') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    skipped = true;
                    while let Some(c) = self.cursor.current() {
                        if c == '\n' {
                            break;
                        }
                        self.cursor.advance();
                    }
                }
                Some('/') if self.cursor.peek() == Some('*') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    skipped = true;
                    loop {
                        match self.cursor.current() {
                            None => break,
                            Some('*') if self.cursor.peek() == Some('/') => {
                                self.cursor.advance();
                                self.cursor.advance();
                                break;
                            }
                            Some(_) => {
                                self.cursor.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
        skipped
    }

    // --- Identifiers -----------------------------------------------------

    fn identifier(&mut self, start: RawLocation) -> RawToken {
        let text = self.cursor.eat_while(is_ident_continue);
        RawToken::new(RawTag::Ident, text, start)
    }

    fn backtick(&mut self, start: RawLocation) -> RawToken {
        self.cursor.advance(); // opening backtick
        let mut text = String::new();
        loop {
            match self.cursor.current() {
                None | Some('\n') => return RawToken::new(RawTag::UnterminatedBacktick, text, start),
                Some('`') => {
                    self.cursor.advance();
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.cursor.advance();
                }
            }
        }
        RawToken::new(RawTag::Backtick, text, start)
    }

    // --- Numbers -----------------------------------------------------------

    fn number(&mut self, start: RawLocation) -> RawToken {
        let mut text = String::new();
        let signed = matches!(self.cursor.current(), Some('+') | Some('-'));
        if signed {
            text.push(self.cursor.advance().unwrap());
            if !self.cursor.current().is_some_and(|c| c.is_ascii_digit()) {
                return RawToken::new(RawTag::SignedNonDigit, text, start);
            }
        }

        if self.cursor.current() == Some('0')
            && matches!(self.cursor.peek(), Some('x') | Some('X') | Some('b') | Some('B'))
        {
            let is_hex = matches!(self.cursor.peek(), Some('x') | Some('X'));
            text.push(self.cursor.advance().unwrap());
            text.push(self.cursor.advance().unwrap());
            text.push_str(&self.cursor.eat_while(|c| c.is_ascii_hexdigit() || c == '_'));
            let tag = if signed {
                RawTag::SignedRadixPrefix
            } else if is_hex {
                RawTag::HexInt
            } else {
                RawTag::BinInt
            };
            return RawToken::new(tag, text, start);
        }

        text.push_str(&self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_'));

        let mut is_float = false;
        if self.cursor.current() == Some('.')
            && self.cursor.peek().is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            text.push(self.cursor.advance().unwrap());
            text.push_str(&self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_'));
        }

        if matches!(self.cursor.current(), Some('e') | Some('E')) {
            let has_exponent = match self.cursor.peek() {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => self.cursor.peek2().is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if has_exponent {
                is_float = true;
                text.push(self.cursor.advance().unwrap());
                if matches!(self.cursor.current(), Some('+') | Some('-')) {
                    text.push(self.cursor.advance().unwrap());
                }
                text.push_str(&self.cursor.eat_while(|c| c.is_ascii_digit()));
            }
        }

        let tag = if is_float { RawTag::Float } else { RawTag::Int };
        RawToken::new(tag, text, start)
    }

    // --- Strings -------------------------------------------------------

    fn at_triple_quote_close(&mut self) -> bool {
        self.cursor.current() == Some('"')
            && self.cursor.peek() == Some('"')
            && self.cursor.peek2() == Some('"')
    }

    fn string(&mut self, start: RawLocation) -> RawToken {
        self.cursor.advance(); // opening quote

        if self.cursor.current() == Some('"') && self.cursor.peek() == Some('"') {
            if self.cursor.peek2() == Some('\n') {
                // Confirmed triple-quote: consume the 2nd/3rd quote and the
                // required newline, then scan to three consecutive closers.
                self.cursor.advance();
                self.cursor.advance();
                self.cursor.advance();
                let mut text = String::new();
                loop {
                    match self.cursor.current() {
                        None => break,
                        Some('"') if self.at_triple_quote_close() => {
                            self.cursor.advance();
                            self.cursor.advance();
                            self.cursor.advance();
                            break;
                        }
                        Some(c) => {
                            text.push(c);
                            self.cursor.advance();
                        }
                    }
                }
                return RawToken::new(RawTag::TripleString, text, start);
            }
            // No newline after the opener: fall back to an empty simple
            // string. The third quote is left unconsumed so the next call
            // re-lexes it as its own string literal.
            self.cursor.advance(); // 2nd quote closes the empty string
            return RawToken::new(RawTag::SimpleString, String::new(), start);
        }

        let mut text = String::new();
        loop {
            match self.cursor.current() {
                None | Some('\n') => break,
                Some('\\') => {
                    text.push('\\');
                    self.cursor.advance();
                    if let Some(c) = self.cursor.current() {
                        text.push(c);
                        self.cursor.advance();
                    }
                }
                Some('"') => {
                    self.cursor.advance();
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.cursor.advance();
                }
            }
        }
        RawToken::new(RawTag::SimpleString, text, start)
    }

    // --- Foreign code blocks ---------------------------------------------

    fn foreign(&mut self, start: RawLocation) -> RawToken {
        self.cursor.advance(); // `@`
        match self.cursor.current() {
            Some('"') => self.foreign_delimited(start, '"', '"'),
            Some('\'') => self.foreign_delimited(start, '\'', '\''),
            Some('[') => self.foreign_delimited(start, '[', ']'),
            Some('{') => self.foreign_delimited(start, '{', '}'),
            _ => RawToken::new(RawTag::BadForeignDelimiter, String::new(), start),
        }
    }

    /// Scans a foreign-code block opened by `opener`, closed by `closer`
    /// (same character for quote delimiters, the matching bracket for
    /// `[`/`{`). Handles both single- and triple-delimited forms.
    fn foreign_delimited(&mut self, start: RawLocation, opener: char, closer: char) -> RawToken {
        self.cursor.advance(); // 1st delimiter char

        let is_triple = self.cursor.current() == Some(opener)
            && self.cursor.peek() == Some(opener)
            && self.cursor.peek2() == Some('\n');

        if is_triple {
            self.cursor.advance(); // 2nd
            self.cursor.advance(); // 3rd
            self.cursor.advance(); // newline
            let mut text = String::new();
            let mut run = 0u32;
            loop {
                match self.cursor.current() {
                    None => return RawToken::new(RawTag::UnterminatedForeign, text, start),
                    Some(c) if c == closer => {
                        self.cursor.advance();
                        run += 1;
                        if run == 3 {
                            break;
                        }
                    }
                    Some(c) => {
                        for _ in 0..run {
                            text.push(closer);
                        }
                        run = 0;
                        text.push(c);
                        self.cursor.advance();
                    }
                }
            }
            return RawToken::new(RawTag::At, text, start);
        }

        let mut text = String::new();
        loop {
            match self.cursor.current() {
                None | Some('\n') => return RawToken::new(RawTag::UnterminatedForeign, text, start),
                Some(c) if c == closer => {
                    self.cursor.advance();
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.cursor.advance();
                }
            }
        }
        RawToken::new(RawTag::At, text, start)
    }

    // --- Miscellaneous ---------------------------------------------------

    fn hash(&mut self, start: RawLocation) -> RawToken {
        self.cursor.advance(); // `#`
        if self.cursor.current() == Some('!') {
            self.cursor.advance();
            RawToken::new(RawTag::HashBang, String::new(), start)
        } else {
            RawToken::new(RawTag::Hash, String::new(), start)
        }
    }

    fn single(&mut self, start: RawLocation, tag: RawTag) -> RawToken {
        self.cursor.advance();
        RawToken::new(tag, String::new(), start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SliceSource<'a> {
        units: &'a [u16],
        pos: usize,
    }

    impl CharSource for SliceSource<'_> {
        fn next_code_unit(&mut self) -> i32 {
            if self.pos >= self.units.len() {
                return -1;
            }
            let u = self.units[self.pos];
            self.pos += 1;
            i32::from(u)
        }
    }

    fn scan_all(text: &str) -> Vec<RawToken> {
        let units: Vec<u16> = text.encode_utf16().collect();
        let source = SliceSource {
            units: Box::leak(units.into_boxed_slice()),
            pos: 0,
        };
        let mut scanner = RawScanner::new(Cursor::new(source));
        let mut out = Vec::new();
        loop {
            let tok = scanner.next_token();
            let is_eof = tok.tag == RawTag::Eof;
            out.push(tok);
            if is_eof {
                break;
            }
        }
        out
    }

    #[test]
    fn scans_structural_tokens() {
        let toks = scan_all("{}[]()");
        let tags: Vec<_> = toks.iter().map(|t| t.tag).collect();
        assert_eq!(
            tags,
            vec![
                RawTag::LBrace,
                RawTag::RBrace,
                RawTag::LBracket,
                RawTag::RBracket,
                RawTag::LParen,
                RawTag::RParen,
                RawTag::Eof,
            ]
        );
    }

    #[test]
    fn skips_whitespace_and_line_comments() {
        let toks = scan_all("  // a comment\nwidget");
        assert_eq!(toks[0].tag, RawTag::Newline);
        assert_eq!(toks[1].tag, RawTag::Ident);
        assert_eq!(toks[1].text, "widget");
    }

    #[test]
    fn block_comment_spans_newlines() {
        let toks = scan_all("/* line1\nline2 */widget");
        assert_eq!(toks[0].tag, RawTag::Ident);
        assert_eq!(toks[0].text, "widget");
    }

    #[test]
    fn identifier_allows_hyphen_and_digits() {
        let toks = scan_all("my-widget2");
        assert_eq!(toks[0].tag, RawTag::Ident);
        assert_eq!(toks[0].text, "my-widget2");
    }

    #[test]
    fn backtick_identifier_captures_raw_text() {
        let toks = scan_all("`true`");
        assert_eq!(toks[0].tag, RawTag::Backtick);
        assert_eq!(toks[0].text, "true");
    }

    #[test]
    fn backtick_newline_before_closer_is_unterminated() {
        let toks = scan_all("`abc\ndef`");
        assert_eq!(toks[0].tag, RawTag::UnterminatedBacktick);
    }

    #[test]
    fn decimal_int_and_float() {
        let toks = scan_all("120 3.5");
        assert_eq!(toks[0].tag, RawTag::Int);
        assert_eq!(toks[0].text, "120");
        assert_eq!(toks[2].tag, RawTag::Float);
        assert_eq!(toks[2].text, "3.5");
    }

    #[test]
    fn exponent_makes_float() {
        let toks = scan_all("1e10");
        assert_eq!(toks[0].tag, RawTag::Float);
        assert_eq!(toks[0].text, "1e10");
    }

    #[test]
    fn hex_and_binary_prefixes() {
        let toks = scan_all("0x1A 0b101");
        assert_eq!(toks[0].tag, RawTag::HexInt);
        assert_eq!(toks[0].text, "0x1A");
        assert_eq!(toks[2].tag, RawTag::BinInt);
        assert_eq!(toks[2].text, "0b101");
    }

    #[test]
    fn signed_radix_prefix_is_an_error() {
        let toks = scan_all("+0x1");
        assert_eq!(toks[0].tag, RawTag::SignedRadixPrefix);
    }

    #[test]
    fn dash_not_followed_by_a_digit_is_an_error() {
        let toks = scan_all("-foo");
        assert_eq!(toks[0].tag, RawTag::SignedNonDigit);
        assert_eq!(toks[0].text, "-");
        assert_eq!(toks[1].tag, RawTag::Ident);
        assert_eq!(toks[1].text, "foo");
    }

    #[test]
    fn plus_not_followed_by_a_digit_is_an_error() {
        let toks = scan_all("+bar");
        assert_eq!(toks[0].tag, RawTag::SignedNonDigit);
        assert_eq!(toks[0].text, "+");
    }

    #[test]
    fn lone_sign_at_end_of_input_is_an_error() {
        let toks = scan_all("-");
        assert_eq!(toks[0].tag, RawTag::SignedNonDigit);
    }

    #[test]
    fn simple_string_preserves_escapes_raw() {
        let toks = scan_all(r#""a\nb""#);
        assert_eq!(toks[0].tag, RawTag::SimpleString);
        assert_eq!(toks[0].text, "a\\nb");
    }

    #[test]
    fn triple_quoted_string_captures_raw_content() {
        let toks = scan_all("\"\"\"\nhello\nworld\n\"\"\"");
        assert_eq!(toks[0].tag, RawTag::TripleString);
        assert_eq!(toks[0].text, "hello\nworld\n");
    }

    #[test]
    fn triple_quote_without_newline_falls_back_to_empty_strings() {
        let toks = scan_all("\"\"\"\"");
        assert_eq!(toks[0].tag, RawTag::SimpleString);
        assert_eq!(toks[0].text, "");
        assert_eq!(toks[1].tag, RawTag::SimpleString);
        assert_eq!(toks[1].text, "");
    }

    #[test]
    fn single_delimited_foreign_block() {
        let toks = scan_all("@'echo ok'");
        assert_eq!(toks[0].tag, RawTag::At);
        assert_eq!(toks[0].text, "echo ok");
    }

    #[test]
    fn triple_delimited_foreign_block() {
        let toks = scan_all("@{{{\nlet x = {1};\n}}}");
        assert_eq!(toks[0].tag, RawTag::At);
        assert_eq!(toks[0].text, "let x = {1};\n");
    }

    #[test]
    fn foreign_block_newline_before_single_closer_is_unterminated() {
        let toks = scan_all("@'abc\ndef'");
        assert_eq!(toks[0].tag, RawTag::UnterminatedForeign);
    }

    #[test]
    fn bad_foreign_delimiter_is_flagged() {
        let toks = scan_all("@x");
        assert_eq!(toks[0].tag, RawTag::BadForeignDelimiter);
    }

    #[test]
    fn hash_bang_vs_plain_hash() {
        let toks = scan_all("#! #");
        assert_eq!(toks[0].tag, RawTag::HashBang);
        assert_eq!(toks[2].tag, RawTag::Hash);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn scanner_over(text: &str) -> RawScanner<SliceSource<'_>> {
            let units: Vec<u16> = text.encode_utf16().collect();
            let source = SliceSource {
                units: Box::leak(units.into_boxed_slice()),
                pos: 0,
            };
            RawScanner::new(Cursor::new(source))
        }

        proptest! {
            /// `skip_trivia` never eats past the first character that isn't a
            /// space, tab, or `\r` — indentation is stripped, nothing else.
            #[test]
            fn skip_trivia_consumes_exactly_the_leading_indent_run(
                indent in "[ \\t\\r]{0,16}",
                rest in "[a-zA-Z0-9_]{0,16}",
            ) {
                let text = format!("{indent}{rest}");
                let mut scanner = scanner_over(&text);
                let skipped = scanner.skip_trivia();
                prop_assert_eq!(skipped, !indent.is_empty());
                let remaining = scanner.cursor.eat_while(|_| true);
                prop_assert_eq!(remaining, rest);
            }

            /// A line comment is always skipped up to (not including) the
            /// newline that ends it, regardless of its body.
            #[test]
            fn skip_trivia_consumes_a_full_line_comment(
                body in "[a-zA-Z0-9 _]{0,32}",
            ) {
                let text = format!("//{body}\nrest");
                let mut scanner = scanner_over(&text);
                let skipped = scanner.skip_trivia();
                prop_assert!(skipped);
                prop_assert_eq!(scanner.cursor.current(), Some('\n'));
            }
        }
    }
}
