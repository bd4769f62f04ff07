//! Attribute value grammar (spec.md §4.2 "Attribute value parsing").
//!
//! Lists, maps, tuples, and constructor calls nest arbitrarily, so the
//! recursive entry point is wrapped in [`sd2_stack::ensure_sufficient_stack`]
//! the same way the teacher wraps its own deeply-recursive expression
//! parser.

use sd2_diagnostic::ErrorCode;
use sd2_diagnostic::ErrorRecord;
use sd2_ir::{Location, QualifiedName, TokenKind, Value};
use sd2_lexer_core::CharSource;

use crate::Reader;

fn is_reserved_word_name(name: &QualifiedName) -> bool {
    matches!(name.parts(), [only] if matches!(only.as_str(), "true" | "false" | "null"))
}

impl<S: CharSource> Reader<S> {
    pub(crate) fn parse_value(&mut self) -> Result<Value, ErrorRecord> {
        sd2_stack::ensure_sufficient_stack(|| self.parse_value_inner())
    }

    fn parse_value_inner(&mut self) -> Result<Value, ErrorRecord> {
        let tok = self.cursor.advance()?;
        let location = tok.location;
        match tok.kind {
            TokenKind::String(s) => Ok(Value::String(s, location)),
            TokenKind::Int(i) => Ok(Value::Int(i, location)),
            TokenKind::Float(f) => Ok(Value::Float(f, location)),
            TokenKind::Bool(b) => {
                self.reject_adjacent_foreign_tag()?;
                Ok(Value::Bool(b, location))
            }
            TokenKind::Null => {
                self.reject_adjacent_foreign_tag()?;
                Ok(Value::Null(location))
            }
            TokenKind::LBracket => self.parse_list(location),
            TokenKind::LBrace => self.parse_map(location),
            TokenKind::LParen => self.parse_tuple(location),
            TokenKind::Ident(name) => {
                let first = self.resolve(name);
                self.parse_qualified_value(first, location)
            }
            TokenKind::BacktickIdent(name) => {
                let first = self.resolve(name);
                self.parse_qualified_value(first, location)
            }
            TokenKind::At(text) => Ok(Value::Foreign(text, None, location)),
            other => Err(self.error(
                ErrorCode::E1000,
                format!("unexpected {} in value position", other.describe()),
                location,
            )),
        }
    }

    /// After a BOOL/NULL literal, an `@` with no intervening whitespace is
    /// E4004 (a reserved word cannot carry a foreign-code tag). An `@` with
    /// whitespace before it is left for whatever follows the value to deal
    /// with (typically the trailing-newline-or-`}` check, E1000).
    fn reject_adjacent_foreign_tag(&mut self) -> Result<(), ErrorRecord> {
        let is_adjacent_at = matches!(self.cursor.peek()?.kind, TokenKind::At(_)) && !self.cursor.peek()?.preceded_by_trivia;
        if is_adjacent_at {
            let location = self.cursor.peek()?.location;
            return Err(self.error(
                ErrorCode::E4004,
                "`@` cannot immediately follow a boolean or null literal",
                location,
            ));
        }
        Ok(())
    }

    fn continue_qualified_name(&mut self, first: String) -> Result<QualifiedName, ErrorRecord> {
        let mut parts = vec![first];
        while matches!(self.cursor.peek()?.kind, TokenKind::Dot) {
            self.cursor.advance()?;
            let tok = self.cursor.advance()?;
            parts.push(self.ident_text(&tok)?);
        }
        Ok(QualifiedName::new(parts))
    }

    /// Parses a dotted name starting from an already-consumed identifier and
    /// branches on what immediately follows it: a foreign-code tag, a named
    /// or positional constructor call, or a bare `QualifiedName` value.
    fn parse_qualified_value(&mut self, first: String, location: Location) -> Result<Value, ErrorRecord> {
        let name = self.continue_qualified_name(first)?;
        match self.cursor.peek()?.kind.clone() {
            TokenKind::At(_) => {
                let preceded_by_trivia = self.cursor.peek()?.preceded_by_trivia;
                if preceded_by_trivia {
                    let location = self.cursor.peek()?.location;
                    return Err(self.error(
                        ErrorCode::E4003,
                        "`@` must be column-adjacent to the constructor name",
                        location,
                    ));
                }
                if is_reserved_word_name(&name) {
                    let location = self.cursor.peek()?.location;
                    return Err(self.error(
                        ErrorCode::E4004,
                        "`@` cannot tag a reserved word",
                        location,
                    ));
                }
                let at_tok = self.cursor.advance()?;
                let text = match at_tok.kind {
                    TokenKind::At(text) => text,
                    _ => unreachable!("peeked At above"),
                };
                Ok(Value::Foreign(text, Some(name), location))
            }
            TokenKind::LBrace => {
                self.cursor.advance()?;
                self.parse_named_constructor_body(name, location)
            }
            TokenKind::LParen => {
                self.cursor.advance()?;
                self.parse_positional_constructor_args(name, location)
            }
            TokenKind::Newline => {
                let after = self.cursor.peek2()?.clone();
                match after.kind {
                    TokenKind::LBrace => Err(self.error(
                        ErrorCode::E1001,
                        "constructor body `{` must open on the same line as its name",
                        after.location,
                    )),
                    TokenKind::LParen => Err(self.error(
                        ErrorCode::E1005,
                        "constructor argument list `(` must open on the same line as its name",
                        after.location,
                    )),
                    _ => Ok(Value::QualifiedName(name, location)),
                }
            }
            _ => Ok(Value::QualifiedName(name, location)),
        }
    }

    fn parse_named_constructor_body(&mut self, name: QualifiedName, location: Location) -> Result<Value, ErrorRecord> {
        let mut attrs = Vec::new();
        self.skip_newlines()?;
        loop {
            if matches!(self.cursor.peek()?.kind, TokenKind::RBrace) {
                self.cursor.advance()?;
                break;
            }
            let key_tok = self.cursor.advance()?;
            let key = self.ident_text(&key_tok)?;
            self.expect(TokenKind::Equal)?;
            let value = self.parse_value()?;
            attrs.push((key, value));
            match self.cursor.peek()?.kind {
                TokenKind::Newline => {
                    self.cursor.advance()?;
                    self.skip_newlines()?;
                }
                TokenKind::RBrace => {}
                _ => {
                    let loc = self.cursor.peek()?.location;
                    return Err(self.error(
                        ErrorCode::E1000,
                        "expected a newline or `}` after a constructor attribute",
                        loc,
                    ));
                }
            }
        }
        self.resolve_value(Value::ConstructorNamed(name, attrs, location))
    }

    fn parse_positional_constructor_args(&mut self, name: QualifiedName, location: Location) -> Result<Value, ErrorRecord> {
        let mut args = Vec::new();
        self.skip_newlines()?;
        if matches!(self.cursor.peek()?.kind, TokenKind::RParen) {
            self.cursor.advance()?;
            return self.resolve_value(Value::ConstructorTuple(name, args, location));
        }
        loop {
            args.push(self.parse_value()?);
            self.skip_newlines()?;
            match self.cursor.peek()?.kind {
                TokenKind::Comma => {
                    self.cursor.advance()?;
                    self.skip_newlines()?;
                    if matches!(self.cursor.peek()?.kind, TokenKind::RParen) {
                        self.cursor.advance()?;
                        break;
                    }
                }
                TokenKind::RParen => {
                    self.cursor.advance()?;
                    break;
                }
                _ => {
                    let loc = self.cursor.peek()?.location;
                    return Err(self.error(
                        ErrorCode::E1000,
                        "expected `,` or `)` in constructor arguments",
                        loc,
                    ));
                }
            }
        }
        self.resolve_value(Value::ConstructorTuple(name, args, location))
    }

    fn parse_list(&mut self, location: Location) -> Result<Value, ErrorRecord> {
        let mut items = Vec::new();
        self.skip_newlines()?;
        if matches!(self.cursor.peek()?.kind, TokenKind::RBracket) {
            self.cursor.advance()?;
            return Ok(Value::List(items, location));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_newlines()?;
            match self.cursor.peek()?.kind {
                TokenKind::Comma => {
                    self.cursor.advance()?;
                    self.skip_newlines()?;
                    if matches!(self.cursor.peek()?.kind, TokenKind::RBracket) {
                        self.cursor.advance()?;
                        break;
                    }
                }
                TokenKind::RBracket => {
                    self.cursor.advance()?;
                    break;
                }
                _ => {
                    let loc = self.cursor.peek()?.location;
                    return Err(self.error(ErrorCode::E1000, "expected `,` or `]` in list", loc));
                }
            }
        }
        Ok(Value::List(items, location))
    }

    fn parse_tuple(&mut self, location: Location) -> Result<Value, ErrorRecord> {
        let mut items = Vec::new();
        self.skip_newlines()?;
        if matches!(self.cursor.peek()?.kind, TokenKind::RParen) {
            self.cursor.advance()?;
            return Ok(Value::Tuple(items, location));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_newlines()?;
            match self.cursor.peek()?.kind {
                TokenKind::Comma => {
                    self.cursor.advance()?;
                    self.skip_newlines()?;
                    if matches!(self.cursor.peek()?.kind, TokenKind::RParen) {
                        self.cursor.advance()?;
                        break;
                    }
                }
                TokenKind::RParen => {
                    self.cursor.advance()?;
                    break;
                }
                _ => {
                    let loc = self.cursor.peek()?.location;
                    return Err(self.error(ErrorCode::E1000, "expected `,` or `)` in tuple", loc));
                }
            }
        }
        Ok(Value::Tuple(items, location))
    }

    fn parse_map(&mut self, location: Location) -> Result<Value, ErrorRecord> {
        let mut entries: Vec<(String, Value)> = Vec::new();
        self.skip_newlines()?;
        if matches!(self.cursor.peek()?.kind, TokenKind::RBrace) {
            self.cursor.advance()?;
            return Ok(Value::Map(entries, location));
        }
        loop {
            let key = self.parse_map_key()?;
            self.expect(TokenKind::Equal)?;
            let value = self.parse_value()?;
            if entries.iter().any(|(k, _)| k == &key) {
                return Err(self.error(
                    ErrorCode::E2003,
                    format!("duplicate map key `{key}`"),
                    value.location(),
                ));
            }
            entries.push((key, value));
            self.skip_newlines()?;
            match self.cursor.peek()?.kind {
                TokenKind::Comma => {
                    self.cursor.advance()?;
                    self.skip_newlines()?;
                    if matches!(self.cursor.peek()?.kind, TokenKind::RBrace) {
                        self.cursor.advance()?;
                        break;
                    }
                }
                TokenKind::RBrace => {
                    self.cursor.advance()?;
                    break;
                }
                _ => {
                    let loc = self.cursor.peek()?.location;
                    return Err(self.error(ErrorCode::E1000, "expected `,` or `}` in map", loc));
                }
            }
        }
        Ok(Value::Map(entries, location))
    }

    /// Map keys are an IDENT, a STRING, or a `[primitive]`-bracketed
    /// primitive whose token text becomes the string key.
    fn parse_map_key(&mut self) -> Result<String, ErrorRecord> {
        let tok = self.cursor.advance()?;
        match tok.kind {
            TokenKind::Ident(name) => Ok(self.resolve(name)),
            TokenKind::String(s) => Ok(s),
            TokenKind::LBracket => {
                let key = self.bracketed_primitive_key()?;
                self.expect(TokenKind::RBracket)?;
                Ok(key)
            }
            other => Err(self.error(
                ErrorCode::E1000,
                format!("expected a map key, found {}", other.describe()),
                tok.location,
            )),
        }
    }

    fn bracketed_primitive_key(&mut self) -> Result<String, ErrorRecord> {
        let tok = self.cursor.advance()?;
        match tok.kind {
            TokenKind::Int(i) => Ok(i.to_string()),
            TokenKind::Float(f) => Ok(f.to_string()),
            TokenKind::Bool(b) => Ok(b.to_string()),
            TokenKind::Null => Ok("null".to_string()),
            TokenKind::String(s) => Ok(s),
            other => Err(self.error(
                ErrorCode::E1000,
                format!("expected a primitive inside `[...]`, found {}", other.describe()),
                tok.location,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReaderConfig;

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

    fn reader_over(text: &str) -> Reader<SliceSource> {
        Reader::new(
            SliceSource {
                units: text.encode_utf16().collect(),
                pos: 0,
            },
            ReaderConfig::default(),
        )
    }

    #[test]
    fn primitives_parse_to_their_own_variant() {
        assert!(matches!(reader_over("\"hi\"\n").parse_value().unwrap(), Value::String(s, _) if s == "hi"));
        assert!(matches!(reader_over("42\n").parse_value().unwrap(), Value::Int(42, _)));
        assert!(matches!(reader_over("3.5\n").parse_value().unwrap(), Value::Float(f, _) if f == 3.5));
        assert!(matches!(reader_over("true\n").parse_value().unwrap(), Value::Bool(true, _)));
        assert!(matches!(reader_over("null\n").parse_value().unwrap(), Value::Null(_)));
    }

    #[test]
    fn dotted_qualified_name_with_no_trailer_is_a_bare_value() {
        let value = reader_over("dark.primary\n").parse_value().unwrap();
        match value {
            Value::QualifiedName(name, _) => assert_eq!(name, QualifiedName::new(vec!["dark".into(), "primary".into()])),
            other => panic!("expected QualifiedName, got {other:?}"),
        }
    }

    #[test]
    fn list_with_trailing_comma_and_newlines_is_allowed() {
        let value = reader_over("[\n  1,\n  2,\n]\n").parse_value().unwrap();
        match value {
            Value::List(items, _) => assert_eq!(items.len(), 2),
            other => panic!("expected List, got {other:?}"),
        }
    }

    #[test]
    fn single_element_tuple_needs_the_trailing_comma() {
        let value = reader_over("(42,)\n").parse_value().unwrap();
        assert!(matches!(value, Value::Tuple(items, _) if items.len() == 1));
    }

    #[test]
    fn empty_map_parses_to_no_entries() {
        let value = reader_over("{}\n").parse_value().unwrap();
        assert!(matches!(value, Value::Map(entries, _) if entries.is_empty()));
    }

    #[test]
    fn bracketed_primitive_map_key_is_stringified() {
        let value = reader_over("{ [42] = \"answer\" }\n").parse_value().unwrap();
        match value {
            Value::Map(entries, _) => {
                assert_eq!(entries[0].0, "42");
            }
            other => panic!("expected Map, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_map_key_is_e2003() {
        let err = reader_over("{ a = 1, a = 2 }\n").parse_value().unwrap_err();
        assert_eq!(err.code, ErrorCode::E2003);
    }

    #[test]
    fn named_constructor_body_collects_attributes_in_order() {
        let value = reader_over("Point {\n  x = 1\n  y = 2\n}\n").parse_value().unwrap();
        match value {
            Value::ConstructorNamed(name, attrs, _) => {
                assert_eq!(name, QualifiedName::single("Point"));
                assert_eq!(attrs.len(), 2);
                assert_eq!(attrs[0].0, "x");
                assert_eq!(attrs[1].0, "y");
            }
            other => panic!("expected ConstructorNamed, got {other:?}"),
        }
    }

    #[test]
    fn foreign_tag_without_a_qualified_name_prefix() {
        let value = reader_over("@'echo ok'\n").parse_value().unwrap();
        assert!(matches!(value, Value::Foreign(text, None, _) if text == "echo ok"));
    }

    #[test]
    fn foreign_tag_adjacent_to_a_dotted_constructor_name() {
        let value = reader_over("sh@'echo ok'\n").parse_value().unwrap();
        match value {
            Value::Foreign(text, Some(ctor), _) => {
                assert_eq!(text, "echo ok");
                assert_eq!(ctor, QualifiedName::single("sh"));
            }
            other => panic!("expected Foreign, got {other:?}"),
        }
    }

    #[test]
    fn whitespace_before_foreign_tag_is_e4003() {
        let err = reader_over("sh @'echo ok'\n").parse_value().unwrap_err();
        assert_eq!(err.code, ErrorCode::E4003);
    }

    #[test]
    fn foreign_tag_immediately_after_a_bool_literal_is_e4004() {
        let err = reader_over("true@'x'\n").parse_value().unwrap_err();
        assert_eq!(err.code, ErrorCode::E4004);
    }

    #[test]
    fn foreign_tag_with_whitespace_after_a_bool_literal_is_left_unrejected() {
        // `reject_adjacent_foreign_tag` only fires with no intervening trivia;
        // whitespace before `@` is left for whatever follows the value to reject instead.
        let value = reader_over("true @'x'\n").parse_value();
        assert!(value.is_ok());
    }

    #[test]
    fn constructor_body_brace_on_next_line_is_e1001() {
        let err = reader_over("Point\n{\n}\n").parse_value().unwrap_err();
        assert_eq!(err.code, ErrorCode::E1001);
    }

    #[test]
    fn constructor_args_paren_on_next_line_is_e1005() {
        let err = reader_over("Point\n(1, 2)\n").parse_value().unwrap_err();
        assert_eq!(err.code, ErrorCode::E1005);
    }
}
