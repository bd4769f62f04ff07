//! Element header grammar (spec.md §4.2 "Element header"):
//! `[annotations] keyword [id] [: type] [qualifiers] [body]`.

use sd2_diagnostic::ErrorCode;
use sd2_diagnostic::ErrorRecord;
use sd2_ir::{Event, Qualifier, TokenKind, TypeExpr};
use sd2_lexer_core::CharSource;

use crate::scope::Scope;
use crate::Reader;

impl<S: CharSource> Reader<S> {
    pub(crate) fn parse_element_header(&mut self) -> Result<Event, ErrorRecord> {
        let annotations = std::mem::take(&mut self.pending_annotations);

        let kw_tok = self.cursor.advance()?;
        let location = kw_tok.location;
        let keyword = match kw_tok.kind {
            TokenKind::Ident(name) => self.resolve(name),
            other => {
                return Err(self.error(
                    ErrorCode::E1000,
                    format!("expected an element keyword, found {}", other.describe()),
                    kw_tok.location,
                ))
            }
        };

        let id = match self.cursor.peek()?.kind.clone() {
            TokenKind::Ident(name) => {
                self.cursor.advance()?;
                Some(self.resolve(name))
            }
            TokenKind::BacktickIdent(name) => {
                self.cursor.advance()?;
                Some(self.resolve(name))
            }
            _ => None,
        };

        let type_expr = if matches!(self.cursor.peek()?.kind, TokenKind::Colon) {
            self.cursor.advance()?;
            Some(self.parse_type_expr()?)
        } else {
            None
        };

        let qualifiers = self.parse_qualifiers()?;

        match self.cursor.peek()?.kind.clone() {
            TokenKind::LBrace => {
                self.cursor.advance()?;
                self.scopes.push(Scope::Element);
                self.scopes.push(Scope::Body);
                Ok(Event::StartElement {
                    keyword,
                    id,
                    type_expr,
                    annotations,
                    qualifiers,
                    location,
                })
            }
            TokenKind::Newline => {
                let after = self.cursor.peek2()?.clone();
                if matches!(after.kind, TokenKind::LBrace) {
                    Err(self.error(
                        ErrorCode::E1001,
                        "element body `{` must open on the same line as its header",
                        after.location,
                    ))
                } else {
                    self.scopes.push(Scope::ElementNoBody);
                    Ok(Event::StartElement {
                        keyword,
                        id,
                        type_expr,
                        annotations,
                        qualifiers,
                        location,
                    })
                }
            }
            _ => {
                self.scopes.push(Scope::ElementNoBody);
                Ok(Event::StartElement {
                    keyword,
                    id,
                    type_expr,
                    annotations,
                    qualifiers,
                    location,
                })
            }
        }
    }

    fn parse_type_expr(&mut self) -> Result<TypeExpr, ErrorRecord> {
        let name = self.parse_qualified_name()?;
        let mut args = Vec::new();
        if matches!(self.cursor.peek()?.kind, TokenKind::Lt) {
            self.cursor.advance()?;
            loop {
                args.push(self.parse_type_expr()?);
                match self.cursor.peek()?.kind {
                    TokenKind::Comma => {
                        self.cursor.advance()?;
                    }
                    TokenKind::Gt => {
                        self.cursor.advance()?;
                        break;
                    }
                    _ => {
                        let loc = self.cursor.peek()?.location;
                        return Err(self.error(
                            ErrorCode::E5001,
                            "missing `>` closing generic type arguments",
                            loc,
                        ));
                    }
                }
            }
        }
        Ok(TypeExpr { name, args })
    }

    /// Each qualifier is a plain identifier followed by one or more
    /// `QualifiedName` arguments. A `NEWLINE` then `|` in column 1 continues
    /// the list on the next line; `|` elsewhere is E1002.
    fn parse_qualifiers(&mut self) -> Result<Vec<Qualifier>, ErrorRecord> {
        let mut qualifiers = Vec::new();
        loop {
            match self.cursor.peek()?.kind.clone() {
                TokenKind::Ident(name) => {
                    let name_tok_location = self.cursor.peek()?.location;
                    self.cursor.advance()?;
                    let qname = self.resolve(name);
                    let mut args = Vec::new();
                    loop {
                        match self.cursor.peek()?.kind {
                            TokenKind::Ident(_) | TokenKind::BacktickIdent(_) => {
                                args.push(self.parse_qualified_name()?);
                            }
                            _ => break,
                        }
                        if matches!(self.cursor.peek()?.kind, TokenKind::Comma) {
                            self.cursor.advance()?;
                        } else {
                            break;
                        }
                    }
                    if args.is_empty() {
                        return Err(self.error(
                            ErrorCode::E2101,
                            format!("qualifier `{qname}` requires at least one argument"),
                            name_tok_location,
                        ));
                    }
                    qualifiers.push(Qualifier { name: qname, args });
                }
                TokenKind::Newline => {
                    let after = self.cursor.peek2()?.clone();
                    if matches!(after.kind, TokenKind::Pipe) {
                        if after.location.column == 1 {
                            self.cursor.advance()?; // newline
                            self.cursor.advance()?; // `|`
                        } else {
                            return Err(self.error(
                                ErrorCode::E1002,
                                "qualifier continuation `|` must be in column 1",
                                after.location,
                            ));
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(qualifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReaderConfig;
    use sd2_ir::QualifiedName;

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
    fn keyword_id_generic_type_and_qualifier_with_argument() {
        let mut reader = reader_over("field email : List<String> unique x {\n}\n");
        let event = reader.parse_element_header().unwrap();
        match event {
            Event::StartElement {
                keyword,
                id,
                type_expr,
                qualifiers,
                ..
            } => {
                assert_eq!(keyword, "field");
                assert_eq!(id.as_deref(), Some("email"));
                let type_expr = type_expr.unwrap();
                assert_eq!(type_expr.name, QualifiedName::single("List"));
                assert_eq!(type_expr.args.len(), 1);
                assert_eq!(type_expr.args[0].name, QualifiedName::single("String"));
                assert_eq!(qualifiers.len(), 1);
                assert_eq!(qualifiers[0].name, "unique");
                assert_eq!(qualifiers[0].args, vec![QualifiedName::single("x")]);
            }
            other => panic!("expected StartElement, got {other:?}"),
        }
    }

    #[test]
    fn header_with_no_id_no_type_and_no_body_ends_at_newline() {
        let mut reader = reader_over("widget\n");
        let event = reader.parse_element_header().unwrap();
        match event {
            Event::StartElement {
                keyword,
                id,
                type_expr,
                qualifiers,
                ..
            } => {
                assert_eq!(keyword, "widget");
                assert!(id.is_none());
                assert!(type_expr.is_none());
                assert!(qualifiers.is_empty());
            }
            other => panic!("expected StartElement, got {other:?}"),
        }
    }

    #[test]
    fn body_brace_on_next_line_is_e1001() {
        let mut reader = reader_over("widget w\n{\n}\n");
        let err = reader.parse_element_header().unwrap_err();
        assert_eq!(err.code, ErrorCode::E1001);
    }

    #[test]
    fn qualifier_without_argument_is_e2101() {
        let mut reader = reader_over("field email unique {\n}\n");
        let err = reader.parse_element_header().unwrap_err();
        assert_eq!(err.code, ErrorCode::E2101);
    }

    #[test]
    fn missing_closing_angle_bracket_in_generic_type_is_e5001() {
        let mut reader = reader_over("field email : List<String {\n}\n");
        let err = reader.parse_element_header().unwrap_err();
        assert_eq!(err.code, ErrorCode::E5001);
    }

    #[test]
    fn non_identifier_keyword_is_e1000() {
        let mut reader = reader_over("\"oops\" w {\n}\n");
        let err = reader.parse_element_header().unwrap_err();
        assert_eq!(err.code, ErrorCode::E1000);
    }

    #[test]
    fn dash_prefixed_id_is_rejected_instead_of_producing_a_phantom_element() {
        let mut reader = reader_over("widget -foo {\n}\n");
        let err = reader.parse_element_header().unwrap_err();
        assert_eq!(err.code, ErrorCode::E7002);
    }
}
