//! Body-item grammar (spec.md §4.2 "Body items"): closing a body, namespace
//! headers, and attributes.

use sd2_diagnostic::ErrorCode;
use sd2_diagnostic::ErrorRecord;
use sd2_ir::{Event, Location, TokenKind, Value};
use sd2_lexer_core::CharSource;

use crate::scope::Scope;
use crate::Reader;

impl<S: CharSource> Reader<S> {
    pub(crate) fn parse_body_item(&mut self) -> Result<Event, ErrorRecord> {
        let tok = self.cursor.peek()?.clone();
        match tok.kind {
            TokenKind::RBrace => {
                self.cursor.advance()?;
                self.scopes.pop(); // BODY
                match self.scopes.pop() {
                    Some(Scope::Element) => Ok(Event::EndElement(tok.location)),
                    Some(Scope::Namespace) => Ok(Event::EndNamespace(tok.location)),
                    other => unreachable!("BODY is always pushed together with Element or Namespace, found {other:?}"),
                }
            }
            TokenKind::Dot => {
                self.cursor.advance()?;
                let name_tok = self.cursor.advance()?;
                let name = match name_tok.kind {
                    TokenKind::Ident(n) => self.resolve(n),
                    other => {
                        return Err(self.error(
                            ErrorCode::E1000,
                            format!("namespace name must be a plain identifier, found {}", other.describe()),
                            name_tok.location,
                        ))
                    }
                };
                self.expect(TokenKind::LBrace)?;
                self.scopes.push(Scope::Namespace);
                self.scopes.push(Scope::Body);
                Ok(Event::StartNamespace {
                    name,
                    location: tok.location,
                })
            }
            TokenKind::BacktickIdent(name) => {
                self.cursor.advance()?;
                self.expect(TokenKind::Equal)?;
                let attr_name = self.resolve(name);
                let value = self.parse_value()?;
                self.finish_attribute(attr_name, value, tok.location)
            }
            TokenKind::Ident(name) => {
                if matches!(self.cursor.peek2()?.kind, TokenKind::Equal) {
                    self.cursor.advance()?; // ident
                    self.cursor.advance()?; // `=`
                    let attr_name = self.resolve(name);
                    let value = self.parse_value()?;
                    self.finish_attribute(attr_name, value, tok.location)
                } else {
                    self.parse_element_header()
                }
            }
            TokenKind::Pipe => Err(self.error(
                ErrorCode::E1004,
                "`|` is only valid as a qualifier continuation marker",
                tok.location,
            )),
            other => Err(self.error(
                ErrorCode::E1000,
                format!("unexpected {} in element body", other.describe()),
                tok.location,
            )),
        }
    }

    fn finish_attribute(&mut self, name: String, value: Value, location: Location) -> Result<Event, ErrorRecord> {
        let value = self.resolve_value(value)?;
        match self.cursor.peek()?.kind {
            TokenKind::Newline => {
                self.cursor.advance()?;
            }
            TokenKind::RBrace => {}
            _ => {
                let loc = self.cursor.peek()?.location;
                return Err(self.error(
                    ErrorCode::E1000,
                    "expected a newline or `}` after an attribute value",
                    loc,
                ));
            }
        }
        Ok(Event::Attribute {
            name,
            value,
            location,
        })
    }
}
