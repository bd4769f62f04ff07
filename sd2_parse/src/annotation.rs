//! Document/element annotations (spec.md §4.2 "Document annotations").
//!
//! Argument text is opaque: it is captured by scanning balanced `()` and
//! reproducing token texts into a raw string, not re-parsed by the core. The
//! teacher's `Cursor` can slice this verbatim out of the original byte
//! buffer; `sd2_lexer` retains no such span once a token is cooked (numbers
//! are parsed, strings are decoded, identifiers are interned), so this
//! re-renders each token's text from its cooked `TokenKind` instead. This is
//! lossy for exact source formatting (e.g. numeric literal spelling, string
//! escape style) but the argument text is opaque to the core either way —
//! no downstream consumer in scope parses it further.

use sd2_diagnostic::{ErrorCode, ErrorRecord};
use sd2_ir::{Annotation, StringInterner, TokenKind};

use crate::cursor::TokenCursor;
use crate::Reader;
use sd2_lexer_core::CharSource;

impl<S: CharSource> Reader<S> {
    /// Parses the `[qname (opt-args)]` body shared by `#!` and `#` forms;
    /// the caller has already consumed the `#!`/`#` token.
    pub(crate) fn parse_annotation_body(&mut self) -> Result<Annotation, ErrorRecord> {
        self.expect(TokenKind::LBracket)?;
        let name = self.parse_qualified_name()?;
        let args_text = if matches!(self.cursor.peek()?.kind, TokenKind::LParen) {
            Some(capture_balanced_parens(&mut self.cursor)?)
        } else {
            None
        };
        self.expect(TokenKind::RBracket)?;
        Ok(Annotation { name, args_text })
    }
}

fn capture_balanced_parens<S: CharSource>(cursor: &mut TokenCursor<S>) -> Result<String, ErrorRecord> {
    cursor.advance()?; // opening `(`
    let mut depth = 1u32;
    let mut out = String::from("(");
    loop {
        let tok = cursor.advance()?;
        match &tok.kind {
            TokenKind::LParen => {
                depth += 1;
                out.push('(');
            }
            TokenKind::RParen => {
                depth -= 1;
                out.push(')');
                if depth == 0 {
                    return Ok(out);
                }
            }
            TokenKind::Eof => {
                return Err(ErrorRecord::new(
                    ErrorCode::E1000,
                    "unexpected end of input inside annotation arguments",
                    tok.location,
                ));
            }
            other => {
                if !out.ends_with('(') {
                    out.push(' ');
                }
                out.push_str(&render_token_text(other, cursor.interner()));
            }
        }
    }
}

/// Best-effort re-rendering of a cooked token's text, used only for opaque
/// annotation argument capture.
fn render_token_text(kind: &TokenKind, interner: &StringInterner) -> String {
    match kind {
        TokenKind::Ident(name) => interner.resolve(*name).to_string(),
        TokenKind::BacktickIdent(name) => format!("`{}`", interner.resolve(*name)),
        TokenKind::String(s) => format!("\"{}\"", escape_for_capture(s)),
        TokenKind::Int(i) => i.to_string(),
        TokenKind::Float(f) => f.to_string(),
        TokenKind::Bool(b) => b.to_string(),
        TokenKind::Null => "null".to_string(),
        TokenKind::At(text) => format!("@\"{}\"", escape_for_capture(text)),
        TokenKind::Newline => "\n".to_string(),
        TokenKind::Eof => String::new(),
        TokenKind::LBrace => "{".to_string(),
        TokenKind::RBrace => "}".to_string(),
        TokenKind::LBracket => "[".to_string(),
        TokenKind::RBracket => "]".to_string(),
        TokenKind::LParen => "(".to_string(),
        TokenKind::RParen => ")".to_string(),
        TokenKind::Comma => ",".to_string(),
        TokenKind::Colon => ":".to_string(),
        TokenKind::Equal => "=".to_string(),
        TokenKind::Dot => ".".to_string(),
        TokenKind::Lt => "<".to_string(),
        TokenKind::Gt => ">".to_string(),
        TokenKind::Hash => "#".to_string(),
        TokenKind::HashBang => "#!".to_string(),
        TokenKind::Bang => "!".to_string(),
        TokenKind::Pipe => "|".to_string(),
    }
}

fn escape_for_capture(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}
