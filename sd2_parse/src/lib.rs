//! Recursive-descent streaming parser (spec.md §4.2 "Parser / Streaming
//! Reader").
//!
//! ```text
//! CharSource → sd2_lexer::Lexer → TokenCursor (this crate) → Reader::next() → Event
//! ```
//!
//! The teacher's `ori_parse::Parser` accumulates a `ParseOutcome` (errors,
//! warnings, an `ExprArena`) across a whole-module parse. SD2's public
//! contract is narrower and more literal: `next() → Event`, callable
//! repeatedly, idempotent once `EndDocument` has been produced (spec.md
//! §4.2's "Public contract"). Diagnostics have nowhere else to go but the
//! `onError` callback threaded in through [`ReaderConfig`] — there is no
//! accumulator to drain afterward.
//!
//! Unlike `ori_parse::error::ParseErrorKind`'s ~15-variant internal
//! taxonomy, every fallible function here returns `Result<T,
//! sd2_diagnostic::ErrorRecord>` directly: spec.md §6 already defines a
//! flat, stable external error-code contract, so a second internal error
//! type would just be a lossy restatement of it.

mod annotation;
mod body;
mod cursor;
mod header;
mod recovery;
mod scope;
mod value;

use cursor::TokenCursor;
use scope::Scope;
use sd2_diagnostic::{ErrorCode, ErrorRecord};
use sd2_ir::{Annotation, Event, Identifier, Location, QualifiedName, Token, TokenKind};
use sd2_lexer::Lexer;
use sd2_lexer_core::CharSource;
use sd2_registry::{ConstructorRegistry, UnknownConstructorPolicy};

/// Configuration accepted by [`Reader::new`] (spec.md §6 "Reader factory").
pub struct ReaderConfig {
    /// Reserved; always behaves as `false` (spec.md §9's open question on
    /// value-chunk streaming — left unimplemented, no events are defined
    /// for it).
    pub stream_values: bool,
    /// When `true`, a parse error is reported via `on_error` and parsing
    /// resumes after resynchronizing; when `false`, the first error is
    /// fatal and ends the stream.
    pub allow_recovery: bool,
    /// Receives every error record raised during parsing, whether strict or
    /// recovering.
    pub on_error: Box<dyn FnMut(ErrorRecord)>,
    /// `None` means no resolution is performed at all: constructor values
    /// are left as `ConstructorNamed`/`ConstructorTuple`. `Some` enables
    /// resolution per `unknown_constructor_policy`.
    pub constructor_registry: Option<ConstructorRegistry>,
    pub unknown_constructor_policy: UnknownConstructorPolicy,
}

impl Default for ReaderConfig {
    /// Matches spec.md §6's stated defaults: recovery off, the built-in
    /// temporal registry, `KeepRaw` for unregistered constructor names.
    fn default() -> Self {
        ReaderConfig {
            stream_values: false,
            allow_recovery: false,
            on_error: Box::new(|_| {}),
            constructor_registry: Some(ConstructorRegistry::temporal()),
            unknown_constructor_policy: UnknownConstructorPolicy::default(),
        }
    }
}

/// The streaming reader: owns the scope stack and the pending-annotation
/// buffer, and drives the token cursor one grammar construct at a time.
///
/// Single-threaded and strictly sequential (spec.md §5) — `next()` mutates
/// everything in place, with no interior mutability or shared state.
pub struct Reader<S> {
    cursor: TokenCursor<S>,
    registry: Option<ConstructorRegistry>,
    unknown_policy: UnknownConstructorPolicy,
    allow_recovery: bool,
    on_error: Box<dyn FnMut(ErrorRecord)>,
    scopes: Vec<Scope>,
    started: bool,
    ended: bool,
    /// True until the first top-level token that isn't a document
    /// annotation (spec.md §4.2 "State").
    annotation_phase: bool,
    pending_annotations: Vec<Annotation>,
    last_location: Location,
}

impl<S: CharSource> Reader<S> {
    pub fn new(source: S, config: ReaderConfig) -> Self {
        Reader {
            cursor: TokenCursor::new(Lexer::new(source)),
            registry: config.constructor_registry,
            unknown_policy: config.unknown_constructor_policy,
            allow_recovery: config.allow_recovery,
            on_error: config.on_error,
            scopes: Vec::new(),
            started: false,
            ended: false,
            annotation_phase: true,
            pending_annotations: Vec::new(),
            last_location: Location::START,
        }
    }

    /// Returns the next event. Idempotent once `EndDocument` has been
    /// returned: every subsequent call returns the same `EndDocument` again
    /// (spec.md §4.2's "Public contract").
    pub fn next(&mut self) -> Event {
        if self.ended {
            return Event::EndDocument(self.last_location);
        }
        if !self.started {
            self.started = true;
            self.scopes.push(Scope::Document);
            self.last_location = Location::START;
            return Event::StartDocument(Location::START);
        }
        loop {
            match self.step() {
                Ok(event) => {
                    if event.is_end_document() {
                        self.ended = true;
                        self.last_location = event.location();
                    }
                    return event;
                }
                Err(err) => {
                    let fault_location = err.location;
                    (self.on_error)(err);
                    if self.allow_recovery {
                        self.synchronize();
                        continue;
                    }
                    self.ended = true;
                    self.last_location = fault_location;
                    return Event::EndDocument(fault_location);
                }
            }
        }
    }

    /// One iteration of the top-level loop (spec.md §4.2 steps 2-7):
    /// skips newlines, handles annotations and the `|`-outside-qualifier
    /// error, then dispatches on the current scope.
    fn step(&mut self) -> Result<Event, ErrorRecord> {
        loop {
            let kind = self.cursor.peek()?.kind.clone();
            match kind {
                TokenKind::Newline => {
                    self.cursor.advance()?;
                }
                TokenKind::Pipe => {
                    let loc = self.cursor.peek()?.location;
                    return Err(self.error(
                        ErrorCode::E1004,
                        "`|` is only valid as a qualifier continuation marker",
                        loc,
                    ));
                }
                TokenKind::HashBang => {
                    if !self.annotation_phase {
                        let loc = self.cursor.peek()?.location;
                        return Err(self.error(
                            ErrorCode::E1000,
                            "`#!` document annotations must precede the first element",
                            loc,
                        ));
                    }
                    return self.parse_document_annotation();
                }
                TokenKind::Hash => {
                    self.parse_element_annotation()?;
                    self.annotation_phase = false;
                }
                TokenKind::Eof => {
                    let loc = self.cursor.peek()?.location;
                    return Ok(Event::EndDocument(loc));
                }
                _ => break,
            }
        }
        self.annotation_phase = false;
        match self.scopes.last().copied() {
            Some(Scope::Body) => self.parse_body_item(),
            Some(Scope::ElementNoBody) => {
                self.scopes.pop();
                let loc = self.cursor.peek()?.location;
                Ok(Event::EndElement(loc))
            }
            _ => self.parse_element_header(),
        }
    }

    fn parse_document_annotation(&mut self) -> Result<Event, ErrorRecord> {
        let bang = self.cursor.advance()?; // `#!`
        let annotation = self.parse_annotation_body()?;
        Ok(Event::DocumentAnnotation {
            name: annotation.name,
            args_text: annotation.args_text,
            location: bang.location,
        })
    }

    fn parse_element_annotation(&mut self) -> Result<(), ErrorRecord> {
        self.cursor.advance()?; // `#`
        let annotation = self.parse_annotation_body()?;
        self.pending_annotations.push(annotation);
        Ok(())
    }

    /// Resynchronizes after a recoverable error: discards pending
    /// annotations and consumes tokens until the next resync point (spec.md
    /// §4.2 "Recovery mode", §9's "Recovery state" note — looks only at
    /// upcoming tokens through the same lookahead buffer, no separate
    /// internal recovery state).
    fn synchronize(&mut self) {
        tracing::debug!("resynchronizing after parse error");
        self.pending_annotations.clear();
        let mut skipped = 0u32;
        loop {
            match self.cursor.advance() {
                Ok(tok) => {
                    if recovery::is_resync_point(&tok.kind) {
                        tracing::trace!(skipped, resync_at = ?tok.kind, "resync point reached");
                        return;
                    }
                    skipped += 1;
                }
                Err(_) => {
                    // The token itself was a lexical error; treat it as
                    // consumed and keep scanning for a resync point.
                    skipped += 1;
                }
            }
        }
    }

    // --- Shared helpers used by header/value/annotation/body parsing -----

    fn error(&self, code: ErrorCode, message: impl Into<String>, location: Location) -> ErrorRecord {
        ErrorRecord::new(code, message, location)
    }

    fn resolve(&self, name: sd2_ir::Name) -> String {
        self.cursor.interner().resolve(name).to_string()
    }

    /// Consumes `kind` or raises a generic E1000 naming what was expected.
    fn expect(&mut self, kind: TokenKind) -> Result<Token, ErrorRecord> {
        let tok = self.cursor.advance()?;
        if std::mem::discriminant(&tok.kind) == std::mem::discriminant(&kind) {
            Ok(tok)
        } else {
            Err(self.error(
                ErrorCode::E1000,
                format!("expected {}, found {}", kind.describe(), tok.kind.describe()),
                tok.location,
            ))
        }
    }

    fn skip_newlines(&mut self) -> Result<(), ErrorRecord> {
        while matches!(self.cursor.peek()?.kind, TokenKind::Newline) {
            self.cursor.advance()?;
        }
        Ok(())
    }

    fn ident_text(&self, tok: &Token) -> Result<Identifier, ErrorRecord> {
        match &tok.kind {
            TokenKind::Ident(name) | TokenKind::BacktickIdent(name) => Ok(self.resolve(*name)),
            other => Err(self.error(
                ErrorCode::E1000,
                format!("expected identifier, found {}", other.describe()),
                tok.location,
            )),
        }
    }

    fn parse_qualified_name(&mut self) -> Result<QualifiedName, ErrorRecord> {
        let first = self.cursor.advance()?;
        let mut parts = vec![self.ident_text(&first)?];
        while matches!(self.cursor.peek()?.kind, TokenKind::Dot) {
            self.cursor.advance()?;
            let tok = self.cursor.advance()?;
            parts.push(self.ident_text(&tok)?);
        }
        Ok(QualifiedName::new(parts))
    }

    /// Invokes the constructor registry on a freshly built `ConstructorNamed`
    /// / `ConstructorTuple` value (spec.md §4.3 "Resolution invocation").
    /// Any constructor nested inside it was already resolved when it was
    /// individually parsed, so this only ever needs to act on the outermost
    /// node.
    fn resolve_value(&self, value: sd2_ir::Value) -> Result<sd2_ir::Value, ErrorRecord> {
        match &self.registry {
            None => Ok(value),
            Some(registry) => sd2_registry::resolve_constructor(registry, self.unknown_policy, value),
        }
    }
}
