//! Public facade for the SD2 streaming parser core.
//!
//! Wires a concrete [`CharSource`] (an in-memory UTF-16 string) to the
//! streaming [`Reader`] and re-exports the document model so a consumer
//! never has to depend on `sd2_ir`/`sd2_lexer`/`sd2_parse`/`sd2_registry`
//! directly.
//!
//! # Usage
//!
//! ```ignore
//! use sd2::{InMemorySource, Reader, ReaderConfig, Event};
//!
//! let source = InMemorySource::new("button \"OK\" { width = 80 }");
//! let mut reader = Reader::new(source, ReaderConfig::default());
//! loop {
//!     let event = reader.next();
//!     if let Event::EndDocument(_) = event {
//!         break;
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! sd2_ir, sd2_lexer_core, sd2_lexer, sd2_registry, sd2_parse
//!                          ↓
//!                        sd2  ← this crate
//! ```
//!
//! This crate intentionally stops at the in-process reader: CLI argument
//! parsing, file I/O, and a formatter/validator are out of scope (spec.md §1's
//! Non-goals).

mod source;

pub use source::InMemorySource;

pub use sd2_diagnostic::{ErrorCode, ErrorRecord};
pub use sd2_ir::{
    Annotation, Event, Identifier, Location, Payload, Qualifier, QualifiedName, TypeExpr, Value,
};
pub use sd2_lexer_core::CharSource;
pub use sd2_parse::{Reader, ReaderConfig};
pub use sd2_registry::{
    ConstructorCall, ConstructorContext, ConstructorHandler, ConstructorRegistry, Temporal,
    TemporalPayload, UnknownConstructorPolicy,
};

/// Convenience constructor for the common case of parsing a whole in-memory
/// string, skipping the [`InMemorySource::new`] step.
pub fn reader_for_str(source: &str, config: ReaderConfig) -> Reader<InMemorySource> {
    Reader::new(InMemorySource::new(source), config)
}
