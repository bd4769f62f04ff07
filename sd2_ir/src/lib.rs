//! SD2 IR - core data types shared across the streaming parser core.
//!
//! This crate contains the types every other `sd2_*` crate builds on:
//! - [`Location`] for source positions
//! - [`Name`]/[`StringInterner`] for interned identifier text
//! - [`Token`]/[`TokenKind`] for lexer output
//! - [`Identifier`]/[`QualifiedName`]/[`TypeExpr`]/[`Qualifier`]/[`Annotation`]
//!   for header-level grammar types
//! - [`Value`] for the materialized attribute value tree
//! - [`Event`] for the parser's document event stream

mod event;
mod interner;
mod location;
mod qualified;
mod token;
mod value;

pub use event::Event;
pub use interner::{Name, StringInterner};
pub use location::Location;
pub use qualified::{Annotation, Identifier, Qualifier, QualifiedName, TypeExpr};
pub use token::{Token, TokenKind};
pub use value::{Payload, Value};
