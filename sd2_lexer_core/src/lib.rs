//! Low-level, pull-based character scanner.
//!
//! This crate provides a standalone tokenizer with **zero `sd2_*`
//! dependencies**. It is the "raw" half of the two-layer lexer:
//!
//! - **`sd2_lexer_core`** (this crate): decodes UTF-16 code units pulled from
//!   a [`CharSource`] and produces [`RawToken`]s. No keyword resolution, no
//!   escape decoding, no numeric parsing.
//! - **`sd2_lexer`**: cooks raw tokens into parser-ready `sd2_ir::Token`s —
//!   keyword classification, string/triple-string decoding, number parsing.
//!
//! Unlike a byte-slice tokenizer, there is no backing buffer to slice: the
//! source yields one UTF-16 code unit at a time, so [`Cursor`] decodes
//! characters (joining surrogate pairs) as it goes and [`RawToken`] carries
//! its text directly rather than a length into a buffer.

mod char_source;
mod cursor;
mod raw_location;
mod raw_scanner;
mod tag;

pub use char_source::CharSource;
pub use cursor::Cursor;
pub use raw_location::RawLocation;
pub use raw_scanner::RawScanner;
pub use tag::{RawTag, RawToken};
