//! Constructor resolution (spec.md §4.3): turns a parsed `ConstructorNamed`/
//! `ConstructorTuple` value into an `Object` value by invoking a registered
//! handler, or leaves/rejects it per [`UnknownConstructorPolicy`] when no
//! handler is registered.
//!
//! A [`ConstructorRegistry`] is owned outright by whatever builds it (a
//! `Reader`, typically) — there is no sharing across threads to design for,
//! since a `Reader` never crosses a thread boundary (spec.md §5).

mod call;
mod registry;
mod temporal;

pub use call::{ConstructorCall, ConstructorContext, ConstructorHandler};
pub use registry::{resolve_constructor, ConstructorRegistry, UnknownConstructorPolicy};
pub use temporal::{Temporal, TemporalPayload};
