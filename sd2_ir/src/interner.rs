//! Single-threaded string interner.
//!
//! A `Reader` owns exactly one source and is never shared across threads (see
//! the crate-level concurrency notes), so this interner has none of the sharding
//! or locking a concurrent-compilation interner needs — it's a plain
//! `FxHashMap` plus a backing `Vec`.

use rustc_hash::FxHashMap;

/// An interned string, scoped to the [`StringInterner`] that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string; always index 0 in a fresh interner.
    pub const EMPTY: Name = Name(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interns strings into small `Name` handles, deduplicating by content.
#[derive(Debug, Default)]
pub struct StringInterner {
    map: FxHashMap<Box<str>, u32>,
    strings: Vec<Box<str>>,
}

impl StringInterner {
    pub fn new() -> Self {
        let mut interner = StringInterner {
            map: FxHashMap::default(),
            strings: Vec::new(),
        };
        let empty = interner.intern("");
        debug_assert_eq!(empty, Name::EMPTY);
        interner
    }

    /// Intern `text`, returning its handle. Interning the same content twice
    /// returns the same handle.
    pub fn intern(&mut self, text: &str) -> Name {
        if let Some(&idx) = self.map.get(text) {
            return Name(idx);
        }
        let idx = self.strings.len() as u32;
        let boxed: Box<str> = text.into();
        self.map.insert(boxed.clone(), idx);
        self.strings.push(boxed);
        Name(idx)
    }

    /// Resolve a handle back to its string content.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    pub fn resolve(&self, name: Name) -> &str {
        &self.strings[name.index()]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
