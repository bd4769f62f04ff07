//! Identifiers, qualified names, type expressions, qualifiers, and annotations.

use std::fmt;

/// A non-empty identifier. Simple identifiers match `[A-Za-z_][A-Za-z0-9_-]*`;
/// backtick identifiers are arbitrary text excluding backtick and newline.
///
/// The reserved words `true`/`false`/`null` may only appear as an `Identifier`
/// when they were written with backticks in the source — the lexer is what
/// enforces that distinction, not this type.
pub type Identifier = String;

/// An ordered, dotted sequence of identifiers: `a.b.c`.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct QualifiedName(pub Vec<Identifier>);

impl QualifiedName {
    /// # Panics
    /// Panics if `parts` is empty — a `QualifiedName` always has at least one
    /// component.
    pub fn new(parts: Vec<Identifier>) -> Self {
        assert!(!parts.is_empty(), "QualifiedName must have >= 1 component");
        QualifiedName(parts)
    }

    pub fn single(ident: impl Into<Identifier>) -> Self {
        QualifiedName(vec![ident.into()])
    }

    pub fn parts(&self) -> &[Identifier] {
        &self.0
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// A qualified name plus an ordered sequence of nested generic-argument type
/// expressions: `Map<String, List<Int>>`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeExpr {
    pub name: QualifiedName,
    pub args: Vec<TypeExpr>,
}

impl TypeExpr {
    pub fn simple(name: QualifiedName) -> Self {
        TypeExpr {
            name,
            args: Vec::new(),
        }
    }
}

/// An element-header modifier: a plain identifier name with one or more
/// qualified-name arguments. A qualifier with no arguments is a parse error
/// (E2101), so `args` is guaranteed non-empty by construction.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Qualifier {
    pub name: Identifier,
    pub args: Vec<QualifiedName>,
}

/// A `#[...]`/`#![...]` annotation: a qualified name plus the opaque, balanced
/// argument text captured from the originating parenthesized region, if any.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Annotation {
    pub name: QualifiedName,
    pub args_text: Option<String>,
}
