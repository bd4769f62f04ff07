//! The document event stream produced by the parser (spec.md §3 "Event").

use crate::location::Location;
use crate::qualified::{Annotation, Identifier, Qualifier, QualifiedName, TypeExpr};
use crate::value::Value;

/// One event in the document stream. Every variant carries the [`Location`]
/// of the token that introduced it.
#[derive(Clone, Debug)]
pub enum Event {
    StartDocument(Location),
    EndDocument(Location),
    DocumentAnnotation {
        name: QualifiedName,
        args_text: Option<String>,
        location: Location,
    },
    StartElement {
        keyword: Identifier,
        id: Option<Identifier>,
        type_expr: Option<TypeExpr>,
        annotations: Vec<Annotation>,
        qualifiers: Vec<Qualifier>,
        location: Location,
    },
    EndElement(Location),
    StartNamespace {
        name: Identifier,
        location: Location,
    },
    EndNamespace(Location),
    Attribute {
        name: Identifier,
        value: Value,
        location: Location,
    },
}

impl Event {
    pub fn location(&self) -> Location {
        match self {
            Event::StartDocument(loc)
            | Event::EndDocument(loc)
            | Event::DocumentAnnotation { location: loc, .. }
            | Event::StartElement { location: loc, .. }
            | Event::EndElement(loc)
            | Event::StartNamespace { location: loc, .. }
            | Event::EndNamespace(loc)
            | Event::Attribute { location: loc, .. } => *loc,
        }
    }

    pub fn is_end_document(&self) -> bool {
        matches!(self, Event::EndDocument(_))
    }
}
