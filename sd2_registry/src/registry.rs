//! Constructor lookup and resolution (spec.md §4.3 "Registry contract" and
//! "Resolution invocation").

use crate::call::{ConstructorCall, ConstructorContext, ConstructorHandler};
use rustc_hash::FxHashMap;
use sd2_diagnostic::{ErrorCode, ErrorRecord};
use sd2_ir::{Location, QualifiedName, Value};

/// What happens when a constructor name has no registered handler.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum UnknownConstructorPolicy {
    /// Leave the value as the raw `ConstructorNamed`/`ConstructorTuple` it
    /// already is.
    #[default]
    KeepRaw,
    /// Raise E5001.
    Error,
}

struct Entry {
    type_tag: QualifiedName,
    handler: Box<dyn ConstructorHandler>,
}

/// Maps constructor names to handlers. Lookup compares the dotted path
/// component-by-component, case-sensitive, per spec.md §4.3.
///
/// Single-threaded: a `Reader` never crosses a thread boundary (spec.md
/// §5), so unlike a registry meant to be shared across worker threads this
/// one carries no `Arc`/`Send`/`Sync` machinery — handlers are owned
/// outright by the registry that holds them.
#[derive(Default)]
pub struct ConstructorRegistry {
    handlers: FxHashMap<Vec<String>, Entry>,
}

impl ConstructorRegistry {
    /// A registry with no handlers registered; every constructor name falls
    /// through to `unknownConstructorPolicy`.
    pub fn empty() -> Self {
        ConstructorRegistry {
            handlers: FxHashMap::default(),
        }
    }

    /// The default registry described in spec.md §4.3: `date`, `time`,
    /// `instant`, `duration`, `period`, each tagged `temporal.<name>`.
    pub fn temporal() -> Self {
        let mut registry = ConstructorRegistry::empty();
        crate::temporal::register_all(&mut registry);
        registry
    }

    /// Registers `handler` under `name`, tagging the `Object` values it
    /// produces with `type_tag`. Replaces any handler already registered
    /// under `name`.
    pub fn register(
        &mut self,
        name: QualifiedName,
        type_tag: QualifiedName,
        handler: impl ConstructorHandler + 'static,
    ) {
        self.handlers.insert(
            name.parts().to_vec(),
            Entry {
                type_tag,
                handler: Box::new(handler),
            },
        );
    }

    pub fn handler_for(&self, name: &QualifiedName) -> Option<(&QualifiedName, &dyn ConstructorHandler)> {
        self.handlers
            .get(name.parts())
            .map(|entry| (&entry.type_tag, entry.handler.as_ref()))
    }
}

/// Resolves a single value, per spec.md §4.3's "Resolution invocation":
/// only `ConstructorNamed`/`ConstructorTuple` are acted on; everything else,
/// including an already-`Object` value, is returned unchanged — which is
/// exactly what makes `resolve(resolve(v)) == resolve(v)` hold (spec.md §8).
pub fn resolve_constructor(
    registry: &ConstructorRegistry,
    policy: UnknownConstructorPolicy,
    value: Value,
) -> Result<Value, ErrorRecord> {
    let (name, args, attrs, location) = match value {
        Value::ConstructorTuple(name, args, location) => (name, args, Vec::new(), location),
        Value::ConstructorNamed(name, attrs, location) => (name, Vec::new(), attrs, location),
        other => return Ok(other),
    };

    match registry.handler_for(&name) {
        None => {
            tracing::trace!(constructor = %name, "no handler registered");
            match policy {
                UnknownConstructorPolicy::KeepRaw => Ok(if attrs.is_empty() {
                    Value::ConstructorTuple(name, args, location)
                } else {
                    Value::ConstructorNamed(name, attrs, location)
                }),
                UnknownConstructorPolicy::Error => Err(ErrorRecord::new(
                    ErrorCode::E5001,
                    format!("unknown constructor `{name}`"),
                    location,
                )),
            }
        }
        Some((type_tag, handler)) => {
            tracing::debug!(constructor = %name, type_tag = %type_tag, "dispatching to constructor handler");
            let type_tag = type_tag.clone();
            let call = ConstructorCall {
                name,
                args,
                attrs,
                location,
            };
            let mut ctx = ResolverContext {
                registry,
                policy,
                location,
            };
            let payload = handler.call(&call, &mut ctx)?;
            Ok(Value::Object(type_tag, payload, location))
        }
    }
}

struct ResolverContext<'a> {
    registry: &'a ConstructorRegistry,
    policy: UnknownConstructorPolicy,
    location: Location,
}

impl ConstructorContext for ResolverContext<'_> {
    fn resolve(&mut self, value: Value) -> Result<Value, ErrorRecord> {
        resolve_constructor(self.registry, self.policy, value)
    }

    fn error(&self, code: ErrorCode, message: &str, at: Option<Location>) -> ErrorRecord {
        ErrorRecord::new(code, message, at.unwrap_or(self.location))
    }
}
