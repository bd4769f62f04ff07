//! The handler-facing API: what a constructor invocation looks like and what
//! a handler is allowed to do with it (spec.md §4.3 "Resolution invocation").

use sd2_diagnostic::{ErrorCode, ErrorRecord};
use sd2_ir::{Location, QualifiedName, Value};

/// A completed `ConstructorNamed`/`ConstructorTuple` value, handed to the
/// registered handler for its name.
pub struct ConstructorCall {
    pub name: QualifiedName,
    /// Positional arguments, non-empty only for tuple-form calls.
    pub args: Vec<Value>,
    /// Named arguments, non-empty only for named-form calls.
    pub attrs: Vec<(String, Value)>,
    pub location: Location,
}

/// What a handler can do besides inspect its call: recursively resolve a
/// nested value through the same registry, and build a located error.
///
/// Object-safe so handlers can be stored as `Box<dyn ConstructorHandler>`
/// without threading a type parameter through the registry.
pub trait ConstructorContext {
    /// Resolves `value` if it is a `ConstructorNamed`/`ConstructorTuple`;
    /// any other variant, including an already-`Object` value, passes
    /// through unchanged. Recurses through the same registry and policy the
    /// outer call was resolved with.
    fn resolve(&mut self, value: Value) -> Result<Value, ErrorRecord>;

    /// Builds an `ErrorRecord` at `at`, or at the call's own location if
    /// `at` is `None`.
    fn error(&self, code: ErrorCode, message: &str, at: Option<Location>) -> ErrorRecord;
}

/// A registered constructor handler: given the call and a context, produces
/// the opaque payload that becomes the `Object` value's content, or an
/// error.
///
/// Blanket-implemented for plain closures/fns so built-in and user handlers
/// can both be registered with `ConstructorRegistry::register` without a
/// dedicated struct per handler.
pub trait ConstructorHandler {
    fn call(
        &self,
        call: &ConstructorCall,
        ctx: &mut dyn ConstructorContext,
    ) -> Result<Box<dyn sd2_ir::Payload>, ErrorRecord>;
}

impl<F> ConstructorHandler for F
where
    F: Fn(&ConstructorCall, &mut dyn ConstructorContext) -> Result<Box<dyn sd2_ir::Payload>, ErrorRecord>,
{
    fn call(
        &self,
        call: &ConstructorCall,
        ctx: &mut dyn ConstructorContext,
    ) -> Result<Box<dyn sd2_ir::Payload>, ErrorRecord> {
        self(call, ctx)
    }
}

/// Fetches the call's single `String` argument, the shape every built-in
/// temporal handler expects. Any other arity or a non-string argument is a
/// shape failure (E3001), since spec.md §4.3 defines no other argument
/// shape for the default registry.
pub(crate) fn single_string_arg<'a>(
    call: &'a ConstructorCall,
    ctx: &dyn ConstructorContext,
) -> Result<&'a str, ErrorRecord> {
    match (call.args.as_slice(), call.attrs.as_slice()) {
        ([Value::String(s, _)], []) => Ok(s.as_str()),
        _ => Err(ctx.error(
            ErrorCode::E3001,
            &format!("`{}` expects a single string argument", call.name),
            None,
        )),
    }
}
