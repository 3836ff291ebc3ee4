//! The type algebra: closing declared types and narrowing to runtime types.

use ojson_reflect::Reflect;
use ojson_reflect::info::{DeclaredType, ResolvedType};

// -----------------------------------------------------------------------------
// resolve

/// Closes a field's declared type against the declaring instantiation.
///
/// `Param(i)` takes the `i`-th argument of `context`. When the context cannot
/// supply the binding (the caller discarded type information, or the index
/// is out of range) the result is the unresolved stand-in rather than an
/// error; encoding recovers through narrowing, decoding reports the missing
/// information at its use site.
///
/// Flattened embeddings re-run this per level: the embedded context is itself
/// resolved first, so a variable bound several levels up is substituted
/// through the chain.
pub fn resolve(declared: &DeclaredType, context: &ResolvedType) -> ResolvedType {
    match declared {
        DeclaredType::Concrete(resolve) => resolve(),
        DeclaredType::Param(index) => match context.arg(*index as usize) {
            Some(arg) => arg.clone(),
            None => ResolvedType::unresolved(),
        },
        DeclaredType::Dyn => ResolvedType::unresolved(),
    }
}

// -----------------------------------------------------------------------------
// narrow

/// Replaces a declared type with the value's runtime type when the declared
/// type says less.
///
/// A declared type that is unresolved (or simply wrong about the value)
/// imposes no constraint; the value's own instantiation is the more specific
/// description. Callers on a preserve-exact-type path skip this entirely.
pub fn narrow(declared: &ResolvedType, value: &dyn Reflect) -> ResolvedType {
    if declared.is_unresolved() || declared.id() != value.ty_id() {
        value.resolved_type()
    } else {
        declared.clone()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{narrow, resolve};
    use ojson_reflect::Reflect;
    use ojson_reflect::info::{DeclaredType, ResolvedType};

    #[test]
    fn params_bind_through_the_context() {
        let context = ResolvedType::of::<Vec<String>>();
        let resolved = resolve(&DeclaredType::Param(0), &context);
        assert!(resolved.is::<String>());
    }

    #[test]
    fn missing_bindings_fall_back_leniently() {
        let context = ResolvedType::of::<u32>();
        assert!(resolve(&DeclaredType::Param(2), &context).is_unresolved());
        assert!(resolve(&DeclaredType::Dyn, &context).is_unresolved());
    }

    #[test]
    fn narrowing_recovers_the_runtime_type() {
        let value = "hello".to_string();
        let narrowed = narrow(&ResolvedType::unresolved(), value.as_reflect());
        assert!(narrowed.is::<String>());

        // A closed declared type that already matches is kept as-is.
        let kept = narrow(&ResolvedType::of::<String>(), value.as_reflect());
        assert!(kept.is::<String>());
    }
}
