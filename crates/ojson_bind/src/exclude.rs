use ojson_reflect::info::ResolvedType;

use crate::catalog::FieldDescriptor;

// -----------------------------------------------------------------------------
// ExclusionStrategy

/// A veto over fields or whole types.
///
/// Strategies compose by disjunction and run once per field, when a type's
/// catalog entry is built, not per object instance. Both methods default to
/// "keep", so an implementation overrides only the side it cares about.
pub trait ExclusionStrategy: Send + Sync {
    /// Whether this field should be dropped from conversion.
    fn skip_field(&self, field: &FieldDescriptor) -> bool {
        let _ = field;
        false
    }

    /// Whether every field of this type should be dropped.
    fn skip_type(&self, ty: &ResolvedType) -> bool {
        let _ = ty;
        false
    }
}

// -----------------------------------------------------------------------------
// Engine-default strategies

/// Drops fields carrying the explicit skip mark.
pub(crate) struct SkipMarked;

impl ExclusionStrategy for SkipMarked {
    fn skip_field(&self, field: &FieldDescriptor) -> bool {
        field.template().is_skip()
    }
}

/// Drops compiler-mandated marker fields (`PhantomData` and friends).
pub(crate) struct SyntheticFields;

impl ExclusionStrategy for SyntheticFields {
    fn skip_field(&self, field: &FieldDescriptor) -> bool {
        field.template().is_synthetic()
    }
}

/// Drops fields outside the engine's pinned schema version.
///
/// A field with `since(s)` exists from version `s` on; one with `until(u)`
/// stops existing at version `u`.
pub(crate) struct VersionRange {
    pub(crate) version: f64,
}

impl ExclusionStrategy for VersionRange {
    fn skip_field(&self, field: &FieldDescriptor) -> bool {
        let template = field.template();
        if let Some(since) = template.version_since() {
            if self.version < since {
                return true;
            }
        }
        if let Some(until) = template.version_until() {
            if self.version >= until {
                return true;
            }
        }
        false
    }
}

/// Drops every field not explicitly marked exposed.
pub(crate) struct ExposedOnly;

impl ExclusionStrategy for ExposedOnly {
    fn skip_field(&self, field: &FieldDescriptor) -> bool {
        !field.template().is_exposed()
    }
}
