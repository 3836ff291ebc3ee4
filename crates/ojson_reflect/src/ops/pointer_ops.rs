use crate::Reflect;

// -----------------------------------------------------------------------------
// Pointer trait

/// Type-erased access to a smart pointer's target.
///
/// Conversion passes through pointers transparently: the document shape of a
/// pointer is the shape of its target. Shared pointers cannot always hand out
/// mutable access, so [`target_mut`](Self::target_mut) is fallible; decoding
/// builds the target first and wraps it through the registry's
/// [`MetaPointer`](crate::registry::MetaPointer) instead.
pub trait Pointer: Reflect {
    /// Returns the pointed-to value.
    fn target(&self) -> &dyn Reflect;

    /// Returns the pointed-to value mutably, when the pointer is unique.
    fn target_mut(&mut self) -> Option<&mut dyn Reflect>;
}
