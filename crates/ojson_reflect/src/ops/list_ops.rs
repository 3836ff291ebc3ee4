use crate::Reflect;

// -----------------------------------------------------------------------------
// List trait

/// Type-erased access to a growable positional sequence.
///
/// Appending takes a boxed value of the exact element type; an incompatible
/// box is handed back to the caller unchanged.
pub trait List: Reflect {
    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns the element at `index`, if in bounds.
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    /// Returns the element at `index` mutably, if in bounds.
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Appends `value`, or returns it when it is not an element of this list's
    /// type.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Pre-sizes the sequence for `additional` more elements.
    fn reserve(&mut self, additional: usize);
}
