use crate::Reflect;

// -----------------------------------------------------------------------------
// Struct trait

/// Type-erased access to a value with named fields.
///
/// Field names here are source names; any document-key policy is applied
/// upstream. The set of fields and their declared types live in the type's
/// [`StructInfo`](crate::info::StructInfo); this trait only reaches into a
/// live value.
///
/// # Examples
///
/// ```
/// use ojson_reflect::reflect_struct;
/// use ojson_reflect::ops::Struct;
///
/// reflect_struct! {
///     #[derive(Default)]
///     pub struct Probe {
///         pub answer: u32,
///     }
/// }
///
/// let probe = Probe { answer: 42 };
/// let as_struct: &dyn Struct = &probe;
/// let field = as_struct.field("answer").unwrap();
/// assert_eq!(field.downcast_ref::<u32>(), Some(&42));
/// ```
pub trait Struct: Reflect {
    /// Returns the field named `name`, if it exists.
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    /// Returns the field named `name` mutably, if it exists.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    /// Returns the number of fields.
    fn field_len(&self) -> usize;
}

impl dyn Struct {
    /// Returns a typed reference to the field named `name`.
    ///
    /// `None` if the field does not exist or is not a `T`.
    #[inline]
    pub fn field_as<T: Reflect>(&self, name: &str) -> Option<&T> {
        self.field(name).and_then(<dyn Reflect>::downcast_ref)
    }

    /// Returns a typed mutable reference to the field named `name`.
    ///
    /// `None` if the field does not exist or is not a `T`.
    #[inline]
    pub fn field_mut_as<T: Reflect>(&mut self, name: &str) -> Option<&mut T> {
        self.field_mut(name).and_then(<dyn Reflect>::downcast_mut)
    }
}
