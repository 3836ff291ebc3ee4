use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{DynamicTypePath, DynamicTyped, ResolvedType};
use crate::ops::{ReflectKind, ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// The foundational trait for runtime-reflected values.
///
/// A `Reflect` value carries its own concrete type identity (including
/// generic arguments) and can be taken apart structurally by
/// [kind](ReflectKind). That is everything the binding engine needs: the
/// identity feeds type narrowing and handler lookup, the structural access
/// feeds reflective conversion.
///
/// Implement it through [`reflect_struct!`](crate::reflect_struct) for your
/// own structs; primitives, `String`, `Vec`, `Option`, `OnceLock`, `Box` and
/// `Arc` ship with implementations.
///
/// # Type identity
///
/// [`Any::type_id`] on a `Box<dyn Reflect>` names the box, not the value;
/// use [`ty_id`](Reflect::ty_id) (or deref first):
///
/// ```
/// use core::any::TypeId;
/// use ojson_reflect::Reflect;
///
/// let x: Box<dyn Reflect> = Box::new(32_i32);
/// assert_eq!(x.ty_id(), TypeId::of::<i32>());
/// ```
pub trait Reflect: DynamicTypePath + DynamicTyped + Send + Sync + Any {
    /// Casts this value to a fully-reflected one.
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this value to a mutable fully-reflected one.
    #[inline(always)]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this box to a boxed reflected value.
    #[inline(always)]
    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        self
    }

    /// The [`TypeId`] of the underlying value.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// The closed descriptor of the underlying value's concrete type.
    ///
    /// This is the "runtime class" query behind type narrowing: a value
    /// reached through a wider declared type still reports its own
    /// instantiation here.
    #[inline]
    fn resolved_type(&self) -> ResolvedType {
        self.reflect_type_info().resolved()
    }

    /// The structural kind of this value.
    fn reflect_kind(&self) -> ReflectKind;

    /// Dispatches this value by kind, immutably.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Dispatches this value by kind, mutably.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Replaces this value with `value`, which must be of exactly this type;
    /// an incompatible box is handed back unchanged.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;
}

impl dyn Reflect {
    /// Whether the underlying value is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the box, or hands it back when the value is not a `T`.
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            // The type was checked on the line above.
            Ok(<Box<dyn Any>>::downcast(self).unwrap_or_else(|_| unreachable!()))
        } else {
            Err(self)
        }
    }

    /// Downcasts and unboxes, or hands the box back when the value is not a
    /// `T`.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.reflect_type_path())
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

/// Implements the kind-cast methods plus `set` for one [`ReflectKind`].
macro_rules! impl_reflect_cast_fn {
    ($kind:ident) => {
        fn set(
            &mut self,
            value: ::std::boxed::Box<dyn $crate::Reflect>,
        ) -> Result<(), ::std::boxed::Box<dyn $crate::Reflect>> {
            *self = value.take::<Self>()?;
            Ok(())
        }

        #[inline]
        fn reflect_kind(&self) -> $crate::ops::ReflectKind {
            $crate::ops::ReflectKind::$kind
        }

        #[inline]
        fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
            $crate::ops::ReflectRef::$kind(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
            $crate::ops::ReflectMut::$kind(self)
        }
    };
}

pub(crate) use impl_reflect_cast_fn;
