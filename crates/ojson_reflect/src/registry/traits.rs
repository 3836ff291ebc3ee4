use crate::Reflect;
use crate::info::Typed;

// -----------------------------------------------------------------------------
// FromType

/// A capability that can be derived from a concrete type.
///
/// The standard way to build a [`TypeTrait`](crate::registry::TypeTrait)
/// entry: `<MetaDefault as FromType<String>>::from_type()` captures
/// `String`-specific function pointers into a type-erased struct.
pub trait FromType<T> {
    fn from_type() -> Self;
}

// -----------------------------------------------------------------------------
// MetaDefault

/// Per-type no-argument construction.
///
/// The decoding side's constructor analogue: when no instance creator is
/// registered for a type, the engine falls back to this entry from the
/// registry.
///
/// # Examples
///
/// ```
/// use ojson_reflect::registry::{FromType, MetaDefault};
///
/// let ctor = <MetaDefault as FromType<Vec<u8>>>::from_type();
/// assert!(ctor.construct().take::<Vec<u8>>().unwrap().is_empty());
/// ```
#[derive(Clone)]
pub struct MetaDefault {
    func: fn() -> Box<dyn Reflect>,
}

impl MetaDefault {
    /// Builds a fresh default value of the bound type.
    #[inline(always)]
    pub fn construct(&self) -> Box<dyn Reflect> {
        (self.func)()
    }
}

fn construct_default<T: Default + Reflect>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

impl<T: Default + Reflect + Typed> FromType<T> for MetaDefault {
    fn from_type() -> Self {
        Self {
            func: construct_default::<T>,
        }
    }
}

// -----------------------------------------------------------------------------
// MetaPointer

/// Per-type smart-pointer wrapping.
///
/// Decoding builds a pointer's target first, then wraps it through this
/// entry; that avoids demanding mutable access to a shared pointer that was
/// never unique. The wrapped box must hold exactly the target type, otherwise
/// it is handed back unchanged.
#[derive(Clone)]
pub struct MetaPointer {
    wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl MetaPointer {
    /// Creates the capability from a wrapping function.
    ///
    /// Pointer impls supply this through their `FromType` implementations;
    /// see `ojson_reflect::impls`.
    #[inline]
    pub const fn from_fn(
        wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
    ) -> Self {
        Self { wrap }
    }

    /// Wraps a target value into the bound pointer type.
    #[inline(always)]
    pub fn wrap(&self, target: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(target)
    }
}
