use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// TypePath

/// Static access to a type's stable names.
///
/// Unlike [`core::any::type_name`], these strings are part of the reflected
/// contract: they survive compiler versions and they distinguish a generic
/// family from its instantiations.
///
/// - [`type_path`](Self::type_path): full path including generic arguments,
///   e.g. `alloc::vec::Vec<u32>`. Unique per instantiation.
/// - [`family_path`](Self::family_path): full path without generic arguments,
///   e.g. `alloc::vec::Vec`. Shared by every instantiation of one family.
/// - [`type_ident`](Self::type_ident): the bare name, e.g. `Vec`.
///
/// None of the names carries a leading `::`.
pub trait TypePath: 'static {
    /// The unique full path of this type, generic arguments included.
    fn type_path() -> &'static str;

    /// The full path without generic arguments.
    fn family_path() -> &'static str;

    /// The bare type name.
    fn type_ident() -> &'static str;
}

/// Object-safe mirror of [`TypePath`].
pub trait DynamicTypePath {
    /// See [`TypePath::type_path`].
    fn reflect_type_path(&self) -> &'static str;

    /// See [`TypePath::family_path`].
    fn reflect_family_path(&self) -> &'static str;
}

impl<T: TypePath> DynamicTypePath for T {
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        T::type_path()
    }

    #[inline]
    fn reflect_family_path(&self) -> &'static str {
        T::family_path()
    }
}

// -----------------------------------------------------------------------------
// Type

/// The identity of one concrete type: its [`TypeId`] plus its stable names.
#[derive(Clone, Copy, Debug)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    family: &'static str,
    ident: &'static str,
}

impl Type {
    /// Captures the identity of `T`.
    pub fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: T::type_path(),
            family: T::family_path(),
            ident: T::type_ident(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[inline]
    pub const fn family(&self) -> &'static str {
        self.family
    }

    #[inline]
    pub const fn ident(&self) -> &'static str {
        self.ident
    }

    /// Whether this identity belongs to `T`.
    #[inline]
    pub fn is<T: TypePath + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}
