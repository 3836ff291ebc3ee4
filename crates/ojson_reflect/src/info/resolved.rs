use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::info::{Type, TypePath, Typed};

// -----------------------------------------------------------------------------
// ResolvedType

/// A closed type descriptor: a concrete type identity plus the structure of
/// its generic arguments and, for sequences, its element type.
///
/// A `ResolvedType` never contains type variables. Producing one from a
/// possibly-open declared type and a concrete declaring context is the type
/// algebra's job; everything downstream (field access, handler lookup,
/// instantiation) only ever sees closed descriptors.
///
/// The distinguished [`unresolved`](Self::unresolved) value stands in when
/// type information was discarded by the caller; it is a deliberate lenient
/// fallback, not an error.
///
/// # Examples
///
/// ```
/// use ojson_reflect::info::ResolvedType;
///
/// let ty = ResolvedType::of::<Vec<u32>>();
/// assert_eq!(ty.family(), "alloc::vec::Vec");
/// assert_eq!(ty.component().unwrap().path(), "u32");
/// ```
#[derive(Clone, Debug)]
pub struct ResolvedType {
    ty: Type,
    args: Box<[ResolvedType]>,
    component: Option<Box<ResolvedType>>,
}

/// Marker behind [`ResolvedType::unresolved`].
struct Unresolved;

impl TypePath for Unresolved {
    fn type_path() -> &'static str {
        "?"
    }
    fn family_path() -> &'static str {
        "?"
    }
    fn type_ident() -> &'static str {
        "?"
    }
}

impl ResolvedType {
    /// The descriptor of a concrete reflected type.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        T::type_info().resolved()
    }

    /// A descriptor with no generic structure.
    #[inline]
    pub fn plain(ty: Type) -> Self {
        Self {
            ty,
            args: Box::new([]),
            component: None,
        }
    }

    /// A descriptor carrying generic arguments.
    #[inline]
    pub fn with_args(ty: Type, args: impl Into<Box<[ResolvedType]>>) -> Self {
        Self {
            ty,
            args: args.into(),
            component: None,
        }
    }

    /// A sequence descriptor; the single argument doubles as the component.
    #[inline]
    pub fn sequence(ty: Type, component: ResolvedType) -> Self {
        Self {
            ty,
            args: Box::new([component.clone()]),
            component: Some(Box::new(component)),
        }
    }

    /// The lenient stand-in for discarded type information.
    #[inline]
    pub fn unresolved() -> Self {
        Self::plain(Type::of::<Unresolved>())
    }

    /// Whether this is the [`unresolved`](Self::unresolved) stand-in.
    #[inline]
    pub fn is_unresolved(&self) -> bool {
        self.ty.is::<Unresolved>()
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline]
    pub const fn path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline]
    pub const fn family(&self) -> &'static str {
        self.ty.family()
    }

    /// The generic arguments, in declaration order.
    #[inline]
    pub fn args(&self) -> &[ResolvedType] {
        &self.args
    }

    #[inline]
    pub fn arg(&self, index: usize) -> Option<&ResolvedType> {
        self.args.get(index)
    }

    /// The element type of a sequence, if this is one.
    #[inline]
    pub fn component(&self) -> Option<&ResolvedType> {
        self.component.as_deref()
    }

    /// Whether this descriptor identifies `T`.
    #[inline]
    pub fn is<T: TypePath + ?Sized>(&self) -> bool {
        self.ty.is::<T>()
    }
}

impl PartialEq for ResolvedType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        // Monomorphization makes the TypeId unique per instantiation.
        self.ty == other.ty
    }
}

impl Eq for ResolvedType {}

impl Hash for ResolvedType {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// -----------------------------------------------------------------------------
// DeclaredType

/// The statically declared type of a field: possibly open.
///
/// A declared type is closed against the declaring type's concrete arguments
/// by the type algebra before it is used for anything else.
#[derive(Clone)]
pub enum DeclaredType {
    /// Known in full at registration time.
    Concrete(fn() -> ResolvedType),
    /// The declaring type's generic parameter at this index.
    Param(u32),
    /// A trait-object field; only the runtime value can say more.
    Dyn,
}

impl DeclaredType {
    /// The declared form of a statically known type.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        Self::Concrete(ResolvedType::of::<T>)
    }
}

impl fmt::Debug for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(resolve) => write!(f, "Concrete({})", resolve()),
            Self::Param(index) => write!(f, "Param({index})"),
            Self::Dyn => f.write_str("Dyn"),
        }
    }
}
