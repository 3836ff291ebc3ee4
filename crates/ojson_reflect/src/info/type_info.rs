use crate::info::struct_info::StructInfo;
use crate::info::{ResolvedType, Type, TypePath};
use crate::ops::ReflectKind;

// -----------------------------------------------------------------------------
// Typed

/// Static access to a type's reflection metadata.
///
/// Implemented together with [`Reflect`](crate::Reflect), normally through
/// [`reflect_struct!`](crate::reflect_struct) or the built-in impls. The
/// returned reference is built once per type (per instantiation for generic
/// families) and shared for the process lifetime.
pub trait Typed: TypePath {
    /// Returns the compiled metadata for this type.
    fn type_info() -> &'static TypeInfo;
}

/// Object-safe mirror of [`Typed`].
pub trait DynamicTyped {
    /// See [`Typed::type_info`].
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compiled metadata for one reflected type, tagged by structural shape.
#[derive(Debug)]
pub enum TypeInfo {
    Struct(StructInfo),
    List(ListInfo),
    Option(OptionInfo),
    Pointer(PointerInfo),
    Opaque(OpaqueInfo),
}

impl TypeInfo {
    /// The type identity this metadata describes.
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Struct(info) => info.ty(),
            Self::List(info) => &info.ty,
            Self::Option(info) => &info.ty,
            Self::Pointer(info) => &info.ty,
            Self::Opaque(info) => &info.ty,
        }
    }

    /// The structural kind of the described type.
    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::List(_) => ReflectKind::List,
            Self::Option(_) => ReflectKind::Option,
            Self::Pointer(_) => ReflectKind::Pointer,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }

    /// Builds the closed descriptor of the described type.
    pub fn resolved(&self) -> ResolvedType {
        match self {
            Self::Struct(info) => info.resolved(),
            Self::List(info) => ResolvedType::sequence(info.ty, (info.item)()),
            Self::Option(info) => ResolvedType::with_args(info.ty, [(info.payload)()]),
            Self::Pointer(info) => ResolvedType::with_args(info.ty, [(info.target)()]),
            Self::Opaque(info) => ResolvedType::plain(info.ty),
        }
    }

    pub const fn as_struct(&self) -> Option<&StructInfo> {
        match self {
            Self::Struct(info) => Some(info),
            _ => None,
        }
    }

    pub const fn as_list(&self) -> Option<&ListInfo> {
        match self {
            Self::List(info) => Some(info),
            _ => None,
        }
    }

    pub const fn as_option(&self) -> Option<&OptionInfo> {
        match self {
            Self::Option(info) => Some(info),
            _ => None,
        }
    }

    pub const fn as_pointer(&self) -> Option<&PointerInfo> {
        match self {
            Self::Pointer(info) => Some(info),
            _ => None,
        }
    }

    pub const fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }
}

// -----------------------------------------------------------------------------
// Shape infos

/// Metadata for a growable sequence type.
#[derive(Debug)]
pub struct ListInfo {
    ty: Type,
    // Built on first access; the function pointer defers the element's info.
    item: fn() -> ResolvedType,
}

impl ListInfo {
    /// Describes list type `L` holding elements of type `I`.
    pub fn new<L: TypePath, I: Typed>() -> Self {
        Self {
            ty: Type::of::<L>(),
            item: ResolvedType::of::<I>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// The element type.
    #[inline]
    pub fn item(&self) -> ResolvedType {
        (self.item)()
    }
}

/// Metadata for an optional container.
#[derive(Debug)]
pub struct OptionInfo {
    ty: Type,
    payload: fn() -> ResolvedType,
}

impl OptionInfo {
    /// Describes optional type `O` holding a payload of type `P`.
    pub fn new<O: TypePath, P: Typed>() -> Self {
        Self {
            ty: Type::of::<O>(),
            payload: ResolvedType::of::<P>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// The payload type.
    #[inline]
    pub fn payload(&self) -> ResolvedType {
        (self.payload)()
    }
}

/// Metadata for a smart-pointer wrapper.
#[derive(Debug)]
pub struct PointerInfo {
    ty: Type,
    target: fn() -> ResolvedType,
}

impl PointerInfo {
    /// Describes pointer type `P` wrapping a target of type `T`.
    pub fn new<P: TypePath, T: Typed>() -> Self {
        Self {
            ty: Type::of::<P>(),
            target: ResolvedType::of::<T>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// The pointee type.
    #[inline]
    pub fn target(&self) -> ResolvedType {
        (self.target)()
    }
}

/// Metadata for a type with no reflected structure.
#[derive(Debug)]
pub struct OpaqueInfo {
    ty: Type,
}

impl OpaqueInfo {
    pub fn new<T: TypePath + ?Sized>() -> Self {
        Self {
            ty: Type::of::<T>(),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}
