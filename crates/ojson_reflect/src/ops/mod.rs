//! Type-erased structural operations, grouped by kind.

mod list_ops;
mod option_ops;
mod pointer_ops;
mod struct_ops;

pub use list_ops::List;
pub use option_ops::Optional;
pub use pointer_ops::Pointer;
pub use struct_ops::Struct;

use core::fmt;

use crate::Reflect;

// -----------------------------------------------------------------------------
// ReflectKind

/// The structural shape of a reflected type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    /// Named fields.
    Struct,
    /// A growable positional sequence.
    List,
    /// A present-or-absent container (`Option`, `OnceLock`).
    Option,
    /// A smart pointer delegating to its target.
    Pointer,
    /// No reflected structure; leaf types claimed by converters.
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Struct => "struct",
            Self::List => "list",
            Self::Option => "option",
            Self::Pointer => "pointer",
            Self::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

// -----------------------------------------------------------------------------
// ReflectRef / ReflectMut

/// An immutable reflected value, dispatched by kind.
pub enum ReflectRef<'a> {
    Struct(&'a dyn Struct),
    List(&'a dyn List),
    Option(&'a dyn Optional),
    Pointer(&'a dyn Pointer),
    Opaque(&'a dyn Reflect),
}

impl<'a> ReflectRef<'a> {
    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::List(_) => ReflectKind::List,
            Self::Option(_) => ReflectKind::Option,
            Self::Pointer(_) => ReflectKind::Pointer,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }

    pub const fn as_struct(&self) -> Option<&'a dyn Struct> {
        match self {
            Self::Struct(value) => Some(*value),
            _ => None,
        }
    }

    pub const fn as_list(&self) -> Option<&'a dyn List> {
        match self {
            Self::List(value) => Some(*value),
            _ => None,
        }
    }

    pub const fn as_option(&self) -> Option<&'a dyn Optional> {
        match self {
            Self::Option(value) => Some(*value),
            _ => None,
        }
    }

    pub const fn as_pointer(&self) -> Option<&'a dyn Pointer> {
        match self {
            Self::Pointer(value) => Some(*value),
            _ => None,
        }
    }
}

/// A mutable reflected value, dispatched by kind.
pub enum ReflectMut<'a> {
    Struct(&'a mut dyn Struct),
    List(&'a mut dyn List),
    Option(&'a mut dyn Optional),
    Pointer(&'a mut dyn Pointer),
    Opaque(&'a mut dyn Reflect),
}

impl<'a> ReflectMut<'a> {
    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::List(_) => ReflectKind::List,
            Self::Option(_) => ReflectKind::Option,
            Self::Pointer(_) => ReflectKind::Pointer,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }

    pub fn into_struct(self) -> Option<&'a mut dyn Struct> {
        match self {
            Self::Struct(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<&'a mut dyn List> {
        match self {
            Self::List(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<&'a mut dyn Optional> {
        match self {
            Self::Option(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_pointer(self) -> Option<&'a mut dyn Pointer> {
        match self {
            Self::Pointer(value) => Some(value),
            _ => None,
        }
    }
}
