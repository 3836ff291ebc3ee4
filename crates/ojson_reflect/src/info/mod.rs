//! Type identity, type descriptors and compiled per-type metadata.

mod cell;
mod resolved;
mod struct_info;
mod ty;
mod type_info;

pub use cell::{GenericPathCell, GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use resolved::{DeclaredType, ResolvedType};
pub use struct_info::{FieldInfo, StructInfo, TypeParam};
pub use ty::{DynamicTypePath, Type, TypePath};
pub use type_info::{
    DynamicTyped, ListInfo, OpaqueInfo, OptionInfo, PointerInfo, TypeInfo, Typed,
};
