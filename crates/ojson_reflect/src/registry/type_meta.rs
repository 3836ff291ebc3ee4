use core::any::{Any, TypeId};
use core::ops::{Deref, DerefMut};

use crate::info::{Type, TypeInfo, Typed};
use crate::registry::TypeRegistry;
use crate::typeid_map::TypeIdMap;

// -----------------------------------------------------------------------------
// TypeTrait

/// A per-type capability stored in a [`TypeMeta`]'s trait table.
///
/// Entries are plain cloneable structs holding function pointers bound to one
/// concrete type: see [`MetaDefault`](crate::registry::MetaDefault) and
/// [`MetaPointer`](crate::registry::MetaPointer).
pub trait TypeTrait: Any + Send + Sync {
    fn clone_type_trait(&self) -> Box<dyn TypeTrait>;
}

impl<T: Any + Send + Sync + Clone> TypeTrait for T {
    #[inline]
    fn clone_type_trait(&self) -> Box<dyn TypeTrait> {
        Box::new(self.clone())
    }
}

impl dyn TypeTrait {
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }
}

// -----------------------------------------------------------------------------
// TypeMeta

/// Runtime storage for one registered type: its [`TypeInfo`] plus a table of
/// [`TypeTrait`] capabilities.
///
/// # Examples
///
/// ```
/// use ojson_reflect::registry::{FromType, MetaDefault, TypeMeta};
///
/// let mut meta = TypeMeta::of::<String>();
/// meta.insert_trait(<MetaDefault as FromType<String>>::from_type());
///
/// let ctor = meta.get_trait::<MetaDefault>().unwrap();
/// assert_eq!(ctor.construct().take::<String>().unwrap(), "");
/// ```
pub struct TypeMeta {
    ty: Type,
    type_info: &'static TypeInfo,
    trait_table: TypeIdMap<Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// Creates an empty `TypeMeta` for `T`.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        let type_info = T::type_info();
        Self {
            ty: *type_info.ty(),
            type_info,
            trait_table: TypeIdMap::new(),
        }
    }

    #[inline(always)]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    /// Inserts a capability, replacing any previous entry of the same type.
    #[inline]
    pub fn insert_trait<T: TypeTrait>(&mut self, data: T) {
        self.trait_table.insert(TypeId::of::<T>(), Box::new(data));
    }

    /// Returns the capability of type `T`, if present.
    #[inline]
    pub fn get_trait<T: TypeTrait>(&self) -> Option<&T> {
        self.trait_table
            .get(&TypeId::of::<T>())
            .map(Deref::deref)
            .and_then(<dyn TypeTrait>::downcast_ref)
    }

    /// Returns the capability of type `T` mutably, if present.
    #[inline]
    pub fn get_trait_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        self.trait_table
            .get_mut(&TypeId::of::<T>())
            .map(DerefMut::deref_mut)
            .and_then(<dyn TypeTrait>::downcast_mut)
    }

    /// Whether a capability of type `T` is present.
    #[inline]
    pub fn has_trait<T: TypeTrait>(&self) -> bool {
        self.trait_table.contains(&TypeId::of::<T>())
    }
}

impl Clone for TypeMeta {
    fn clone(&self) -> Self {
        let mut trait_table = TypeIdMap::with_capacity(self.trait_table.len());
        for (id, type_trait) in self.trait_table.iter() {
            trait_table.insert(*id, (**type_trait).clone_type_trait());
        }
        Self {
            ty: self.ty,
            type_info: self.type_info,
            trait_table,
        }
    }
}

impl core::fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeMeta").field("ty", &self.ty).finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// A type that can describe its own registration.
///
/// Implemented by [`reflect_struct!`](crate::reflect_struct) and the built-in
/// impls. `register_dependencies` pulls in the types a registration needs to
/// be usable: typically every field type.
pub trait GetTypeMeta: Typed {
    /// Returns the default [`TypeMeta`] for this type.
    fn get_type_meta() -> TypeMeta;

    /// Registers other types needed by this type. Need not register `Self`.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
