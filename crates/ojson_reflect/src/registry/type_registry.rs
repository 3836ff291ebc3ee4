use core::any::TypeId;

use hashbrown::HashMap;

use crate::info::TypeInfo;
use crate::registry::{GetTypeMeta, TypeMeta, TypeTrait};
use crate::typeid_map::TypeIdMap;

// -----------------------------------------------------------------------------
// TypeRegistry

/// The central store of registered type metadata.
///
/// Registering a type creates its [`TypeMeta`] from the type's
/// [`GetTypeMeta`] implementation and indexes it by [`TypeId`] and by full
/// type path. The binding engine reads the registry on every decode to find
/// field templates, constructors and pointer wrappers.
///
/// # Examples
///
/// ```
/// use ojson_reflect::registry::{MetaDefault, TypeRegistry};
///
/// let registry = TypeRegistry::new();
///
/// let meta = registry.get_with_type_path("alloc::string::String").unwrap();
/// let ctor = meta.get_trait::<MetaDefault>().unwrap();
/// assert_eq!(ctor.construct().take::<String>().unwrap(), "");
/// ```
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::new(),
        }
    }

    /// Creates a registry pre-populated with the primitive types:
    /// `bool`, `char`, the integer types up to 64 bits, `f32`/`f64` and
    /// `String`.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry
    }

    // Inserts the meta before dependencies are visited, so recursive types
    // terminate.
    fn register_internal(&mut self, type_id: TypeId, get_type_meta: impl FnOnce() -> TypeMeta) -> bool {
        self.type_meta_table.try_insert(type_id, || {
            let meta = get_type_meta();
            self.type_path_to_id.insert(meta.ty().path(), type_id);
            meta
        })
    }

    /// Registers `T` if it has not been registered already, along with its
    /// type dependencies (its fields, element type, payload type, …).
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.register_internal(TypeId::of::<T>(), T::get_type_meta) {
            T::register_dependencies(self);
        }
    }

    /// Inserts or overwrites a prepared [`TypeMeta`].
    ///
    /// Does not register dependencies; use [`register`](Self::register) for
    /// that.
    pub fn insert_type_meta(&mut self, type_meta: TypeMeta) {
        self.type_path_to_id
            .insert(type_meta.ty().path(), type_meta.type_id());
        self.type_meta_table
            .insert(type_meta.type_id(), type_meta);
    }

    /// Whether the type with the given [`TypeId`] has been registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    /// Returns the [`TypeMeta`] registered for `type_id`, if any.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    /// Returns the [`TypeMeta`] registered for `type_id` mutably, if any.
    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        self.type_meta_table.get_mut(&type_id)
    }

    /// Returns the [`TypeMeta`] registered under the given full type path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns the capability `T` registered for `type_id`, if present.
    pub fn get_type_trait<T: TypeTrait>(&self, type_id: TypeId) -> Option<&T> {
        match self.get(type_id) {
            Some(type_meta) => type_meta.get_trait::<T>(),
            None => None,
        }
    }

    /// Returns the [`TypeInfo`] registered for `type_id`, if any.
    pub fn get_type_info(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.get(type_id).map(TypeMeta::type_info)
    }

    /// Iterates the registered metas in arbitrary order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

use std::sync::{Arc, PoisonError};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared, lock-guarded [`TypeRegistry`] handle.
///
/// The registry is read-mostly process-wide state: many conversions read it
/// concurrently while registration writes are rare. Lock poisoning is
/// ignored; the registry is append-only so a panicked writer cannot leave it
/// half-formed in a way readers would observe.
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Wraps a prepared registry.
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// Takes a read lock on the underlying registry.
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying registry.
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set()
            .entries(self.read().type_path_to_id.keys())
            .finish()
    }
}
