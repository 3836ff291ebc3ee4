use core::any::TypeId;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::info::TypeInfo;
use crate::typeid_map::TypeIdMap;

// -----------------------------------------------------------------------------
// Type info cells

/// One-time storage for the [`TypeInfo`] of a non-generic type.
///
/// Used as a `static` inside `Typed::type_info` so the info is built once and
/// handed out by `&'static` reference.
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    pub fn get_or_init(&'static self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        self.0.get_or_init(f)
    }
}

/// One-time storage for the [`TypeInfo`] of each instantiation of a generic
/// family.
///
/// A `static` inside a generic function is shared by every instantiation, so
/// the cell keys the built infos by [`TypeId`] and leaks each one to obtain a
/// `&'static` reference.
pub struct GenericTypeInfoCell(OnceLock<RwLock<TypeIdMap<&'static TypeInfo>>>);

impl GenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    pub fn get_or_insert<T: 'static>(
        &'static self,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        let map = self.0.get_or_init(|| RwLock::new(TypeIdMap::new()));
        let type_id = TypeId::of::<T>();

        if let Some(info) = map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return info;
        }

        let mut map = map.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(info) = map.get(&type_id) {
            return info;
        }
        let info: &'static TypeInfo = Box::leak(Box::new(f()));
        map.insert(type_id, info);
        info
    }
}

// -----------------------------------------------------------------------------
// Generic path cell

/// One-time storage for the leaked path strings of a generic family.
///
/// Same sharing caveat as [`GenericTypeInfoCell`]: keyed by the instantiation's
/// [`TypeId`], each built string is leaked once.
pub struct GenericPathCell(OnceLock<RwLock<TypeIdMap<&'static str>>>);

impl GenericPathCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    pub fn get_or_insert<T: 'static>(&'static self, f: impl FnOnce() -> String) -> &'static str {
        let map = self.0.get_or_init(|| RwLock::new(TypeIdMap::new()));
        let type_id = TypeId::of::<T>();

        if let Some(path) = map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return path;
        }

        let mut map = map.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(path) = map.get(&type_id) {
            return path;
        }
        let path: &'static str = Box::leak(f().into_boxed_str());
        map.insert(type_id, path);
        path
    }
}
