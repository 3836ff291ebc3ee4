use std::sync::OnceLock;

use crate::Reflect;
use crate::info::{GenericPathCell, GenericTypeInfoCell};
use crate::info::{OptionInfo, TypeInfo, TypePath, Typed};
use crate::ops::Optional;
use crate::reflection::impl_reflect_cast_fn;
use crate::registry::{FromType, GetTypeMeta, MetaDefault, TypeMeta, TypeRegistry};

// -----------------------------------------------------------------------------
// Option

impl<T: Reflect + Typed> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| format!("core::option::Option<{}>", T::type_path()))
    }

    #[inline]
    fn family_path() -> &'static str {
        "core::option::Option"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Option"
    }
}

impl<T: Reflect + Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Option(OptionInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed> Reflect for Option<T> {
    impl_reflect_cast_fn!(Option);
}

impl<T: Reflect + Typed> Optional for Option<T> {
    #[inline]
    fn is_none(&self) -> bool {
        Option::is_none(self)
    }

    #[inline]
    fn get(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|value| value as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|value| value as &mut dyn Reflect)
    }

    #[inline]
    fn set_none(&mut self) {
        *self = None;
    }

    fn set_some(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = Some(value.take::<T>()?);
        Ok(())
    }
}

impl<T: Reflect + Typed + GetTypeMeta> GetTypeMeta for Option<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait(<MetaDefault as FromType<Self>>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// OnceLock

// A lazily-initialized field reads as an optional value; writable back-edges
// in shared object graphs are built this way (`cell.set(arc.clone())`).

impl<T: Reflect + Typed> TypePath for OnceLock<T> {
    fn type_path() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| format!("std::sync::OnceLock<{}>", T::type_path()))
    }

    #[inline]
    fn family_path() -> &'static str {
        "std::sync::OnceLock"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "OnceLock"
    }
}

impl<T: Reflect + Typed> Typed for OnceLock<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Option(OptionInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed> Reflect for OnceLock<T> {
    impl_reflect_cast_fn!(Option);
}

impl<T: Reflect + Typed> Optional for OnceLock<T> {
    #[inline]
    fn is_none(&self) -> bool {
        self.get().is_none()
    }

    #[inline]
    fn get(&self) -> Option<&dyn Reflect> {
        OnceLock::get(self).map(|value| value as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        OnceLock::get_mut(self).map(|value| value as &mut dyn Reflect)
    }

    #[inline]
    fn set_none(&mut self) {
        self.take();
    }

    fn set_some(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        let value = value.take::<T>()?;
        self.take();
        // Cannot race: an exclusive borrow is held.
        let _ = OnceLock::set(self, value);
        Ok(())
    }
}

impl<T: Reflect + Typed + GetTypeMeta> GetTypeMeta for OnceLock<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait(<MetaDefault as FromType<Self>>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}
