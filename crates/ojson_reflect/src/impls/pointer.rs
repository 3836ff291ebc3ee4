use std::sync::Arc;

use crate::Reflect;
use crate::info::{GenericPathCell, GenericTypeInfoCell};
use crate::info::{PointerInfo, TypeInfo, TypePath, Typed};
use crate::ops::Pointer;
use crate::reflection::impl_reflect_cast_fn;
use crate::registry::{FromType, GetTypeMeta, MetaPointer, TypeMeta, TypeRegistry};

// -----------------------------------------------------------------------------
// Box

impl<T: Reflect + Typed> TypePath for Box<T> {
    fn type_path() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| format!("alloc::boxed::Box<{}>", T::type_path()))
    }

    #[inline]
    fn family_path() -> &'static str {
        "alloc::boxed::Box"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Box"
    }
}

impl<T: Reflect + Typed> Typed for Box<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Pointer(PointerInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed> Reflect for Box<T> {
    impl_reflect_cast_fn!(Pointer);
}

impl<T: Reflect + Typed> Pointer for Box<T> {
    #[inline]
    fn target(&self) -> &dyn Reflect {
        &**self
    }

    #[inline]
    fn target_mut(&mut self) -> Option<&mut dyn Reflect> {
        Some(&mut **self)
    }
}

fn wrap_box<T: Reflect + Typed>(
    target: Box<dyn Reflect>,
) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    let target: Box<T> = Box::new(target.take::<T>()?);
    Ok(Box::new(target))
}

impl<T: Reflect + Typed> FromType<Box<T>> for MetaPointer {
    fn from_type() -> Self {
        Self::from_fn(wrap_box::<T>)
    }
}

impl<T: Reflect + Typed + GetTypeMeta> GetTypeMeta for Box<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait(<MetaPointer as FromType<Self>>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// Arc

// `Arc` is the shared pointer in reflected graphs (`Rc` is not `Send + Sync`
// and cannot appear behind `Reflect`). Back-references through `Arc` are what
// makes object graphs cyclic.

impl<T: Reflect + Typed> TypePath for Arc<T> {
    fn type_path() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| format!("alloc::sync::Arc<{}>", T::type_path()))
    }

    #[inline]
    fn family_path() -> &'static str {
        "alloc::sync::Arc"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Arc"
    }
}

impl<T: Reflect + Typed> Typed for Arc<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Pointer(PointerInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed> Reflect for Arc<T> {
    impl_reflect_cast_fn!(Pointer);
}

impl<T: Reflect + Typed> Pointer for Arc<T> {
    #[inline]
    fn target(&self) -> &dyn Reflect {
        &**self
    }

    #[inline]
    fn target_mut(&mut self) -> Option<&mut dyn Reflect> {
        Arc::get_mut(self).map(|target| target as &mut dyn Reflect)
    }
}

fn wrap_arc<T: Reflect + Typed>(
    target: Box<dyn Reflect>,
) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    let target: Arc<T> = Arc::new(target.take::<T>()?);
    Ok(Box::new(target))
}

impl<T: Reflect + Typed> FromType<Arc<T>> for MetaPointer {
    fn from_type() -> Self {
        Self::from_fn(wrap_arc::<T>)
    }
}

impl<T: Reflect + Typed + GetTypeMeta> GetTypeMeta for Arc<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait(<MetaPointer as FromType<Self>>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}
