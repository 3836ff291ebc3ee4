use core::marker::PhantomData;

use crate::info::{GenericPathCell, GenericTypeInfoCell, NonGenericTypeInfoCell};
use crate::info::{OpaqueInfo, TypeInfo, TypePath, Typed};
use crate::reflection::impl_reflect_cast_fn;
use crate::Reflect;
use crate::registry::{FromType, GetTypeMeta, MetaDefault, TypeMeta, TypeRegistry};

// -----------------------------------------------------------------------------
// Primitive impls

/// Implements the full reflection surface for a leaf type.
macro_rules! impl_reflect_opaque {
    ($ty:ty, $path:literal, $ident:literal) => {
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }
            #[inline]
            fn family_path() -> &'static str {
                $path
            }
            #[inline]
            fn type_ident() -> &'static str {
                $ident
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<$ty>()))
            }
        }

        impl Reflect for $ty {
            impl_reflect_cast_fn!(Opaque);
        }

        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait(<MetaDefault as FromType<Self>>::from_type());
                meta
            }
        }
    };
}

impl_reflect_opaque!(bool, "bool", "bool");
impl_reflect_opaque!(char, "char", "char");
impl_reflect_opaque!(u8, "u8", "u8");
impl_reflect_opaque!(u16, "u16", "u16");
impl_reflect_opaque!(u32, "u32", "u32");
impl_reflect_opaque!(u64, "u64", "u64");
impl_reflect_opaque!(usize, "usize", "usize");
impl_reflect_opaque!(i8, "i8", "i8");
impl_reflect_opaque!(i16, "i16", "i16");
impl_reflect_opaque!(i32, "i32", "i32");
impl_reflect_opaque!(i64, "i64", "i64");
impl_reflect_opaque!(isize, "isize", "isize");
impl_reflect_opaque!(f32, "f32", "f32");
impl_reflect_opaque!(f64, "f64", "f64");
impl_reflect_opaque!(String, "alloc::string::String", "String");

// -----------------------------------------------------------------------------
// PhantomData

// A `PhantomData` field is a compiler-mandated marker with no data meaning;
// struct registrations flag such fields synthetic, so the catalog drops them
// before traversal ever reaches this impl.

impl<T: TypePath + Send + Sync + ?Sized> TypePath for PhantomData<T> {
    fn type_path() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| format!("core::marker::PhantomData<{}>", T::type_path()))
    }

    #[inline]
    fn family_path() -> &'static str {
        "core::marker::PhantomData"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "PhantomData"
    }
}

impl<T: TypePath + Send + Sync + ?Sized> Typed for PhantomData<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
    }
}

impl<T: TypePath + Send + Sync + ?Sized> Reflect for PhantomData<T> {
    impl_reflect_cast_fn!(Opaque);
}

impl<T: TypePath + Send + Sync + ?Sized> GetTypeMeta for PhantomData<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait(<MetaDefault as FromType<Self>>::from_type());
        meta
    }

    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
