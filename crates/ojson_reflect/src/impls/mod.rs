//! Reflection implementations for primitives and standard containers, plus
//! the [`reflect_struct!`](crate::reflect_struct) registration macro.

mod list;
mod macros;
mod opaque;
mod option;
mod pointer;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::info::{DeclaredType, ResolvedType, Typed};
    use crate::ops::{Optional, ReflectKind, Struct};
    use crate::registry::{MetaDefault, MetaPointer, TypeRegistry};
    use crate::{Reflect, reflect_struct};

    reflect_struct! {
        #[derive(Clone, Debug, Default, PartialEq)]
        struct Holder<T> {
            @param(0) inner: T,
            count: u32,
        }
    }

    #[test]
    fn generic_paths_distinguish_instantiations() {
        let a = <Holder<String>>::type_path();
        let b = <Holder<u32>>::type_path();
        assert!(a.starts_with("ojson_reflect::impls::tests::Holder<"));
        assert_ne!(a, b);
        assert_eq!(<Holder<String>>::family_path(), <Holder<u32>>::family_path());
    }

    #[test]
    fn struct_info_carries_open_templates_and_closed_args() {
        let info = <Holder<String>>::type_info().as_struct().unwrap();
        assert_eq!(info.generics().len(), 1);
        assert_eq!(info.generics()[0].name(), "T");
        assert!(info.generics()[0].arg().is::<String>());

        assert!(matches!(
            info.field("inner").unwrap().declared(),
            DeclaredType::Param(0)
        ));
        assert!(matches!(
            info.field("count").unwrap().declared(),
            DeclaredType::Concrete(_)
        ));
    }

    #[test]
    fn struct_field_access_by_name() {
        let mut holder = Holder {
            inner: "x".to_string(),
            count: 2,
        };
        assert_eq!(
            holder.field("inner").unwrap().downcast_ref::<String>(),
            Some(&"x".to_string())
        );

        let slot = holder.field_mut("count").unwrap();
        slot.set(Box::new(9_u32)).unwrap();
        assert_eq!(holder.count, 9);
    }

    #[test]
    fn registration_pulls_dependencies() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Holder<String>>();

        let ty = ResolvedType::of::<Holder<String>>();
        assert!(registry.contains(ty.id()));
        assert!(registry.contains(ResolvedType::of::<String>().id()));
        assert!(registry.contains(ResolvedType::of::<u32>().id()));

        let meta = registry.get(ty.id()).unwrap();
        let built = meta.get_trait::<MetaDefault>().unwrap().construct();
        assert_eq!(built.take::<Holder<String>>().unwrap(), Holder::default());
    }

    #[test]
    fn vec_reflects_as_list_with_component() {
        let ty = ResolvedType::of::<Vec<u32>>();
        assert_eq!(ty.family(), "alloc::vec::Vec");
        assert!(ty.component().unwrap().is::<u32>());

        let vec: Vec<u32> = vec![1, 2];
        assert_eq!(vec.reflect_kind(), ReflectKind::List);
    }

    #[test]
    fn option_ops_cover_both_states() {
        let mut value: Option<u32> = None;
        assert!(Optional::is_none(&value));
        value.set_some(Box::new(7_u32)).unwrap();
        assert_eq!(value, Some(7));
        assert!(value.set_some(Box::new("no".to_string())).is_err());
        value.set_none();
        assert_eq!(value, None);
    }

    #[test]
    fn pointer_meta_wraps_targets() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Arc<u32>>();

        let ty = ResolvedType::of::<Arc<u32>>();
        let wrap = registry.get(ty.id()).unwrap().get_trait::<MetaPointer>().unwrap();
        let arc = wrap.wrap(Box::new(5_u32)).unwrap();
        assert_eq!(*arc.take::<Arc<u32>>().unwrap(), 5_u32);
    }
}
