// -----------------------------------------------------------------------------
// reflect_struct!

/// Defines a struct together with its full reflection surface.
///
/// The macro emits the struct itself plus implementations of
/// [`TypePath`](crate::info::TypePath), [`Typed`](crate::info::Typed),
/// [`Reflect`](crate::Reflect), [`Struct`](crate::ops::Struct) and
/// [`GetTypeMeta`](crate::registry::GetTypeMeta). Registration requires
/// [`Default`] (the no-argument construction entry), so derive or implement
/// it.
///
/// # Field marks
///
/// A field may be prefixed with marks that shape its template:
///
/// - `@param(N)`: the field's declared type is the struct's generic
///   parameter `N` rather than the concrete type it happens to have in this
///   instantiation.
/// - `@flatten`: the field's own fields are inlined into this object.
/// - `@skip`: excluded from conversion.
/// - `@synthetic`: a compiler-mandated marker field (e.g. `PhantomData`).
/// - `@exposed`: opted in for exposure-only engines.
/// - `@since(1.0)` / `@until(2.0)`: version range (float literals).
///
/// # Limitations
///
/// Plain type parameters only: no lifetimes, const parameters, defaults or
/// `where` clauses.
///
/// # Examples
///
/// ```
/// use ojson_reflect::reflect_struct;
/// use ojson_reflect::info::{DeclaredType, Typed};
///
/// reflect_struct! {
///     #[derive(Clone, Debug, Default, PartialEq)]
///     pub struct Pair<T> {
///         @param(0) pub first: T,
///         @param(0) pub second: T,
///     }
/// }
///
/// let info = <Pair<String>>::type_info().as_struct().unwrap();
/// assert_eq!(info.generics()[0].arg().path(), "alloc::string::String");
/// assert!(matches!(info.field("first").unwrap().declared(), DeclaredType::Param(0)));
/// ```
#[macro_export]
macro_rules! reflect_struct {
    // Public entry. Captures the header and hands the raw field tokens to the
    // normalizer, which strips each field's `@`-marks before any `:vis` matcher
    // sees them (a `(literal)` mark argument sitting directly before `:vis` is a
    // local parsing ambiguity, since a visibility may itself begin with `(`).
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident $(< $($gen:ident),+ >)? {
            $($body:tt)*
        }
    ) => {
        $crate::reflect_struct! {
            @normalize
            { $(#[$attr])* $vis struct $name $(< $($gen),+ >)? }
            []
            $($body)*
        }
    };

    // Normalizer: no fields left — emit.
    (@normalize { $($hdr:tt)* } [ $($done:tt)* ]) => {
        $crate::reflect_struct! { @emit { $($hdr)* } [ $($done)* ] }
    };
    // Normalizer: swallow a stray separating comma.
    (@normalize { $($hdr:tt)* } [ $($done:tt)* ] , $($rest:tt)*) => {
        $crate::reflect_struct! { @normalize { $($hdr)* } [ $($done)* ] $($rest)* }
    };
    // Normalizer: a field remains — begin stripping its marks.
    (@normalize { $($hdr:tt)* } [ $($done:tt)* ] $($rest:tt)+) => {
        $crate::reflect_struct! { @field { $($hdr)* } [ $($done)* ] [] $($rest)+ }
    };

    // Field: strip a leading `@mark(arg)`.
    (@field { $($hdr:tt)* } [ $($done:tt)* ] [ $($marks:tt)* ]
        @ $mark:ident ( $markarg:literal ) $($rest:tt)*
    ) => {
        $crate::reflect_struct! {
            @field { $($hdr)* } [ $($done)* ] [ $($marks)* $mark ( $markarg ) ] $($rest)*
        }
    };
    // Field: strip a leading `@mark` with no argument.
    (@field { $($hdr:tt)* } [ $($done:tt)* ] [ $($marks:tt)* ]
        @ $mark:ident $($rest:tt)*
    ) => {
        $crate::reflect_struct! {
            @field { $($hdr)* } [ $($done)* ] [ $($marks)* $mark ] $($rest)*
        }
    };
    // Field: no marks left — parse `vis name : ty` (trailing comma).
    (@field { $($hdr:tt)* } [ $($done:tt)* ] [ $($marks:tt)* ]
        $fvis:vis $fname:ident : $fty:ty , $($rest:tt)*
    ) => {
        $crate::reflect_struct! {
            @normalize { $($hdr)* }
            [ $($done)* ( [ $($marks)* ] [ $fvis ] $fname [ $fty ] ) ]
            $($rest)*
        }
    };
    // Field: no marks left — parse `vis name : ty` (final field, no comma).
    (@field { $($hdr:tt)* } [ $($done:tt)* ] [ $($marks:tt)* ]
        $fvis:vis $fname:ident : $fty:ty
    ) => {
        $crate::reflect_struct! {
            @normalize { $($hdr)* }
            [ $($done)* ( [ $($marks)* ] [ $fvis ] $fname [ $fty ] ) ]
        }
    };

    // Emit: all fields normalized to `( [marks] [vis] name [ty] )`.
    (@emit
        { $(#[$attr:meta])* $vis:vis struct $name:ident $(< $($gen:ident),+ >)? }
        [ $( ( [ $($mark:tt)* ] [ $($fvis:tt)* ] $fname:ident [ $fty:ty ] ) )* ]
    ) => {
        $(#[$attr])*
        $vis struct $name $(< $($gen),+ >)? {
            $( $($fvis)* $fname : $fty, )*
        }

        impl $(< $($gen: $crate::Reflect
            + $crate::info::Typed
            + $crate::registry::GetTypeMeta),+ >)?
            $crate::info::TypePath for $name $(< $($gen),+ >)?
        {
            fn type_path() -> &'static str {
                static CELL: $crate::info::GenericPathCell = $crate::info::GenericPathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let mut path = ::std::string::String::new();
                    path.push_str(::core::module_path!());
                    path.push_str("::");
                    path.push_str(::core::stringify!($name));
                    $(
                        path.push('<');
                        let mut first = true;
                        $(
                            if !first {
                                path.push_str(", ");
                            }
                            first = false;
                            path.push_str(<$gen as $crate::info::TypePath>::type_path());
                        )+
                        path.push('>');
                    )?
                    path
                })
            }

            #[inline]
            fn family_path() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", ::core::stringify!($name))
            }

            #[inline]
            fn type_ident() -> &'static str {
                ::core::stringify!($name)
            }
        }

        impl $(< $($gen: $crate::Reflect
            + $crate::info::Typed
            + $crate::registry::GetTypeMeta),+ >)?
            $crate::info::Typed for $name $(< $($gen),+ >)?
        {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::info::GenericTypeInfoCell =
                    $crate::info::GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let generics: ::std::vec::Vec<$crate::info::TypeParam> = ::std::vec![
                        $($(
                            $crate::info::TypeParam::new::<$gen>(::core::stringify!($gen))
                        ),+)?
                    ];
                    let fields: ::std::vec::Vec<$crate::info::FieldInfo> = ::std::vec![
                        $(
                            $crate::__reflect_field!(
                                $crate::info::FieldInfo::new::<$fty>(::core::stringify!($fname))
                                ; $( $mark )*
                            )
                        ),*
                    ];
                    $crate::info::TypeInfo::Struct(
                        $crate::info::StructInfo::new::<Self>(generics, fields),
                    )
                })
            }
        }

        impl $(< $($gen: $crate::Reflect
            + $crate::info::Typed
            + $crate::registry::GetTypeMeta),+ >)?
            $crate::Reflect for $name $(< $($gen),+ >)?
        {
            fn set(
                &mut self,
                value: ::std::boxed::Box<dyn $crate::Reflect>,
            ) -> Result<(), ::std::boxed::Box<dyn $crate::Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> $crate::ops::ReflectKind {
                $crate::ops::ReflectKind::Struct
            }

            #[inline]
            fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
                $crate::ops::ReflectRef::Struct(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
                $crate::ops::ReflectMut::Struct(self)
            }
        }

        impl $(< $($gen: $crate::Reflect
            + $crate::info::Typed
            + $crate::registry::GetTypeMeta),+ >)?
            $crate::ops::Struct for $name $(< $($gen),+ >)?
        {
            fn field(&self, name: &str) -> ::core::option::Option<&dyn $crate::Reflect> {
                $(
                    if name == ::core::stringify!($fname) {
                        return ::core::option::Option::Some(&self.$fname as &dyn $crate::Reflect);
                    }
                )*
                let _ = name;
                ::core::option::Option::None
            }

            fn field_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn $crate::Reflect> {
                $(
                    if name == ::core::stringify!($fname) {
                        return ::core::option::Option::Some(
                            &mut self.$fname as &mut dyn $crate::Reflect,
                        );
                    }
                )*
                let _ = name;
                ::core::option::Option::None
            }

            #[inline]
            fn field_len(&self) -> usize {
                let names: &[&str] = &[$( ::core::stringify!($fname) ),*];
                names.len()
            }
        }

        impl $(< $($gen: $crate::Reflect
            + $crate::info::Typed
            + $crate::registry::GetTypeMeta),+ >)?
            $crate::registry::GetTypeMeta for $name $(< $($gen),+ >)?
        where
            Self: ::core::default::Default,
        {
            fn get_type_meta() -> $crate::registry::TypeMeta {
                let mut meta = $crate::registry::TypeMeta::of::<Self>();
                meta.insert_trait(
                    <$crate::registry::MetaDefault as $crate::registry::FromType<Self>>::from_type(),
                );
                meta
            }

            fn register_dependencies(registry: &mut $crate::registry::TypeRegistry) {
                $( registry.register::<$fty>(); )*
            }
        }
    };
}

/// Folds field marks into a [`FieldInfo`](crate::info::FieldInfo) builder
/// chain. Implementation detail of [`reflect_struct!`].
#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_field {
    ($info:expr ; ) => { $info };
    ($info:expr ; param($index:literal) $($rest:tt)*) => {
        $crate::__reflect_field!($info.with_param($index) ; $($rest)*)
    };
    ($info:expr ; flatten $($rest:tt)*) => {
        $crate::__reflect_field!($info.flatten() ; $($rest)*)
    };
    ($info:expr ; skip $($rest:tt)*) => {
        $crate::__reflect_field!($info.skip() ; $($rest)*)
    };
    ($info:expr ; synthetic $($rest:tt)*) => {
        $crate::__reflect_field!($info.synthetic() ; $($rest)*)
    };
    ($info:expr ; exposed $($rest:tt)*) => {
        $crate::__reflect_field!($info.exposed() ; $($rest)*)
    };
    ($info:expr ; since($version:literal) $($rest:tt)*) => {
        $crate::__reflect_field!($info.since($version) ; $($rest)*)
    };
    ($info:expr ; until($version:literal) $($rest:tt)*) => {
        $crate::__reflect_field!($info.until($version) ; $($rest)*)
    };
}
