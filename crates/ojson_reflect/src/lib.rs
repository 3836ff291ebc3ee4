//! Runtime reflection for the `ojson` workspace.
//!
//! The binding engine needs two things from a value: its concrete type
//! identity (generic arguments included) and structural access by
//! [kind](ops::ReflectKind). Both come from the [`Reflect`] trait; the
//! per-type metadata behind it lives in [`info`] and is collected into a
//! [`registry::TypeRegistry`] before conversion.
//!
//! Type descriptors distinguish the *declared* form of a field: possibly
//! open over the declaring type's parameters ([`info::DeclaredType`]): from
//! the *closed* form everything downstream consumes
//! ([`info::ResolvedType`]). Closing the former against a concrete
//! instantiation is the engine's type algebra, built on the argument lists
//! recorded in [`info::StructInfo`].
//!
//! Register your own structs with [`reflect_struct!`]; primitives, `String`,
//! `Vec`, `Option`, `OnceLock`, `Box` and `Arc` are covered by built-in
//! implementations.

// -----------------------------------------------------------------------------
// Modules

mod reflection;
mod typeid_map;

pub mod impls;
pub mod info;
pub mod ops;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-level exports

pub use reflection::Reflect;
pub use typeid_map::TypeIdMap;
