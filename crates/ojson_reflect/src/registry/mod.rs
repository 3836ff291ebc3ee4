//! The type registry: per-type metadata and capability tables.

mod traits;
mod type_meta;
mod type_registry;

pub use traits::{FromType, MetaDefault, MetaPointer};
pub use type_meta::{GetTypeMeta, TypeMeta, TypeTrait};
pub use type_registry::{TypeRegistry, TypeRegistryArc};
