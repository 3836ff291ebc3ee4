//! The object-binding engine of the `ojson` workspace.
//!
//! An [`Engine`] converts between reflected Rust values
//! ([`ojson_reflect::Reflect`]) and JSON documents
//! ([`ojson_tree::JsonNode`], or token streams). The moving parts:
//!
//! - [`algebra`] closes possibly-generic declared types against a concrete
//!   context and narrows declared types to runtime types;
//! - [`catalog`] prepares and caches each type's convertible fields, with the
//!   exclusion pipeline and the naming policy applied once per type;
//! - [`handlers`] picks the most appropriate converter among overlapping
//!   registrations (exact before hierarchy, user before built-in);
//! - [`guard`] detects cycles across one conversion's live call stack;
//! - [`construct`] rebuilds target instances during decoding;
//! - [`encode`]/[`decode`] orchestrate the walk, streaming and tree alike.
//!
//! Conversions either complete, or fail with a [`BindError`] naming the full
//! path from the root to the failure point.

// -----------------------------------------------------------------------------
// Modules

mod algebra;
mod defaults;
mod engine;
mod error;

pub mod catalog;
pub mod construct;
pub mod decode;
pub mod encode;
pub mod exclude;
pub mod guard;
pub mod handlers;
pub mod naming;

// -----------------------------------------------------------------------------
// Top-level exports

pub use engine::{Engine, EngineBuilder};
pub use error::{BindError, Path, PathSegment};
pub use handlers::{InstanceCreator, NodeDecoder, NodeEncoder, TypeMatcher};
pub use naming::KeyNaming;

pub use algebra::{narrow, resolve};
