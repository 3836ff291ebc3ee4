//! In-memory JSON document trees and the token-level reader/writer contract.
//!
//! This crate is the document side of the `ojson` workspace. It knows nothing
//! about Rust values or reflection; it models the exchanged text format as a
//! tree of [`JsonNode`]s and exposes the streaming [`JsonReader`]/[`JsonWriter`]
//! interfaces the binding engine drives. Lexical scanning and escaping are not
//! performed here: text enters and leaves through the serde implementations on
//! [`JsonNode`], so any serde text format (normally `serde_json`) supplies the
//! tokenizer.

// -----------------------------------------------------------------------------
// Modules

mod error;
mod node;
mod number;
mod read;
mod serde;
mod write;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::SyntaxError;
pub use node::{JsonNode, JsonObject};
pub use number::JsonNumber;
pub use read::{JsonReader, Token, TreeReader, read_node};
pub use write::{JsonWriter, TreeWriter, write_node};
