#![doc = include_str!("../README.md")]

pub use ojson_bind as bind;
pub use ojson_reflect as reflect;
pub use ojson_tree as tree;

pub use ojson_bind::{BindError, Engine, EngineBuilder, KeyNaming, TypeMatcher};
pub use ojson_reflect::{Reflect, reflect_struct};
pub use ojson_tree::{JsonNode, JsonNumber, JsonObject, SyntaxError};

use ojson_reflect::info::Typed;

// -----------------------------------------------------------------------------
// Text conveniences

/// Encodes `value` to JSON text through the serde bridge.
pub fn to_string(engine: &Engine, value: &dyn Reflect) -> Result<String, BindError> {
    let node = engine.to_node(value)?;
    serde_json::to_string(&node).map_err(|e| BindError::Syntax(SyntaxError::new(e.to_string())))
}

/// Encodes `value` to pretty-printed JSON text through the serde bridge.
pub fn to_string_pretty(engine: &Engine, value: &dyn Reflect) -> Result<String, BindError> {
    let node = engine.to_node(value)?;
    serde_json::to_string_pretty(&node)
        .map_err(|e| BindError::Syntax(SyntaxError::new(e.to_string())))
}

/// Decodes JSON text into a `T` through the serde bridge.
pub fn from_str<T: Reflect + Typed>(engine: &Engine, text: &str) -> Result<T, BindError> {
    let node: JsonNode =
        serde_json::from_str(text).map_err(|e| BindError::Syntax(SyntaxError::new(e.to_string())))?;
    engine.from_node(&node)
}
