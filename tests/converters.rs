//! Custom converter dispatch: precedence, narrowing and delegation.

use ojson::bind::decode::DecodeContext;
use ojson::bind::encode::EncodeContext;
use ojson::bind::{BindError, NodeDecoder, NodeEncoder, TypeMatcher};
use ojson::reflect::info::ResolvedType;
use ojson::{Engine, JsonNode, JsonObject, Reflect, reflect_struct};

reflect_struct! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Celsius {
        pub degrees: f64,
    }
}

/// Encodes a value as a tagged string.
struct TaggedString(&'static str);

impl NodeEncoder for TaggedString {
    fn encode(
        &self,
        _value: &dyn Reflect,
        _ty: &ResolvedType,
        _ctx: &mut EncodeContext<'_>,
    ) -> Result<JsonNode, BindError> {
        Ok(JsonNode::from(self.0))
    }
}

#[test]
fn later_exact_registration_wins() {
    let engine = Engine::builder()
        .register_type::<Celsius>()
        .register_encoder(TypeMatcher::exact::<Celsius>(), TaggedString("first"))
        .register_encoder(TypeMatcher::exact::<Celsius>(), TaggedString("second"))
        .build();

    let node = engine.to_node(&Celsius { degrees: 1.0 }).unwrap();
    assert_eq!(node, JsonNode::from("second"));
}

#[test]
fn exact_beats_hierarchy_regardless_of_order() {
    let engine = Engine::builder()
        .register_type::<Celsius>()
        .register_encoder(TypeMatcher::family("alloc::vec::Vec"), TaggedString("family"))
        .register_encoder(TypeMatcher::exact::<Vec<u32>>(), TaggedString("exact"))
        .build();

    let exact: Vec<u32> = vec![1];
    assert_eq!(engine.to_node(&exact).unwrap(), JsonNode::from("exact"));

    let family: Vec<bool> = vec![true];
    assert_eq!(engine.to_node(&family).unwrap(), JsonNode::from("family"));
}

#[test]
fn user_registrations_shadow_built_in_codecs() {
    let engine = Engine::builder()
        .register_encoder(TypeMatcher::exact::<u32>(), TaggedString("mine"))
        .build();

    assert_eq!(engine.to_node(&5_u32).unwrap(), JsonNode::from("mine"));
    // Other primitives still use the built-in codecs.
    assert_eq!(engine.to_node(&5_u64).unwrap(), JsonNode::from(5_u64));
}

// -----------------------------------------------------------------------------
// Narrowing

#[test]
fn unresolved_declared_type_narrows_to_the_runtime_type() {
    let engine = Engine::builder().register_type::<Celsius>().build();
    let value = Celsius { degrees: 21.5 };

    let through_dyn = engine
        .to_node_as(&value, &ResolvedType::unresolved())
        .unwrap();
    let direct = engine.to_node(&value).unwrap();
    assert_eq!(through_dyn, direct);
}

// -----------------------------------------------------------------------------
// Delegation and self-recursion

/// Wraps the structural form of its own type under a `"wrapped"` key.
struct Wrapping;

impl NodeEncoder for Wrapping {
    fn encode(
        &self,
        value: &dyn Reflect,
        ty: &ResolvedType,
        ctx: &mut EncodeContext<'_>,
    ) -> Result<JsonNode, BindError> {
        let inner = ctx.encode_default(value, ty)?;
        let mut object = JsonObject::new();
        object.insert("wrapped", inner);
        Ok(JsonNode::Object(object))
    }
}

impl NodeDecoder for Wrapping {
    fn decode(
        &self,
        node: &JsonNode,
        ty: &ResolvedType,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Box<dyn Reflect>, BindError> {
        let inner = node
            .as_object()
            .and_then(|object| object.get("wrapped"))
            .unwrap_or(node);
        ctx.decode_default(inner, ty)
    }
}

#[test]
fn converters_delegate_default_handling_without_recursing() {
    let engine = Engine::builder()
        .register_type::<Celsius>()
        .register_converter(TypeMatcher::exact::<Celsius>(), Wrapping)
        .build();
    let value = Celsius { degrees: 21.5 };

    let text = ojson::to_string(&engine, &value).unwrap();
    assert_eq!(text, r#"{"wrapped":{"degrees":21.5}}"#);

    let back: Celsius = ojson::from_str(&engine, &text).unwrap();
    assert_eq!(back, value);
}

/// Re-enters the engine on its own value: the naive self-recursion mistake.
struct NaivelyRecursive;

impl NodeEncoder for NaivelyRecursive {
    fn encode(
        &self,
        value: &dyn Reflect,
        ty: &ResolvedType,
        ctx: &mut EncodeContext<'_>,
    ) -> Result<JsonNode, BindError> {
        ctx.encode(value, ty)
    }
}

#[test]
fn naive_self_recursion_is_caught_as_a_cycle() {
    let engine = Engine::builder()
        .register_type::<Celsius>()
        .register_encoder(TypeMatcher::exact::<Celsius>(), NaivelyRecursive)
        .build();

    let error = engine.to_node(&Celsius { degrees: 1.0 }).unwrap_err();
    assert!(matches!(error, BindError::Cycle { .. }));
}

// -----------------------------------------------------------------------------
// Instance creators

#[test]
fn creators_take_precedence_over_default_construction() {
    let engine = Engine::builder()
        .register_type::<Celsius>()
        .register_creator(TypeMatcher::exact::<Celsius>(), |_: &ResolvedType| {
            Box::new(Celsius { degrees: -40.0 }) as Box<dyn Reflect>
        })
        .build();

    // No keys decoded: the instance is exactly what the creator produced.
    let back: Celsius = ojson::from_str(&engine, "{}").unwrap();
    assert_eq!(back.degrees, -40.0);
}

#[test]
fn missing_construction_strategy_is_a_terminal_error() {
    use ojson::reflect::registry::TypeMeta;

    reflect_struct! {
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct Orphan {
            pub value: u32,
        }
    }

    let engine = Engine::builder().build();
    // Register the metadata only, without the default-construction entry.
    engine
        .registry()
        .write()
        .insert_type_meta(TypeMeta::of::<Orphan>());

    let node: JsonNode = serde_json::from_str(r#"{"value":1}"#).unwrap();
    let error = engine
        .from_node_as(&node, &ResolvedType::of::<Orphan>())
        .unwrap_err();
    assert!(matches!(error, BindError::Construction { .. }));
    assert!(error.to_string().contains("instance creator"));
}
