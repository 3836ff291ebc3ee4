//! Built-in converters for the leaf types.
//!
//! Every primitive is claimed by an exact-matched codec in the defaults
//! segment, so user registrations for the same types shadow these without
//! touching them.

use core::marker::PhantomData;
use std::sync::Arc;

use ojson_reflect::Reflect;
use ojson_reflect::info::{ResolvedType, TypePath, Typed};
use ojson_tree::{JsonNode, JsonNumber};

use crate::decode::DecodeContext;
use crate::encode::EncodeContext;
use crate::error::{BindError, Path};
use crate::handlers::{HandlerRegistry, NodeDecoder, NodeEncoder, TypeMatcher};

// -----------------------------------------------------------------------------
// Installation

pub(crate) fn install(handlers: &mut HandlerRegistry) {
    macro_rules! install_numbers {
        ($($ty:ty),*) => {
            $(
                let codec = Arc::new(NumberCodec::<$ty>::new());
                handlers.register_default_encoder(TypeMatcher::exact::<$ty>(), codec.clone());
                handlers.register_default_decoder(TypeMatcher::exact::<$ty>(), codec);
            )*
        };
    }
    install_numbers!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

    let codec = Arc::new(BoolCodec);
    handlers.register_default_encoder(TypeMatcher::exact::<bool>(), codec.clone());
    handlers.register_default_decoder(TypeMatcher::exact::<bool>(), codec);

    let codec = Arc::new(StringCodec);
    handlers.register_default_encoder(TypeMatcher::exact::<String>(), codec.clone());
    handlers.register_default_decoder(TypeMatcher::exact::<String>(), codec);

    let codec = Arc::new(CharCodec);
    handlers.register_default_encoder(TypeMatcher::exact::<char>(), codec.clone());
    handlers.register_default_decoder(TypeMatcher::exact::<char>(), codec);
}

fn wrong_value<T: TypePath>(value: &dyn Reflect) -> BindError {
    BindError::TypeMismatch {
        expected: T::type_path().into(),
        found: value.reflect_type_path().into(),
        path: Path::new(),
    }
}

fn wrong_node(expected: &'static str, node: &JsonNode) -> BindError {
    BindError::TypeMismatch {
        expected: expected.into(),
        found: node.kind_name().into(),
        path: Path::new(),
    }
}

// -----------------------------------------------------------------------------
// Numbers

/// Conversion from a document number into one concrete numeric type.
///
/// Out-of-range and fractional-into-integer conversions are rejected, never
/// silently truncated.
trait FromJsonNumber: Sized {
    fn from_number(number: &JsonNumber) -> Option<Self>;
}

macro_rules! impl_from_number_unsigned {
    ($($ty:ty),*) => {
        $(impl FromJsonNumber for $ty {
            fn from_number(number: &JsonNumber) -> Option<Self> {
                number.as_u64().and_then(|v| v.try_into().ok())
            }
        })*
    };
}

macro_rules! impl_from_number_signed {
    ($($ty:ty),*) => {
        $(impl FromJsonNumber for $ty {
            fn from_number(number: &JsonNumber) -> Option<Self> {
                number.as_i64().and_then(|v| v.try_into().ok())
            }
        })*
    };
}

impl_from_number_unsigned!(u8, u16, u32, u64, usize);
impl_from_number_signed!(i8, i16, i32, i64, isize);

impl FromJsonNumber for f64 {
    fn from_number(number: &JsonNumber) -> Option<Self> {
        number.as_f64()
    }
}

impl FromJsonNumber for f32 {
    fn from_number(number: &JsonNumber) -> Option<Self> {
        number.as_f64().map(|v| v as f32)
    }
}

struct NumberCodec<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T> NumberCodec<T> {
    const fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<T> NodeEncoder for NumberCodec<T>
where
    T: Reflect + Typed + Copy + Into<JsonNumber>,
{
    fn encode(
        &self,
        value: &dyn Reflect,
        _ty: &ResolvedType,
        _ctx: &mut EncodeContext<'_>,
    ) -> Result<JsonNode, BindError> {
        let value = value.downcast_ref::<T>().ok_or_else(|| wrong_value::<T>(value))?;
        Ok(JsonNode::Number((*value).into()))
    }
}

impl<T> NodeDecoder for NumberCodec<T>
where
    T: Reflect + Typed + FromJsonNumber,
{
    fn decode(
        &self,
        node: &JsonNode,
        _ty: &ResolvedType,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Box<dyn Reflect>, BindError> {
        let number = node.as_number().ok_or_else(|| wrong_node("number", node))?;
        let value = T::from_number(number).ok_or_else(|| BindError::TypeMismatch {
            expected: T::type_path().into(),
            found: format!("number {number}").into(),
            path: Path::new(),
        })?;
        Ok(Box::new(value))
    }
}

// -----------------------------------------------------------------------------
// Bool / String / char

struct BoolCodec;

impl NodeEncoder for BoolCodec {
    fn encode(
        &self,
        value: &dyn Reflect,
        _ty: &ResolvedType,
        _ctx: &mut EncodeContext<'_>,
    ) -> Result<JsonNode, BindError> {
        let value = value
            .downcast_ref::<bool>()
            .ok_or_else(|| wrong_value::<bool>(value))?;
        Ok(JsonNode::Bool(*value))
    }
}

impl NodeDecoder for BoolCodec {
    fn decode(
        &self,
        node: &JsonNode,
        _ty: &ResolvedType,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Box<dyn Reflect>, BindError> {
        let value = node.as_bool().ok_or_else(|| wrong_node("boolean", node))?;
        Ok(Box::new(value))
    }
}

struct StringCodec;

impl NodeEncoder for StringCodec {
    fn encode(
        &self,
        value: &dyn Reflect,
        _ty: &ResolvedType,
        _ctx: &mut EncodeContext<'_>,
    ) -> Result<JsonNode, BindError> {
        let value = value
            .downcast_ref::<String>()
            .ok_or_else(|| wrong_value::<String>(value))?;
        Ok(JsonNode::String(value.clone()))
    }
}

impl NodeDecoder for StringCodec {
    fn decode(
        &self,
        node: &JsonNode,
        _ty: &ResolvedType,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Box<dyn Reflect>, BindError> {
        let value = node.as_str().ok_or_else(|| wrong_node("string", node))?;
        Ok(Box::new(value.to_owned()))
    }
}

struct CharCodec;

impl NodeEncoder for CharCodec {
    fn encode(
        &self,
        value: &dyn Reflect,
        _ty: &ResolvedType,
        _ctx: &mut EncodeContext<'_>,
    ) -> Result<JsonNode, BindError> {
        let value = value
            .downcast_ref::<char>()
            .ok_or_else(|| wrong_value::<char>(value))?;
        Ok(JsonNode::String(value.to_string()))
    }
}

impl NodeDecoder for CharCodec {
    fn decode(
        &self,
        node: &JsonNode,
        _ty: &ResolvedType,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Box<dyn Reflect>, BindError> {
        let text = node.as_str().ok_or_else(|| wrong_node("string", node))?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(value), None) => Ok(Box::new(value)),
            _ => Err(wrong_node("single-character string", node)),
        }
    }
}
