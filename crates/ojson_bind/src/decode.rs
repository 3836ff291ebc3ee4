//! The decoding half of the graph traverser.
//!
//! Mirrors encoding: one state machine reads tokens from a [`JsonReader`],
//! and the tree API is the same walk pointed at a [`TreeReader`]. The
//! document node's shape selects the branch; the target type says what to
//! build. Custom converters receive finished [`JsonNode`] fragments, bridged
//! from the reader with [`read_node`](ojson_tree::read_node).

use ojson_reflect::Reflect;
use ojson_reflect::info::{ResolvedType, TypeInfo};
use ojson_reflect::ops::ReflectMut;
use ojson_reflect::registry::{MetaPointer, TypeRegistry};
use ojson_tree::{JsonNode, JsonReader, Token, TreeReader, read_node};

use crate::catalog::FieldCatalog;
use crate::construct::InstantiationEngine;
use crate::engine::EngineConfig;
use crate::error::{BindError, Path, PathSegment};
use crate::handlers::HandlerRegistry;

// -----------------------------------------------------------------------------
// DecodeContext

/// Per-call state of one top-level decode, also the re-entry surface handed
/// to custom converters.
pub struct DecodeContext<'e> {
    pub(crate) handlers: &'e HandlerRegistry,
    pub(crate) catalog: &'e FieldCatalog,
    pub(crate) registry: &'e TypeRegistry,
    pub(crate) construct: &'e InstantiationEngine,
    pub(crate) config: &'e EngineConfig,
    depth: usize,
}

impl<'e> DecodeContext<'e> {
    pub(crate) fn new(
        handlers: &'e HandlerRegistry,
        catalog: &'e FieldCatalog,
        registry: &'e TypeRegistry,
        construct: &'e InstantiationEngine,
        config: &'e EngineConfig,
    ) -> Self {
        Self {
            handlers,
            catalog,
            registry,
            construct,
            config,
            depth: 0,
        }
    }

    /// Decodes a fragment into the given target type, dispatching normally.
    pub fn decode(
        &mut self,
        node: &JsonNode,
        target: &ResolvedType,
    ) -> Result<Box<dyn Reflect>, BindError> {
        let mut reader = TreeReader::new(node);
        decode_value(self, &mut reader, target)
    }

    /// Decodes a fragment structurally, bypassing converter dispatch for this
    /// node only, the decoding twin of
    /// [`encode_default`](crate::encode::EncodeContext::encode_default).
    pub fn decode_default(
        &mut self,
        node: &JsonNode,
        target: &ResolvedType,
    ) -> Result<Box<dyn Reflect>, BindError> {
        let mut reader = TreeReader::new(node);
        decode_structural(self, &mut reader, target)
    }
}

// -----------------------------------------------------------------------------
// Node visit

/// Decodes one node: dispatch to a converter or fall back to structure.
pub(crate) fn decode_value(
    ctx: &mut DecodeContext<'_>,
    reader: &mut dyn JsonReader,
    target: &ResolvedType,
) -> Result<Box<dyn Reflect>, BindError> {
    if ctx.depth >= ctx.config.max_depth {
        return Err(BindError::DepthExceeded {
            limit: ctx.config.max_depth,
            path: Path::new(),
        });
    }

    let kind = ctx
        .registry
        .get_type_info(target.id())
        .map(|info| info.kind());

    ctx.depth += 1;
    let result = match ctx.handlers.lookup_decoder(target, kind) {
        Some(decoder) => {
            log::trace!("custom decoder claims `{}`", target.path());
            let node = read_node(reader)?;
            decoder.decode(&node, target, ctx)
        }
        None => decode_structural(ctx, reader, target),
    };
    ctx.depth -= 1;
    result
}

/// The structural branch: the registered shape of the target type drives the
/// token walk.
pub(crate) fn decode_structural(
    ctx: &mut DecodeContext<'_>,
    reader: &mut dyn JsonReader,
    target: &ResolvedType,
) -> Result<Box<dyn Reflect>, BindError> {
    let Some(info) = ctx.registry.get_type_info(target.id()) else {
        return Err(BindError::Construction {
            type_path: target.path().into(),
            reason: "the type is not registered".into(),
            path: Path::new(),
        });
    };

    match info {
        TypeInfo::Opaque(_) => Err(BindError::Unsupported {
            type_path: target.path().into(),
            path: Path::new(),
        }),
        TypeInfo::Struct(struct_info) => {
            expect(reader, Token::BeginObject, "object")?;
            let mut instance = ctx
                .construct
                .construct(target, ctx.handlers, ctx.registry)?;
            let entry = ctx.catalog.entry(target, struct_info, ctx.registry);

            reader.begin_object()?;
            while reader.peek()? != Token::EndObject {
                let key = reader.next_name()?;
                match entry.by_key(&key) {
                    Some(descriptor) => {
                        let field_ty = descriptor.resolve();
                        let decoded = decode_value(ctx, reader, &field_ty)
                            .map_err(|e| e.at(PathSegment::Key(descriptor.name().to_owned())))?;
                        let Some(slot) = descriptor.field_mut_of(instance.as_mut()) else {
                            log::debug!(
                                "instance of `{}` has no field `{}`; dropping decoded value",
                                target.path(),
                                descriptor.name()
                            );
                            continue;
                        };
                        slot.set(decoded).map_err(|rejected| {
                            BindError::TypeMismatch {
                                expected: field_ty.path().into(),
                                found: rejected.reflect_type_path().into(),
                                path: Path::new(),
                            }
                            .at(PathSegment::Key(descriptor.name().to_owned()))
                        })?;
                    }
                    None if ctx.config.strict_unknown_fields => {
                        return Err(BindError::UnknownField {
                            key,
                            type_path: target.path().into(),
                            path: Path::new(),
                        });
                    }
                    None => {
                        log::debug!("skipping unknown key `{key}` for `{}`", target.path());
                        reader.skip_value()?;
                    }
                }
            }
            reader.end_object()?;
            Ok(instance)
        }
        TypeInfo::List(list_info) => {
            expect(reader, Token::BeginArray, "array")?;
            let mut instance = ctx
                .construct
                .construct(target, ctx.handlers, ctx.registry)?;
            let component = target.component().cloned().unwrap_or_else(|| list_info.item());

            reader.begin_array()?;
            {
                let ReflectMut::List(list) = instance.reflect_mut() else {
                    return Err(BindError::Construction {
                        type_path: target.path().into(),
                        reason: "the constructed instance is not a sequence".into(),
                        path: Path::new(),
                    });
                };
                let mut index = 0;
                while reader.peek()? != Token::EndArray {
                    let element = decode_value(ctx, reader, &component)
                        .map_err(|e| e.at(PathSegment::Index(index)))?;
                    list.push(element).map_err(|rejected| {
                        BindError::TypeMismatch {
                            expected: component.path().into(),
                            found: rejected.reflect_type_path().into(),
                            path: Path::new(),
                        }
                        .at(PathSegment::Index(index))
                    })?;
                    index += 1;
                }
            }
            reader.end_array()?;
            Ok(instance)
        }
        TypeInfo::Option(option_info) => {
            if reader.peek()? == Token::Null {
                reader.next_null()?;
                // The freshly constructed container is the absent state.
                return ctx.construct.construct(target, ctx.handlers, ctx.registry);
            }
            let payload_ty = target.arg(0).cloned().unwrap_or_else(|| option_info.payload());
            let payload = decode_value(ctx, reader, &payload_ty)?;
            let mut instance = ctx
                .construct
                .construct(target, ctx.handlers, ctx.registry)?;
            let ReflectMut::Option(optional) = instance.reflect_mut() else {
                return Err(BindError::Construction {
                    type_path: target.path().into(),
                    reason: "the constructed instance is not an optional container".into(),
                    path: Path::new(),
                });
            };
            optional.set_some(payload).map_err(|rejected| BindError::TypeMismatch {
                expected: payload_ty.path().into(),
                found: rejected.reflect_type_path().into(),
                path: Path::new(),
            })?;
            Ok(instance)
        }
        TypeInfo::Pointer(pointer_info) => {
            let target_ty = target.arg(0).cloned().unwrap_or_else(|| pointer_info.target());
            let inner = decode_value(ctx, reader, &target_ty)?;
            let Some(wrap) = ctx.registry.get_type_trait::<MetaPointer>(target.id()) else {
                return Err(BindError::Construction {
                    type_path: target.path().into(),
                    reason: "no pointer wrapping entry is registered".into(),
                    path: Path::new(),
                });
            };
            wrap.wrap(inner).map_err(|rejected| BindError::TypeMismatch {
                expected: target_ty.path().into(),
                found: rejected.reflect_type_path().into(),
                path: Path::new(),
            })
        }
    }
}

fn expect(
    reader: &mut dyn JsonReader,
    token: Token,
    expected: &'static str,
) -> Result<(), BindError> {
    let found = reader.peek()?;
    if found == token {
        return Ok(());
    }
    Err(BindError::TypeMismatch {
        expected: expected.into(),
        found: token_name(found).into(),
        path: Path::new(),
    })
}

fn token_name(token: Token) -> &'static str {
    match token {
        Token::BeginObject | Token::EndObject => "object",
        Token::BeginArray | Token::EndArray => "array",
        Token::Name => "member name",
        Token::String => "string",
        Token::Number => "number",
        Token::Bool => "boolean",
        Token::Null => "null",
        Token::End => "end of document",
    }
}
