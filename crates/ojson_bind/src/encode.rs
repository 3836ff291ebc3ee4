//! The encoding half of the graph traverser.
//!
//! One state machine drives every output form: the structural walk emits
//! tokens straight into a [`JsonWriter`], so the tree API is just this walk
//! pointed at a [`TreeWriter`]. Custom converters exchange finished
//! [`JsonNode`] fragments, bridged to the writer with
//! [`write_node`](ojson_tree::write_node).

use std::sync::Arc;

use ojson_reflect::Reflect;
use ojson_reflect::info::ResolvedType;
use ojson_reflect::ops::ReflectRef;
use ojson_reflect::registry::TypeRegistry;
use ojson_tree::{JsonNode, JsonWriter, TreeWriter, write_node};

use crate::algebra;
use crate::catalog::FieldCatalog;
use crate::engine::EngineConfig;
use crate::error::{BindError, Path, PathSegment};
use crate::guard::{AncestorGuard, ValueTypePair};
use crate::handlers::{HandlerRegistry, NodeEncoder};

// -----------------------------------------------------------------------------
// EncodeContext

/// Per-call state of one top-level encode, also the re-entry surface handed
/// to custom converters.
///
/// The shared engine pieces come in by reference; the [`AncestorGuard`] is
/// owned here and dies with the call, never shared across concurrent
/// conversions.
pub struct EncodeContext<'e> {
    pub(crate) handlers: &'e HandlerRegistry,
    pub(crate) catalog: &'e FieldCatalog,
    pub(crate) registry: &'e TypeRegistry,
    pub(crate) config: &'e EngineConfig,
    pub(crate) guard: AncestorGuard,
}

impl<'e> EncodeContext<'e> {
    pub(crate) fn new(
        handlers: &'e HandlerRegistry,
        catalog: &'e FieldCatalog,
        registry: &'e TypeRegistry,
        config: &'e EngineConfig,
    ) -> Self {
        Self {
            handlers,
            catalog,
            registry,
            config,
            guard: AncestorGuard::new(),
        }
    }

    /// Encodes a member value to a fragment, with normal type narrowing.
    pub fn encode(
        &mut self,
        value: &dyn Reflect,
        declared: &ResolvedType,
    ) -> Result<JsonNode, BindError> {
        self.fragment(value, declared, false)
    }

    /// Encodes a member value to a fragment with the declared type pinned
    /// (no narrowing).
    pub fn encode_preserve(
        &mut self,
        value: &dyn Reflect,
        declared: &ResolvedType,
    ) -> Result<JsonNode, BindError> {
        self.fragment(value, declared, true)
    }

    /// Encodes a value structurally, bypassing converter dispatch for this
    /// node only.
    ///
    /// This is how a converter delegates default handling on its own type
    /// without recursing into itself; members of the value dispatch normally
    /// again.
    pub fn encode_default(
        &mut self,
        value: &dyn Reflect,
        ty: &ResolvedType,
    ) -> Result<JsonNode, BindError> {
        let mut writer = TreeWriter::new().with_serialize_nulls(self.config.serialize_nulls);
        encode_structural(self, value, ty, &mut writer)?;
        writer.finish().map_err(BindError::from)
    }

    fn fragment(
        &mut self,
        value: &dyn Reflect,
        declared: &ResolvedType,
        preserve: bool,
    ) -> Result<JsonNode, BindError> {
        let mut writer = TreeWriter::new().with_serialize_nulls(self.config.serialize_nulls);
        encode_value(self, value, declared, preserve, &mut writer)?;
        writer.finish().map_err(BindError::from)
    }
}

// -----------------------------------------------------------------------------
// Node visit

/// Encodes one node: resolve the working type, dispatch to a converter or
/// fall back to structure.
pub(crate) fn encode_value(
    ctx: &mut EncodeContext<'_>,
    value: &dyn Reflect,
    declared: &ResolvedType,
    preserve: bool,
    writer: &mut dyn JsonWriter,
) -> Result<(), BindError> {
    if ctx.guard.depth() >= ctx.config.max_depth {
        return Err(BindError::DepthExceeded {
            limit: ctx.config.max_depth,
            path: Path::new(),
        });
    }

    let narrowed = if preserve {
        declared.clone()
    } else {
        algebra::narrow(declared, value)
    };

    // Narrowed type first, declared type second; the matched type is the one
    // the converter (and any structural continuation) works with.
    let kind = value.reflect_kind();
    let dispatch = ctx
        .handlers
        .lookup_encoder(&narrowed, Some(kind))
        .map(|encoder| (encoder, narrowed.clone()))
        .or_else(|| {
            if narrowed != *declared {
                ctx.handlers
                    .lookup_encoder(declared, Some(kind))
                    .map(|encoder| (encoder, declared.clone()))
            } else {
                None
            }
        });

    // Only reference-bearing nodes can close a cycle; leaves are exempt.
    let guarded = match value.reflect_ref() {
        ReflectRef::Opaque(_) => false,
        ReflectRef::Option(optional) => !optional.is_none(),
        _ => true,
    };
    if guarded {
        ctx.guard
            .enter(ValueTypePair::new(value, &narrowed, preserve))?;
    }
    let result = match dispatch {
        Some((encoder, matched)) => encode_with(ctx, encoder, value, &matched, writer),
        None => encode_structural(ctx, value, &narrowed, writer),
    };
    if guarded {
        ctx.guard.leave();
    }
    result
}

fn encode_with(
    ctx: &mut EncodeContext<'_>,
    encoder: Arc<dyn NodeEncoder>,
    value: &dyn Reflect,
    ty: &ResolvedType,
    writer: &mut dyn JsonWriter,
) -> Result<(), BindError> {
    log::trace!("custom encoder claims `{}`", ty.path());
    let node = encoder.encode(value, ty, ctx)?;
    write_node(&node, writer).map_err(BindError::from)
}

/// The structural (reflective) branch, dispatched on the value's kind.
pub(crate) fn encode_structural(
    ctx: &mut EncodeContext<'_>,
    value: &dyn Reflect,
    ty: &ResolvedType,
    writer: &mut dyn JsonWriter,
) -> Result<(), BindError> {
    match value.reflect_ref() {
        ReflectRef::Opaque(_) => Err(BindError::Unsupported {
            type_path: value.reflect_type_path().into(),
            path: Path::new(),
        }),
        ReflectRef::Struct(_) => {
            // Field templates come from the working type so that a preserved
            // declared type keeps governing field resolution.
            let info = if ty.id() == value.ty_id() {
                value.reflect_type_info()
            } else {
                ctx.registry
                    .get_type_info(ty.id())
                    .unwrap_or_else(|| value.reflect_type_info())
            };
            let Some(struct_info) = info.as_struct() else {
                return Err(BindError::Unsupported {
                    type_path: ty.path().into(),
                    path: Path::new(),
                });
            };

            let entry = ctx.catalog.entry(ty, struct_info, ctx.registry);
            writer.begin_object()?;
            for descriptor in entry.fields() {
                let Some(field_value) = descriptor.field_of(value) else {
                    log::debug!(
                        "value of `{}` has no field `{}`; skipping",
                        ty.path(),
                        descriptor.name()
                    );
                    continue;
                };
                let field_ty = descriptor.resolve();
                writer.name(descriptor.key())?;
                encode_value(ctx, field_value, &field_ty, false, writer)
                    .map_err(|e| e.at(PathSegment::Key(descriptor.name().to_owned())))?;
            }
            writer.end_object()?;
            Ok(())
        }
        ReflectRef::List(list) => {
            let component = ty
                .component()
                .cloned()
                .unwrap_or_else(ResolvedType::unresolved);
            writer.begin_array()?;
            for index in 0..list.len() {
                let Some(element) = list.get(index) else { break };
                encode_value(ctx, element, &component, false, writer)
                    .map_err(|e| e.at(PathSegment::Index(index)))?;
            }
            writer.end_array()?;
            Ok(())
        }
        ReflectRef::Option(optional) => match optional.get() {
            // The writer's deferred-name contract applies the null policy;
            // array positions always keep their null.
            None => writer.null_value().map_err(BindError::from),
            Some(payload) => {
                let payload_ty = ty.arg(0).cloned().unwrap_or_else(ResolvedType::unresolved);
                encode_value(ctx, payload, &payload_ty, false, writer)
            }
        },
        ReflectRef::Pointer(pointer) => {
            let target_ty = ty.arg(0).cloned().unwrap_or_else(ResolvedType::unresolved);
            encode_value(ctx, pointer.target(), &target_ty, false, writer)
        }
    }
}
