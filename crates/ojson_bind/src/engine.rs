use std::sync::Arc;

use ojson_reflect::Reflect;
use ojson_reflect::info::{ResolvedType, Typed};
use ojson_reflect::registry::{GetTypeMeta, TypeRegistry, TypeRegistryArc};
use ojson_tree::{JsonNode, JsonReader, JsonWriter, TreeReader, TreeWriter};

use crate::catalog::FieldCatalog;
use crate::construct::InstantiationEngine;
use crate::decode::{DecodeContext, decode_value};
use crate::defaults;
use crate::encode::{EncodeContext, encode_value};
use crate::error::{BindError, Path};
use crate::exclude::{ExclusionStrategy, ExposedOnly, SkipMarked, SyntheticFields, VersionRange};
use crate::handlers::{HandlerRegistry, InstanceCreator, NodeDecoder, NodeEncoder, TypeMatcher};
use crate::naming::KeyNaming;

// -----------------------------------------------------------------------------
// EngineConfig

/// The policy knobs one engine instance runs under.
#[derive(Clone, Debug)]
pub(crate) struct EngineConfig {
    pub(crate) serialize_nulls: bool,
    pub(crate) strict_unknown_fields: bool,
    pub(crate) max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            serialize_nulls: false,
            strict_unknown_fields: false,
            max_depth: 512,
        }
    }
}

// -----------------------------------------------------------------------------
// EngineBuilder

/// Configures and assembles an [`Engine`].
///
/// # Examples
///
/// ```
/// use ojson_bind::Engine;
/// use ojson_reflect::reflect_struct;
///
/// reflect_struct! {
///     #[derive(Default)]
///     pub struct Point {
///         pub x: i32,
///         pub y: i32,
///     }
/// }
///
/// let engine = Engine::builder().register_type::<Point>().build();
///
/// let node = engine.to_node(&Point { x: 1, y: 2 }).unwrap();
/// let back: Point = engine.from_node(&node).unwrap();
/// assert_eq!(back.x, 1);
/// ```
pub struct EngineBuilder {
    registry: TypeRegistry,
    handlers: HandlerRegistry,
    naming: KeyNaming,
    exclusions: Vec<Arc<dyn ExclusionStrategy>>,
    version: Option<f64>,
    expose_only: bool,
    cache_capacity: usize,
    config: EngineConfig,
}

impl Default for EngineBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// Starts from the primitive-populated registry and default policies.
    pub fn new() -> Self {
        Self {
            registry: TypeRegistry::new(),
            handlers: HandlerRegistry::new(),
            naming: KeyNaming::Identity,
            exclusions: Vec::new(),
            version: None,
            expose_only: false,
            cache_capacity: 1024,
            config: EngineConfig::default(),
        }
    }

    /// Registers `T` (and its type dependencies) for conversion.
    pub fn register_type<T: GetTypeMeta>(mut self) -> Self {
        self.registry.register::<T>();
        self
    }

    /// Emits explicit nulls for absent object members (default: omit them).
    pub fn serialize_nulls(mut self, on: bool) -> Self {
        self.config.serialize_nulls = on;
        self
    }

    /// Escalates unknown document keys from a silent skip to a hard error.
    pub fn strict_unknown_fields(mut self, on: bool) -> Self {
        self.config.strict_unknown_fields = on;
        self
    }

    /// Pins the schema version; fields outside their version range drop out.
    pub fn version(mut self, version: f64) -> Self {
        self.version = Some(version);
        self
    }

    /// Converts only fields explicitly marked exposed.
    pub fn expose_only(mut self, on: bool) -> Self {
        self.expose_only = on;
        self
    }

    /// Sets the document-key naming policy.
    pub fn naming(mut self, naming: KeyNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Adds an exclusion strategy (composed by disjunction with the rest).
    pub fn exclude(mut self, strategy: impl ExclusionStrategy + 'static) -> Self {
        self.exclusions.push(Arc::new(strategy));
        self
    }

    /// Bounds the shared field-catalog and constructor caches.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Bounds conversion recursion; deeper graphs fail with a structured
    /// error instead of exhausting the stack.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Registers a custom encoder.
    pub fn register_encoder(
        mut self,
        matcher: TypeMatcher,
        encoder: impl NodeEncoder + 'static,
    ) -> Self {
        self.handlers.register_encoder(matcher, Arc::new(encoder));
        self
    }

    /// Registers a custom decoder.
    pub fn register_decoder(
        mut self,
        matcher: TypeMatcher,
        decoder: impl NodeDecoder + 'static,
    ) -> Self {
        self.handlers.register_decoder(matcher, Arc::new(decoder));
        self
    }

    /// Registers a converter for both directions at once.
    pub fn register_converter(
        mut self,
        matcher: TypeMatcher,
        converter: impl NodeEncoder + NodeDecoder + 'static,
    ) -> Self {
        let converter = Arc::new(converter);
        self.handlers
            .register_encoder(matcher.clone(), converter.clone());
        self.handlers.register_decoder(matcher, converter);
        self
    }

    /// Registers an instance creator, consulted before default construction.
    pub fn register_creator(
        mut self,
        matcher: TypeMatcher,
        creator: impl InstanceCreator + 'static,
    ) -> Self {
        self.handlers.register_creator(matcher, Arc::new(creator));
        self
    }

    /// Assembles the engine.
    pub fn build(self) -> Engine {
        let mut handlers = self.handlers;
        defaults::install(&mut handlers);

        let mut exclusions: Vec<Arc<dyn ExclusionStrategy>> =
            vec![Arc::new(SkipMarked), Arc::new(SyntheticFields)];
        if let Some(version) = self.version {
            exclusions.push(Arc::new(VersionRange { version }));
        }
        if self.expose_only {
            exclusions.push(Arc::new(ExposedOnly));
        }
        exclusions.extend(self.exclusions);

        log::debug!(
            "engine built: naming {:?}, {} exclusion strategies, cache capacity {}",
            self.naming,
            exclusions.len(),
            self.cache_capacity
        );

        Engine {
            registry: TypeRegistryArc::new(self.registry),
            handlers,
            catalog: FieldCatalog::new(self.cache_capacity, self.naming, exclusions),
            construct: InstantiationEngine::new(self.cache_capacity),
            config: self.config,
        }
    }
}

// -----------------------------------------------------------------------------
// Engine

/// A long-lived conversion engine.
///
/// One engine serves many conversions, concurrently: the registry, handler
/// registrations and the bounded catalog/constructor caches are shared
/// read-mostly state, while every top-level call gets its own context and
/// ancestor stack. Conversions are synchronous and run to completion or to a
/// terminal [`BindError`].
pub struct Engine {
    registry: TypeRegistryArc,
    handlers: HandlerRegistry,
    catalog: FieldCatalog,
    construct: InstantiationEngine,
    config: EngineConfig,
}

impl Engine {
    /// Starts a builder.
    #[inline]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// The shared type registry, for registrations after construction.
    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        &self.registry
    }

    // -- encoding ------------------------------------------------------------

    /// Encodes `value` as its own runtime type into a document tree.
    pub fn to_node(&self, value: &dyn Reflect) -> Result<JsonNode, BindError> {
        let declared = value.resolved_type();
        self.to_node_as(value, &declared)
    }

    /// Encodes `value` under an explicit declared type into a document tree.
    pub fn to_node_as(
        &self,
        value: &dyn Reflect,
        declared: &ResolvedType,
    ) -> Result<JsonNode, BindError> {
        let mut writer = TreeWriter::new().with_serialize_nulls(self.config.serialize_nulls);
        self.to_writer_as(value, declared, &mut writer)?;
        writer.finish().map_err(BindError::from)
    }

    /// Encodes `value` straight into a streaming writer, no intermediate
    /// tree.
    pub fn to_writer(
        &self,
        value: &dyn Reflect,
        writer: &mut dyn JsonWriter,
    ) -> Result<(), BindError> {
        let declared = value.resolved_type();
        self.to_writer_as(value, &declared, writer)
    }

    /// Encodes `value` under an explicit declared type into a streaming
    /// writer.
    pub fn to_writer_as(
        &self,
        value: &dyn Reflect,
        declared: &ResolvedType,
        writer: &mut dyn JsonWriter,
    ) -> Result<(), BindError> {
        let registry = self.registry.read();
        let mut ctx =
            EncodeContext::new(&self.handlers, &self.catalog, &registry, &self.config);
        encode_value(&mut ctx, value, declared, false, writer)
    }

    // -- decoding ------------------------------------------------------------

    /// Decodes a document tree into a `T`.
    pub fn from_node<T: Reflect + Typed>(&self, node: &JsonNode) -> Result<T, BindError> {
        let target = ResolvedType::of::<T>();
        take_as(self.from_node_as(node, &target)?, &target)
    }

    /// Decodes a document tree into an explicit target type.
    pub fn from_node_as(
        &self,
        node: &JsonNode,
        target: &ResolvedType,
    ) -> Result<Box<dyn Reflect>, BindError> {
        let mut reader = TreeReader::new(node);
        self.from_reader_as(&mut reader, target)
    }

    /// Decodes from a streaming reader into a `T`, no intermediate tree.
    pub fn from_reader<T: Reflect + Typed>(
        &self,
        reader: &mut dyn JsonReader,
    ) -> Result<T, BindError> {
        let target = ResolvedType::of::<T>();
        take_as(self.from_reader_as(reader, &target)?, &target)
    }

    /// Decodes from a streaming reader into an explicit target type.
    pub fn from_reader_as(
        &self,
        reader: &mut dyn JsonReader,
        target: &ResolvedType,
    ) -> Result<Box<dyn Reflect>, BindError> {
        let registry = self.registry.read();
        let mut ctx = DecodeContext::new(
            &self.handlers,
            &self.catalog,
            &registry,
            &self.construct,
            &self.config,
        );
        decode_value(&mut ctx, reader, target)
    }
}

fn take_as<T: Reflect>(value: Box<dyn Reflect>, target: &ResolvedType) -> Result<T, BindError> {
    value.take::<T>().map_err(|rejected| BindError::TypeMismatch {
        expected: target.path().into(),
        found: rejected.reflect_type_path().into(),
        path: Path::new(),
    })
}
