use std::sync::Arc;

use ojson_reflect::Reflect;
use ojson_reflect::info::{ResolvedType, Type, TypePath};
use ojson_reflect::ops::ReflectKind;
use ojson_tree::JsonNode;

use crate::decode::DecodeContext;
use crate::encode::EncodeContext;
use crate::error::BindError;

// -----------------------------------------------------------------------------
// Converter traits

/// Custom encode logic bound to a type matcher.
///
/// A converter produces a finished document fragment; on the streaming paths
/// the engine bridges the fragment to the writer. Re-entering the engine for
/// members goes through the context: [`EncodeContext::encode`] narrows like
/// any field visit, [`EncodeContext::encode_preserve`] pins the declared
/// type, and [`EncodeContext::encode_default`] asks for structural handling
/// of a value this converter does not want to handle itself (the safe way to
/// delegate on your own type).
pub trait NodeEncoder: Send + Sync {
    fn encode(
        &self,
        value: &dyn Reflect,
        ty: &ResolvedType,
        ctx: &mut EncodeContext<'_>,
    ) -> Result<JsonNode, BindError>;
}

/// Custom decode logic bound to a type matcher.
///
/// Mirrors [`NodeEncoder`]: the converter consumes a document fragment and
/// produces a finished value; [`DecodeContext::decode`] re-enters the engine
/// and [`DecodeContext::decode_default`] delegates structurally.
pub trait NodeDecoder: Send + Sync {
    fn decode(
        &self,
        node: &JsonNode,
        ty: &ResolvedType,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Box<dyn Reflect>, BindError>;
}

/// Custom instantiation bound to a type matcher, consulted before the
/// registry's no-argument construction entry.
pub trait InstanceCreator: Send + Sync {
    fn create(&self, ty: &ResolvedType) -> Box<dyn Reflect>;
}

impl<F> InstanceCreator for F
where
    F: Fn(&ResolvedType) -> Box<dyn Reflect> + Send + Sync,
{
    #[inline]
    fn create(&self, ty: &ResolvedType) -> Box<dyn Reflect> {
        self(ty)
    }
}

// -----------------------------------------------------------------------------
// TypeMatcher

/// What a registration applies to.
///
/// `Exact` claims one instantiation. The two hierarchy forms claim a set:
/// every instantiation of one generic family, or every type of one
/// structural kind.
#[derive(Clone, Debug)]
pub enum TypeMatcher {
    /// Exactly this concrete type.
    Exact(Type),
    /// Every instantiation of the generic family with this path.
    Family(&'static str),
    /// Every type of this structural kind.
    Kind(ReflectKind),
}

impl TypeMatcher {
    /// Matches exactly `T`.
    #[inline]
    pub fn exact<T: TypePath>() -> Self {
        Self::Exact(Type::of::<T>())
    }

    /// Matches every instantiation of the family at `path`
    /// (e.g. `"alloc::vec::Vec"`).
    #[inline]
    pub const fn family(path: &'static str) -> Self {
        Self::Family(path)
    }

    /// Matches every type of `kind`.
    #[inline]
    pub const fn kind(kind: ReflectKind) -> Self {
        Self::Kind(kind)
    }

    #[inline]
    pub const fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    fn matches(&self, ty: &ResolvedType, kind: Option<ReflectKind>) -> bool {
        match self {
            Self::Exact(exact) => ty.id() == exact.id(),
            Self::Family(family) => ty.family() == *family,
            Self::Kind(matched) => kind == Some(*matched),
        }
    }
}

// -----------------------------------------------------------------------------
// HandlerRegistry

/// The ordered store of converters and instance creators.
///
/// Registrations live in two segments: the user segment and the built-in
/// defaults, with the user segment logically later/closer. Lookup runs in
/// two tiers, exact matchers strictly before hierarchy matchers, and
/// within a segment the most recent exact registration wins while the first
/// hierarchy registration wins. The combination gives the fixed specificity
/// rule: exact match first, then hierarchy match at the narrowed type, then
/// at the declared type (the narrowed/declared ordering is the caller's; see
/// the encode dispatch).
///
/// A failed lookup is not an error: it is the signal to fall back to
/// structural (reflective) handling.
pub struct HandlerRegistry {
    encoders: Segmented<dyn NodeEncoder>,
    decoders: Segmented<dyn NodeDecoder>,
    creators: Segmented<dyn InstanceCreator>,
}

impl Default for HandlerRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            encoders: Segmented::new(),
            decoders: Segmented::new(),
            creators: Segmented::new(),
        }
    }

    pub fn register_encoder(&mut self, matcher: TypeMatcher, encoder: Arc<dyn NodeEncoder>) {
        self.encoders.user.push((matcher, encoder));
    }

    pub fn register_decoder(&mut self, matcher: TypeMatcher, decoder: Arc<dyn NodeDecoder>) {
        self.decoders.user.push((matcher, decoder));
    }

    pub fn register_creator(&mut self, matcher: TypeMatcher, creator: Arc<dyn InstanceCreator>) {
        self.creators.user.push((matcher, creator));
    }

    pub(crate) fn register_default_encoder(
        &mut self,
        matcher: TypeMatcher,
        encoder: Arc<dyn NodeEncoder>,
    ) {
        self.encoders.builtin.push((matcher, encoder));
    }

    pub(crate) fn register_default_decoder(
        &mut self,
        matcher: TypeMatcher,
        decoder: Arc<dyn NodeDecoder>,
    ) {
        self.decoders.builtin.push((matcher, decoder));
    }

    /// Finds the best encoder for `ty`, or none (the structural fallback).
    pub fn lookup_encoder(
        &self,
        ty: &ResolvedType,
        kind: Option<ReflectKind>,
    ) -> Option<Arc<dyn NodeEncoder>> {
        self.encoders.lookup(ty, kind)
    }

    /// Finds the best decoder for `ty`, or none (the structural fallback).
    pub fn lookup_decoder(
        &self,
        ty: &ResolvedType,
        kind: Option<ReflectKind>,
    ) -> Option<Arc<dyn NodeDecoder>> {
        self.decoders.lookup(ty, kind)
    }

    /// Finds the best instance creator for `ty`, or none.
    pub fn lookup_creator(
        &self,
        ty: &ResolvedType,
        kind: Option<ReflectKind>,
    ) -> Option<Arc<dyn InstanceCreator>> {
        self.creators.lookup(ty, kind)
    }

}

struct Segmented<H: ?Sized> {
    user: Vec<(TypeMatcher, Arc<H>)>,
    builtin: Vec<(TypeMatcher, Arc<H>)>,
}

impl<H: ?Sized> Segmented<H> {
    fn new() -> Self {
        Self {
            user: Vec::new(),
            builtin: Vec::new(),
        }
    }

    fn lookup(&self, ty: &ResolvedType, kind: Option<ReflectKind>) -> Option<Arc<H>> {
        // Exact tier: most recent wins, user segment before builtins.
        for (matcher, handler) in self.user.iter().rev().chain(self.builtin.iter().rev()) {
            if matcher.is_exact() && matcher.matches(ty, kind) {
                return Some(Arc::clone(handler));
            }
        }
        // Hierarchy tier: first registered wins, user segment before builtins.
        for (matcher, handler) in self.user.iter().chain(self.builtin.iter()) {
            if !matcher.is_exact() && matcher.matches(ty, kind) {
                return Some(Arc::clone(handler));
            }
        }
        None
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{HandlerRegistry, NodeEncoder, TypeMatcher};
    use crate::encode::EncodeContext;
    use crate::error::BindError;
    use ojson_reflect::Reflect;
    use ojson_reflect::info::ResolvedType;
    use ojson_reflect::ops::ReflectKind;
    use ojson_tree::JsonNode;
    use std::sync::Arc;

    struct Tagged;

    impl NodeEncoder for Tagged {
        fn encode(
            &self,
            _value: &dyn Reflect,
            _ty: &ResolvedType,
            _ctx: &mut EncodeContext<'_>,
        ) -> Result<JsonNode, BindError> {
            Ok(JsonNode::Null)
        }
    }

    fn encoder() -> Arc<dyn NodeEncoder> {
        Arc::new(Tagged)
    }

    #[test]
    fn later_exact_registration_shadows_earlier() {
        let (first, second) = (encoder(), encoder());
        let mut registry = HandlerRegistry::new();
        registry.register_encoder(TypeMatcher::exact::<u32>(), first.clone());
        registry.register_encoder(TypeMatcher::exact::<u32>(), second.clone());

        let ty = ResolvedType::of::<u32>();
        let found = registry.lookup_encoder(&ty, Some(ReflectKind::Opaque)).unwrap();
        assert!(Arc::ptr_eq(&found, &second));
    }

    #[test]
    fn exact_beats_hierarchy_regardless_of_order() {
        let (exact, family) = (encoder(), encoder());
        let mut registry = HandlerRegistry::new();
        registry.register_encoder(TypeMatcher::exact::<Vec<u32>>(), exact.clone());
        registry.register_encoder(TypeMatcher::family("alloc::vec::Vec"), family.clone());

        let ty = ResolvedType::of::<Vec<u32>>();
        let found = registry.lookup_encoder(&ty, Some(ReflectKind::List)).unwrap();
        assert!(Arc::ptr_eq(&found, &exact));

        // Another instantiation only the family matcher claims.
        let other = ResolvedType::of::<Vec<bool>>();
        let found = registry
            .lookup_encoder(&other, Some(ReflectKind::List))
            .unwrap();
        assert!(Arc::ptr_eq(&found, &family));
    }

    #[test]
    fn first_hierarchy_registration_wins() {
        let (family, kind) = (encoder(), encoder());
        let mut registry = HandlerRegistry::new();
        registry.register_encoder(TypeMatcher::family("alloc::vec::Vec"), family.clone());
        registry.register_encoder(TypeMatcher::kind(ReflectKind::List), kind.clone());

        let ty = ResolvedType::of::<Vec<u32>>();
        let found = registry.lookup_encoder(&ty, Some(ReflectKind::List)).unwrap();
        assert!(Arc::ptr_eq(&found, &family));
    }

    #[test]
    fn user_registrations_shadow_builtins() {
        let (builtin, user) = (encoder(), encoder());
        let mut registry = HandlerRegistry::new();
        registry.register_default_encoder(TypeMatcher::exact::<u32>(), builtin.clone());
        registry.register_encoder(TypeMatcher::exact::<u32>(), user.clone());

        let ty = ResolvedType::of::<u32>();
        let found = registry.lookup_encoder(&ty, Some(ReflectKind::Opaque)).unwrap();
        assert!(Arc::ptr_eq(&found, &user));
    }

    #[test]
    fn no_match_is_none() {
        let registry = HandlerRegistry::new();
        let ty = ResolvedType::of::<u32>();
        assert!(registry.lookup_encoder(&ty, Some(ReflectKind::Opaque)).is_none());
    }
}
