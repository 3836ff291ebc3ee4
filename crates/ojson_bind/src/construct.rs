use core::any::TypeId;
use core::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use ojson_reflect::Reflect;
use ojson_reflect::info::ResolvedType;
use ojson_reflect::registry::{MetaDefault, TypeRegistry};

use crate::error::{BindError, Path};
use crate::handlers::{HandlerRegistry, InstanceCreator};

// -----------------------------------------------------------------------------
// InstantiationEngine

/// Builds target instances during decoding.
///
/// Strategy order: a registered [`InstanceCreator`] first, then the type's
/// no-argument construction entry ([`MetaDefault`]) from the registry. The
/// chosen strategy is memoized per type in a bounded LRU, negative results
/// too, so a type with no viable strategy is not re-probed on every decode.
pub struct InstantiationEngine {
    cache: Mutex<LruCache<TypeId, Option<Strategy>>>,
}

#[derive(Clone)]
enum Strategy {
    Creator(Arc<dyn InstanceCreator>),
    Default(MetaDefault),
}

impl InstantiationEngine {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Builds a fresh instance of `ty`.
    ///
    /// Failure is terminal for the conversion: there is nothing to retry, the
    /// caller needs to register an instance creator (the error says so).
    pub fn construct(
        &self,
        ty: &ResolvedType,
        handlers: &HandlerRegistry,
        registry: &TypeRegistry,
    ) -> Result<Box<dyn Reflect>, BindError> {
        if ty.is_unresolved() {
            return Err(BindError::Construction {
                type_path: "?".into(),
                reason: "the target type could not be resolved".into(),
                path: Path::new(),
            });
        }

        let strategy = {
            let mut cache = self.cache.lock();
            match cache.get(&ty.id()) {
                Some(strategy) => strategy.clone(),
                None => {
                    let strategy = Self::find(ty, handlers, registry);
                    cache.put(ty.id(), strategy.clone());
                    strategy
                }
            }
        };

        match strategy {
            Some(Strategy::Creator(creator)) => Ok(creator.create(ty)),
            Some(Strategy::Default(ctor)) => Ok(ctor.construct()),
            None => Err(BindError::Construction {
                type_path: ty.path().into(),
                reason: "no instance creator and no default construction entry".into(),
                path: Path::new(),
            }),
        }
    }

    fn find(
        ty: &ResolvedType,
        handlers: &HandlerRegistry,
        registry: &TypeRegistry,
    ) -> Option<Strategy> {
        let kind = registry.get_type_info(ty.id()).map(|info| info.kind());
        if let Some(creator) = handlers.lookup_creator(ty, kind) {
            return Some(Strategy::Creator(creator));
        }
        registry
            .get_type_trait::<MetaDefault>(ty.id())
            .cloned()
            .map(Strategy::Default)
    }
}
