use core::any::TypeId;
use core::num::NonZeroUsize;
use std::sync::Arc;

use hashbrown::HashMap;
use lru::LruCache;
use parking_lot::Mutex;

use ojson_reflect::Reflect;
use ojson_reflect::info::{DeclaredType, FieldInfo, ResolvedType, StructInfo};
use ojson_reflect::registry::TypeRegistry;

use crate::algebra;
use crate::exclude::ExclusionStrategy;
use crate::naming::KeyNaming;

// -----------------------------------------------------------------------------
// FieldDescriptor

/// One convertible field of a concrete type, fully prepared for traversal.
///
/// Built once per type when the catalog first sees it: the document key is
/// already computed, the access path already walks any flattened embeddings,
/// and the declaring context is the instantiation the declared type must be
/// closed against. The declared type itself stays open here; the traverser
/// closes it per visit through the type algebra.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    template: FieldInfo,
    key: Box<str>,
    declaring: ResolvedType,
    access_path: Box<[&'static str]>,
}

impl FieldDescriptor {
    /// The source (pre-policy) field name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.template.name()
    }

    /// The document key (naming policy applied).
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The registration-time template this descriptor was built from.
    #[inline]
    pub fn template(&self) -> &FieldInfo {
        &self.template
    }

    /// The declared (possibly open) type.
    #[inline]
    pub fn declared(&self) -> &DeclaredType {
        self.template.declared()
    }

    /// The instantiation this field's declared type is closed against.
    #[inline]
    pub fn declaring(&self) -> &ResolvedType {
        &self.declaring
    }

    /// Closes the declared type for this visit.
    #[inline]
    pub fn resolve(&self) -> ResolvedType {
        algebra::resolve(self.template.declared(), &self.declaring)
    }

    /// Reads this field out of `value`, walking flattened embeddings.
    pub fn field_of<'a>(&self, value: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        let mut current = value;
        for name in &self.access_path {
            current = current.reflect_ref().as_struct()?.field(name)?;
        }
        Some(current)
    }

    /// Reaches this field inside `value` mutably, walking flattened
    /// embeddings.
    pub fn field_mut_of<'a>(&self, value: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        let mut current = value;
        for name in &self.access_path {
            current = current.reflect_mut().into_struct()?.field_mut(name)?;
        }
        Some(current)
    }
}

// -----------------------------------------------------------------------------
// CatalogEntry

/// The prepared field set of one concrete type.
#[derive(Debug, Default)]
pub struct CatalogEntry {
    fields: Vec<FieldDescriptor>,
    by_key: HashMap<Box<str>, usize>,
}

impl CatalogEntry {
    /// The convertible fields, declaration order, flattened embeddings
    /// inlined at their embed point.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Finds the field behind a document key.
    pub fn by_key(&self, key: &str) -> Option<&FieldDescriptor> {
        self.by_key.get(key).map(|index| &self.fields[*index])
    }

    fn push(&mut self, descriptor: FieldDescriptor) {
        // First registration wins on key collisions between flatten levels.
        if !self.by_key.contains_key(&descriptor.key) {
            self.by_key
                .insert(descriptor.key.clone(), self.fields.len());
            self.fields.push(descriptor);
        }
    }
}

// -----------------------------------------------------------------------------
// FieldCatalog

/// The shared, bounded cache of prepared field sets.
///
/// The exclusion pipeline and the naming policy run exactly once per type,
/// here; traversal afterwards only reads descriptors. The cache is keyed by
/// the concrete instantiation's [`TypeId`] and shared by every conversion on
/// the engine, so it is bounded (LRU) and internally locked.
pub struct FieldCatalog {
    naming: KeyNaming,
    exclusions: Vec<Arc<dyn ExclusionStrategy>>,
    cache: Mutex<LruCache<TypeId, Arc<CatalogEntry>>>,
}

impl FieldCatalog {
    /// Creates a catalog with the engine's policy set.
    pub fn new(
        capacity: usize,
        naming: KeyNaming,
        exclusions: Vec<Arc<dyn ExclusionStrategy>>,
    ) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            naming,
            exclusions,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the prepared field set of `ty`, building it on first sight.
    ///
    /// `info` is the struct metadata of `ty` (callers have it at hand from
    /// either the value or the registry); `registry` supplies the metadata of
    /// flattened embeddings.
    pub fn entry(
        &self,
        ty: &ResolvedType,
        info: &StructInfo,
        registry: &TypeRegistry,
    ) -> Arc<CatalogEntry> {
        // The unresolved stand-in shares one TypeId across all types; its
        // entries must not land in the shared cache.
        let cacheable = !ty.is_unresolved();
        if cacheable {
            if let Some(entry) = self.cache.lock().get(&ty.id()) {
                return Arc::clone(entry);
            }
        }

        let mut entry = CatalogEntry::default();
        let mut access_path = Vec::new();
        self.collect(ty, info, registry, &mut access_path, &mut entry);
        log::debug!(
            "catalog built for `{}`: {} field(s)",
            ty.path(),
            entry.fields().len()
        );

        let entry = Arc::new(entry);
        if cacheable {
            self.cache.lock().put(ty.id(), Arc::clone(&entry));
        }
        entry
    }

    fn collect(
        &self,
        declaring: &ResolvedType,
        info: &StructInfo,
        registry: &TypeRegistry,
        access_path: &mut Vec<&'static str>,
        entry: &mut CatalogEntry,
    ) {
        for template in info.fields() {
            if template.is_flatten() {
                let embedded = algebra::resolve(template.declared(), declaring);
                let embedded_info = registry
                    .get_type_info(embedded.id())
                    .and_then(|info| info.as_struct());
                match embedded_info {
                    Some(embedded_info) => {
                        access_path.push(template.name());
                        self.collect(&embedded, embedded_info, registry, access_path, entry);
                        access_path.pop();
                    }
                    None => {
                        log::warn!(
                            "flattened field `{}` of `{}` is not a registered struct; \
                             treating it as a plain field",
                            template.name(),
                            declaring.path()
                        );
                        self.push_plain(template, declaring, access_path, entry);
                    }
                }
            } else {
                self.push_plain(template, declaring, access_path, entry);
            }
        }
    }

    fn push_plain(
        &self,
        template: &FieldInfo,
        declaring: &ResolvedType,
        access_path: &[&'static str],
        entry: &mut CatalogEntry,
    ) {
        let mut path = Vec::with_capacity(access_path.len() + 1);
        path.extend_from_slice(access_path);
        path.push(template.name());

        let descriptor = FieldDescriptor {
            template: template.clone(),
            key: self.naming.apply(template.name()).into_boxed_str(),
            declaring: declaring.clone(),
            access_path: path.into_boxed_slice(),
        };

        if self.is_excluded(&descriptor) {
            return;
        }
        entry.push(descriptor);
    }

    // The pipeline is a disjunction: any strategy vetoing the field, or its
    // resolved type, drops it.
    fn is_excluded(&self, descriptor: &FieldDescriptor) -> bool {
        if self.exclusions.is_empty() {
            return false;
        }
        let field_type = descriptor.resolve();
        self.exclusions
            .iter()
            .any(|strategy| strategy.skip_field(descriptor) || strategy.skip_type(&field_type))
    }
}
