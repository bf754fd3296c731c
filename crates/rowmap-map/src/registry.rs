//! Per-type resolver cache.
//!
//! A [`MappingRegistry`] is created once at startup, handed by reference to
//! every materialization call site, and filled on demand. Overrides should be
//! registered before concurrent reads begin; after that the last write for a
//! type wins.
//!
//! Default resolvers snapshot the schemas they were built from. A cached
//! default resolver is rebuilt when the catalog has since replaced the
//! type's schema or rebound its implementation. Overrides are kept as
//! registered.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use rowmap_model::{MapError, Mapped, MemberTarget, Result, TypeName, TypeSchema};

use crate::catalog::{Activator, TypeCatalog};
use crate::resolver::{CustomResolver, DefaultResolver, TypeMap};

#[derive(Debug)]
struct Slot {
    resolver: Arc<TypeMap>,
    /// Registered explicitly rather than created on first use.
    pinned: bool,
}

#[derive(Debug, Default)]
pub struct MappingRegistry {
    catalog: Arc<TypeCatalog>,
    entries: RwLock<HashMap<TypeName, Slot>>,
}

impl MappingRegistry {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            catalog,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    /// Returns the resolver bound to `ty`, creating a [`DefaultResolver`] on
    /// first use.
    ///
    /// Two threads racing on first use may both build a resolver; only the
    /// first insert is kept. Fails with [`MapError::UnknownType`] when the
    /// catalog has no schema for `ty`.
    pub fn resolver_for(&self, ty: &TypeName) -> Result<Arc<TypeMap>> {
        let cached = self.cached(ty);
        if let Some((resolver, true)) = &cached {
            return Ok(Arc::clone(resolver));
        }

        let schema = self
            .catalog
            .get(ty)
            .ok_or_else(|| MapError::UnknownType(ty.to_string()))?;
        let implementation = self.catalog.implementation_type(&schema);
        if let Some((resolver, _)) = cached
            && is_current(&resolver, &schema, &implementation)
        {
            return Ok(resolver);
        }

        let created = Arc::new(TypeMap::Default(DefaultResolver::new(
            Arc::clone(&schema),
            self.catalog.as_ref(),
        )));

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = entries.get(ty)
            && (slot.pinned || is_current(&slot.resolver, &schema, &implementation))
        {
            return Ok(Arc::clone(&slot.resolver));
        }
        tracing::debug!(target_type = %ty, "created default resolver");
        entries.insert(
            ty.clone(),
            Slot {
                resolver: Arc::clone(&created),
                pinned: false,
            },
        );
        Ok(created)
    }

    /// Resolver for a Rust type that declares its schema through [`Mapped`].
    pub fn resolver_for_type<T: Mapped + 'static>(&self) -> Result<Arc<TypeMap>> {
        let schema = self.catalog.register_type::<T>()?;
        self.resolver_for(schema.name())
    }

    /// Binds `resolver` to its target type, replacing any cached resolver.
    pub fn register(&self, resolver: impl Into<TypeMap>) -> Option<Arc<TypeMap>> {
        let resolver = Arc::new(resolver.into());
        let ty = resolver.target_name().clone();
        tracing::debug!(target_type = %ty, custom = resolver.is_custom(), "registered resolver override");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                ty,
                Slot {
                    resolver,
                    pinned: true,
                },
            )
            .map(|slot| slot.resolver)
    }

    /// Installs a [`CustomResolver`] for a catalogued type.
    pub fn register_custom<F>(&self, ty: &TypeName, selector: F) -> Result<()>
    where
        F: Fn(&TypeSchema, &str) -> Option<MemberTarget> + Send + Sync + 'static,
    {
        let schema = self
            .catalog
            .get(ty)
            .ok_or_else(|| MapError::UnknownType(ty.to_string()))?;
        self.register(CustomResolver::new(schema, selector));
        Ok(())
    }

    pub fn contains(&self, ty: &TypeName) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(ty)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cached(&self, ty: &TypeName) -> Option<(Arc<TypeMap>, bool)> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
            .map(|slot| (Arc::clone(&slot.resolver), slot.pinned))
    }
}

fn is_current(
    resolver: &TypeMap,
    schema: &Arc<TypeSchema>,
    implementation: &Arc<TypeSchema>,
) -> bool {
    match resolver {
        TypeMap::Default(default) => default.is_built_from(schema, implementation),
        TypeMap::Custom(_) => false,
    }
}
