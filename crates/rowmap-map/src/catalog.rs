//! Schema arena and type activation.
//!
//! The catalog owns every [`TypeSchema`] the process maps to, keyed by
//! [`TypeName`]. It also answers the activation question: when a caller asks
//! for an abstract type, which concrete type's constructors are used.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use rowmap_model::{Mapped, Result, TypeName, TypeSchema};

/// Resolves a requested target type to the type that is actually constructed.
pub trait Activator: Send + Sync {
    fn implementation_type(&self, requested: &Arc<TypeSchema>) -> Arc<TypeSchema>;
}

/// Activator that constructs every type as itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfActivator;

impl Activator for SelfActivator {
    fn implementation_type(&self, requested: &Arc<TypeSchema>) -> Arc<TypeSchema> {
        Arc::clone(requested)
    }
}

/// Thread-safe store of declared schemas.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    schemas: RwLock<HashMap<TypeName, Arc<TypeSchema>>>,
    implementations: RwLock<HashMap<TypeName, TypeName>>,
    rust_types: RwLock<HashMap<TypeId, TypeName>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a schema, replacing any schema registered under the same name.
    pub fn register(&self, schema: TypeSchema) -> Arc<TypeSchema> {
        let schema = Arc::new(schema);
        tracing::debug!(target_type = %schema.name(), "registered type schema");
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(schema.name().clone(), Arc::clone(&schema));
        schema
    }

    /// Registers the schema a Rust type declares through [`Mapped`].
    ///
    /// The schema is built on the first call for `T`; later calls return the
    /// stored schema.
    pub fn register_type<T: Mapped + 'static>(&self) -> Result<Arc<TypeSchema>> {
        let key = TypeId::of::<T>();
        let known = self
            .rust_types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(schema) = known.and_then(|name| self.get(&name)) {
            return Ok(schema);
        }

        let schema = self.register(T::type_schema()?);
        self.rust_types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, schema.name().clone());
        Ok(schema)
    }

    pub fn get(&self, name: &TypeName) -> Option<Arc<TypeSchema>> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Constructs `implementation` whenever `requested` is materialized.
    pub fn bind_implementation(&self, requested: TypeName, implementation: TypeName) {
        tracing::debug!(%requested, %implementation, "bound implementation type");
        self.implementations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(requested, implementation);
    }

    pub fn len(&self) -> usize {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Activator for TypeCatalog {
    fn implementation_type(&self, requested: &Arc<TypeSchema>) -> Arc<TypeSchema> {
        let bound = self
            .implementations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(requested.name())
            .cloned();
        let Some(implementation) = bound else {
            return Arc::clone(requested);
        };
        match self.get(&implementation) {
            Some(schema) => schema,
            None => {
                tracing::warn!(
                    requested = %requested.name(),
                    %implementation,
                    "implementation type is not registered; constructing requested type"
                );
                Arc::clone(requested)
            }
        }
    }
}
