use std::fmt;
use std::sync::Arc;

use rowmap_model::{
    ColumnDescriptor, Constructor, MapError, MemberMap, MemberTarget, Result, TypeSchema,
};

/// Caller-supplied column-to-member selection.
///
/// Receives the target schema and a column name; returns the member the
/// column maps to, or `None` to leave the column unmapped.
pub type MemberSelector = Arc<dyn Fn(&TypeSchema, &str) -> Option<MemberTarget> + Send + Sync>;

/// Resolver driven entirely by a [`MemberSelector`].
///
/// Instances are always default-constructed and then populated member by
/// member, so constructor parameters are never resolved.
pub struct CustomResolver {
    target: Arc<TypeSchema>,
    selector: MemberSelector,
}

impl CustomResolver {
    pub fn new<F>(target: Arc<TypeSchema>, selector: F) -> Self
    where
        F: Fn(&TypeSchema, &str) -> Option<MemberTarget> + Send + Sync + 'static,
    {
        Self::with_selector(target, Arc::new(selector))
    }

    pub fn with_selector(target: Arc<TypeSchema>, selector: MemberSelector) -> Self {
        Self { target, selector }
    }

    pub fn target(&self) -> &TypeSchema {
        &self.target
    }

    /// The public parameterless constructor of the target, whatever the columns.
    pub fn find_constructor(&self, _columns: &[ColumnDescriptor]) -> Option<&Constructor> {
        self.target.default_constructor()
    }

    pub fn get_constructor_parameter(
        &self,
        _constructor: &Constructor,
        _column_name: &str,
    ) -> Result<MemberMap> {
        Err(MapError::UnsupportedOperation(
            "custom resolvers do not map constructor parameters",
        ))
    }

    pub fn get_member(&self, column_name: &str) -> Result<Option<MemberMap>> {
        match (self.selector)(&self.target, column_name) {
            Some(target) => MemberMap::new(column_name, Some(target)).map(Some),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for CustomResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomResolver")
            .field("target", self.target.name())
            .finish_non_exhaustive()
    }
}
