use serde::{Deserialize, Serialize};

use crate::TypeRef;

/// One column of an active result set.
///
/// Order within a result set is significant: constructor matching compares
/// parameters to columns by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Builds an ordered column list from `(name, type)` pairs.
    pub fn list<I, S>(columns: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (S, TypeRef)>,
        S: Into<String>,
    {
        columns
            .into_iter()
            .map(|(name, ty)| Self::new(name, ty))
            .collect()
    }
}
