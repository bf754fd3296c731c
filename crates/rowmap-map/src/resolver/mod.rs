//! Resolvers decide how result-set columns reach the members of a type.
//!
//! [`TypeMap`] is the single entry point the materializer talks to. It wraps
//! one of two strategies:
//!
//! - [`DefaultResolver`] searches the declared schema by name, retrying with
//!   the camel-cased column name, and picks constructors positionally.
//! - [`CustomResolver`] delegates member selection to a caller-supplied
//!   function and always default-constructs.

mod custom;
mod default;

pub use custom::{CustomResolver, MemberSelector};
pub use default::{DefaultResolver, find_member_target};

use rowmap_model::{ColumnDescriptor, Constructor, MemberMap, Result, TypeName, TypeSchema};

/// A resolver bound to one target type.
#[derive(Debug)]
pub enum TypeMap {
    Default(DefaultResolver),
    Custom(CustomResolver),
}

impl TypeMap {
    /// The requested target type.
    pub fn target(&self) -> &TypeSchema {
        match self {
            Self::Default(resolver) => resolver.target(),
            Self::Custom(resolver) => resolver.target(),
        }
    }

    pub fn target_name(&self) -> &TypeName {
        self.target().name()
    }

    /// Picks the constructor to invoke for a result set with these columns.
    ///
    /// `None` means no constructor fits; the caller default-constructs and
    /// populates members instead.
    pub fn find_constructor(&self, columns: &[ColumnDescriptor]) -> Option<&Constructor> {
        match self {
            Self::Default(resolver) => resolver.find_constructor(columns),
            Self::Custom(resolver) => resolver.find_constructor(columns),
        }
    }

    /// Maps a column onto a parameter of a constructor chosen by
    /// [`Self::find_constructor`].
    pub fn get_constructor_parameter(
        &self,
        constructor: &Constructor,
        column_name: &str,
    ) -> Result<MemberMap> {
        match self {
            Self::Default(resolver) => resolver.get_constructor_parameter(constructor, column_name),
            Self::Custom(resolver) => resolver.get_constructor_parameter(constructor, column_name),
        }
    }

    /// Maps a column onto a property or field. `Ok(None)` marks the column as
    /// unmapped.
    pub fn get_member(&self, column_name: &str) -> Result<Option<MemberMap>> {
        match self {
            Self::Default(resolver) => resolver.get_member(column_name),
            Self::Custom(resolver) => resolver.get_member(column_name),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl From<DefaultResolver> for TypeMap {
    fn from(value: DefaultResolver) -> Self {
        Self::Default(value)
    }
}

impl From<CustomResolver> for TypeMap {
    fn from(value: CustomResolver) -> Self {
        Self::Custom(value)
    }
}
