pub mod column;
pub mod error;
pub mod ids;
pub mod member;
pub mod schema;
pub mod ty;

pub use column::ColumnDescriptor;
pub use error::{MapError, Result};
pub use ids::TypeName;
pub use member::{MemberMap, MemberTarget};
pub use schema::{
    Constructor, Field, Mapped, Parameter, Property, TypeSchema, TypeSchemaBuilder, Visibility,
};
pub use ty::TypeRef;
