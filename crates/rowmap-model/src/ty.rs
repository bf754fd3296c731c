//! Semantic types shared by result-set columns and target members.
//!
//! Columns report the type the data source declared; members report the type
//! they will be written as. The two meet in [`TypeRef::accepts_column`], which
//! encodes the coercions positional constructor matching tolerates.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypeName;

/// A column or member type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    String,
    /// Raw byte array as returned by the data source.
    Bytes,
    Uuid,
    DateTime,
    /// Binary blob wrapper type; accepts `Bytes` columns.
    Binary,
    /// A member that may hold no value.
    Nullable(Box<TypeRef>),
    /// An enumeration stored as its integral representation.
    Enum { name: String, repr: Box<TypeRef> },
    /// Any other declared type, such as a nested record.
    Named(TypeName),
}

impl TypeRef {
    pub fn nullable(inner: TypeRef) -> Self {
        Self::Nullable(Box::new(inner))
    }

    pub fn enumeration(name: impl Into<String>, repr: TypeRef) -> Self {
        Self::Enum {
            name: name.into(),
            repr: Box::new(repr),
        }
    }

    /// Strips one level of `Nullable`.
    pub fn unwrap_nullable(&self) -> &TypeRef {
        match self {
            Self::Nullable(inner) => inner.as_ref(),
            other => other,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// Returns true if a column declared as `column` can be bound to a member
    /// of this type without conversion.
    ///
    /// Accepted: a `Binary` member for a `Bytes` column, an exact match after
    /// removing `Nullable`, an enum whose representation equals the column
    /// type, and a `Char` member for a `String` column.
    pub fn accepts_column(&self, column: &TypeRef) -> bool {
        if *column == TypeRef::Bytes && *self == TypeRef::Binary {
            return true;
        }
        let unboxed = self.unwrap_nullable();
        if unboxed == column {
            return true;
        }
        match unboxed {
            Self::Enum { repr, .. } => repr.as_ref() == column,
            Self::Char => *column == TypeRef::String,
            _ => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Char => f.write_str("char"),
            Self::I8 => f.write_str("i8"),
            Self::I16 => f.write_str("i16"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
            Self::U8 => f.write_str("u8"),
            Self::U16 => f.write_str("u16"),
            Self::U32 => f.write_str("u32"),
            Self::U64 => f.write_str("u64"),
            Self::F32 => f.write_str("f32"),
            Self::F64 => f.write_str("f64"),
            Self::Decimal => f.write_str("decimal"),
            Self::String => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::Uuid => f.write_str("uuid"),
            Self::DateTime => f.write_str("datetime"),
            Self::Binary => f.write_str("binary"),
            Self::Nullable(inner) => write!(f, "{inner}?"),
            Self::Enum { name, repr } => write!(f, "{name}({repr})"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_member_accepts_inner_column() {
        let ty = TypeRef::nullable(TypeRef::I32);
        assert!(ty.accepts_column(&TypeRef::I32));
        assert!(!ty.accepts_column(&TypeRef::I64));
    }

    #[test]
    fn enum_member_accepts_its_representation() {
        let status = TypeRef::enumeration("Status", TypeRef::I16);
        assert!(status.accepts_column(&TypeRef::I16));
        assert!(!status.accepts_column(&TypeRef::I32));
        assert!(TypeRef::nullable(status).accepts_column(&TypeRef::I16));
    }

    #[test]
    fn char_and_binary_special_cases() {
        assert!(TypeRef::Char.accepts_column(&TypeRef::String));
        assert!(!TypeRef::String.accepts_column(&TypeRef::Char));
        assert!(TypeRef::Binary.accepts_column(&TypeRef::Bytes));
        assert!(TypeRef::Bytes.accepts_column(&TypeRef::Bytes));
    }

    #[test]
    fn uuid_member_rejects_integer_column() {
        assert!(!TypeRef::Uuid.accepts_column(&TypeRef::I32));
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(TypeRef::nullable(TypeRef::I32).to_string(), "i32?");
        assert_eq!(
            TypeRef::enumeration("Status", TypeRef::U8).to_string(),
            "Status(u8)"
        );
    }
}
