//! Column-to-member bindings produced by resolvers.

use serde::{Deserialize, Serialize};

use crate::{Field, MapError, Parameter, Property, Result, TypeRef};

/// The member a column is written through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberTarget {
    Property(Property),
    Field(Field),
    Parameter(Parameter),
}

impl MemberTarget {
    pub fn name(&self) -> &str {
        match self {
            Self::Property(p) => &p.name,
            Self::Field(f) => &f.name,
            Self::Parameter(p) => &p.name,
        }
    }

    pub fn ty(&self) -> &TypeRef {
        match self {
            Self::Field(f) => &f.ty,
            Self::Property(p) => &p.ty,
            Self::Parameter(p) => &p.ty,
        }
    }
}

impl From<Property> for MemberTarget {
    fn from(value: Property) -> Self {
        Self::Property(value)
    }
}

impl From<Field> for MemberTarget {
    fn from(value: Field) -> Self {
        Self::Field(value)
    }
}

impl From<Parameter> for MemberTarget {
    fn from(value: Parameter) -> Self {
        Self::Parameter(value)
    }
}

/// Binds one result-set column to exactly one member of the target type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberMap {
    column_name: String,
    target: MemberTarget,
}

impl MemberMap {
    /// Fails with [`MapError::InvalidArgument`] when the column name is empty
    /// or no member was supplied.
    pub fn new(column_name: impl Into<String>, target: Option<MemberTarget>) -> Result<Self> {
        let column_name = column_name.into();
        if column_name.is_empty() {
            return Err(MapError::invalid_argument(
                "column_name",
                "column name is required",
            ));
        }
        let Some(target) = target else {
            return Err(MapError::invalid_argument(
                "member",
                format!("no member supplied for column {column_name:?}"),
            ));
        };
        Ok(Self {
            column_name,
            target,
        })
    }

    pub fn property(column_name: impl Into<String>, property: Property) -> Result<Self> {
        Self::new(column_name, Some(property.into()))
    }

    pub fn field(column_name: impl Into<String>, field: Field) -> Result<Self> {
        Self::new(column_name, Some(field.into()))
    }

    pub fn parameter(column_name: impl Into<String>, parameter: Parameter) -> Result<Self> {
        Self::new(column_name, Some(parameter.into()))
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn target(&self) -> &MemberTarget {
        &self.target
    }

    /// Declared type of the bound member.
    pub fn member_type(&self) -> &TypeRef {
        self.target.ty()
    }

    pub fn as_property(&self) -> Option<&Property> {
        match &self.target {
            MemberTarget::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&Field> {
        match &self.target {
            MemberTarget::Field(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&Parameter> {
        match &self.target {
            MemberTarget::Parameter(p) => Some(p),
            _ => None,
        }
    }
}
