//! Ahead-of-time type schemas.
//!
//! A [`TypeSchema`] lists everything the resolver needs to know about a target
//! type: its constructors in declaration order, its properties and its fields.
//! Schemas are declared once (through [`TypeSchemaBuilder`], the [`Mapped`]
//! trait, or JSON) and validated when built.

use serde::{Deserialize, Serialize};

use crate::{MapError, Result, TypeName, TypeRef};

/// Declared accessibility of a constructor or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
}

impl Visibility {
    /// Ordering tier used when ranking constructors: public first, private last.
    pub fn tier(self) -> u8 {
        match self {
            Self::Public => 0,
            Self::Protected | Self::Internal => 1,
            Self::Private => 2,
        }
    }
}

/// A constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Zero-based position within the owning constructor.
    #[serde(skip)]
    pub position: usize,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            position: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ConstructorDef")]
pub struct Constructor {
    pub visibility: Visibility,
    pub parameters: Vec<Parameter>,
}

#[derive(Deserialize)]
struct ConstructorDef {
    #[serde(default)]
    visibility: Visibility,
    #[serde(default)]
    parameters: Vec<Parameter>,
}

impl From<ConstructorDef> for Constructor {
    fn from(def: ConstructorDef) -> Self {
        Self::new(def.visibility, def.parameters)
    }
}

impl Constructor {
    pub fn new(visibility: Visibility, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        let mut ctor = Self {
            visibility,
            parameters: parameters.into_iter().collect(),
        };
        ctor.renumber();
        ctor
    }

    pub fn public(parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self::new(Visibility::Public, parameters)
    }

    pub fn private(parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self::new(Visibility::Private, parameters)
    }

    /// A public constructor taking no arguments.
    pub fn default_public() -> Self {
        Self::public([])
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_parameterless(&self) -> bool {
        self.parameters.is_empty()
    }

    fn renumber(&mut self) {
        for (position, parameter) in self.parameters.iter_mut().enumerate() {
            parameter.position = position;
        }
    }
}

fn default_setter() -> Option<Visibility> {
    Some(Visibility::Public)
}

/// A property with an optional setter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub visibility: Visibility,
    /// Setter accessibility; `None` for get-only properties.
    #[serde(default = "default_setter")]
    pub setter: Option<Visibility>,
    #[serde(default)]
    pub is_static: bool,
}

impl Property {
    /// A public instance property with a public setter.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: Visibility::Public,
            setter: default_setter(),
            is_static: false,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_setter(mut self, setter: Visibility) -> Self {
        self.setter = Some(setter);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.setter = None;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// True for instance properties that have a setter of any accessibility.
    pub fn is_settable(&self) -> bool {
        !self.is_static && self.setter.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// The declared shape of a target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TypeSchemaDef")]
pub struct TypeSchema {
    name: TypeName,
    constructors: Vec<Constructor>,
    properties: Vec<Property>,
    fields: Vec<Field>,
}

impl TypeSchema {
    pub fn builder(name: impl Into<String>) -> TypeSchemaBuilder {
        TypeSchemaBuilder {
            name: name.into(),
            constructors: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Constructors in declaration order.
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Instance properties that can be written, in declaration order.
    pub fn settable_properties(&self) -> impl Iterator<Item = &Property> + Clone {
        self.properties.iter().filter(|p| p.is_settable())
    }

    pub fn instance_fields(&self) -> impl Iterator<Item = &Field> + Clone {
        self.fields.iter().filter(|f| !f.is_static)
    }

    /// The public parameterless constructor, if one is declared.
    pub fn default_constructor(&self) -> Option<&Constructor> {
        self.constructors
            .iter()
            .find(|c| c.visibility == Visibility::Public && c.is_parameterless())
    }
}

/// Incremental declaration of a [`TypeSchema`].
#[derive(Debug, Clone)]
pub struct TypeSchemaBuilder {
    name: String,
    constructors: Vec<Constructor>,
    properties: Vec<Property>,
    fields: Vec<Field>,
}

impl TypeSchemaBuilder {
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn default_constructor(self) -> Self {
        self.constructor(Constructor::default_public())
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates names and fixes parameter positions.
    pub fn build(self) -> Result<TypeSchema> {
        let name = TypeName::new(self.name)?;

        let mut constructors = self.constructors;
        for ctor in &mut constructors {
            for parameter in &ctor.parameters {
                require_member_name("parameter", &name, &parameter.name)?;
            }
            ctor.renumber();
        }
        for property in &self.properties {
            require_member_name("property", &name, &property.name)?;
        }
        for field in &self.fields {
            require_member_name("field", &name, &field.name)?;
        }

        Ok(TypeSchema {
            name,
            constructors,
            properties: self.properties,
            fields: self.fields,
        })
    }
}

fn require_member_name(kind: &'static str, owner: &TypeName, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MapError::invalid_argument(
            kind,
            format!("{owner} declares a {kind} with an empty name"),
        ));
    }
    Ok(())
}

#[derive(Deserialize)]
struct TypeSchemaDef {
    name: String,
    #[serde(default)]
    constructors: Vec<Constructor>,
    #[serde(default)]
    properties: Vec<Property>,
    #[serde(default)]
    fields: Vec<Field>,
}

impl TryFrom<TypeSchemaDef> for TypeSchema {
    type Error = MapError;

    fn try_from(def: TypeSchemaDef) -> Result<Self> {
        TypeSchemaBuilder {
            name: def.name,
            constructors: def.constructors,
            properties: def.properties,
            fields: def.fields,
        }
        .build()
    }
}

/// A Rust type that carries its own mapping schema.
pub trait Mapped {
    fn type_schema() -> Result<TypeSchema>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_numbers_parameters() {
        let schema = TypeSchema::builder("Order")
            .constructor(Constructor::public([
                Parameter::new("id", TypeRef::I64),
                Parameter::new("total", TypeRef::Decimal),
            ]))
            .build()
            .unwrap();
        let positions: Vec<usize> = schema.constructors()[0]
            .parameters
            .iter()
            .map(|p| p.position)
            .collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn build_rejects_empty_member_names() {
        let err = TypeSchema::builder("Order")
            .property(Property::new("  ", TypeRef::I32))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidArgument {
                name: "property",
                ..
            }
        ));
    }

    #[test]
    fn build_rejects_empty_type_name() {
        assert!(TypeSchema::builder("").build().is_err());
    }

    #[test]
    fn settable_properties_skip_getters_and_statics() {
        let schema = TypeSchema::builder("Order")
            .property(Property::new("Id", TypeRef::I64))
            .property(Property::new("Total", TypeRef::Decimal).read_only())
            .property(Property::new("Count", TypeRef::I32).static_member())
            .property(
                Property::new("Note", TypeRef::String)
                    .with_visibility(Visibility::Private)
                    .with_setter(Visibility::Private),
            )
            .build()
            .unwrap();
        let names: Vec<&str> = schema
            .settable_properties()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Id", "Note"]);
    }

    #[test]
    fn deserialized_constructor_numbers_parameters() {
        let ctor: Constructor = serde_json::from_str(
            r#"{ "parameters": [
                { "name": "id", "type": "i64" },
                { "name": "total", "type": "decimal" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(ctor.visibility, Visibility::Public);
        let positions: Vec<usize> = ctor.parameters.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn default_constructor_must_be_public() {
        let schema = TypeSchema::builder("Order")
            .constructor(Constructor::private([]))
            .build()
            .unwrap();
        assert!(schema.default_constructor().is_none());
    }
}
