//! JSON mapping configuration.
//!
//! A configuration declares type schemas, binds abstract types to their
//! implementations, and lists per-type column aliases:
//!
//! ```json
//! {
//!   "types": [{ "name": "Customer", "properties": [{ "name": "CustomerId", "type": "i32" }] }],
//!   "implementations": { "ICustomer": "Customer" },
//!   "aliases": { "Customer": { "CUST_NO": "CustomerId" } }
//! }
//! ```
//!
//! Aliased types get a [`CustomResolver`](crate::CustomResolver) that sends
//! aliased columns to the named member and every other column through the
//! default member search.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rowmap_model::{MapError, MemberTarget, TypeName, TypeSchema};

use crate::normalize::eq_ignore_case;
use crate::registry::MappingRegistry;
use crate::resolver::find_member_target;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid mapping config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Map(#[from] MapError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default)]
    pub types: Vec<TypeSchema>,
    /// Requested type name -> implementation type name.
    #[serde(default)]
    pub implementations: BTreeMap<String, String>,
    /// Type name -> (column name -> member name).
    #[serde(default)]
    pub aliases: BTreeMap<String, BTreeMap<String, String>>,
}

impl MappingConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping config: {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Failed to parse mapping config: {}", path.display()))
    }

    /// Builds a fresh registry populated from this configuration.
    pub fn into_registry(self) -> Result<MappingRegistry, ConfigError> {
        let registry = MappingRegistry::default();
        self.apply(&registry)?;
        Ok(registry)
    }

    /// Registers schemas, implementation bindings and alias resolvers.
    ///
    /// The whole configuration is checked before anything is registered, so
    /// a rejected configuration leaves `registry` untouched. Aliases must
    /// name a member the type declares, either in this configuration or in
    /// the catalog already.
    pub fn apply(&self, registry: &MappingRegistry) -> Result<(), ConfigError> {
        let catalog = registry.catalog();

        let bindings = self
            .implementations
            .iter()
            .map(|(requested, implementation)| -> Result<_, MapError> {
                Ok((
                    TypeName::new(requested.as_str())?,
                    TypeName::new(implementation.as_str())?,
                ))
            })
            .collect::<Result<Vec<_>, MapError>>()?;

        let mut aliased = Vec::with_capacity(self.aliases.len());
        for (type_name, aliases) in &self.aliases {
            let ty = TypeName::new(type_name.as_str())?;
            match self.types.iter().rev().find(|schema| schema.name() == &ty) {
                Some(schema) => check_aliases(schema, aliases)?,
                None => {
                    let schema = catalog
                        .get(&ty)
                        .ok_or_else(|| MapError::UnknownType(ty.to_string()))?;
                    check_aliases(&schema, aliases)?;
                }
            }
            let aliases: Vec<(String, String)> = aliases
                .iter()
                .map(|(column, member)| (column.clone(), member.clone()))
                .collect();
            aliased.push((ty, aliases));
        }

        for schema in &self.types {
            catalog.register(schema.clone());
        }
        for (requested, implementation) in bindings {
            catalog.bind_implementation(requested, implementation);
        }
        for (ty, aliases) in aliased {
            registry.register_custom(&ty, move |schema, column| {
                match aliases.iter().find(|(alias, _)| eq_ignore_case(alias, column)) {
                    Some((_, member)) => declared_member(schema, member),
                    None => find_member_target(schema, column),
                }
            })?;
        }

        tracing::info!(
            types = self.types.len(),
            implementations = self.implementations.len(),
            aliased_types = self.aliases.len(),
            "applied mapping config"
        );
        Ok(())
    }
}

fn check_aliases(schema: &TypeSchema, aliases: &BTreeMap<String, String>) -> Result<(), MapError> {
    for (column, member) in aliases {
        if declared_member(schema, member).is_none() {
            return Err(MapError::invalid_argument(
                "alias",
                format!(
                    "{} has no settable member {member:?} for column {column:?}",
                    schema.name()
                ),
            ));
        }
    }
    Ok(())
}

/// The settable property, else the instance field, declared with `name`.
fn declared_member(schema: &TypeSchema, name: &str) -> Option<MemberTarget> {
    if let Some(property) = schema.settable_properties().find(|p| p.name == name) {
        return Some(MemberTarget::Property(property.clone()));
    }
    schema
        .instance_fields()
        .find(|f| f.name == name)
        .map(|field| MemberTarget::Field(field.clone()))
}
