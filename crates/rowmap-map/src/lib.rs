//! Resolution of result-set columns to members of target types.
//!
//! The flow a materializer follows:
//!
//! 1. Ask the [`MappingRegistry`] for the [`TypeMap`] of the target type.
//! 2. Ask it for a constructor given the result set's columns.
//! 3. Bind each column to a constructor parameter or, failing that, to a
//!    property or field.
//!
//! [`MappingPlan::build`] runs steps 2 and 3 for a whole result set.

#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod normalize;
pub mod plan;
pub mod registry;
pub mod resolver;

pub use catalog::{Activator, SelfActivator, TypeCatalog};
pub use config::{ConfigError, MappingConfig};
pub use normalize::to_camel_case;
pub use plan::{ColumnPlan, MappingPlan};
pub use registry::MappingRegistry;
pub use resolver::{CustomResolver, DefaultResolver, MemberSelector, TypeMap, find_member_target};
