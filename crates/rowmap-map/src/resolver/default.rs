use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use rowmap_model::{
    ColumnDescriptor, Constructor, Field, MemberMap, MemberTarget, Property, Result, TypeSchema,
};

use crate::catalog::Activator;
use crate::normalize::{eq_ignore_case, to_camel_case};

/// Name-driven resolver over a declared schema.
///
/// Members are looked up on the requested type; constructors come from the
/// implementation type the [`Activator`] picked for it.
pub struct DefaultResolver {
    target: Arc<TypeSchema>,
    implementation: Arc<TypeSchema>,
}

impl DefaultResolver {
    pub fn new(target: Arc<TypeSchema>, activator: &dyn Activator) -> Self {
        let implementation = activator.implementation_type(&target);
        Self {
            target,
            implementation,
        }
    }

    pub fn target(&self) -> &TypeSchema {
        &self.target
    }

    pub fn implementation(&self) -> &TypeSchema {
        &self.implementation
    }

    /// True when this resolver was built from exactly these schema instances.
    pub(crate) fn is_built_from(
        &self,
        target: &Arc<TypeSchema>,
        implementation: &Arc<TypeSchema>,
    ) -> bool {
        Arc::ptr_eq(&self.target, target) && Arc::ptr_eq(&self.implementation, implementation)
    }

    /// Returns the first constructor, in accessibility-then-arity order, that
    /// is parameterless or whose parameters match the columns position by
    /// position.
    pub fn find_constructor(&self, columns: &[ColumnDescriptor]) -> Option<&Constructor> {
        let mut candidates: Vec<&Constructor> = self.implementation.constructors().iter().collect();
        candidates.sort_by_key(|ctor| (ctor.visibility.tier(), ctor.arity()));

        let found = candidates.into_iter().find(|ctor| {
            if ctor.is_parameterless() {
                return true;
            }
            ctor.arity() == columns.len()
                && ctor
                    .parameters
                    .iter()
                    .zip(columns)
                    .all(|(parameter, column)| {
                        eq_ignore_case(&parameter.name, &column.name)
                            && parameter.ty.accepts_column(&column.ty)
                    })
        });

        match found {
            Some(ctor) => tracing::debug!(
                target_type = %self.target.name(),
                implementation = %self.implementation.name(),
                arity = ctor.arity(),
                "selected constructor"
            ),
            None => tracing::debug!(
                target_type = %self.target.name(),
                columns = columns.len(),
                "no constructor matches result set"
            ),
        }
        found
    }

    /// Wraps the parameter named like the column (ignoring case).
    ///
    /// A missing parameter surfaces as the invalid-argument error of
    /// [`MemberMap::new`]; the caller decides what that means.
    pub fn get_constructor_parameter(
        &self,
        constructor: &Constructor,
        column_name: &str,
    ) -> Result<MemberMap> {
        let parameter = constructor
            .parameters
            .iter()
            .find(|p| eq_ignore_case(&p.name, column_name))
            .cloned();
        MemberMap::new(column_name, parameter.map(MemberTarget::Parameter))
    }

    pub fn get_member(&self, column_name: &str) -> Result<Option<MemberMap>> {
        match find_member_target(&self.target, column_name) {
            Some(target) => MemberMap::new(column_name, Some(target)).map(Some),
            None => {
                tracing::trace!(
                    target_type = %self.target.name(),
                    column = column_name,
                    "column has no matching member"
                );
                Ok(None)
            }
        }
    }
}

impl fmt::Debug for DefaultResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultResolver")
            .field("target", self.target.name())
            .field("implementation", self.implementation.name())
            .finish()
    }
}

/// Finds the member a column should be written through.
///
/// Settable instance properties are searched first, then instance fields.
/// Each search tries the column name exactly, then ignoring case, then the
/// camel-cased column name exactly and ignoring case.
pub fn find_member_target(schema: &TypeSchema, column_name: &str) -> Option<MemberTarget> {
    let camel = OnceCell::new();
    if let Some(property) = lookup(
        schema.settable_properties(),
        property_name,
        column_name,
        &camel,
    ) {
        return Some(MemberTarget::Property(property.clone()));
    }
    lookup(schema.instance_fields(), field_name, column_name, &camel)
        .map(|field| MemberTarget::Field(field.clone()))
}

fn property_name(property: &Property) -> &str {
    &property.name
}

fn field_name(field: &Field) -> &str {
    &field.name
}

fn lookup<'a, T, I>(
    members: I,
    name_of: fn(&T) -> &str,
    column_name: &str,
    camel: &OnceCell<String>,
) -> Option<&'a T>
where
    T: 'a,
    I: Iterator<Item = &'a T> + Clone,
{
    find_by_name(members.clone(), name_of, column_name).or_else(|| {
        let normalized = camel.get_or_init(|| to_camel_case(column_name));
        find_by_name(members, name_of, normalized)
    })
}

fn find_by_name<'a, T, I>(mut members: I, name_of: fn(&T) -> &str, name: &str) -> Option<&'a T>
where
    T: 'a,
    I: Iterator<Item = &'a T> + Clone,
{
    members
        .clone()
        .find(|m| name_of(m) == name)
        .or_else(|| members.find(|m| eq_ignore_case(name_of(m), name)))
}
