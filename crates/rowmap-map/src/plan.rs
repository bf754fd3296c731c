//! Result-set shape resolution.
//!
//! A materializer resolves a result set once per shape, not once per row:
//! pick the constructor, then bind every column either to one of its
//! parameters or to a property/field. [`MappingPlan`] is that outcome.

use std::fmt;

use rowmap_model::{ColumnDescriptor, Constructor, MemberMap, MemberTarget, Result, TypeName};

use crate::resolver::TypeMap;

/// How a single column is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    /// Position of the column in the result set.
    pub index: usize,
    pub column: ColumnDescriptor,
    /// `None` when no member receives the column.
    pub member: Option<MemberMap>,
}

impl ColumnPlan {
    /// True when the column's declared type cannot be written to the member
    /// without conversion. Unmapped columns are never incompatible.
    pub fn is_incompatible(&self) -> bool {
        self.member
            .as_ref()
            .is_some_and(|member| !member.member_type().accepts_column(&self.column.ty))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingPlan {
    pub target: TypeName,
    /// Constructor to invoke; `None` when no declared constructor fits.
    pub constructor: Option<Constructor>,
    pub columns: Vec<ColumnPlan>,
}

impl MappingPlan {
    /// Resolves every column of a result set against `resolver`.
    ///
    /// When the selected constructor takes parameters, each column is bound to
    /// the parameter of the same name. Otherwise each column is looked up as a
    /// property or field and left unmapped if nothing matches.
    pub fn build(resolver: &TypeMap, columns: &[ColumnDescriptor]) -> Result<Self> {
        let constructor = resolver.find_constructor(columns).cloned();

        let mut planned = Vec::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            let member = match &constructor {
                Some(ctor) if !ctor.is_parameterless() => {
                    Some(resolver.get_constructor_parameter(ctor, &column.name)?)
                }
                _ => resolver.get_member(&column.name)?,
            };
            planned.push(ColumnPlan {
                index,
                column: column.clone(),
                member,
            });
        }

        let plan = Self {
            target: resolver.target_name().clone(),
            constructor,
            columns: planned,
        };
        tracing::debug!(
            target_type = %plan.target,
            mapped = plan.bindings().count(),
            unmapped = plan.unmapped_columns().len(),
            "built mapping plan"
        );
        Ok(plan)
    }

    /// True when values are passed to a constructor rather than assigned.
    pub fn is_constructor_driven(&self) -> bool {
        self.constructor
            .as_ref()
            .is_some_and(|ctor| !ctor.is_parameterless())
    }

    /// Columns that have a member, in result-set order.
    pub fn bindings(&self) -> impl Iterator<Item = &ColumnPlan> {
        self.columns.iter().filter(|c| c.member.is_some())
    }

    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.member.is_none())
            .map(|c| c.column.name.as_str())
            .collect()
    }

    /// Bindings whose column type the member cannot accept. A materializer
    /// should reject the result set before reading rows if this is non-empty.
    pub fn incompatible_bindings(&self) -> Vec<&ColumnPlan> {
        self.columns.iter().filter(|c| c.is_incompatible()).collect()
    }
}

impl fmt::Display for MappingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target)?;
        match &self.constructor {
            Some(ctor) => {
                let params: Vec<String> = ctor
                    .parameters
                    .iter()
                    .map(|p| format!("{}: {}", p.name, p.ty))
                    .collect();
                writeln!(f, " via new({})", params.join(", "))?;
            }
            None => writeln!(f, " without constructor")?,
        }
        for column in &self.columns {
            write!(f, "  {} ({}) -> ", column.column.name, column.column.ty)?;
            match &column.member {
                Some(member) => {
                    let kind = match member.target() {
                        MemberTarget::Property(_) => "property",
                        MemberTarget::Field(_) => "field",
                        MemberTarget::Parameter(_) => "parameter",
                    };
                    write!(
                        f,
                        "{kind} {}: {}",
                        member.target().name(),
                        member.member_type()
                    )?;
                    if column.is_incompatible() {
                        f.write_str(" [incompatible]")?;
                    }
                }
                None => f.write_str("unmapped")?,
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
