use std::sync::Arc;

use rowmap_map::{MappingPlan, MappingRegistry, TypeCatalog};
use rowmap_model::{
    ColumnDescriptor, Constructor, Field, Parameter, Property, TypeName, TypeRef, TypeSchema,
};

fn registry() -> MappingRegistry {
    let catalog = Arc::new(TypeCatalog::new());
    catalog.register(
        TypeSchema::builder("Customer")
            .default_constructor()
            .property(Property::new("CustomerId", TypeRef::I32))
            .property(Property::new("Name", TypeRef::String))
            .field(Field::new("_region", TypeRef::String).private())
            .build()
            .unwrap(),
    );
    catalog.register(
        TypeSchema::builder("CustomerRecord")
            .constructor(Constructor::public([
                Parameter::new("customerId", TypeRef::I32),
                Parameter::new("name", TypeRef::nullable(TypeRef::String)),
            ]))
            .build()
            .unwrap(),
    );
    catalog.register(
        TypeSchema::builder("CustomerFailed")
            .default_constructor()
            .property(Property::new("CustomerId", TypeRef::Uuid))
            .build()
            .unwrap(),
    );
    MappingRegistry::new(catalog)
}

fn plan(type_name: &str, columns: &[ColumnDescriptor]) -> MappingPlan {
    let registry = registry();
    let resolver = registry
        .resolver_for(&TypeName::new(type_name).unwrap())
        .unwrap();
    MappingPlan::build(&resolver, columns).unwrap()
}

#[test]
fn member_driven_plan() {
    let columns = ColumnDescriptor::list([
        ("CUSTOMER_ID", TypeRef::I32),
        ("name", TypeRef::String),
        ("_REGION", TypeRef::String),
        ("created_at", TypeRef::DateTime),
    ]);
    let plan = plan("Customer", &columns);

    assert!(!plan.is_constructor_driven());
    assert_eq!(plan.unmapped_columns(), vec!["created_at"]);
    assert!(plan.incompatible_bindings().is_empty());
    insta::assert_snapshot!(plan.to_string(), @r"
    Customer via new()
      CUSTOMER_ID (i32) -> property CustomerId: i32
      name (string) -> property Name: string
      _REGION (string) -> field _region: string
      created_at (datetime) -> unmapped
    ");
}

#[test]
fn constructor_driven_plan() {
    let columns = ColumnDescriptor::list([("CustomerId", TypeRef::I32), ("Name", TypeRef::String)]);
    let plan = plan("CustomerRecord", &columns);

    assert!(plan.is_constructor_driven());
    assert_eq!(plan.bindings().count(), 2);
    insta::assert_snapshot!(plan.to_string(), @r"
    CustomerRecord via new(customerId: i32, name: string?)
      CustomerId (i32) -> parameter customerId: i32
      Name (string) -> parameter name: string?
    ");
}

#[test]
fn plan_without_fitting_constructor_falls_back_to_members() {
    let columns = ColumnDescriptor::list([("customer_id", TypeRef::I32)]);
    let plan = plan("CustomerRecord", &columns);

    assert!(plan.constructor.is_none());
    assert_eq!(plan.unmapped_columns(), vec!["customer_id"]);
}

#[test]
fn incompatible_column_types_are_reported() {
    let columns = ColumnDescriptor::list([("Customer_Id", TypeRef::I32)]);
    let plan = plan("CustomerFailed", &columns);

    let incompatible = plan.incompatible_bindings();
    assert_eq!(incompatible.len(), 1);
    let binding = incompatible[0];
    assert_eq!(binding.index, 0);
    assert_eq!(
        binding.member.as_ref().map(|m| m.member_type()),
        Some(&TypeRef::Uuid)
    );
    insta::assert_snapshot!(plan.to_string(), @r"
    CustomerFailed via new()
      Customer_Id (i32) -> property CustomerId: uuid [incompatible]
    ");
}
