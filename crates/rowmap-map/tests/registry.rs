use std::sync::Arc;
use std::thread;

use rowmap_map::{CustomResolver, MappingRegistry, TypeCatalog, TypeMap};
use rowmap_model::{
    ColumnDescriptor, Constructor, MapError, Mapped, MemberTarget, Parameter, Property, Result,
    TypeName, TypeRef, TypeSchema,
};

fn customer_schema() -> TypeSchema {
    TypeSchema::builder("Customer")
        .default_constructor()
        .property(Property::new("CustomerId", TypeRef::I32))
        .property(Property::new("Name", TypeRef::String))
        .build()
        .unwrap()
}

fn registry() -> MappingRegistry {
    let catalog = Arc::new(TypeCatalog::new());
    catalog.register(customer_schema());
    MappingRegistry::new(catalog)
}

fn customer() -> TypeName {
    TypeName::new("Customer").unwrap()
}

#[test]
fn resolvers_are_created_on_first_use_and_cached() {
    let registry = registry();
    assert!(registry.is_empty());

    let first = registry.resolver_for(&customer()).unwrap();
    let second = registry.resolver_for(&customer()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(matches!(first.as_ref(), TypeMap::Default(_)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn unknown_types_fail() {
    let registry = registry();
    let err = registry
        .resolver_for(&TypeName::new("Order").unwrap())
        .unwrap_err();
    assert_eq!(err, MapError::UnknownType("Order".to_string()));
    assert!(!registry.contains(&TypeName::new("Order").unwrap()));
}

#[test]
fn overrides_replace_the_default() {
    let registry = registry();
    let schema = registry.catalog().get(&customer()).unwrap();
    registry.register(CustomResolver::new(schema, |schema, column| {
        (column == "CUST_NO")
            .then(|| schema.properties()[0].clone())
            .map(MemberTarget::Property)
    }));

    let resolver = registry.resolver_for(&customer()).unwrap();
    assert!(resolver.is_custom());
    assert!(resolver.get_member("CUST_NO").unwrap().is_some());
    assert!(resolver.get_member("CustomerId").unwrap().is_none());
}

#[test]
fn last_override_wins() {
    let registry = registry();
    registry.register_custom(&customer(), |_, _| None).unwrap();
    let schema = registry.catalog().get(&customer()).unwrap();
    let previous = registry.register(rowmap_map::DefaultResolver::new(
        schema,
        registry.catalog().as_ref(),
    ));

    assert!(previous.is_some_and(|p| p.is_custom()));
    assert!(!registry.resolver_for(&customer()).unwrap().is_custom());
}

#[test]
fn register_custom_requires_a_catalogued_type() {
    let registry = registry();
    let err = registry
        .register_custom(&TypeName::new("Order").unwrap(), |_, _| None)
        .unwrap_err();
    assert!(matches!(err, MapError::UnknownType(_)));
}

#[test]
fn concurrent_first_use_settles_on_one_resolver() {
    let registry = registry();
    let resolvers: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| registry.resolver_for(&customer()).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let cached = registry.resolver_for(&customer()).unwrap();
    for resolver in &resolvers {
        assert!(Arc::ptr_eq(resolver, &cached));
    }
}

struct Invoice;

impl Mapped for Invoice {
    fn type_schema() -> Result<TypeSchema> {
        TypeSchema::builder("Invoice")
            .constructor(Constructor::public([
                Parameter::new("number", TypeRef::String),
                Parameter::new("total", TypeRef::Decimal),
            ]))
            .build()
    }
}

#[test]
fn mapped_rust_types_register_themselves() {
    let registry = MappingRegistry::default();
    let resolver = registry.resolver_for_type::<Invoice>().unwrap();
    assert_eq!(resolver.target_name().as_str(), "Invoice");
    assert!(registry.catalog().contains(&TypeName::new("Invoice").unwrap()));

    let again = registry.resolver_for_type::<Invoice>().unwrap();
    assert!(Arc::ptr_eq(&resolver, &again));
}

#[test]
fn binding_after_first_use_rebuilds_the_resolver() {
    let catalog = Arc::new(TypeCatalog::new());
    catalog.register(
        TypeSchema::builder("ICustomer")
            .property(Property::new("CustomerId", TypeRef::I32))
            .build()
            .unwrap(),
    );
    let registry = MappingRegistry::new(Arc::clone(&catalog));
    let columns = [ColumnDescriptor::new("customerId", TypeRef::I32)];

    let before = registry.resolver_for(&name("ICustomer")).unwrap();
    assert!(before.find_constructor(&columns).is_none());

    catalog.register(
        TypeSchema::builder("Customer")
            .constructor(Constructor::public([Parameter::new(
                "customerId",
                TypeRef::I32,
            )]))
            .build()
            .unwrap(),
    );
    catalog.bind_implementation(name("ICustomer"), name("Customer"));

    let after = registry.resolver_for(&name("ICustomer")).unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(after.find_constructor(&columns).is_some());
    assert!(Arc::ptr_eq(
        &after,
        &registry.resolver_for(&name("ICustomer")).unwrap()
    ));
}

#[test]
fn replaced_schema_is_picked_up() {
    let registry = registry();
    let before = registry.resolver_for(&customer()).unwrap();
    assert!(before.get_member("Region").unwrap().is_none());

    registry.catalog().register(
        TypeSchema::builder("Customer")
            .default_constructor()
            .property(Property::new("Region", TypeRef::String))
            .build()
            .unwrap(),
    );

    let after = registry.resolver_for(&customer()).unwrap();
    assert!(after.get_member("Region").unwrap().is_some());
    assert_eq!(registry.len(), 1);
}

#[test]
fn overrides_survive_schema_replacement() {
    let registry = registry();
    registry.register_custom(&customer(), |_, _| None).unwrap();
    registry.catalog().register(customer_schema());

    assert!(registry.resolver_for(&customer()).unwrap().is_custom());
}

fn name(value: &str) -> TypeName {
    TypeName::new(value).unwrap()
}
