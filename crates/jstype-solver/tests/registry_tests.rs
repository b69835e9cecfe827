use super::*;
use jstype_common::PropertyDecl;
use jstype_common::Span;

#[test]
fn test_natives_are_preregistered() {
    let registry = TypeRegistry::new();
    assert_eq!(registry.len(), TypeId::FIRST_USER as usize);

    for native in JsTypeNative::ALL {
        let id = registry.native_type(native);
        assert!(id.is_native());
        assert_eq!(registry.lookup(id), Some(TypeData::Native(native)));
    }
    assert_eq!(registry.native_type(JsTypeNative::Number), TypeId::NUMBER);
    assert_eq!(registry.native_type(JsTypeNative::Unknown), TypeId::UNKNOWN);
}

#[test]
fn test_lookup_unknown_id() {
    let registry = TypeRegistry::new();
    assert_eq!(registry.lookup(TypeId(9_999)), None);
    assert!(!registry.is_template_type(TypeId(9_999)));
}

#[test]
fn test_template_types_are_distinct_by_identity() {
    let registry = TypeRegistry::new();
    let t1 = registry.template_type("T", None);
    let t2 = registry.template_type("T", None);

    assert_ne!(t1, t2);
    assert!(registry.is_template_type(t1));
    assert!(!t1.is_native());

    let info = registry.template_type_info(t1).expect("template type");
    assert_eq!(registry.resolve_atom(info.name), "T");
    assert_eq!(info.bound, None);
}

#[test]
fn test_template_type_bound() {
    let registry = TypeRegistry::new();
    let t = registry.template_type("T", Some(TypeId::STRING));
    assert_eq!(
        registry.template_type_info(t).and_then(|info| info.bound),
        Some(TypeId::STRING)
    );
}

#[test]
fn test_records_are_never_interned() {
    let registry = TypeRegistry::new();
    let a = registry.record(&[("x", TypeId::NUMBER)]);
    let b = registry.record(&[("x", TypeId::NUMBER)]);

    assert_ne!(a, b);
    assert_eq!(registry.object_shape(a), registry.object_shape(b));
}

#[test]
fn test_record_keeps_property_order() {
    let registry = TypeRegistry::new();
    let record = registry.record(&[
        ("c", TypeId::NUMBER),
        ("a", TypeId::STRING),
        ("b", TypeId::BOOLEAN),
    ]);

    let shape = registry.object_shape(record).expect("record");
    let names: Vec<String> = shape
        .property_names()
        .map(|name| registry.resolve_atom(name))
        .collect();
    assert_eq!(names, ["c", "a", "b"]);
    assert_eq!(
        shape.property_type(registry.intern_string("a")),
        Some(TypeId::STRING)
    );
}

#[test]
fn test_nominal_object() {
    let registry = TypeRegistry::new();
    let foo = registry.nominal_object("Foo", &[("x", TypeId::NUMBER)]);
    let shape = registry.object_shape(foo).expect("object");

    assert!(shape.is_nominal());
    assert!(!shape.is_record());
    assert_eq!(
        shape.kind,
        ObjectKind::Nominal {
            name: registry.intern_string("Foo")
        }
    );
}

#[test]
fn test_union_interning() {
    let registry = TypeRegistry::new();
    let a = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);
    let b = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);
    let c = registry.create_union_type([TypeId::STRING, TypeId::NUMBER]);

    assert_eq!(a, b);
    // Order is part of the member list.
    assert_ne!(a, c);
    assert_eq!(
        registry.union_members(a).as_deref(),
        Some(&[TypeId::NUMBER, TypeId::STRING][..])
    );
}

#[test]
fn test_union_collapses_to_single_member() {
    let registry = TypeRegistry::new();
    assert_eq!(
        registry.create_union_type([TypeId::STRING, TypeId::STRING]),
        TypeId::STRING
    );
    assert_eq!(registry.create_union_type([TypeId::NUMBER]), TypeId::NUMBER);
}

#[test]
fn test_empty_union_is_no_type() {
    let registry = TypeRegistry::new();
    assert_eq!(registry.create_union_type(std::iter::empty()), TypeId::NO_TYPE);
    assert_eq!(registry.create_union_type([TypeId::NO_TYPE]), TypeId::NO_TYPE);
}

#[test]
fn test_union_drops_no_type() {
    let registry = TypeRegistry::new();
    let t = registry.template_type("T", None);
    assert_eq!(registry.create_union_type([t, TypeId::NO_TYPE]), t);
}

#[test]
fn test_union_absorbed_by_unknown_and_all() {
    let registry = TypeRegistry::new();
    assert_eq!(
        registry.create_union_type([TypeId::NUMBER, TypeId::UNKNOWN]),
        TypeId::UNKNOWN
    );
    assert_eq!(
        registry.create_union_type([TypeId::ALL_TYPE, TypeId::STRING]),
        TypeId::ALL_TYPE
    );
    // Unknown wins over all.
    assert_eq!(
        registry.create_union_type([TypeId::ALL_TYPE, TypeId::UNKNOWN]),
        TypeId::UNKNOWN
    );
}

#[test]
fn test_union_flattens_nested_unions() {
    let registry = TypeRegistry::new();
    let inner = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);
    let outer = registry.create_union_type([inner, TypeId::BOOLEAN, TypeId::NUMBER]);

    assert_eq!(
        registry.union_members(outer).as_deref(),
        Some(&[TypeId::NUMBER, TypeId::STRING, TypeId::BOOLEAN][..])
    );
    assert_eq!(
        outer,
        registry.create_union_type([TypeId::NUMBER, TypeId::STRING, TypeId::BOOLEAN])
    );
}

#[test]
fn test_templatized_interning() {
    let registry = TypeRegistry::new();
    let t = registry.template_type("T", None);
    let container = registry.record(&[("value", t)]);

    let a = registry.create_templatized_type(container, vec![TypeId::NUMBER]);
    let b = registry.create_templatized_type(container, vec![TypeId::NUMBER]);
    let c = registry.create_templatized_type(container, vec![TypeId::STRING]);

    assert_eq!(a, b);
    assert_ne!(a, c);
    let (base, args) = registry.templatized_parts(a).expect("templatized");
    assert_eq!(base, container);
    assert_eq!(&*args, &[TypeId::NUMBER]);
}

#[test]
fn test_templatized_without_args_is_base() {
    let registry = TypeRegistry::new();
    let container = registry.record(&[]);
    assert_eq!(registry.create_templatized_type(container, vec![]), container);
}

#[test]
fn test_proxy_forward_reference() {
    let registry = TypeRegistry::new();
    let proxy = registry.reserve_proxy();
    assert_eq!(
        registry.lookup(proxy),
        Some(TypeData::Proxy {
            referenced: TypeId::UNKNOWN
        })
    );

    let record = registry.record(&[("next", proxy)]);
    assert!(registry.set_proxy_target(proxy, record));
    assert_eq!(
        registry.lookup(proxy),
        Some(TypeData::Proxy { referenced: record })
    );

    assert!(!registry.set_proxy_target(record, proxy));
}

#[test]
fn test_self_referential_record() {
    let registry = TypeRegistry::new();
    let node = registry.reserve_record();

    let mut builder = RecordTypeBuilder::new();
    builder.add_property(registry.intern_string("value"), TypeId::NUMBER, None);
    builder.add_property(registry.intern_string("next"), node, None);
    assert!(registry.define_record(node, builder));

    let shape = registry.object_shape(node).expect("record");
    assert_eq!(shape.property_type(registry.intern_string("next")), Some(node));
}

#[test]
fn test_define_record_rejects_non_records() {
    let registry = TypeRegistry::new();
    let foo = registry.nominal_object("Foo", &[]);
    assert!(!registry.define_record(foo, RecordTypeBuilder::new()));
    assert!(!registry.define_record(TypeId::NUMBER, RecordTypeBuilder::new()));
}

#[test]
fn test_property_decl_is_stored() {
    let registry = TypeRegistry::new();
    let decl = PropertyDecl::new(3, Span::new(10, 20));

    let mut builder = RecordTypeBuilder::new();
    builder.add_property(registry.intern_string("x"), TypeId::NUMBER, Some(decl));
    let record = builder.build(&registry);

    let shape = registry.object_shape(record).expect("record");
    let prop = shape
        .properties
        .get(&registry.intern_string("x"))
        .expect("property");
    assert_eq!(prop.decl, Some(decl));
}

#[test]
fn test_named_and_enum_element() {
    let registry = TypeRegistry::new();
    let named = registry.named_type("Foo", None);
    let element = registry.enum_element("Color.RED", TypeId::NUMBER);

    assert!(matches!(registry.lookup(named), Some(TypeData::Named { .. })));
    assert!(matches!(
        registry.lookup(element),
        Some(TypeData::EnumElement {
            primitive: TypeId::NUMBER,
            ..
        })
    ));
}

#[test]
fn test_format_type_delegates_to_formatter() {
    let registry = TypeRegistry::new();
    let union = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);
    assert_eq!(registry.format_type(union), "(number|string)");
}
