use super::*;
use crate::types::{FunctionKind, TypeData};

#[test]
fn test_param_builder_keeps_order() {
    let mut builder = FunctionParamBuilder::new();
    assert!(builder.add_required_params(&[TypeId::NUMBER, TypeId::STRING]));
    assert!(builder.add_optional_params(&[TypeId::BOOLEAN]));
    assert!(builder.add_var_args(TypeId::NUMBER));

    let params = builder.build();
    assert_eq!(
        params,
        vec![
            Parameter::required(TypeId::NUMBER),
            Parameter::required(TypeId::STRING),
            Parameter::optional(TypeId::BOOLEAN),
            Parameter::variadic(TypeId::NUMBER),
        ]
    );
}

#[test]
fn test_param_builder_rejects_required_after_optional() {
    let mut builder = FunctionParamBuilder::new();
    assert!(builder.add_optional_params(&[TypeId::STRING]));
    assert!(builder.has_optional_or_var_args());
    assert!(!builder.add_required_params(&[TypeId::NUMBER]));
    assert_eq!(builder.build().len(), 1);
}

#[test]
fn test_param_builder_rejects_anything_after_var_args() {
    let mut builder = FunctionParamBuilder::new();
    assert!(builder.add_var_args(TypeId::STRING));
    assert!(builder.has_var_args());
    assert!(!builder.add_var_args(TypeId::NUMBER));
    assert!(!builder.add_optional_params(&[TypeId::NUMBER]));
    assert!(!builder.add_required_params(&[TypeId::NUMBER]));
}

#[test]
fn test_add_param_like_copies_modality() {
    let mut builder = FunctionParamBuilder::with_capacity(3);
    assert!(builder.add_param_like(&Parameter::required(TypeId::UNKNOWN), TypeId::NUMBER));
    assert!(builder.add_param_like(&Parameter::optional(TypeId::UNKNOWN), TypeId::STRING));
    assert!(builder.add_param_like(&Parameter::variadic(TypeId::UNKNOWN), TypeId::BOOLEAN));

    let kinds: Vec<ParamKind> = builder.build().iter().map(|param| param.kind).collect();
    assert_eq!(
        kinds,
        [ParamKind::Required, ParamKind::Optional, ParamKind::Variadic]
    );
}

#[test]
fn test_new_parameter_from_ignores_order() {
    let mut builder = FunctionParamBuilder::new();
    builder.new_parameter_from(&Parameter::variadic(TypeId::NUMBER));
    builder.new_parameter_from(&Parameter::required(TypeId::STRING));
    assert_eq!(builder.build().len(), 2);
}

#[test]
fn test_function_builder_defaults() {
    let registry = TypeRegistry::new();
    let func = FunctionBuilder::new().build(&registry);

    let shape = registry.function_shape(func).expect("function");
    assert!(shape.is_ordinary_function());
    assert_eq!(shape.return_type, TypeId::UNKNOWN);
    assert_eq!(shape.this_type, None);
    assert!(shape.params.is_empty());
    assert!(!shape.is_native());
    assert!(!shape.is_abstract());
}

#[test]
fn test_function_builder_from_shape_copies() {
    let registry = TypeRegistry::new();
    let name = registry.intern_string("f");
    let original = FunctionBuilder::new()
        .with_name(name)
        .with_kind(FunctionKind::Constructor)
        .with_is_abstract(true)
        .with_parameters(vec![Parameter::required(TypeId::NUMBER)])
        .with_return_type(TypeId::VOID)
        .build(&registry);
    let shape = registry.function_shape(original).expect("function");

    let copy = FunctionBuilder::from_shape(&shape)
        .with_return_type(TypeId::STRING)
        .with_is_abstract(false)
        .build(&registry);

    assert_ne!(copy, original);
    let copied = registry.function_shape(copy).expect("function");
    assert_eq!(copied.name, Some(name));
    assert!(copied.is_constructor());
    assert!(!copied.is_abstract());
    assert_eq!(copied.params, shape.params);
    assert_eq!(copied.return_type, TypeId::STRING);

    // The source is untouched.
    let original_shape = registry.function_shape(original).expect("function");
    assert!(original_shape.is_abstract());
    assert_eq!(original_shape.return_type, TypeId::VOID);
}

#[test]
fn test_function_builder_flags() {
    let shape = FunctionBuilder::new()
        .with_is_native(true)
        .with_is_abstract(true)
        .with_type_of_this(TypeId::NUMBER)
        .into_shape();
    assert!(shape.is_native());
    assert!(shape.is_abstract());
    assert_eq!(shape.this_type, Some(TypeId::NUMBER));

    let shape = FunctionBuilder::from_shape(&shape)
        .with_is_native(false)
        .into_shape();
    assert!(!shape.is_native());
    assert!(shape.is_abstract());
}

#[test]
fn test_record_builder_first_property_wins() {
    let registry = TypeRegistry::new();
    let x = registry.intern_string("x");

    let mut builder = RecordTypeBuilder::new();
    assert!(builder.is_empty());
    assert!(builder.add_property(x, TypeId::NUMBER, None));
    assert!(!builder.add_property(x, TypeId::STRING, None));
    assert_eq!(builder.len(), 1);

    let record = builder.build(&registry);
    let shape = registry.object_shape(record).expect("record");
    assert_eq!(shape.property_type(x), Some(TypeId::NUMBER));
}

#[test]
fn test_empty_record_is_fresh() {
    let registry = TypeRegistry::new();
    let a = RecordTypeBuilder::new().build(&registry);
    let b = RecordTypeBuilder::new().build(&registry);

    assert_ne!(a, b);
    assert!(matches!(registry.lookup(a), Some(TypeData::Object(shape)) if shape.is_record()));
}
