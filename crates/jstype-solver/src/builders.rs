//! Builders for function and record types.
//!
//! These are the "rebuild with new children" operations of the type model.
//! A builder copies what it is given; nothing built here shares mutable
//! state with the type it was derived from.

use crate::registry::TypeRegistry;
use crate::types::{
    FunctionFlags, FunctionKind, FunctionShape, ObjectShape, ParamKind, Parameter, PropertyInfo,
    TypeId,
};
use indexmap::IndexMap;
use jstype_common::{Atom, PropertyDecl};

// =============================================================================
// FunctionParamBuilder
// =============================================================================

/// Builds a parameter list in required, optional, variadic order.
///
/// Each `add_*` method returns `false` and adds nothing if the parameter
/// would break that order.
#[derive(Clone, Debug, Default)]
pub struct FunctionParamBuilder {
    params: Vec<Parameter>,
}

impl FunctionParamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            params: Vec::with_capacity(capacity),
        }
    }

    pub fn add_required_params(&mut self, types: &[TypeId]) -> bool {
        if self.has_optional_or_var_args() {
            return false;
        }
        self.params
            .extend(types.iter().map(|&type_id| Parameter::required(type_id)));
        true
    }

    pub fn add_optional_params(&mut self, types: &[TypeId]) -> bool {
        if self.has_var_args() {
            return false;
        }
        self.params
            .extend(types.iter().map(|&type_id| Parameter::optional(type_id)));
        true
    }

    pub fn add_var_args(&mut self, type_id: TypeId) -> bool {
        if self.has_var_args() {
            return false;
        }
        self.params.push(Parameter::variadic(type_id));
        true
    }

    /// Copy an existing parameter as-is.
    pub fn new_parameter_from(&mut self, parameter: &Parameter) {
        self.params.push(*parameter);
    }

    /// Add `type_id` with the same modality as `like`.
    pub fn add_param_like(&mut self, like: &Parameter, type_id: TypeId) -> bool {
        match like.kind {
            ParamKind::Required => self.add_required_params(&[type_id]),
            ParamKind::Optional => self.add_optional_params(&[type_id]),
            ParamKind::Variadic => self.add_var_args(type_id),
        }
    }

    pub fn has_optional_or_var_args(&self) -> bool {
        self.params
            .last()
            .is_some_and(|param| param.kind != ParamKind::Required)
    }

    pub fn has_var_args(&self) -> bool {
        self.params.last().is_some_and(Parameter::is_variadic)
    }

    pub fn build(self) -> Vec<Parameter> {
        self.params
    }
}

// =============================================================================
// FunctionBuilder
// =============================================================================

/// Builds a function type, optionally starting from an existing one.
#[derive(Clone, Debug)]
pub struct FunctionBuilder {
    shape: FunctionShape,
}

impl FunctionBuilder {
    /// An ordinary function with no parameters returning unknown.
    pub fn new() -> Self {
        Self {
            shape: FunctionShape {
                name: None,
                this_type: None,
                return_type: TypeId::UNKNOWN,
                params: Vec::new(),
                kind: FunctionKind::Ordinary,
                flags: FunctionFlags::empty(),
            },
        }
    }

    /// Start from a copy of `shape`.
    pub fn from_shape(shape: &FunctionShape) -> Self {
        Self {
            shape: shape.clone(),
        }
    }

    pub fn with_name(mut self, name: Atom) -> Self {
        self.shape.name = Some(name);
        self
    }

    pub fn with_parameters(mut self, params: Vec<Parameter>) -> Self {
        self.shape.params = params;
        self
    }

    pub fn with_return_type(mut self, return_type: TypeId) -> Self {
        self.shape.return_type = return_type;
        self
    }

    pub fn with_type_of_this(mut self, this_type: TypeId) -> Self {
        self.shape.this_type = Some(this_type);
        self
    }

    pub fn with_kind(mut self, kind: FunctionKind) -> Self {
        self.shape.kind = kind;
        self
    }

    pub fn with_is_native(mut self, is_native: bool) -> Self {
        self.shape.flags.set(FunctionFlags::NATIVE, is_native);
        self
    }

    pub fn with_is_abstract(mut self, is_abstract: bool) -> Self {
        self.shape.flags.set(FunctionFlags::ABSTRACT, is_abstract);
        self
    }

    pub fn into_shape(self) -> FunctionShape {
        self.shape
    }

    pub fn build(self, registry: &TypeRegistry) -> TypeId {
        registry.function(self.shape)
    }
}

impl Default for FunctionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// RecordTypeBuilder
// =============================================================================

/// Builds a structural record type, keeping properties in insertion order.
#[derive(Clone, Debug, Default)]
pub struct RecordTypeBuilder {
    properties: IndexMap<Atom, PropertyInfo>,
}

impl RecordTypeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property. Returns `false` if `name` is already present; the
    /// first declaration wins.
    pub fn add_property(&mut self, name: Atom, type_id: TypeId, decl: Option<PropertyDecl>) -> bool {
        if self.properties.contains_key(&name) {
            return false;
        }
        self.properties.insert(name, PropertyInfo { type_id, decl });
        true
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn into_shape(self) -> ObjectShape {
        ObjectShape::record(self.properties)
    }

    /// Build a fresh record, even when there are no properties.
    pub fn build(self, registry: &TypeRegistry) -> TypeId {
        registry.object(self.into_shape())
    }
}

#[cfg(test)]
#[path = "../tests/builders_tests.rs"]
mod tests;
