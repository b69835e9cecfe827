//! JavaScript Type Model and Template Substitution
//!
//! This crate holds the type graph of the jstype checker and the engine that
//! instantiates generic types over it.
//!
//! - **`TypeId` identity**: types live in a [`TypeRegistry`] arena; unions
//!   and templatized types are interned, everything else is fresh
//! - **Builders**: the "rebuild with new children" operations
//! - **Template replacement**: [`TemplateTypeReplacer`] applies a
//!   [`TemplateTypeMap`] to a type under one of three policies
//!
//! Key properties:
//! - A replacement that changes nothing returns the original `TypeId`
//! - Cyclic graphs and self-referential bindings terminate
//! - Deep graphs grow the stack instead of overflowing it

pub mod builders;
mod format;
pub mod recursion;
pub mod registry;
pub mod replacer;
pub mod template_map;
pub mod types;
pub mod visitor;

pub use builders::{FunctionBuilder, FunctionParamBuilder, RecordTypeBuilder};
pub use format::TypeFormatter;
pub use recursion::{CycleGuard, CycleResult};
pub use registry::TypeRegistry;
pub use replacer::{ReplacementError, ReplacementPolicy, TemplateTypeReplacer, replace_templates};
pub use template_map::TemplateTypeMap;
pub use types::{
    FunctionFlags, FunctionKind, FunctionShape, JsTypeNative, ObjectKind, ObjectShape, ParamKind,
    Parameter, PropertyInfo, TemplateTypeInfo, TypeData, TypeId,
};
pub use visitor::{TemplateTypeCollector, TypeVisitor, collect_template_types, contains_template_types};

// Test modules: most are loaded by their source files via #[path = "../tests/..."].
#[cfg(test)]
#[path = "../tests/test_support.rs"]
mod test_support;
#[cfg(test)]
#[path = "../tests/integration_tests.rs"]
mod integration_tests;
#[cfg(test)]
#[path = "../tests/parallel_tests.rs"]
mod parallel_tests;
