//! Type visitor pattern.
//!
//! [`TypeVisitor`] gives each `TypeData` variant its own method and a single
//! [`visit_type`](TypeVisitor::visit_type) entry point that looks the type up
//! and dispatches on its variant. The template replacer and the formatter
//! are visitors; the queries at the bottom of this module are small ones.
//!
//! Dispatch runs under `ensure_sufficient_stack`, so visitors may recurse
//! through `visit_type` as deeply as the graph nests.

use crate::recursion::{CycleGuard, CycleResult};
use crate::registry::TypeRegistry;
use crate::types::{FunctionShape, JsTypeNative, ObjectShape, TemplateTypeInfo, TypeData, TypeId};
use jstype_common::{Atom, ensure_sufficient_stack};
use rustc_hash::FxHashSet;
use std::sync::Arc;

// =============================================================================
// Type Visitor Trait
// =============================================================================

/// One method per type variant, plus dispatch.
pub trait TypeVisitor: Sized {
    type Output;

    /// Registry the visited ids belong to.
    fn registry(&self) -> &TypeRegistry;

    fn visit_native(&mut self, id: TypeId, native: JsTypeNative) -> Self::Output;

    fn visit_template_type(&mut self, id: TypeId, info: &TemplateTypeInfo) -> Self::Output;

    fn visit_object(&mut self, id: TypeId, shape: &Arc<ObjectShape>) -> Self::Output;

    fn visit_function(&mut self, id: TypeId, shape: &Arc<FunctionShape>) -> Self::Output;

    fn visit_union(&mut self, id: TypeId, alternates: &Arc<[TypeId]>) -> Self::Output;

    fn visit_templatized(&mut self, id: TypeId, base: TypeId, args: &Arc<[TypeId]>)
    -> Self::Output;

    fn visit_named(&mut self, id: TypeId, name: Atom, referenced: Option<TypeId>) -> Self::Output;

    fn visit_proxy(&mut self, id: TypeId, referenced: TypeId) -> Self::Output;

    fn visit_enum_element(&mut self, id: TypeId, name: Atom, primitive: TypeId) -> Self::Output;

    /// Called for an id the registry does not know.
    fn visit_missing(&mut self, id: TypeId) -> Self::Output;

    /// Look `id` up and dispatch to the matching `visit_*` method.
    fn visit_type(&mut self, id: TypeId) -> Self::Output {
        let Some(data) = self.registry().lookup(id) else {
            return self.visit_missing(id);
        };

        ensure_sufficient_stack(|| match &data {
            TypeData::Native(native) => self.visit_native(id, *native),
            TypeData::TemplateType(info) => self.visit_template_type(id, info),
            TypeData::Object(shape) => self.visit_object(id, shape),
            TypeData::Function(shape) => self.visit_function(id, shape),
            TypeData::Union(alternates) => self.visit_union(id, alternates),
            TypeData::Templatized { base, args } => self.visit_templatized(id, *base, args),
            TypeData::Named { name, referenced } => self.visit_named(id, *name, *referenced),
            TypeData::Proxy { referenced } => self.visit_proxy(id, *referenced),
            TypeData::EnumElement { name, primitive } => {
                self.visit_enum_element(id, *name, *primitive)
            }
        })
    }
}

// =============================================================================
// Template type collection
// =============================================================================

/// Collects the template types reachable from a type, in first-seen order.
///
/// Descends through records, functions, unions, templatized types and
/// proxies. Named types and nominal object properties are opaque, matching
/// what substitution would rewrite.
pub struct TemplateTypeCollector<'a> {
    registry: &'a TypeRegistry,
    guard: CycleGuard<TypeId>,
    seen: FxHashSet<TypeId>,
    found: Vec<TypeId>,
}

impl<'a> TemplateTypeCollector<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            guard: CycleGuard::new(),
            seen: FxHashSet::default(),
            found: Vec::new(),
        }
    }

    pub fn collect(mut self, id: TypeId) -> Vec<TypeId> {
        self.visit_type(id);
        std::mem::take(&mut self.found)
    }

    fn guarded(&mut self, id: TypeId, f: impl FnOnce(&mut Self)) {
        if self.guard.enter(id) == CycleResult::Cycle {
            return;
        }
        f(self);
        self.guard.leave(id);
    }
}

impl TypeVisitor for TemplateTypeCollector<'_> {
    type Output = ();

    fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    fn visit_native(&mut self, _id: TypeId, _native: JsTypeNative) {}

    fn visit_template_type(&mut self, id: TypeId, _info: &TemplateTypeInfo) {
        if self.seen.insert(id) {
            self.found.push(id);
        }
    }

    fn visit_object(&mut self, id: TypeId, shape: &Arc<ObjectShape>) {
        if !shape.is_record() {
            return;
        }
        self.guarded(id, |this| {
            for prop in shape.properties.values() {
                this.visit_type(prop.type_id);
            }
        });
    }

    fn visit_function(&mut self, id: TypeId, shape: &Arc<FunctionShape>) {
        self.guarded(id, |this| {
            if let Some(this_type) = shape.this_type {
                this.visit_type(this_type);
            }
            for param in &shape.params {
                this.visit_type(param.type_id);
            }
            this.visit_type(shape.return_type);
        });
    }

    fn visit_union(&mut self, id: TypeId, alternates: &Arc<[TypeId]>) {
        self.guarded(id, |this| {
            for &alternate in alternates.iter() {
                this.visit_type(alternate);
            }
        });
    }

    fn visit_templatized(&mut self, id: TypeId, base: TypeId, args: &Arc<[TypeId]>) {
        self.guarded(id, |this| {
            this.visit_type(base);
            for &arg in args.iter() {
                this.visit_type(arg);
            }
        });
    }

    fn visit_named(&mut self, _id: TypeId, _name: Atom, _referenced: Option<TypeId>) {}

    fn visit_proxy(&mut self, id: TypeId, referenced: TypeId) {
        self.guarded(id, |this| this.visit_type(referenced));
    }

    fn visit_enum_element(&mut self, _id: TypeId, _name: Atom, _primitive: TypeId) {}

    fn visit_missing(&mut self, _id: TypeId) {}
}

/// Template types reachable from `id`, in first-seen order.
pub fn collect_template_types(registry: &TypeRegistry, id: TypeId) -> Vec<TypeId> {
    TemplateTypeCollector::new(registry).collect(id)
}

/// Whether any template type is reachable from `id`.
pub fn contains_template_types(registry: &TypeRegistry, id: TypeId) -> bool {
    !collect_template_types(registry, id).is_empty()
}

#[cfg(test)]
#[path = "../tests/visitor_tests.rs"]
mod tests;
