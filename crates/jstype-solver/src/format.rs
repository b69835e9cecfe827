//! Type formatting for trace output and tests.
//!
//! Output follows JSDoc type syntax: `{a: T, b: string}` for records,
//! `function(this:Foo, T, U=, ...V): R` for functions, `(A|B)` for unions
//! and `Base<A, B>` for templatized types. A type reached again while it is
//! still being printed renders as `...`.

use crate::recursion::{CycleGuard, CycleResult};
use crate::registry::TypeRegistry;
use crate::types::{
    FunctionShape, JsTypeNative, ObjectKind, ObjectShape, ParamKind, TemplateTypeInfo, TypeId,
};
use crate::visitor::TypeVisitor;
use jstype_common::Atom;
use std::sync::Arc;

pub struct TypeFormatter<'a> {
    registry: &'a TypeRegistry,
    guard: CycleGuard<TypeId>,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        TypeFormatter {
            registry,
            guard: CycleGuard::new(),
        }
    }

    pub fn format(&mut self, id: TypeId) -> String {
        self.visit_type(id)
    }

    fn guarded(&mut self, id: TypeId, f: impl FnOnce(&mut Self) -> String) -> String {
        if self.guard.enter(id) == CycleResult::Cycle {
            return "...".to_string();
        }
        let out = f(self);
        self.guard.leave(id);
        out
    }

    fn name(&self, atom: Atom) -> Arc<str> {
        self.registry.resolve_atom_ref(atom)
    }

    fn join(&mut self, ids: &[TypeId], sep: &str) -> String {
        ids.iter()
            .map(|&id| self.format(id))
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl TypeVisitor for TypeFormatter<'_> {
    type Output = String;

    fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    fn visit_native(&mut self, _id: TypeId, native: JsTypeNative) -> String {
        native.display_name().to_string()
    }

    fn visit_template_type(&mut self, _id: TypeId, info: &TemplateTypeInfo) -> String {
        self.name(info.name).to_string()
    }

    fn visit_object(&mut self, id: TypeId, shape: &Arc<ObjectShape>) -> String {
        if let ObjectKind::Nominal { name } = shape.kind {
            return self.name(name).to_string();
        }
        if shape.properties.is_empty() {
            return "{}".to_string();
        }
        self.guarded(id, |this| {
            let props: Vec<String> = shape
                .properties
                .iter()
                .map(|(&name, prop)| {
                    let name = this.name(name);
                    format!("{name}: {}", this.format(prop.type_id))
                })
                .collect();
            format!("{{{}}}", props.join(", "))
        })
    }

    fn visit_function(&mut self, id: TypeId, shape: &Arc<FunctionShape>) -> String {
        self.guarded(id, |this| {
            let mut parts = Vec::with_capacity(shape.params.len() + 1);
            if let Some(this_type) = shape.this_type {
                let label = if shape.is_constructor() { "new" } else { "this" };
                parts.push(format!("{label}:{}", this.format(this_type)));
            }
            for param in &shape.params {
                let ty = this.format(param.type_id);
                parts.push(match param.kind {
                    ParamKind::Required => ty,
                    ParamKind::Optional => format!("{ty}="),
                    ParamKind::Variadic => format!("...{ty}"),
                });
            }
            let ret = this.format(shape.return_type);
            format!("function({}): {ret}", parts.join(", "))
        })
    }

    fn visit_union(&mut self, id: TypeId, alternates: &Arc<[TypeId]>) -> String {
        self.guarded(id, |this| format!("({})", this.join(alternates, "|")))
    }

    fn visit_templatized(&mut self, id: TypeId, base: TypeId, args: &Arc<[TypeId]>) -> String {
        self.guarded(id, |this| {
            let base = this.format(base);
            format!("{base}<{}>", this.join(args, ", "))
        })
    }

    fn visit_named(&mut self, _id: TypeId, name: Atom, _referenced: Option<TypeId>) -> String {
        self.name(name).to_string()
    }

    fn visit_proxy(&mut self, id: TypeId, referenced: TypeId) -> String {
        self.guarded(id, |this| this.format(referenced))
    }

    fn visit_enum_element(&mut self, _id: TypeId, name: Atom, _primitive: TypeId) -> String {
        self.name(name).to_string()
    }

    fn visit_missing(&mut self, id: TypeId) -> String {
        format!("<missing TypeId({})>", id.0)
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
