//! Template type substitution.
//!
//! [`TemplateTypeReplacer`] rewrites a type by replacing the template types
//! it mentions with their bindings from a [`TemplateTypeMap`]. Composite
//! types are rebuilt only when one of their children changed; otherwise the
//! original `TypeId` comes back, so callers may compare ids to learn whether
//! anything happened.
//!
//! ## Cycles
//!
//! One identity set guards the whole walk. Records, functions, unions,
//! templatized types and proxies enter it before visiting their children,
//! and a type met again while entered is returned as-is. Template types
//! enter it while their binding is being replaced, so a binding that
//! mentions its own key (`T -> Array<T>`) leaves the inner `T` alone.
//!
//! ## Policies
//!
//! [`ReplacementPolicy`] picks what a template type with no binding becomes
//! and whether record properties are visited at all.

use crate::builders::{FunctionBuilder, FunctionParamBuilder, RecordTypeBuilder};
use crate::recursion::{CycleGuard, CycleResult};
use crate::registry::TypeRegistry;
use crate::template_map::TemplateTypeMap;
use crate::types::{
    FunctionShape, JsTypeNative, ObjectShape, Parameter, TemplateTypeInfo, TypeId,
};
use crate::visitor::TypeVisitor;
use indexmap::IndexMap;
use jstype_common::Atom;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, trace};

// =============================================================================
// Policy
// =============================================================================

/// What a replacer does where the bindings have nothing to say.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReplacementPolicy {
    /// Rewrite the properties of record types.
    pub visit_properties: bool,
    /// A template type that is not a key of the map becomes unknown instead
    /// of staying as it is.
    pub unknown_for_missing_keys: bool,
    /// A key with no value becomes unknown instead of staying as it is.
    pub unknown_for_missing_values: bool,
}

impl ReplacementPolicy {
    /// Used while inferring template types: only template types themselves
    /// are replaced, anything unbound becomes unknown.
    pub const INFERENCE: Self = Self {
        visit_properties: false,
        unknown_for_missing_keys: true,
        unknown_for_missing_values: true,
    };

    /// Every template type is replaced; anything unbound becomes unknown.
    pub const TOTAL: Self = Self {
        visit_properties: true,
        unknown_for_missing_keys: true,
        unknown_for_missing_values: true,
    };

    /// Bound template types are replaced; unbound ones are left alone.
    pub const PARTIAL: Self = Self {
        visit_properties: true,
        unknown_for_missing_keys: false,
        unknown_for_missing_values: false,
    };
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReplacementError {
    /// A key resolved to itself through its own binding. The map was built
    /// with a binding cycle.
    #[error("trying to replace key {key:?} with the same value")]
    SelfReplacement { key: TypeId },
}

// =============================================================================
// Traversal state
// =============================================================================

/// The template type whose binding is being resolved, and the end of the
/// sub-map it belongs to. Only keys before that end are visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct KeyScope {
    pub(crate) key: TypeId,
    pub(crate) own_submap_boundary: usize,
}

#[derive(Default)]
struct TraversalState {
    key_scope: Option<KeyScope>,
    seen: CycleGuard<TypeId>,
    /// Record types already rewritten in this traversal, unchanged ones
    /// included.
    visited_objects: FxHashMap<TypeId, TypeId>,
}

// =============================================================================
// TemplateTypeReplacer
// =============================================================================

pub struct TemplateTypeReplacer<'a> {
    registry: &'a TypeRegistry,
    bindings: Cow<'a, TemplateTypeMap>,
    policy: ReplacementPolicy,
    has_made_replacement: bool,
    state: TraversalState,
}

impl<'a> TemplateTypeReplacer<'a> {
    /// Replace with inferred bindings. Keys inferred as `None` become
    /// unknown.
    pub fn for_inference(
        registry: &'a TypeRegistry,
        bindings: &IndexMap<TypeId, Option<TypeId>>,
    ) -> Self {
        let keys: Vec<TypeId> = bindings.keys().copied().collect();
        let values: Vec<TypeId> = bindings
            .values()
            .map(|value| value.unwrap_or(TypeId::UNKNOWN))
            .collect();
        let map = TemplateTypeMap::empty().copy_with_extension(registry, &keys, &values);
        Self::new(registry, Cow::Owned(map), ReplacementPolicy::INFERENCE)
    }

    pub fn for_total_replacement(registry: &'a TypeRegistry, bindings: &'a TemplateTypeMap) -> Self {
        Self::new(registry, Cow::Borrowed(bindings), ReplacementPolicy::TOTAL)
    }

    pub fn for_partial_replacement(
        registry: &'a TypeRegistry,
        bindings: &'a TemplateTypeMap,
    ) -> Self {
        Self::new(registry, Cow::Borrowed(bindings), ReplacementPolicy::PARTIAL)
    }

    pub fn with_policy(
        registry: &'a TypeRegistry,
        bindings: &'a TemplateTypeMap,
        policy: ReplacementPolicy,
    ) -> Self {
        Self::new(registry, Cow::Borrowed(bindings), policy)
    }

    fn new(
        registry: &'a TypeRegistry,
        bindings: Cow<'a, TemplateTypeMap>,
        policy: ReplacementPolicy,
    ) -> Self {
        TemplateTypeReplacer {
            registry,
            bindings,
            policy,
            has_made_replacement: false,
            state: TraversalState::default(),
        }
    }

    pub fn policy(&self) -> ReplacementPolicy {
        self.policy
    }

    pub fn bindings(&self) -> &TemplateTypeMap {
        &self.bindings
    }

    /// Whether the last traversal met at least one template type.
    pub fn has_made_replacement(&self) -> bool {
        self.has_made_replacement
    }

    /// Replace template types in `type_id`.
    pub fn replace(&mut self, type_id: TypeId) -> Result<TypeId, ReplacementError> {
        self.run(type_id, None)
    }

    /// Replace template types in the binding of `scope.key`. Keys of inner
    /// sub-maps are invisible, and the key itself is never rewritten to its
    /// own binding again.
    pub(crate) fn replace_in_scope(
        &mut self,
        type_id: TypeId,
        scope: KeyScope,
    ) -> Result<TypeId, ReplacementError> {
        self.run(type_id, Some(scope))
    }

    fn run(&mut self, type_id: TypeId, scope: Option<KeyScope>) -> Result<TypeId, ReplacementError> {
        self.has_made_replacement = false;
        self.state = TraversalState {
            key_scope: scope,
            ..TraversalState::default()
        };
        self.visit_type(type_id)
    }

    fn key_type(&self) -> Option<TypeId> {
        self.state.key_scope.map(|scope| scope.key)
    }

    /// Run `f` with `id` entered in the seen set, or return `id` if it is
    /// already there. The entry is left on every path out of `f`.
    fn guard_against_cycles(
        &mut self,
        id: TypeId,
        f: impl FnOnce(&mut Self) -> Result<TypeId, ReplacementError>,
    ) -> Result<TypeId, ReplacementError> {
        if self.state.seen.enter(id) == CycleResult::Cycle {
            trace!(type_id = id.0, "cycle, leaving type as-is");
            return Ok(id);
        }
        let result = f(self);
        self.state.seen.leave(id);
        result
    }

    fn unresolved(&self, id: TypeId, use_unknown: bool) -> TypeId {
        if use_unknown { TypeId::UNKNOWN } else { id }
    }

    fn replace_function(
        &mut self,
        id: TypeId,
        shape: &FunctionShape,
    ) -> Result<TypeId, ReplacementError> {
        if shape.is_native() {
            return Ok(id);
        }
        if !shape.is_ordinary_function() && !shape.is_constructor() {
            return Ok(id);
        }

        let mut changed = false;

        let before_this = shape.this_type.unwrap_or(TypeId::UNKNOWN);
        let after_this = self.visit_type(before_this)?;
        changed |= before_this != after_this;

        let before_return = shape.return_type;
        let after_return = self.visit_type(before_return)?;
        changed |= before_return != after_return;

        let mut params_changed = false;
        let mut params = FunctionParamBuilder::with_capacity(shape.params.len());
        for param in &shape.params {
            let after = self.visit_type(param.type_id)?;
            if after == param.type_id {
                params.new_parameter_from(param);
                continue;
            }
            params_changed = true;
            if !params.add_param_like(param, after) {
                // Out-of-order source list; keep the parameter regardless.
                params.new_parameter_from(&Parameter {
                    type_id: after,
                    kind: param.kind,
                });
            }
        }
        changed |= params_changed;

        if !changed {
            return Ok(id);
        }

        let mut builder = FunctionBuilder::from_shape(shape);
        if params_changed {
            builder = builder.with_parameters(params.build());
        }
        // TODO: copy the abstract flag from the source function.
        let rebuilt = builder
            .with_return_type(after_return)
            .with_type_of_this(after_this)
            .with_is_abstract(false)
            .build(self.registry);
        debug!(from = id.0, to = rebuilt.0, "rebuilt function type");
        Ok(rebuilt)
    }

    fn replace_record(
        &mut self,
        id: TypeId,
        shape: &ObjectShape,
    ) -> Result<TypeId, ReplacementError> {
        if !self.policy.visit_properties || !shape.is_record() {
            return Ok(id);
        }
        if let Some(&cached) = self.state.visited_objects.get(&id) {
            return Ok(cached);
        }

        let mut changed = false;
        let mut builder = RecordTypeBuilder::new();
        for (&name, prop) in &shape.properties {
            let after = self.visit_type(prop.type_id)?;
            changed |= after != prop.type_id;
            builder.add_property(name, after, prop.decl);
        }

        let result = if changed {
            let rebuilt = builder.build(self.registry);
            debug!(from = id.0, to = rebuilt.0, "rebuilt record type");
            rebuilt
        } else {
            id
        };
        self.state.visited_objects.insert(id, result);
        Ok(result)
    }

    fn replace_union(
        &mut self,
        id: TypeId,
        alternates: &[TypeId],
    ) -> Result<TypeId, ReplacementError> {
        let mut changed = false;
        let mut results = Vec::with_capacity(alternates.len());
        for &alternate in alternates {
            let replacement = self.visit_type(alternate)?;
            changed |= replacement != alternate;
            results.push(replacement);
        }
        if !changed {
            return Ok(id);
        }
        // May collapse to a single non-union type.
        Ok(self.registry.create_union_type(results))
    }

    fn replace_templatized(
        &mut self,
        id: TypeId,
        base: TypeId,
        args: &[TypeId],
    ) -> Result<TypeId, ReplacementError> {
        let after_base = self.visit_type(base)?;
        let mut changed = after_base != base;

        let mut after_args = Vec::with_capacity(args.len());
        for &arg in args {
            let after = self.visit_type(arg)?;
            changed |= after != arg;
            after_args.push(after);
        }

        if !changed {
            return Ok(id);
        }
        let rebuilt = self.registry.create_templatized_type(after_base, after_args);
        debug!(from = id.0, to = rebuilt.0, "rebuilt templatized type");
        Ok(rebuilt)
    }
}

impl TypeVisitor for TemplateTypeReplacer<'_> {
    type Output = Result<TypeId, ReplacementError>;

    fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    fn visit_native(&mut self, _id: TypeId, native: JsTypeNative) -> Self::Output {
        Ok(self.registry.native_type(native))
    }

    fn visit_template_type(&mut self, id: TypeId, _info: &TemplateTypeInfo) -> Self::Output {
        self.has_made_replacement = true;

        let key_type = self.key_type();
        let boundary = self.state.key_scope.map(|scope| scope.own_submap_boundary);
        if key_type != Some(id) && !self.bindings.has_template_key_within(id, boundary) {
            trace!(template = id.0, "not a key in scope");
            return Ok(self.unresolved(id, self.policy.unknown_for_missing_keys));
        }

        if self.state.seen.is_visiting(&id) {
            // Already replacing this key further up: a reference loop.
            return Ok(id);
        }
        if !self.bindings.has_template_type(id) {
            trace!(template = id.0, "key has no value");
            return Ok(self.unresolved(id, self.policy.unknown_for_missing_values));
        }

        let replacement = self
            .bindings
            .unresolved_original_template_type(self.registry, id);

        // Recursive bindings such as `T -> Foo<T>` keep `Foo<T>` as it was.
        // Returning the key rather than the visited replacement tells the
        // caller nothing changed.
        if Some(replacement) == key_type || self.state.seen.is_visiting(&replacement) {
            trace!(template = id.0, replacement = replacement.0, "recursive binding");
            return Ok(id);
        }

        let _ = self.state.seen.enter(id);
        let visited = self.visit_type(replacement);
        self.state.seen.leave(id);
        let visited = visited?;

        if key_type == Some(visited) {
            return Err(ReplacementError::SelfReplacement { key: visited });
        }
        Ok(visited)
    }

    fn visit_object(&mut self, id: TypeId, shape: &Arc<ObjectShape>) -> Self::Output {
        self.guard_against_cycles(id, |this| this.replace_record(id, shape))
    }

    fn visit_function(&mut self, id: TypeId, shape: &Arc<FunctionShape>) -> Self::Output {
        self.guard_against_cycles(id, |this| this.replace_function(id, shape))
    }

    fn visit_union(&mut self, id: TypeId, alternates: &Arc<[TypeId]>) -> Self::Output {
        self.guard_against_cycles(id, |this| this.replace_union(id, alternates))
    }

    fn visit_templatized(
        &mut self,
        id: TypeId,
        base: TypeId,
        args: &Arc<[TypeId]>,
    ) -> Self::Output {
        self.guard_against_cycles(id, |this| this.replace_templatized(id, base, args))
    }

    fn visit_named(&mut self, id: TypeId, _name: Atom, _referenced: Option<TypeId>) -> Self::Output {
        Ok(id)
    }

    fn visit_proxy(&mut self, id: TypeId, referenced: TypeId) -> Self::Output {
        // Only unwrap a proxy whose target changed.
        self.guard_against_cycles(id, |this| {
            let replacement = this.visit_type(referenced)?;
            Ok(if replacement != referenced { replacement } else { id })
        })
    }

    fn visit_enum_element(&mut self, id: TypeId, _name: Atom, _primitive: TypeId) -> Self::Output {
        Ok(id)
    }

    fn visit_missing(&mut self, id: TypeId) -> Self::Output {
        Ok(id)
    }
}

/// Replace template types in `type_id` with one throwaway replacer.
pub fn replace_templates(
    registry: &TypeRegistry,
    type_id: TypeId,
    bindings: &TemplateTypeMap,
    policy: ReplacementPolicy,
) -> Result<TypeId, ReplacementError> {
    TemplateTypeReplacer::with_policy(registry, bindings, policy).replace(type_id)
}

#[cfg(test)]
#[path = "../tests/replacer_tests.rs"]
mod tests;
