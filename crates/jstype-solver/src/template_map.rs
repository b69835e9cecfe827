//! Ordered template type bindings, partitioned into per-scope sub-maps.
//!
//! A map is built one scope at a time with
//! [`copy_with_extension`](TemplateTypeMap::copy_with_extension), outermost
//! scope first. Each extension records where its slice of `keys` ends, so
//! an index belongs to the first sub-map whose end lies past it. Lookups
//! scan from the end, which lets an inner scope shadow a key of an outer
//! one.

use crate::registry::TypeRegistry;
use crate::replacer::{KeyScope, ReplacementError, TemplateTypeReplacer};
use crate::types::TypeId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateTypeMap {
    keys: Vec<TypeId>,
    /// Never longer than `keys`; trailing keys may be unfilled.
    values: Vec<TypeId>,
    /// Exclusive end of each sub-map, non-decreasing. The last entry is
    /// `keys.len()`.
    submap_ends: Vec<usize>,
}

impl TemplateTypeMap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a new innermost scope.
    ///
    /// Earlier keys that never received a value get their default value
    /// first, so `values` lines up with `keys`. More values than keys are
    /// truncated; fewer leave the trailing new keys unfilled.
    pub fn copy_with_extension(
        &self,
        registry: &TypeRegistry,
        keys: &[TypeId],
        values: &[TypeId],
    ) -> Self {
        let mut extended = self.clone();
        extended.pad_values(registry, self.keys.len());
        extended.keys.extend_from_slice(keys);
        extended
            .values
            .extend(values.iter().copied().take(keys.len()));
        extended.submap_ends.push(extended.keys.len());
        extended
    }

    /// Fill the unfilled trailing keys with `values`, in order, and give
    /// any key still left its default value.
    pub fn copy_filled_with_values(&self, registry: &TypeRegistry, values: &[TypeId]) -> Self {
        let mut filled = self.clone();
        let unfilled = self.keys.len() - self.values.len();
        filled
            .values
            .extend(values.iter().copied().take(unfilled));
        filled.pad_values(registry, filled.keys.len());
        filled
    }

    fn pad_values(&mut self, registry: &TypeRegistry, len: usize) {
        while self.values.len() < len {
            let key = self.keys[self.values.len()];
            self.values.push(default_value(registry, key));
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Index of the innermost binding of `key` that has a value.
    pub fn template_type_index(&self, key: TypeId) -> Option<usize> {
        let max = self.keys.len().min(self.values.len());
        self.keys[..max].iter().rposition(|&k| k == key)
    }

    pub fn has_template_key(&self, key: TypeId) -> bool {
        self.keys.contains(&key)
    }

    /// Whether `key` appears before `boundary`; the whole map for `None`.
    pub fn has_template_key_within(&self, key: TypeId, boundary: Option<usize>) -> bool {
        let end = boundary.map_or(self.keys.len(), |b| b.min(self.keys.len()));
        self.keys[..end].contains(&key)
    }

    /// Whether `key` is bound to a value.
    pub fn has_template_type(&self, key: TypeId) -> bool {
        self.template_type_index(key).is_some()
    }

    /// The value `key` is bound to, before resolving any template types
    /// inside it.
    pub fn unresolved_original_template_type(&self, registry: &TypeRegistry, key: TypeId) -> TypeId {
        match self.template_type_index(key) {
            Some(index) => self.values[index],
            None => default_value(registry, key),
        }
    }

    /// Exclusive end of the sub-map containing `index`.
    pub fn own_submap_boundary(&self, index: usize) -> usize {
        self.submap_ends
            .iter()
            .copied()
            .find(|&end| index < end)
            .unwrap_or(self.keys.len())
    }

    /// The value bound to `key`, with template types inside it replaced by
    /// their own bindings from this map.
    pub fn resolved_template_type(
        &self,
        registry: &TypeRegistry,
        key: TypeId,
    ) -> Result<TypeId, ReplacementError> {
        match self.template_type_index(key) {
            Some(index) => self.resolve_at(registry, index),
            None => Ok(default_value(registry, key)),
        }
    }

    /// Every bound value, resolved as by
    /// [`resolved_template_type`](Self::resolved_template_type).
    pub fn resolved_values(&self, registry: &TypeRegistry) -> Result<Vec<TypeId>, ReplacementError> {
        (0..self.values.len())
            .map(|index| self.resolve_at(registry, index))
            .collect()
    }

    fn resolve_at(&self, registry: &TypeRegistry, index: usize) -> Result<TypeId, ReplacementError> {
        let scope = KeyScope {
            key: self.keys[index],
            own_submap_boundary: self.own_submap_boundary(index),
        };
        TemplateTypeReplacer::for_total_replacement(registry, self)
            .replace_in_scope(self.values[index], scope)
    }

    pub fn template_keys(&self) -> &[TypeId] {
        &self.keys
    }

    pub fn template_values(&self) -> &[TypeId] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether every key has a value.
    pub fn is_filled(&self) -> bool {
        self.values.len() == self.keys.len()
    }
}

/// Value of an unbound key: its declared bound, else unknown.
fn default_value(registry: &TypeRegistry, key: TypeId) -> TypeId {
    registry
        .template_type_info(key)
        .and_then(|info| info.bound)
        .unwrap_or(TypeId::UNKNOWN)
}

#[cfg(test)]
#[path = "../tests/template_map_tests.rs"]
mod tests;
