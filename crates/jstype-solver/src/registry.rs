//! The type registry: arena storage, native singletons and canonical
//! construction of composite types.
//!
//! Every type is stored once in an append-only arena and handed out as a
//! [`TypeId`]. The registry decides which constructions are interned:
//!
//! - natives are fixed singletons,
//! - unions and templatized types are interned by their member list,
//! - records, functions, template types, named types and proxies are always
//!   fresh, so their `TypeId` is their identity.
//!
//! All methods take `&self`; the registry is shared by every substitution
//! running on any thread.

use crate::builders::RecordTypeBuilder;
use crate::format::TypeFormatter;
use crate::types::*;
use indexmap::IndexMap;
use jstype_common::limits::TYPE_LIST_INLINE;
use jstype_common::{Atom, ShardedInterner};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

type MemberBuffer = SmallVec<[TypeId; TYPE_LIST_INLINE]>;

/// Registry of all types in one compilation.
pub struct TypeRegistry {
    types: RwLock<Vec<TypeData>>,
    unions: RwLock<FxHashMap<Arc<[TypeId]>, TypeId>>,
    templatized: RwLock<FxHashMap<(TypeId, Arc<[TypeId]>), TypeId>>,
    /// Property names, template names and nominal type names.
    pub string_interner: ShardedInterner,
}

// Arena entries are only ever appended or swapped whole, so a lock poisoned
// by a panicking writer still guards a consistent vector.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TypeRegistry {
    /// Create a registry with every native type pre-registered.
    pub fn new() -> Self {
        let mut types = Vec::with_capacity(256);
        types.extend(JsTypeNative::ALL.iter().map(|&native| TypeData::Native(native)));
        debug_assert_eq!(types.len() as u32, TypeId::FIRST_USER);

        TypeRegistry {
            types: RwLock::new(types),
            unions: RwLock::new(FxHashMap::default()),
            templatized: RwLock::new(FxHashMap::default()),
            string_interner: {
                let interner = ShardedInterner::new();
                interner.intern_common();
                interner
            },
        }
    }

    // =========================================================================
    // Strings
    // =========================================================================

    pub fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    pub fn resolve_atom(&self, atom: Atom) -> String {
        self.string_interner.resolve(atom).to_string()
    }

    pub fn resolve_atom_ref(&self, atom: Atom) -> Arc<str> {
        self.string_interner.resolve(atom)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Fetch the data for `id`, or `None` if this registry never issued it.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        read_lock(&self.types).get(id.index()).cloned()
    }

    /// Number of types in the arena, natives included.
    pub fn len(&self) -> usize {
        read_lock(&self.types).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The canonical instance of a native type.
    #[inline]
    pub fn native_type(&self, native: JsTypeNative) -> TypeId {
        native.type_id()
    }

    pub fn template_type_info(&self, id: TypeId) -> Option<TemplateTypeInfo> {
        match self.lookup(id)? {
            TypeData::TemplateType(info) => Some(info),
            _ => None,
        }
    }

    pub fn is_template_type(&self, id: TypeId) -> bool {
        matches!(self.lookup(id), Some(TypeData::TemplateType(_)))
    }

    pub fn object_shape(&self, id: TypeId) -> Option<Arc<ObjectShape>> {
        match self.lookup(id)? {
            TypeData::Object(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn function_shape(&self, id: TypeId) -> Option<Arc<FunctionShape>> {
        match self.lookup(id)? {
            TypeData::Function(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn union_members(&self, id: TypeId) -> Option<Arc<[TypeId]>> {
        match self.lookup(id)? {
            TypeData::Union(members) => Some(members),
            _ => None,
        }
    }

    /// Base and arguments of a templatized type.
    pub fn templatized_parts(&self, id: TypeId) -> Option<(TypeId, Arc<[TypeId]>)> {
        match self.lookup(id)? {
            TypeData::Templatized { base, args } => Some((base, args)),
            _ => None,
        }
    }

    /// Render `id` in JSDoc-like syntax.
    pub fn format_type(&self, id: TypeId) -> String {
        TypeFormatter::new(self).format(id)
    }

    // =========================================================================
    // Fresh constructions
    // =========================================================================

    fn alloc(&self, data: TypeData) -> TypeId {
        let mut types = write_lock(&self.types);
        let id = TypeId(types.len() as u32);
        types.push(data);
        id
    }

    /// Declare a new template type. Each call is a distinct parameter.
    pub fn template_type(&self, name: &str, bound: Option<TypeId>) -> TypeId {
        let name = self.intern_string(name);
        self.alloc(TypeData::TemplateType(TemplateTypeInfo { name, bound }))
    }

    pub fn object(&self, shape: ObjectShape) -> TypeId {
        self.alloc(TypeData::Object(Arc::new(shape)))
    }

    /// Build a record from `(name, type)` pairs without declaration sites.
    pub fn record(&self, properties: &[(&str, TypeId)]) -> TypeId {
        let mut builder = RecordTypeBuilder::new();
        for &(name, type_id) in properties {
            builder.add_property(self.intern_string(name), type_id, None);
        }
        builder.build(self)
    }

    /// A class or interface instance type. Never rewritten by substitution.
    pub fn nominal_object(&self, name: &str, properties: &[(&str, TypeId)]) -> TypeId {
        let kind = ObjectKind::Nominal {
            name: self.intern_string(name),
        };
        let properties: IndexMap<Atom, PropertyInfo> = properties
            .iter()
            .map(|&(prop, type_id)| (self.intern_string(prop), PropertyInfo::new(type_id)))
            .collect();
        self.object(ObjectShape { kind, properties })
    }

    pub fn function(&self, shape: FunctionShape) -> TypeId {
        self.alloc(TypeData::Function(Arc::new(shape)))
    }

    pub fn named_type(&self, name: &str, referenced: Option<TypeId>) -> TypeId {
        let name = self.intern_string(name);
        self.alloc(TypeData::Named { name, referenced })
    }

    pub fn proxy(&self, referenced: TypeId) -> TypeId {
        self.alloc(TypeData::Proxy { referenced })
    }

    pub fn enum_element(&self, name: &str, primitive: TypeId) -> TypeId {
        let name = self.intern_string(name);
        self.alloc(TypeData::EnumElement { name, primitive })
    }

    // =========================================================================
    // Forward references (cyclic graphs)
    // =========================================================================

    /// Allocate a proxy whose target is filled in later by
    /// [`set_proxy_target`](Self::set_proxy_target). Until then it forwards
    /// to the unknown type.
    pub fn reserve_proxy(&self) -> TypeId {
        self.proxy(TypeId::UNKNOWN)
    }

    /// Point an existing proxy at `target`. Returns `false` if `proxy` is
    /// not a proxy.
    pub fn set_proxy_target(&self, proxy: TypeId, target: TypeId) -> bool {
        let mut types = write_lock(&self.types);
        match types.get_mut(proxy.index()) {
            Some(TypeData::Proxy { referenced }) => {
                *referenced = target;
                true
            }
            _ => false,
        }
    }

    /// Allocate an empty record whose properties are filled in later by
    /// [`define_record`](Self::define_record). This is how a record can
    /// mention itself in one of its own properties.
    pub fn reserve_record(&self) -> TypeId {
        self.object(ObjectShape::record(IndexMap::new()))
    }

    /// Give a reserved record its properties. Returns `false` if `id` is
    /// not a record type.
    pub fn define_record(&self, id: TypeId, builder: RecordTypeBuilder) -> bool {
        let shape = builder.into_shape();
        let mut types = write_lock(&self.types);
        match types.get_mut(id.index()) {
            Some(TypeData::Object(existing)) if existing.is_record() => {
                *existing = Arc::new(shape);
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Canonical constructions
    // =========================================================================

    /// Build the union of `alternates`.
    ///
    /// Nested unions are flattened and duplicates (by identity) dropped,
    /// keeping first-seen order. `NO_TYPE` contributes nothing; `UNKNOWN`
    /// and then `ALL_TYPE` absorb the whole union. The result is `NO_TYPE`
    /// for no alternatives and the alternative itself for exactly one, so
    /// the result is not necessarily a union.
    pub fn create_union_type(&self, alternates: impl IntoIterator<Item = TypeId>) -> TypeId {
        let mut members = MemberBuffer::new();
        for alternate in alternates {
            match self.lookup(alternate) {
                Some(TypeData::Union(nested)) => {
                    for &member in nested.iter() {
                        push_union_member(&mut members, member);
                    }
                }
                _ => push_union_member(&mut members, alternate),
            }
        }

        if members.contains(&TypeId::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        if members.contains(&TypeId::ALL_TYPE) {
            return TypeId::ALL_TYPE;
        }

        match members.len() {
            0 => TypeId::NO_TYPE,
            1 => members[0],
            _ => {
                let key: Arc<[TypeId]> = Arc::from(members.as_slice());
                let mut unions = write_lock(&self.unions);
                if let Some(&existing) = unions.get(&key) {
                    return existing;
                }
                let id = self.alloc(TypeData::Union(key.clone()));
                trace!(union = id.0, members = key.len(), "interned union");
                unions.insert(key, id);
                id
            }
        }
    }

    /// Apply `base` to `args`, reusing an existing instantiation with the
    /// same base and arguments. With no arguments this is `base` itself.
    pub fn create_templatized_type(&self, base: TypeId, args: Vec<TypeId>) -> TypeId {
        if args.is_empty() {
            return base;
        }

        let args: Arc<[TypeId]> = Arc::from(args);
        let mut templatized = write_lock(&self.templatized);
        if let Some(&existing) = templatized.get(&(base, args.clone())) {
            return existing;
        }
        let id = self.alloc(TypeData::Templatized {
            base,
            args: args.clone(),
        });
        templatized.insert((base, args), id);
        id
    }
}

fn push_union_member(members: &mut MemberBuffer, member: TypeId) {
    if member != TypeId::NO_TYPE && !members.contains(&member) {
        members.push(member);
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod tests;
