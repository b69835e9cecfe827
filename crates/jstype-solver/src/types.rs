//! Type representation for the JavaScript type model.
//!
//! Types live in a [`TypeRegistry`](crate::TypeRegistry) arena and are
//! referenced by [`TypeId`]. A `TypeId` is the type's identity: every
//! construction call allocates a new id unless the registry chooses to
//! intern the result, so two structurally equal types built separately are
//! two distinct types. Reference-identity comparisons elsewhere in the
//! compiler are plain `TypeId` equality.

use bitflags::bitflags;
use indexmap::IndexMap;
use jstype_common::{Atom, PropertyDecl};
use std::sync::Arc;

// =============================================================================
// TypeId
// =============================================================================

/// Identity handle for a type stored in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const NO_TYPE: TypeId = TypeId(0);
    pub const ALL_TYPE: TypeId = TypeId(1);
    pub const NO_OBJECT_TYPE: TypeId = TypeId(2);
    pub const UNKNOWN: TypeId = TypeId(3);
    pub const NULL: TypeId = TypeId(4);
    pub const VOID: TypeId = TypeId(5);
    pub const NUMBER: TypeId = TypeId(6);
    pub const STRING: TypeId = TypeId(7);
    pub const BOOLEAN: TypeId = TypeId(8);
    pub const BIGINT: TypeId = TypeId(9);
    pub const SYMBOL: TypeId = TypeId(10);

    /// First id handed out for a non-native type.
    pub const FIRST_USER: u32 = 11;

    #[inline]
    pub const fn is_native(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// Native types
// =============================================================================

/// The native (primitive and sentinel) types owned by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JsTypeNative {
    /// Bottom type.
    NoType,
    /// Top type (`*`).
    AllType,
    /// Bottom of the object lattice.
    NoObjectType,
    /// The unknown type (`?`).
    Unknown,
    Null,
    /// `undefined`.
    Void,
    Number,
    String,
    Boolean,
    BigInt,
    Symbol,
}

impl JsTypeNative {
    /// All natives, in `TypeId` order.
    pub const ALL: [JsTypeNative; 11] = [
        JsTypeNative::NoType,
        JsTypeNative::AllType,
        JsTypeNative::NoObjectType,
        JsTypeNative::Unknown,
        JsTypeNative::Null,
        JsTypeNative::Void,
        JsTypeNative::Number,
        JsTypeNative::String,
        JsTypeNative::Boolean,
        JsTypeNative::BigInt,
        JsTypeNative::Symbol,
    ];

    pub const fn type_id(self) -> TypeId {
        match self {
            JsTypeNative::NoType => TypeId::NO_TYPE,
            JsTypeNative::AllType => TypeId::ALL_TYPE,
            JsTypeNative::NoObjectType => TypeId::NO_OBJECT_TYPE,
            JsTypeNative::Unknown => TypeId::UNKNOWN,
            JsTypeNative::Null => TypeId::NULL,
            JsTypeNative::Void => TypeId::VOID,
            JsTypeNative::Number => TypeId::NUMBER,
            JsTypeNative::String => TypeId::STRING,
            JsTypeNative::Boolean => TypeId::BOOLEAN,
            JsTypeNative::BigInt => TypeId::BIGINT,
            JsTypeNative::Symbol => TypeId::SYMBOL,
        }
    }

    /// Display name, in JSDoc type syntax.
    pub const fn display_name(self) -> &'static str {
        match self {
            JsTypeNative::NoType => "None",
            JsTypeNative::AllType => "*",
            JsTypeNative::NoObjectType => "NoObject",
            JsTypeNative::Unknown => "?",
            JsTypeNative::Null => "null",
            JsTypeNative::Void => "undefined",
            JsTypeNative::Number => "number",
            JsTypeNative::String => "string",
            JsTypeNative::Boolean => "boolean",
            JsTypeNative::BigInt => "bigint",
            JsTypeNative::Symbol => "symbol",
        }
    }
}

// =============================================================================
// Template types
// =============================================================================

/// A generic type parameter (`@template T`).
///
/// Two template types with the same name are still different parameters;
/// identity is the `TypeId`, never the name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TemplateTypeInfo {
    pub name: Atom,
    /// Declared upper bound (`@template T extends Foo`), if any.
    pub bound: Option<TypeId>,
}

// =============================================================================
// Object types
// =============================================================================

/// Whether an object type is compared structurally or by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Structural record, `{a: number, b: string}`.
    Record,
    /// Instance of a class or interface. Opaque to substitution.
    Nominal { name: Atom },
}

/// Type and declaration site of one own property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub type_id: TypeId,
    pub decl: Option<PropertyDecl>,
}

impl PropertyInfo {
    pub const fn new(type_id: TypeId) -> Self {
        Self {
            type_id,
            decl: None,
        }
    }

    pub const fn with_decl(type_id: TypeId, decl: PropertyDecl) -> Self {
        Self {
            type_id,
            decl: Some(decl),
        }
    }
}

/// Own properties of an object type, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectShape {
    pub kind: ObjectKind,
    pub properties: IndexMap<Atom, PropertyInfo>,
}

impl ObjectShape {
    pub fn record(properties: IndexMap<Atom, PropertyInfo>) -> Self {
        Self {
            kind: ObjectKind::Record,
            properties,
        }
    }

    #[inline]
    pub fn is_record(&self) -> bool {
        matches!(self.kind, ObjectKind::Record)
    }

    #[inline]
    pub fn is_nominal(&self) -> bool {
        matches!(self.kind, ObjectKind::Nominal { .. })
    }

    pub fn property_type(&self, name: Atom) -> Option<TypeId> {
        self.properties.get(&name).map(|prop| prop.type_id)
    }

    pub fn property_names(&self) -> impl Iterator<Item = Atom> + '_ {
        self.properties.keys().copied()
    }
}

// =============================================================================
// Function types
// =============================================================================

/// How an argument binds to a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Required,
    /// `T=`
    Optional,
    /// `...T`
    Variadic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub type_id: TypeId,
    pub kind: ParamKind,
}

impl Parameter {
    pub const fn required(type_id: TypeId) -> Self {
        Self {
            type_id,
            kind: ParamKind::Required,
        }
    }

    pub const fn optional(type_id: TypeId) -> Self {
        Self {
            type_id,
            kind: ParamKind::Optional,
        }
    }

    pub const fn variadic(type_id: TypeId) -> Self {
        Self {
            type_id,
            kind: ParamKind::Variadic,
        }
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.kind == ParamKind::Optional
    }

    #[inline]
    pub fn is_variadic(&self) -> bool {
        self.kind == ParamKind::Variadic
    }
}

/// What a function type describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// A plain callable.
    Ordinary,
    /// A class constructor (`function(new:Foo)`).
    Constructor,
    /// An interface or record constructor; never called directly.
    Interface,
}

bitflags! {
    /// Flags on a function type.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FunctionFlags: u8 {
        /// Built into the environment (`Object`, `Function`, ...).
        const NATIVE = 1 << 0;
        /// Declared `@abstract`.
        const ABSTRACT = 1 << 1;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionShape {
    pub name: Option<Atom>,
    /// Receiver type. `None` means undeclared and reads as unknown.
    pub this_type: Option<TypeId>,
    pub return_type: TypeId,
    pub params: Vec<Parameter>,
    pub kind: FunctionKind,
    pub flags: FunctionFlags,
}

impl FunctionShape {
    #[inline]
    pub fn is_native(&self) -> bool {
        self.flags.contains(FunctionFlags::NATIVE)
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(FunctionFlags::ABSTRACT)
    }

    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.kind == FunctionKind::Constructor
    }

    #[inline]
    pub fn is_ordinary_function(&self) -> bool {
        self.kind == FunctionKind::Ordinary
    }
}

// =============================================================================
// TypeData
// =============================================================================

/// The closed set of type variants.
///
/// Composite payloads sit behind `Arc` so a lookup is a cheap clone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeData {
    Native(JsTypeNative),
    TemplateType(TemplateTypeInfo),
    Object(Arc<ObjectShape>),
    Function(Arc<FunctionShape>),
    /// Alternatives in insertion order; never nested, never fewer than two.
    Union(Arc<[TypeId]>),
    /// A base type applied to template arguments (`Array<string>`).
    Templatized {
        base: TypeId,
        args: Arc<[TypeId]>,
    },
    /// A named reference. Its contents are never inspected by substitution.
    Named {
        name: Atom,
        referenced: Option<TypeId>,
    },
    /// A transparent forwarding wrapper.
    Proxy {
        referenced: TypeId,
    },
    EnumElement {
        name: Atom,
        primitive: TypeId,
    },
}

impl TypeData {
    #[inline]
    pub fn is_template_type(&self) -> bool {
        matches!(self, TypeData::TemplateType(_))
    }

    #[inline]
    pub fn is_union(&self) -> bool {
        matches!(self, TypeData::Union(_))
    }
}
