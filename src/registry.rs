//! Type metadata registry - the ahead-of-time-populated view of the host
//! type system that generation runs against.
//!
//! The registry is filled either by explicit registration calls (tests,
//! embedding applications) or by the source harvester (see [`crate::harvest`]).
//! Once populated it is read-only from the generators' point of view: type
//! and field descriptors are never mutated during a generation run.

use serde_json::Value;
use std::collections::HashMap;

/// The declared shape of a field or parameter type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// A scalar declared with the host primitive name ("i32", "String", ...)
    Primitive(String),
    /// A named data-transfer object, by full identity
    Object(String),
    /// A named enumeration, by full identity
    Enum(String),
    /// An array whose element type may be unknown
    Array(Option<Box<TypeDescriptor>>),
    /// An ordered union of alternative types
    Union(Vec<TypeDescriptor>),
    /// A type that additionally accepts null
    Nullable(Box<TypeDescriptor>),
}

/// A single declared field of a data-transfer type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name, unique within its owning type
    pub name: String,
    /// Declared type shape
    pub ty: TypeDescriptor,
    /// Whether the declaration accepts null
    pub nullable: bool,
    /// Declarative validation markers, in declaration order
    pub constraints: Vec<ConstraintTag>,
}

impl FieldDescriptor {
    pub fn new(name: &str, ty: TypeDescriptor) -> Self {
        Self {
            name: name.to_string(),
            ty,
            nullable: false,
            constraints: Vec::new(),
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_constraint(mut self, tag: ConstraintTag) -> Self {
        self.constraints.push(tag);
        self
    }
}

/// A declarative validation marker attached to a field.
///
/// Tags are translated into schema keywords, never executed. Unknown markers
/// are dropped at the harvest boundary, so the set here is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintTag {
    /// The field must be present and non-blank
    NotEmpty,
    /// The value is a UUID
    IsUuid,
    /// String length bounds
    Length { min: Option<u64>, max: Option<u64> },
    /// Numeric value bounds
    Range { min: Option<f64>, max: Option<f64> },
    /// The value is an email address
    IsEmail,
    /// The value is a URL
    IsUrl,
}

/// Registered metadata for one named type.
#[derive(Debug, Clone)]
pub enum TypeMeta {
    Object(ObjectMeta),
    Enum(EnumMeta),
}

/// Field list and auxiliary hints for a data-transfer object.
#[derive(Debug, Clone, Default)]
pub struct ObjectMeta {
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
    /// Best-effort array element types keyed by field name, sourced from
    /// documentation metadata
    pub element_hints: HashMap<String, String>,
}

/// Case list and optional backing values for an enumeration.
#[derive(Debug, Clone)]
pub struct EnumMeta {
    /// Case names in declaration order
    pub cases: Vec<String>,
    /// Backing values when the enum is backed; `None` for unit enums
    pub backing: Option<EnumBacking>,
}

/// Backing primitive and per-case values of a backed enum.
#[derive(Debug, Clone)]
pub struct EnumBacking {
    /// Host primitive name of the backing type ("i64", "String", ...)
    pub kind: String,
    /// One backing value per case, in case order
    pub values: Vec<Value>,
}

/// The declared signature of a handler entry point.
#[derive(Debug, Clone, Default)]
pub struct HandlerSignature {
    /// Parameter type names in declaration order (receiver excluded)
    pub params: Vec<String>,
    /// Declared return type name, wrappers already unwrapped
    pub ret: Option<String>,
}

/// Read-only type metadata provider.
///
/// Identities are `::`-separated paths. Lookups accept a bare short name as
/// a fallback; when two registered types share a short name the first
/// registered one wins, which mirrors the unresolved short-name-collision
/// behavior of `$ref` targets.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeMeta>,
    /// Registration order, used for deterministic bare-name resolution
    order: Vec<String>,
    handlers: HashMap<String, HandlerSignature>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a data-transfer object with its fields.
    pub fn register_object(&mut self, identity: &str, fields: Vec<FieldDescriptor>) {
        self.insert(
            identity,
            TypeMeta::Object(ObjectMeta {
                fields,
                element_hints: HashMap::new(),
            }),
        );
    }

    /// Register an enumeration.
    pub fn register_enum(&mut self, identity: &str, cases: Vec<String>, backing: Option<EnumBacking>) {
        self.insert(identity, TypeMeta::Enum(EnumMeta { cases, backing }));
    }

    /// Register a handler entry-point signature.
    pub fn register_handler(&mut self, identity: &str, signature: HandlerSignature) {
        self.handlers.insert(identity.to_string(), signature);
    }

    /// Attach an array element-type hint to a field of a registered object.
    pub fn set_element_hint(&mut self, identity: &str, field: &str, element: &str) {
        if let Some(TypeMeta::Object(meta)) = self.types.get_mut(identity) {
            meta.element_hints
                .insert(field.to_string(), element.to_string());
        }
    }

    fn insert(&mut self, identity: &str, meta: TypeMeta) {
        if !self.types.contains_key(identity) {
            self.order.push(identity.to_string());
        }
        self.types.insert(identity.to_string(), meta);
    }

    /// Resolve a possibly-bare name to a registered full identity.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some((identity, _)) = self.types.get_key_value(name) {
            return Some(identity.as_str());
        }

        let suffix = format!("::{}", name);
        self.order
            .iter()
            .find(|identity| identity.ends_with(&suffix))
            .map(String::as_str)
    }

    /// Look up type metadata by identity or bare name.
    pub fn type_meta(&self, name: &str) -> Option<&TypeMeta> {
        self.resolve(name).and_then(|identity| self.types.get(identity))
    }

    /// Look up an object by identity or bare name.
    pub fn object(&self, name: &str) -> Option<&ObjectMeta> {
        match self.type_meta(name) {
            Some(TypeMeta::Object(meta)) => Some(meta),
            _ => None,
        }
    }

    /// Look up an enum by identity or bare name.
    pub fn enum_meta(&self, name: &str) -> Option<&EnumMeta> {
        match self.type_meta(name) {
            Some(TypeMeta::Enum(meta)) => Some(meta),
            _ => None,
        }
    }

    /// Whether the name resolves to a registered enum.
    pub fn is_enum(&self, name: &str) -> bool {
        self.enum_meta(name).is_some()
    }

    /// Whether the name resolves to a registered object.
    pub fn is_object(&self, name: &str) -> bool {
        self.object(name).is_some()
    }

    /// Look up a handler signature by exact identity.
    pub fn handler(&self, identity: &str) -> Option<&HandlerSignature> {
        self.handlers.get(identity)
    }

    /// All registered type identities, in registration order.
    pub fn type_identities(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of registered types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

/// Whether a type name is a host primitive scalar.
pub fn is_primitive(name: &str) -> bool {
    matches!(
        name,
        "String"
            | "str"
            | "char"
            | "bool"
            | "i8"
            | "i16"
            | "i32"
            | "i64"
            | "i128"
            | "isize"
            | "u8"
            | "u16"
            | "u32"
            | "u64"
            | "u128"
            | "usize"
            | "f32"
            | "f64"
    )
}
