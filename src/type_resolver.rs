//! Pure type-to-schema mapping functions.
//!
//! Everything here is stateless: primitive name mapping, enum resolution,
//! array and union schemas. Absent or unknown data degrades to the safest
//! primitive (string) instead of failing - no function in this module has an
//! error condition.
//!
//! Functions that may emit `$ref`s take a name-resolver closure so that the
//! caller decides how identities map to component schema names.

use crate::registry::{TypeDescriptor, TypeRegistry};
use crate::schema::SchemaFragment;
use serde_json::Value;

/// Map a host primitive name to an OpenAPI schema type.
///
/// Unrecognized names map to "string" as the safe default.
pub fn map_primitive(name: &str) -> &'static str {
    match name {
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => "integer",
        "f32" | "f64" => "number",
        "bool" => "boolean",
        "Vec" | "array" => "array",
        _ => "string",
    }
}

/// Resolve an enumeration to its literal-value schema.
///
/// Unbacked enums list their case names as string values; backed enums list
/// the backing values under the mapped backing type. An unknown enum
/// identity degrades to a bare string schema.
pub fn resolve_enum(registry: &TypeRegistry, identity: &str) -> SchemaFragment {
    let Some(meta) = registry.enum_meta(identity) else {
        return SchemaFragment::typed("string");
    };

    match &meta.backing {
        None => SchemaFragment {
            schema_type: Some("string".to_string()),
            enum_values: Some(meta.cases.iter().map(|c| Value::from(c.as_str())).collect()),
            ..SchemaFragment::default()
        },
        Some(backing) => SchemaFragment {
            schema_type: Some(map_primitive(&backing.kind).to_string()),
            enum_values: Some(backing.values.clone()),
            ..SchemaFragment::default()
        },
    }
}

/// Resolve an array schema with an optional element type.
///
/// Without an element the schema stays an untyped-items array, which is
/// still valid.
pub fn resolve_array<F>(
    registry: &TypeRegistry,
    element: Option<&TypeDescriptor>,
    name_resolver: &F,
) -> SchemaFragment
where
    F: Fn(&str) -> String,
{
    let mut schema = SchemaFragment::typed("array");

    if let Some(element) = element {
        schema.items = Some(Box::new(resolve_single(registry, element, name_resolver)));
    }

    schema
}

/// Resolve a union of alternative types.
///
/// Literal null branches are dropped (nullability is represented
/// separately). A single remaining branch is returned directly rather than
/// wrapped in a one-entry `oneOf`.
pub fn resolve_union<F>(
    registry: &TypeRegistry,
    branches: &[TypeDescriptor],
    name_resolver: &F,
) -> SchemaFragment
where
    F: Fn(&str) -> String,
{
    let mut fragments: Vec<SchemaFragment> = branches
        .iter()
        .filter(|branch| !matches!(branch, TypeDescriptor::Primitive(name) if name == "null"))
        .map(|branch| resolve_single(registry, branch, name_resolver))
        .collect();

    if fragments.len() == 1 {
        return fragments.remove(0);
    }

    SchemaFragment {
        one_of: Some(fragments),
        ..SchemaFragment::default()
    }
}

/// Classify a bare type name into a descriptor using the registry.
///
/// Names that are neither registered nor primitive fall back to the
/// primitive path, which maps them to string.
pub fn descriptor_for_name(registry: &TypeRegistry, name: &str) -> TypeDescriptor {
    if registry.is_enum(name) {
        TypeDescriptor::Enum(registry.resolve(name).unwrap_or(name).to_string())
    } else if registry.is_object(name) {
        TypeDescriptor::Object(registry.resolve(name).unwrap_or(name).to_string())
    } else {
        TypeDescriptor::Primitive(name.to_string())
    }
}

/// Resolve one descriptor as a standalone schema.
///
/// Objects become `$ref`s; nested arrays and unions recurse.
pub fn resolve_single<F>(
    registry: &TypeRegistry,
    descriptor: &TypeDescriptor,
    name_resolver: &F,
) -> SchemaFragment
where
    F: Fn(&str) -> String,
{
    match descriptor {
        TypeDescriptor::Primitive(name) => SchemaFragment::typed(map_primitive(name)),
        TypeDescriptor::Enum(identity) => resolve_enum(registry, identity),
        TypeDescriptor::Object(identity) => SchemaFragment::reference(&name_resolver(identity)),
        TypeDescriptor::Array(element) => {
            resolve_array(registry, element.as_deref(), name_resolver)
        }
        TypeDescriptor::Union(branches) => resolve_union(registry, branches, name_resolver),
        TypeDescriptor::Nullable(inner) => {
            let mut schema = resolve_single(registry, inner, name_resolver);
            schema.nullable = Some(true);
            schema
        }
    }
}
