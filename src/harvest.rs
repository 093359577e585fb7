//! Metadata harvesting from parsed source files.
//!
//! Populates a [`TypeRegistry`] ahead of generation: serde-deriving structs
//! become data-transfer objects, unit enums become enumerations, and `impl`
//! blocks exposing a `handle` method register handler signatures. Validation
//! attributes translate into constraint tags and field doc comments may
//! carry array element hints.
//!
//! Harvesting runs in two passes. The first records every type name with
//! its module path so that the second can classify field references into
//! objects, enums, or the string-safe primitive fallback.

use crate::parser::ParsedFile;
use crate::registry::{
    is_primitive, ConstraintTag, EnumBacking, FieldDescriptor, HandlerSignature, TypeDescriptor,
    TypeRegistry,
};
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use syn::{Fields, ImplItem, Item, Type};

#[derive(Debug, Clone, Copy, PartialEq)]
enum NameKind {
    Object,
    Enum,
}

/// Bare name -> (full identity, kind), first declaration wins.
type KindMap = HashMap<String, (String, NameKind)>;

/// Builds a type registry from parsed project sources.
pub struct MetadataHarvester;

impl MetadataHarvester {
    /// Harvest all metadata from the given files.
    ///
    /// `root` anchors module-path derivation: a file at
    /// `<root>/src/item/dto.rs` contributes identities under `item::dto`.
    pub fn harvest(root: &Path, files: &[ParsedFile]) -> TypeRegistry {
        let mut kinds: KindMap = HashMap::new();

        for file in files {
            let module = module_path_for(&file.path, root);
            collect_names(&file.syntax_tree.items, &module, &mut kinds);
        }

        let mut registry = TypeRegistry::new();

        for file in files {
            let module = module_path_for(&file.path, root);
            register_items(&file.syntax_tree.items, &module, &kinds, &mut registry);
        }

        debug!(
            "Harvested {} types and {} handlers",
            registry.type_count(),
            registry.handler_count()
        );

        registry
    }
}

/// Derive a `::`-separated module path from a file path relative to the
/// scan root. `src`, `lib.rs`, `main.rs` and `mod.rs` segments contribute
/// nothing.
fn module_path_for(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let mut segments: Vec<String> = Vec::new();

    for component in relative.components() {
        let part = component.as_os_str().to_string_lossy();
        let part = part.strip_suffix(".rs").unwrap_or(&part);

        if matches!(part, "src" | "lib" | "main" | "mod") {
            continue;
        }

        segments.push(part.to_string());
    }

    segments.join("::")
}

fn join_identity(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{}::{}", module, name)
    }
}

fn collect_names(items: &[Item], module: &str, kinds: &mut KindMap) {
    for item in items {
        match item {
            Item::Struct(item_struct) if has_serde_derive(&item_struct.attrs) => {
                let name = item_struct.ident.to_string();
                kinds
                    .entry(name.clone())
                    .or_insert((join_identity(module, &name), NameKind::Object));
            }
            Item::Enum(item_enum) if is_unit_enum(item_enum) => {
                let name = item_enum.ident.to_string();
                kinds
                    .entry(name.clone())
                    .or_insert((join_identity(module, &name), NameKind::Enum));
            }
            Item::Mod(item_mod) => {
                if let Some((_, nested)) = &item_mod.content {
                    let nested_module = join_identity(module, &item_mod.ident.to_string());
                    collect_names(nested, &nested_module, kinds);
                }
            }
            _ => {}
        }
    }
}

fn register_items(items: &[Item], module: &str, kinds: &KindMap, registry: &mut TypeRegistry) {
    for item in items {
        match item {
            Item::Struct(item_struct) if has_serde_derive(&item_struct.attrs) => {
                register_struct(item_struct, module, kinds, registry);
            }
            Item::Enum(item_enum) if is_unit_enum(item_enum) => {
                register_enum(item_enum, module, registry);
            }
            Item::Impl(item_impl) => {
                register_handler(item_impl, module, registry);
            }
            Item::Mod(item_mod) => {
                if let Some((_, nested)) = &item_mod.content {
                    let nested_module = join_identity(module, &item_mod.ident.to_string());
                    register_items(nested, &nested_module, kinds, registry);
                }
            }
            _ => {}
        }
    }
}

fn register_struct(
    item_struct: &syn::ItemStruct,
    module: &str,
    kinds: &KindMap,
    registry: &mut TypeRegistry,
) {
    let identity = join_identity(module, &item_struct.ident.to_string());
    debug!("Registering object: {}", identity);

    let mut fields = Vec::new();
    let mut hints: Vec<(String, String)> = Vec::new();

    if let Fields::Named(named) = &item_struct.fields {
        for field in &named.named {
            let Some(ident) = &field.ident else { continue };
            let name = ident.to_string();

            let (ty, nullable) = field_descriptor(&field.ty, kinds);
            let constraints = parse_constraints(&field.attrs);

            if let Some(hint) = doc_element_hint(&field.attrs) {
                hints.push((name.clone(), hint));
            }

            let mut descriptor = FieldDescriptor::new(&name, ty);
            descriptor.nullable = nullable;
            descriptor.constraints = constraints;
            fields.push(descriptor);
        }
    }

    registry.register_object(&identity, fields);

    for (field, hint) in hints {
        registry.set_element_hint(&identity, &field, &hint);
    }
}

fn register_enum(item_enum: &syn::ItemEnum, module: &str, registry: &mut TypeRegistry) {
    let identity = join_identity(module, &item_enum.ident.to_string());
    debug!("Registering enum: {}", identity);

    let cases: Vec<String> = item_enum
        .variants
        .iter()
        .map(|variant| variant.ident.to_string())
        .collect();

    let backing = enum_backing(item_enum);

    registry.register_enum(&identity, cases, backing);
}

/// Detect the backing of an enum.
///
/// Explicit integer discriminants on every variant make an integer-backed
/// enum; `#[serde(rename = "...")]` on any variant makes a string-backed
/// one with the serialized names as values. Plain unit enums are unbacked.
fn enum_backing(item_enum: &syn::ItemEnum) -> Option<EnumBacking> {
    let discriminants: Vec<Option<i64>> = item_enum
        .variants
        .iter()
        .map(|variant| {
            variant.discriminant.as_ref().and_then(|(_, expr)| {
                if let syn::Expr::Lit(lit) = expr {
                    if let syn::Lit::Int(int) = &lit.lit {
                        return int.base10_parse::<i64>().ok();
                    }
                }
                None
            })
        })
        .collect();

    if !discriminants.is_empty() && discriminants.iter().all(Option::is_some) {
        return Some(EnumBacking {
            kind: "i64".to_string(),
            values: discriminants.into_iter().flatten().map(Value::from).collect(),
        });
    }

    let has_rename = item_enum
        .variants
        .iter()
        .any(|variant| serde_rename(&variant.attrs).is_some());

    if has_rename {
        let values = item_enum
            .variants
            .iter()
            .map(|variant| {
                let value = serde_rename(&variant.attrs)
                    .unwrap_or_else(|| variant.ident.to_string());
                Value::from(value)
            })
            .collect();

        return Some(EnumBacking {
            kind: "String".to_string(),
            values,
        });
    }

    None
}

fn register_handler(item_impl: &syn::ItemImpl, module: &str, registry: &mut TypeRegistry) {
    // Trait impls are not handler entry points
    if item_impl.trait_.is_some() {
        return;
    }

    let Type::Path(self_ty) = item_impl.self_ty.as_ref() else {
        return;
    };
    let Some(segment) = self_ty.path.segments.last() else {
        return;
    };

    let handle = item_impl.items.iter().find_map(|item| match item {
        ImplItem::Fn(method) if method.sig.ident == "handle" => Some(method),
        _ => None,
    });

    let Some(handle) = handle else { return };

    let identity = join_identity(module, &segment.ident.to_string());
    debug!("Registering handler: {}", identity);

    let params: Vec<String> = handle
        .sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            syn::FnArg::Typed(pat_type) => parameter_type_name(&pat_type.ty),
            syn::FnArg::Receiver(_) => None,
        })
        .collect();

    let ret = match &handle.sig.output {
        syn::ReturnType::Default => None,
        syn::ReturnType::Type(_, ty) => return_type_name(ty),
    };

    registry.register_handler(&identity, HandlerSignature { params, ret });
}

/// Name of a parameter type; `Json<T>` payload wrappers are unwrapped.
fn parameter_type_name(ty: &Type) -> Option<String> {
    let Type::Path(type_path) = ty else { return None };
    let segment = type_path.path.segments.last()?;
    let name = segment.ident.to_string();

    if name == "Json" {
        if let Some(inner) = first_type_argument(segment) {
            return parameter_type_name(inner);
        }
    }

    Some(name)
}

/// Name of the declared return type with `Result` and `Json` wrappers
/// stripped.
fn return_type_name(ty: &Type) -> Option<String> {
    let Type::Path(type_path) = ty else { return None };
    let segment = type_path.path.segments.last()?;
    let name = segment.ident.to_string();

    if name == "Result" || name == "Json" || name == "Option" || name == "Box" {
        if let Some(inner) = first_type_argument(segment) {
            return return_type_name(inner);
        }
        return None;
    }

    Some(name)
}

fn first_type_argument(segment: &syn::PathSegment) -> Option<&Type> {
    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
        for arg in &args.args {
            if let syn::GenericArgument::Type(ty) = arg {
                return Some(ty);
            }
        }
    }
    None
}

/// Build the descriptor for a field's declared type.
///
/// A top-level `Option` marks the field nullable instead of producing a
/// `Nullable` descriptor; nested `Option`s keep the wrapper.
fn field_descriptor(ty: &Type, kinds: &KindMap) -> (TypeDescriptor, bool) {
    if let Some(inner) = option_inner(ty) {
        return (type_descriptor(inner, kinds), true);
    }

    (type_descriptor(ty, kinds), false)
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else { return None };
    let segment = type_path.path.segments.last()?;

    if segment.ident == "Option" {
        return first_type_argument(segment);
    }

    None
}

fn type_descriptor(ty: &Type, kinds: &KindMap) -> TypeDescriptor {
    let Type::Path(type_path) = ty else {
        // Non-path types degrade to the string-safe primitive path
        return TypeDescriptor::Primitive("Unknown".to_string());
    };

    let Some(segment) = type_path.path.segments.last() else {
        return TypeDescriptor::Primitive("Unknown".to_string());
    };

    let name = segment.ident.to_string();

    match name.as_str() {
        "Option" => match first_type_argument(segment) {
            Some(inner) => {
                TypeDescriptor::Nullable(Box::new(type_descriptor(inner, kinds)))
            }
            None => TypeDescriptor::Primitive("Unknown".to_string()),
        },
        "Vec" => {
            let element = first_type_argument(segment)
                .map(|inner| type_descriptor(inner, kinds))
                .filter(|descriptor| {
                    // An unrecognized element name is no better than an
                    // absent one; leaving it out lets a doc hint fill in
                    !matches!(descriptor, TypeDescriptor::Primitive(name) if !is_primitive(name))
                });
            TypeDescriptor::Array(element.map(Box::new))
        }
        "Box" => match first_type_argument(segment) {
            Some(inner) => type_descriptor(inner, kinds),
            None => TypeDescriptor::Primitive("Unknown".to_string()),
        },
        "Either" => {
            let branches: Vec<TypeDescriptor> = type_arguments(segment)
                .into_iter()
                .map(|inner| type_descriptor(inner, kinds))
                .collect();
            TypeDescriptor::Union(branches)
        }
        _ if is_primitive(&name) => TypeDescriptor::Primitive(name),
        _ => match kinds.get(&name) {
            Some((identity, NameKind::Object)) => TypeDescriptor::Object(identity.clone()),
            Some((identity, NameKind::Enum)) => TypeDescriptor::Enum(identity.clone()),
            // Unknown named types degrade to the string-safe primitive path
            None => TypeDescriptor::Primitive(name),
        },
    }
}

fn type_arguments(segment: &syn::PathSegment) -> Vec<&Type> {
    let mut arguments = Vec::new();

    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
        for arg in &args.args {
            if let syn::GenericArgument::Type(ty) = arg {
                arguments.push(ty);
            }
        }
    }

    arguments
}

fn has_serde_derive(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| {
        if !attr.path().is_ident("derive") {
            return false;
        }

        match attr.meta.require_list() {
            Ok(list) => {
                let tokens = list.tokens.to_string();
                tokens.contains("Serialize") || tokens.contains("Deserialize")
            }
            Err(_) => false,
        }
    })
}

fn is_unit_enum(item_enum: &syn::ItemEnum) -> bool {
    !item_enum.variants.is_empty()
        && item_enum
            .variants
            .iter()
            .all(|variant| matches!(variant.fields, Fields::Unit))
}

fn serde_rename(attrs: &[syn::Attribute]) -> Option<String> {
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }

        if let Ok(list) = attr.meta.require_list() {
            let tokens = list.tokens.to_string();
            if let Some(value) = extract_quoted_value(&tokens, "rename") {
                return Some(value);
            }
        }
    }

    None
}

/// Extract a `key = "value"` pair from an attribute token string.
fn extract_quoted_value(tokens: &str, key: &str) -> Option<String> {
    let key_pos = tokens.find(key)?;
    let after_key = &tokens[key_pos + key.len()..];
    let eq_pos = after_key.find('=')?;
    let after_eq = &after_key[eq_pos + 1..];
    let start = after_eq.find('"')?;
    let rest = &after_eq[start + 1..];
    let end = rest.find('"')?;

    Some(rest[..end].to_string())
}

/// Parse `#[validate(...)]` attributes into constraint tags.
///
/// Unrecognized tokens are ignored, so new validation markers never break
/// harvesting.
fn parse_constraints(attrs: &[syn::Attribute]) -> Vec<ConstraintTag> {
    let mut tags = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("validate") {
            continue;
        }

        let Ok(list) = attr.meta.require_list() else {
            continue;
        };

        let tokens = list.tokens.to_string();

        for part in split_top_level(&tokens) {
            let part = part.trim();

            if part.starts_with("length") {
                tags.push(ConstraintTag::Length {
                    min: extract_bound(part, "min").map(|v| v as u64),
                    max: extract_bound(part, "max").map(|v| v as u64),
                });
            } else if part.starts_with("range") {
                tags.push(ConstraintTag::Range {
                    min: extract_bound(part, "min"),
                    max: extract_bound(part, "max"),
                });
            } else if part == "required" || part == "not_empty" {
                tags.push(ConstraintTag::NotEmpty);
            } else if part == "uuid" {
                tags.push(ConstraintTag::IsUuid);
            } else if part == "email" {
                tags.push(ConstraintTag::IsEmail);
            } else if part == "url" {
                tags.push(ConstraintTag::IsUrl);
            }
        }
    }

    tags
}

/// Split an attribute token string on commas outside parentheses.
fn split_top_level(tokens: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth: u32 = 0;

    for ch in tokens.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

/// Extract a numeric `key = value` bound from a tag like
/// `length (min = 3 , max = 100)`.
fn extract_bound(part: &str, key: &str) -> Option<f64> {
    let key_pos = part.find(key)?;
    let after_key = &part[key_pos + key.len()..];
    let eq_pos = after_key.find('=')?;
    let after_eq = after_key[eq_pos + 1..].trim_start();

    let number: String = after_eq
        .chars()
        .take_while(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();

    number.parse().ok()
}

/// Extract an `array<Type>` element hint from a field's doc comments.
fn doc_element_hint(attrs: &[syn::Attribute]) -> Option<String> {
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }

        if let syn::Meta::NameValue(name_value) = &attr.meta {
            if let syn::Expr::Lit(lit) = &name_value.value {
                if let syn::Lit::Str(text) = &lit.lit {
                    let line = text.value();
                    if let Some(start) = line.find("array<") {
                        let rest = &line[start + "array<".len()..];
                        if let Some(end) = rest.find('>') {
                            let hint = rest[..end].trim();
                            if !hint.is_empty() {
                                return Some(hint.to_string());
                            }
                        }
                    }
                }
            }
        }
    }

    None
}
