//! Recursive object-schema generation with caching and cycle detection.
//!
//! The generator walks a data-transfer type's fields in declaration order,
//! delegating type mapping to [`crate::type_resolver`] and constraint
//! translation to [`crate::constraints`]. A write-once cache makes repeated
//! generation of the same type free, and a processing stack breaks
//! self-referential and mutually-referential type graphs with a `$ref`
//! instead of recursing forever.
//!
//! One generator instance supports exactly one generation pass at a time;
//! callers running concurrently must use one instance per run.

use crate::constraints::{apply_constraints, has_uuid_tag};
use crate::registry::{TypeDescriptor, TypeRegistry};
use crate::schema::SchemaFragment;
use crate::type_resolver;
use indexmap::IndexMap;
use log::debug;

/// Strip an identity to its last path segment.
///
/// Used for `$ref` targets and the public schema view. Two distinct types
/// sharing a short name silently merge in that view - a known ambiguity.
pub fn short_name(identity: &str) -> &str {
    identity.rsplit("::").next().unwrap_or(identity)
}

/// Schema generator over a type registry.
pub struct SchemaGenerator<'a> {
    registry: &'a TypeRegistry,
    /// Resolved fragments by full identity, write-once, insertion-ordered
    cache: IndexMap<String, SchemaFragment>,
    /// Identities currently being resolved, for cycle detection
    processing_stack: Vec<String>,
}

impl<'a> SchemaGenerator<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        debug!("Initializing SchemaGenerator");
        Self {
            registry,
            cache: IndexMap::new(),
            processing_stack: Vec::new(),
        }
    }

    /// Generate the schema for a type identity.
    ///
    /// Unknown identities yield an empty fragment, never an error. A type
    /// encountered while still being resolved yields a `$ref` to its own
    /// short name, which is the cycle-breaking policy.
    pub fn generate(&mut self, type_identity: &str) -> SchemaFragment {
        debug!("Generating schema for type: {}", type_identity);

        let Some(identity) = self.registry.resolve(type_identity).map(str::to_string) else {
            debug!("Type {} is unknown, returning empty fragment", type_identity);
            return SchemaFragment::default();
        };

        if let Some(cached) = self.cache.get(&identity) {
            debug!("Schema for {} found in cache", identity);
            return cached.clone();
        }

        if self.processing_stack.contains(&identity) {
            debug!("Cycle detected for {}, emitting reference", identity);
            return SchemaFragment::reference(short_name(&identity));
        }

        if self.registry.is_enum(&identity) {
            let schema = type_resolver::resolve_enum(self.registry, &identity);
            self.cache.insert(identity, schema.clone());
            return schema;
        }

        self.processing_stack.push(identity.clone());

        let schema = self.generate_object_schema(&identity);

        self.processing_stack.pop();
        self.cache.insert(identity, schema.clone());

        schema
    }

    fn generate_object_schema(&mut self, identity: &str) -> SchemaFragment {
        // resolve() guarantees the identity exists; a non-enum entry is an object
        let Some(meta) = self.registry.object(identity) else {
            return SchemaFragment::default();
        };

        let fields = meta.fields.clone();
        let hints = meta.element_hints.clone();

        let mut properties = IndexMap::new();
        let mut required = Vec::new();

        for field in &fields {
            let hint = hints.get(&field.name).map(String::as_str);
            let (schema, field_required) = self.resolve_field(field, hint);
            properties.insert(field.name.clone(), schema);

            if field_required {
                required.push(field.name.clone());
            }
        }

        SchemaFragment {
            schema_type: Some("object".to_string()),
            properties: Some(properties),
            required: (!required.is_empty()).then_some(required),
            ..SchemaFragment::default()
        }
    }

    /// Resolve one field to its property schema and required status.
    ///
    /// A field is required only when tagged `NotEmpty` and not nullable;
    /// nullable fields carry `nullable: true` regardless of anything else.
    fn resolve_field(
        &mut self,
        field: &crate::registry::FieldDescriptor,
        element_hint: Option<&str>,
    ) -> (SchemaFragment, bool) {
        let registry = self.registry;
        let resolver = |identity: &str| short_name(identity).to_string();

        let mut schema = match &field.ty {
            TypeDescriptor::Enum(identity) => type_resolver::resolve_enum(registry, identity),
            TypeDescriptor::Object(identity) => {
                // Lazy reference: the nested type is generated when it is
                // separately requested, not inline
                SchemaFragment::reference(short_name(identity))
            }
            TypeDescriptor::Array(element) => {
                let hinted;
                let element = match (element.as_deref(), element_hint) {
                    (Some(element), _) => Some(element),
                    (None, Some(hint)) => {
                        hinted = type_resolver::descriptor_for_name(registry, hint);
                        Some(&hinted)
                    }
                    (None, None) => None,
                };
                type_resolver::resolve_array(registry, element, &resolver)
            }
            TypeDescriptor::Union(branches) => {
                type_resolver::resolve_union(registry, branches, &resolver)
            }
            TypeDescriptor::Nullable(inner) => {
                let mut schema = type_resolver::resolve_single(registry, inner, &resolver);
                schema.nullable = Some(true);
                schema
            }
            TypeDescriptor::Primitive(name) => {
                let mut schema = SchemaFragment::typed(type_resolver::map_primitive(name));
                if schema.schema_type.as_deref() == Some("string")
                    && has_uuid_tag(&field.constraints)
                {
                    schema.format = Some("uuid".to_string());
                }
                schema
            }
        };

        let mut required = false;
        apply_constraints(&field.constraints, &mut schema, &mut required);

        if field.nullable {
            schema.nullable = Some(true);
        }

        (schema, required && !field.nullable)
    }

    /// All cached schemas keyed by short name.
    pub fn all_schemas(&self) -> IndexMap<String, SchemaFragment> {
        self.cache
            .iter()
            .map(|(identity, schema)| (short_name(identity).to_string(), schema.clone()))
            .collect()
    }

    /// Reset cache and processing stack, isolating subsequent runs.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.processing_stack.clear();
    }
}
