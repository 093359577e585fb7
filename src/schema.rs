//! Schema fragment type shared by all generators.
//!
//! A [`SchemaFragment`] is the universal output unit of the type resolver and
//! the schema generator: a sparse set of OpenAPI schema keywords that can be
//! embedded anywhere a schema object is expected (property, items, oneOf
//! branch, component entry).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A composable unit of an OpenAPI schema.
///
/// All keywords are optional; the all-`None` default is the "empty fragment"
/// returned for unknown types. Property order is preserved because field
/// declaration order is significant for schema key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaFragment {
    /// The schema type (string, integer, object, array, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format qualifier (uuid, email, uri, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Lower bound for numeric values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Upper bound for numeric values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Minimum string length
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum string length
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Literal value set for enumerations
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Element schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaFragment>>,
    /// Reference to a component schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Alternative schemas for union types
    #[serde(rename = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaFragment>>,
    /// Whether null is an accepted value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Named properties for object types, in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaFragment>>,
    /// Names of required properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl SchemaFragment {
    /// Fragment with only a `type` keyword.
    pub fn typed(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Self::default()
        }
    }

    /// Fragment referencing a component schema by its short name.
    pub fn reference(short_name: &str) -> Self {
        Self {
            reference: Some(format!("#/components/schemas/{}", short_name)),
            ..Self::default()
        }
    }

    /// Whether no keyword is set at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_empty() {
        let fragment = SchemaFragment::default();
        assert!(fragment.is_empty());
    }

    #[test]
    fn test_typed_fragment() {
        let fragment = SchemaFragment::typed("string");
        assert_eq!(fragment.schema_type, Some("string".to_string()));
        assert!(!fragment.is_empty());
    }

    #[test]
    fn test_reference_fragment() {
        let fragment = SchemaFragment::reference("ExampleDto");
        assert_eq!(
            fragment.reference,
            Some("#/components/schemas/ExampleDto".to_string())
        );
    }

    #[test]
    fn test_serialization_omits_absent_keywords() {
        let fragment = SchemaFragment::typed("integer");
        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(json, serde_json::json!({"type": "integer"}));
    }

    #[test]
    fn test_property_order_is_preserved() {
        let mut properties = IndexMap::new();
        properties.insert("zebra".to_string(), SchemaFragment::typed("string"));
        properties.insert("apple".to_string(), SchemaFragment::typed("string"));

        let fragment = SchemaFragment {
            schema_type: Some("object".to_string()),
            properties: Some(properties),
            ..SchemaFragment::default()
        };

        let json = serde_json::to_string(&fragment).unwrap();
        let zebra_pos = json.find("zebra").unwrap();
        let apple_pos = json.find("apple").unwrap();
        assert!(zebra_pos < apple_pos);
    }
}
