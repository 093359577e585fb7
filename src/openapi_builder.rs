//! Final document assembly.
//!
//! Merges generated paths, generated component schemas and static
//! configuration into one OpenAPI 3.0 document. Paths and schemas pass
//! through untouched; the assembler adds no semantics of its own.

use crate::config::{InfoConfig, OpenApiConfig, ServerConfig, TagConfig};
use crate::route_scanner::Paths;
use crate::schema::SchemaFragment;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A complete OpenAPI document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: InfoConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<ServerConfig>,
    pub paths: Paths,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagConfig>,
}

/// The components section: schemas plus optional security schemes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaFragment>,
    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, Value>,
}

/// Assembles generated output and configuration into a document.
pub struct DocumentAssembler {
    config: OpenApiConfig,
}

impl DocumentAssembler {
    pub fn new(config: OpenApiConfig) -> Self {
        Self { config }
    }

    /// Build the final document.
    pub fn assemble(
        &self,
        paths: Paths,
        schemas: IndexMap<String, SchemaFragment>,
    ) -> OpenApiDocument {
        debug!(
            "Assembling document with {} paths and {} schemas",
            paths.len(),
            schemas.len()
        );

        let components = (!schemas.is_empty() || !self.config.security_schemes.is_empty())
            .then(|| Components {
                schemas,
                security_schemes: self.config.security_schemes.clone(),
            });

        OpenApiDocument {
            openapi: "3.0.0".to_string(),
            info: self.config.info.clone(),
            servers: self.config.servers.clone(),
            paths,
            components,
            security: self.config.security.clone(),
            tags: self.config.tags.clone(),
        }
    }
}
