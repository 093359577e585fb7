//! Generator configuration.
//!
//! Static document metadata (info, servers, security schemes, tags) and
//! output settings, loadable from a YAML file. The routing table lives in
//! its own file with a `routes:` list and loads through the same machinery.

use crate::error::{Error, Result};
use crate::route_scanner::RoutingTable;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// OpenAPI generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenApiConfig {
    /// The info section (title, version, description)
    pub info: InfoConfig,
    /// Server definitions
    pub servers: Vec<ServerConfig>,
    /// Security scheme fragments keyed by scheme name
    #[serde(rename = "securitySchemes")]
    pub security_schemes: indexmap::IndexMap<String, Value>,
    /// Global tag descriptions
    pub tags: Vec<TagConfig>,
    /// Global security requirements
    pub security: Vec<Value>,
    /// Default output path for the generated document
    #[serde(rename = "outputPath")]
    pub output_path: String,
    /// Whether to also emit a JSON sibling next to the YAML output
    #[serde(rename = "generateJson")]
    pub generate_json: bool,
}

/// API metadata for the document info section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoConfig {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One server entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One tag entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            title: "API Documentation".to_string(),
            version: "1.0.0".to_string(),
            description: Some("Generated API documentation".to_string()),
        }
    }
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            info: InfoConfig::default(),
            servers: vec![ServerConfig {
                url: "http://localhost:8080".to_string(),
                description: Some("Local development".to_string()),
            }],
            security_schemes: indexmap::IndexMap::new(),
            tags: Vec::new(),
            security: Vec::new(),
            output_path: "docs/openapi.yaml".to_string(),
            generate_json: true,
        }
    }
}

impl OpenApiConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());

        if !path.is_file() {
            return Err(Error::ConfigError {
                path: path.to_path_buf(),
                message: "config file not found".to_string(),
            });
        }

        let content = fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Load a routing table from a YAML file with a `routes:` list.
///
/// A missing file yields an empty table so that schema-only projects still
/// generate a document.
pub fn load_routing_table(path: &Path) -> Result<RoutingTable> {
    debug!("Loading routing table from {}", path.display());

    if !path.is_file() {
        debug!("Routing table {} not found, using empty table", path.display());
        return Ok(RoutingTable::default());
    }

    let content = fs::read_to_string(path)?;

    serde_yaml::from_str(&content).map_err(|e| Error::ConfigError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = OpenApiConfig::default();

        assert_eq!(config.info.title, "API Documentation");
        assert_eq!(config.info.version, "1.0.0");
        assert_eq!(config.servers.len(), 1);
        assert_eq!(config.output_path, "docs/openapi.yaml");
        assert!(config.generate_json);
    }

    #[test]
    fn test_load_config_from_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("openapi.yaml");
        fs::write(
            &path,
            r#"
info:
  title: Item API
  version: 2.1.0
servers:
  - url: https://api.example.com
    description: Production
tags:
  - name: items
    description: Item management
outputPath: build/openapi.yaml
generateJson: false
"#,
        )
        .unwrap();

        let config = OpenApiConfig::from_yaml_file(&path).unwrap();

        assert_eq!(config.info.title, "Item API");
        assert_eq!(config.info.version, "2.1.0");
        assert_eq!(config.servers[0].url, "https://api.example.com");
        assert_eq!(config.tags[0].name, "items");
        assert_eq!(config.output_path, "build/openapi.yaml");
        assert!(!config.generate_json);
    }

    #[test]
    fn test_load_config_with_security_schemes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("openapi.yaml");
        fs::write(
            &path,
            r#"
securitySchemes:
  bearerAuth:
    type: http
    scheme: bearer
    bearerFormat: JWT
security:
  - bearerAuth: []
"#,
        )
        .unwrap();

        let config = OpenApiConfig::from_yaml_file(&path).unwrap();

        assert_eq!(
            config.security_schemes["bearerAuth"]["scheme"],
            serde_json::json!("bearer")
        );
        assert_eq!(config.security.len(), 1);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = OpenApiConfig::from_yaml_file(Path::new("/nonexistent/openapi.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_config_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("openapi.yaml");
        fs::write(&path, "info: [not, a, mapping").unwrap();

        let result = OpenApiConfig::from_yaml_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_routing_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("routes.yaml");
        fs::write(
            &path,
            r#"
routes:
  - path: /api/examples/{id}
    allowed_methods: [GET, PUT]
    pipeline:
      - auth::middleware::AuthMiddleware
      - item::application::handler::GetItemHandler
"#,
        )
        .unwrap();

        let table = load_routing_table(&path).unwrap();

        assert_eq!(table.routes.len(), 1);
        assert_eq!(table.routes[0].path, "/api/examples/{id}");
        assert_eq!(table.routes[0].allowed_methods, vec!["GET", "PUT"]);
        assert_eq!(table.routes[0].pipeline.len(), 2);
    }

    #[test]
    fn test_missing_routing_table_yields_empty_table() {
        let table = load_routing_table(Path::new("/nonexistent/routes.yaml")).unwrap();
        assert!(table.routes.is_empty());
    }
}
