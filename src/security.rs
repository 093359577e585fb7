//! Static security-scheme fragments.
//!
//! Pure data builders for the `components.securitySchemes` section. Nothing
//! here is derived from source metadata; the fragments are spliced into the
//! document as-is.

use serde_json::{json, Map, Value};

/// Builders for common OpenAPI security schemes.
pub struct SecuritySchemeGenerator;

impl SecuritySchemeGenerator {
    /// Bearer token (JWT) scheme.
    pub fn bearer_token(name: &str) -> Map<String, Value> {
        let mut scheme = Map::new();
        scheme.insert(
            name.to_string(),
            json!({
                "type": "http",
                "scheme": "bearer",
                "bearerFormat": "JWT",
            }),
        );
        scheme
    }

    /// API key scheme; `location` is "header", "query" or "cookie".
    pub fn api_key(name: &str, param_name: &str, location: &str) -> Map<String, Value> {
        let mut scheme = Map::new();
        scheme.insert(
            name.to_string(),
            json!({
                "type": "apiKey",
                "name": param_name,
                "in": location,
            }),
        );
        scheme
    }

    /// HTTP basic authentication scheme.
    pub fn basic_auth(name: &str) -> Map<String, Value> {
        let mut scheme = Map::new();
        scheme.insert(
            name.to_string(),
            json!({
                "type": "http",
                "scheme": "basic",
            }),
        );
        scheme
    }

    /// OAuth2 scheme with the given flows.
    pub fn oauth2(name: &str, flows: Value) -> Map<String, Value> {
        let mut scheme = Map::new();
        scheme.insert(
            name.to_string(),
            json!({
                "type": "oauth2",
                "flows": flows,
            }),
        );
        scheme
    }

    /// OAuth2 authorization-code flow fragment.
    pub fn oauth2_authorization_code(
        authorization_url: &str,
        token_url: &str,
        scopes: Value,
    ) -> Value {
        json!({
            "authorizationCode": {
                "authorizationUrl": authorization_url,
                "tokenUrl": token_url,
                "scopes": scopes,
            }
        })
    }

    /// OAuth2 client-credentials flow fragment.
    pub fn oauth2_client_credentials(token_url: &str, scopes: Value) -> Value {
        json!({
            "clientCredentials": {
                "tokenUrl": token_url,
                "scopes": scopes,
            }
        })
    }
}
