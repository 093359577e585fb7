//! Routing table scanning and operation synthesis.
//!
//! Turns a declarative routing table into OpenAPI path items: one operation
//! per (route, allowed method) pair, wired to the request/response types the
//! handler analyzer identifies. Routes whose pipeline resolves to no
//! registered handler contribute nothing.

use crate::handler_analyzer::{HandlerAnalyzer, HandlerInfo};
use crate::registry::TypeRegistry;
use crate::schema::SchemaFragment;
use crate::schema_generator::short_name;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Module segments that never name a domain and are skipped when deriving
/// an operation tag.
const STRUCTURAL_SEGMENTS: &[&str] = &["application", "handler", "command"];

/// Methods that may carry a request body.
const BODY_METHODS: &[&str] = &["POST", "PUT", "PATCH"];

/// One entry of the routing table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Path template, possibly with `{name}` or `{name:regex}` placeholders
    pub path: String,
    /// Allowed HTTP methods, uppercase
    #[serde(default)]
    pub allowed_methods: Vec<String>,
    /// Ordered middleware/handler pipeline; the final element is the handler
    #[serde(default)]
    pub pipeline: Vec<String>,
}

/// The routing table consumed by the scanner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingTable {
    #[serde(default)]
    pub routes: Vec<RouteDescriptor>,
}

/// A generated OpenAPI operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId")]
    pub operation_id: String,
    pub summary: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<PathParameter>,
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: IndexMap<String, ResponseObject>,
}

/// A path parameter inferred from a template placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathParameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    pub schema: SchemaFragment,
}

/// A JSON request body referencing a component schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub required: bool,
    pub content: IndexMap<String, MediaType>,
}

/// A media type wrapping a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: SchemaFragment,
}

/// A response entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseObject {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// Generated paths: path template -> lowercase method -> operation.
pub type Paths = IndexMap<String, IndexMap<String, Operation>>;

/// Scanner over a routing table.
pub struct RouteScanner<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> RouteScanner<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Scan all routes and collect operations per path.
    ///
    /// Multiple routes may contribute to the same path; per-method merging
    /// is last-write-wins, so later routes override earlier ones declaring
    /// the same method on the same path.
    pub fn scan_routes(&self, table: &RoutingTable) -> Paths {
        let mut paths: Paths = IndexMap::new();

        for route in &table.routes {
            if route.path.is_empty() {
                continue;
            }

            let operations = self.generate_operations(route);

            if !operations.is_empty() {
                paths
                    .entry(route.path.clone())
                    .or_default()
                    .extend(operations);
            }
        }

        paths
    }

    fn generate_operations(&self, route: &RouteDescriptor) -> IndexMap<String, Operation> {
        let Some(handler) = route.pipeline.last() else {
            warn!("Route {} has an empty pipeline, skipping", route.path);
            return IndexMap::new();
        };

        if self.registry.handler(handler).is_none() {
            warn!(
                "Route {} names unregistered handler {}, skipping",
                route.path, handler
            );
            return IndexMap::new();
        }

        let info = HandlerAnalyzer::analyze(self.registry, handler);

        let mut operations = IndexMap::new();

        for method in &route.allowed_methods {
            let method = method.to_uppercase();
            debug!("Generating operation: {} {}", method, route.path);
            let operation = self.generate_operation(handler, &method, &route.path, &info);
            operations.insert(method.to_lowercase(), operation);
        }

        operations
    }

    fn generate_operation(
        &self,
        handler: &str,
        method: &str,
        path: &str,
        info: &HandlerInfo,
    ) -> Operation {
        let request_body = info
            .request_type
            .as_deref()
            .filter(|_| BODY_METHODS.contains(&method))
            .map(|request_type| RequestBody {
                required: true,
                content: json_content(SchemaFragment::reference(short_name(request_type))),
            });

        Operation {
            operation_id: operation_id(handler),
            summary: summary(handler),
            tags: vec![tag(handler)],
            parameters: extract_path_parameters(path),
            request_body,
            responses: generate_responses(info.response_type.as_deref(), method),
        }
    }
}

/// Derive the operation tag from the handler identity.
///
/// The first segment that is not structural wins, pluralized with a plain
/// "s". An identity with no usable segment falls back to "API".
fn tag(handler: &str) -> String {
    handler
        .split("::")
        .find(|segment| !segment.is_empty() && !STRUCTURAL_SEGMENTS.contains(segment))
        .map(|segment| format!("{}s", segment))
        .unwrap_or_else(|| "API".to_string())
}

/// Derive the human-readable summary from the handler short name.
///
/// A trailing "Handler" suffix is stripped and the remainder is split on
/// uppercase boundaries: `GetItemHandler` becomes "get item".
fn summary(handler: &str) -> String {
    let words = split_camel_case(stripped_name(handler));

    if words.is_empty() {
        return "Operation".to_string();
    }

    words
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive the operationId: stripped short name with a lowercase first letter.
fn operation_id(handler: &str) -> String {
    let name = stripped_name(handler);
    let mut chars = name.chars();

    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn stripped_name(handler: &str) -> &str {
    let name = short_name(handler);
    name.strip_suffix("Handler").unwrap_or(name)
}

fn split_camel_case(name: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();

    for ch in name.chars() {
        if ch.is_uppercase() || words.is_empty() {
            words.push(String::new());
        }
        if let Some(word) = words.last_mut() {
            word.push(ch);
        }
    }

    words.retain(|word| !word.is_empty());
    words
}

/// Extract one path parameter per `{name}` or `{name:pattern}` placeholder.
///
/// Parameter types are inferred from the name: `id` and `uuid` are UUID
/// strings, names containing `_id` or ending in `Id` are integers, anything
/// else is a plain string.
fn extract_path_parameters(path: &str) -> Vec<PathParameter> {
    let mut parameters = Vec::new();
    let mut rest = path;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };

        let placeholder = &rest[open + 1..open + close];
        let name = placeholder.split(':').next().unwrap_or(placeholder);

        if !name.is_empty() {
            parameters.push(PathParameter {
                name: name.to_string(),
                location: "path".to_string(),
                required: true,
                schema: parameter_schema(name),
            });
        }

        rest = &rest[open + close + 1..];
    }

    parameters
}

fn parameter_schema(name: &str) -> SchemaFragment {
    let mut schema = SchemaFragment::typed("string");

    if name == "id" || name == "uuid" {
        schema.format = Some("uuid".to_string());
    } else if name.contains("_id") || name.ends_with("Id") {
        schema.schema_type = Some("integer".to_string());
    }

    schema
}

/// Build the response map for one operation.
///
/// Success code is 201 for POST, 204 for DELETE, 200 otherwise; 204 never
/// carries content. 400 and 404 are always appended as generic errors.
fn generate_responses(
    response_type: Option<&str>,
    method: &str,
) -> IndexMap<String, ResponseObject> {
    let success_code = match method {
        "POST" => "201",
        "DELETE" => "204",
        _ => "200",
    };

    let mut responses = IndexMap::new();

    let success = match response_type {
        Some(response_type) if success_code != "204" => ResponseObject {
            description: "Success".to_string(),
            content: Some(json_content(SchemaFragment::reference(short_name(
                response_type,
            )))),
        },
        _ => ResponseObject {
            description: if success_code == "204" {
                "No Content".to_string()
            } else {
                "Success".to_string()
            },
            content: None,
        },
    };

    responses.insert(success_code.to_string(), success);
    responses.insert(
        "400".to_string(),
        ResponseObject {
            description: "Bad Request".to_string(),
            content: None,
        },
    );
    responses.insert(
        "404".to_string(),
        ResponseObject {
            description: "Not Found".to_string(),
            content: None,
        },
    );

    responses
}

fn json_content(schema: SchemaFragment) -> IndexMap<String, MediaType> {
    let mut content = IndexMap::new();
    content.insert("application/json".to_string(), MediaType { schema });
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HandlerSignature;
    use pretty_assertions::assert_eq;

    fn registry_with_handler() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_object("item::application::dto::ExampleDto", vec![]);
        registry.register_handler(
            "item::application::handler::GetItemHandler",
            HandlerSignature {
                params: vec!["HttpRequest".to_string(), "ExampleDto".to_string()],
                ret: Some("ExampleDto".to_string()),
            },
        );
        registry
    }

    fn route(path: &str, methods: &[&str], pipeline: &[&str]) -> RouteDescriptor {
        RouteDescriptor {
            path: path.to_string(),
            allowed_methods: methods.iter().map(|m| m.to_string()).collect(),
            pipeline: pipeline.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_scan_route_with_get_and_post() {
        let registry = registry_with_handler();
        let scanner = RouteScanner::new(&registry);

        let table = RoutingTable {
            routes: vec![route(
                "/api/examples",
                &["GET", "POST"],
                &["item::application::handler::GetItemHandler"],
            )],
        };

        let paths = scanner.scan_routes(&table);
        let operations = &paths["/api/examples"];

        assert!(operations.contains_key("get"));
        assert!(operations.contains_key("post"));

        // POST carries the request body, GET does not
        let post = &operations["post"];
        let body = post.request_body.as_ref().unwrap();
        assert!(body.required);
        assert_eq!(
            body.content["application/json"].schema.reference,
            Some("#/components/schemas/ExampleDto".to_string())
        );
        assert!(operations["get"].request_body.is_none());

        // GET succeeds with 200, POST with 201, both referencing the DTO
        let get_success = &operations["get"].responses["200"];
        assert_eq!(
            get_success.content.as_ref().unwrap()["application/json"]
                .schema
                .reference,
            Some("#/components/schemas/ExampleDto".to_string())
        );
        let post_success = &operations["post"].responses["201"];
        assert!(post_success.content.is_some());
    }

    #[test]
    fn test_empty_pipeline_contributes_nothing() {
        let registry = registry_with_handler();
        let scanner = RouteScanner::new(&registry);

        let table = RoutingTable {
            routes: vec![route("/api/examples", &["GET"], &[])],
        };

        assert!(scanner.scan_routes(&table).is_empty());
    }

    #[test]
    fn test_unregistered_handler_contributes_nothing() {
        let registry = registry_with_handler();
        let scanner = RouteScanner::new(&registry);

        let table = RoutingTable {
            routes: vec![route("/api/examples", &["GET"], &["no::such::Handler"])],
        };

        assert!(scanner.scan_routes(&table).is_empty());
    }

    #[test]
    fn test_handler_is_last_pipeline_element() {
        let registry = registry_with_handler();
        let scanner = RouteScanner::new(&registry);

        let table = RoutingTable {
            routes: vec![route(
                "/api/examples",
                &["GET"],
                &[
                    "auth::middleware::AuthMiddleware",
                    "item::application::handler::GetItemHandler",
                ],
            )],
        };

        let paths = scanner.scan_routes(&table);
        assert!(paths.contains_key("/api/examples"));
    }

    #[test]
    fn test_tag_derivation_skips_structural_segments() {
        assert_eq!(tag("item::application::handler::GetItemHandler"), "items");
        assert_eq!(tag("application::handler::GetItemHandler"), "GetItemHandlers");
        assert_eq!(tag(""), "API");
    }

    #[test]
    fn test_summary_derivation() {
        assert_eq!(
            summary("item::application::handler::GetItemHandler"),
            "get item"
        );
        assert_eq!(summary("CreateOrderItemHandler"), "create order item");
        assert_eq!(summary("Handler"), "Operation");
    }

    #[test]
    fn test_operation_id_derivation() {
        assert_eq!(
            operation_id("item::application::handler::GetItemHandler"),
            "getItem"
        );
        assert_eq!(operation_id("CreateOrderHandler"), "createOrder");
    }

    #[test]
    fn test_path_parameter_uuid_format() {
        let parameters = extract_path_parameters("/api/examples/{id}");

        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].name, "id");
        assert_eq!(parameters[0].location, "path");
        assert!(parameters[0].required);
        assert_eq!(parameters[0].schema.schema_type, Some("string".to_string()));
        assert_eq!(parameters[0].schema.format, Some("uuid".to_string()));
    }

    #[test]
    fn test_path_parameter_integer_inference() {
        let parameters = extract_path_parameters("/api/orders/{order_id}/items/{itemId}");

        assert_eq!(parameters.len(), 2);
        assert_eq!(
            parameters[0].schema.schema_type,
            Some("integer".to_string())
        );
        assert_eq!(
            parameters[1].schema.schema_type,
            Some("integer".to_string())
        );
    }

    #[test]
    fn test_path_parameter_with_regex_pattern() {
        let parameters = extract_path_parameters("/api/examples/{slug:[a-z-]+}");

        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].name, "slug");
        assert_eq!(parameters[0].schema.schema_type, Some("string".to_string()));
        assert!(parameters[0].schema.format.is_none());
    }

    #[test]
    fn test_path_without_placeholders_has_no_parameters() {
        assert!(extract_path_parameters("/api/examples").is_empty());
    }

    #[test]
    fn test_delete_has_no_content() {
        let responses = generate_responses(Some("dto::ExampleDto"), "DELETE");

        let success = &responses["204"];
        assert_eq!(success.description, "No Content");
        assert!(success.content.is_none());
    }

    #[test]
    fn test_error_responses_always_present() {
        let responses = generate_responses(None, "GET");

        assert_eq!(responses["200"].description, "Success");
        assert!(responses["200"].content.is_none());
        assert_eq!(responses["400"].description, "Bad Request");
        assert_eq!(responses["404"].description, "Not Found");
    }

    #[test]
    fn test_same_path_from_two_routes_merges() {
        let mut registry = registry_with_handler();
        registry.register_handler(
            "item::application::handler::CreateItemHandler",
            HandlerSignature {
                params: vec!["ExampleDto".to_string()],
                ret: Some("ExampleDto".to_string()),
            },
        );

        let scanner = RouteScanner::new(&registry);
        let table = RoutingTable {
            routes: vec![
                route(
                    "/api/examples",
                    &["GET"],
                    &["item::application::handler::GetItemHandler"],
                ),
                route(
                    "/api/examples",
                    &["POST"],
                    &["item::application::handler::CreateItemHandler"],
                ),
            ],
        };

        let paths = scanner.scan_routes(&table);
        assert_eq!(paths.len(), 1);

        let operations = &paths["/api/examples"];
        assert_eq!(operations["get"].operation_id, "getItem");
        assert_eq!(operations["post"].operation_id, "createItem");
    }

    #[test]
    fn test_same_path_and_method_last_write_wins() {
        let mut registry = registry_with_handler();
        registry.register_handler(
            "item::application::handler::ListItemsHandler",
            HandlerSignature::default(),
        );

        let scanner = RouteScanner::new(&registry);
        let table = RoutingTable {
            routes: vec![
                route(
                    "/api/examples",
                    &["GET"],
                    &["item::application::handler::GetItemHandler"],
                ),
                route(
                    "/api/examples",
                    &["GET"],
                    &["item::application::handler::ListItemsHandler"],
                ),
            ],
        };

        let paths = scanner.scan_routes(&table);
        assert_eq!(paths["/api/examples"]["get"].operation_id, "listItems");
    }

    #[test]
    fn test_method_casing_is_normalized() {
        let registry = registry_with_handler();
        let scanner = RouteScanner::new(&registry);

        let table = RoutingTable {
            routes: vec![route(
                "/api/examples",
                &["post"],
                &["item::application::handler::GetItemHandler"],
            )],
        };

        let paths = scanner.scan_routes(&table);
        let operations = &paths["/api/examples"];

        assert!(operations.contains_key("post"));
        // Lowercase input still counts as a body-carrying method
        assert!(operations["post"].request_body.is_some());
    }
}
