//! Handler signature analysis.
//!
//! Identifies which of a handler's declared parameter types is the request
//! payload and whether its return type is a response payload. Analysis fails
//! soft: an unregistered handler yields neither.

use crate::registry::{is_primitive, TypeRegistry};
use log::debug;

/// Parameter types recognized as ambient request markers rather than
/// payload types.
const AMBIENT_REQUEST_TYPES: &[&str] = &["Request", "HttpRequest", "ServerRequest", "State"];

/// Request and response data-transfer types identified for one handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandlerInfo {
    /// Full identity of the request payload type, if any
    pub request_type: Option<String>,
    /// Full identity of the response payload type, if any
    pub response_type: Option<String>,
}

/// Analyzer over registered handler signatures.
pub struct HandlerAnalyzer;

impl HandlerAnalyzer {
    /// Analyze a handler by identity.
    ///
    /// Request type: the first parameter, in declaration order, that is
    /// neither an ambient request marker nor a primitive scalar and that
    /// resolves to a registered object. Response type: the declared return
    /// type when it resolves to a registered object.
    pub fn analyze(registry: &TypeRegistry, handler_identity: &str) -> HandlerInfo {
        debug!("Analyzing handler: {}", handler_identity);

        let Some(signature) = registry.handler(handler_identity) else {
            debug!("Handler {} is not registered", handler_identity);
            return HandlerInfo::default();
        };

        let request_type = signature
            .params
            .iter()
            .filter(|param| {
                let short = short_type_name(param);
                !AMBIENT_REQUEST_TYPES.contains(&short) && !is_primitive(short)
            })
            .find_map(|param| {
                let identity = registry.resolve(param)?;
                registry.is_object(identity).then(|| identity.to_string())
            });

        let response_type = signature
            .ret
            .as_deref()
            .and_then(|ret| registry.resolve(ret))
            .filter(|identity| registry.is_object(identity))
            .map(str::to_string);

        HandlerInfo {
            request_type,
            response_type,
        }
    }
}

fn short_type_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HandlerSignature;
    use pretty_assertions::assert_eq;

    fn registry_with_dto() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_object("item::dto::ExampleDto", vec![]);
        registry
    }

    #[test]
    fn test_unregistered_handler_yields_nothing() {
        let registry = registry_with_dto();
        let info = HandlerAnalyzer::analyze(&registry, "no::such::Handler");
        assert_eq!(info, HandlerInfo::default());
    }

    #[test]
    fn test_request_and_response_detection() {
        let mut registry = registry_with_dto();
        registry.register_handler(
            "item::application::handler::CreateItemHandler",
            HandlerSignature {
                params: vec!["HttpRequest".to_string(), "ExampleDto".to_string()],
                ret: Some("ExampleDto".to_string()),
            },
        );

        let info =
            HandlerAnalyzer::analyze(&registry, "item::application::handler::CreateItemHandler");

        assert_eq!(info.request_type, Some("item::dto::ExampleDto".to_string()));
        assert_eq!(info.response_type, Some("item::dto::ExampleDto".to_string()));
    }

    #[test]
    fn test_ambient_marker_is_skipped() {
        let mut registry = registry_with_dto();
        registry.register_handler(
            "item::H",
            HandlerSignature {
                params: vec!["HttpRequest".to_string()],
                ret: None,
            },
        );

        let info = HandlerAnalyzer::analyze(&registry, "item::H");
        assert!(info.request_type.is_none());
    }

    #[test]
    fn test_primitive_parameters_are_skipped() {
        let mut registry = registry_with_dto();
        registry.register_handler(
            "item::H",
            HandlerSignature {
                params: vec![
                    "String".to_string(),
                    "u64".to_string(),
                    "ExampleDto".to_string(),
                ],
                ret: None,
            },
        );

        let info = HandlerAnalyzer::analyze(&registry, "item::H");
        assert_eq!(info.request_type, Some("item::dto::ExampleDto".to_string()));
    }

    #[test]
    fn test_first_match_wins_for_request() {
        let mut registry = registry_with_dto();
        registry.register_object("item::dto::OtherDto", vec![]);
        registry.register_handler(
            "item::H",
            HandlerSignature {
                params: vec!["ExampleDto".to_string(), "OtherDto".to_string()],
                ret: None,
            },
        );

        let info = HandlerAnalyzer::analyze(&registry, "item::H");
        assert_eq!(info.request_type, Some("item::dto::ExampleDto".to_string()));
    }

    #[test]
    fn test_primitive_return_yields_no_response_type() {
        let mut registry = registry_with_dto();
        registry.register_handler(
            "item::H",
            HandlerSignature {
                params: vec![],
                ret: Some("String".to_string()),
            },
        );

        let info = HandlerAnalyzer::analyze(&registry, "item::H");
        assert!(info.response_type.is_none());
    }

    #[test]
    fn test_unknown_parameter_type_yields_no_request_type() {
        let mut registry = registry_with_dto();
        registry.register_handler(
            "item::H",
            HandlerSignature {
                params: vec!["SomethingUnregistered".to_string()],
                ret: None,
            },
        );

        let info = HandlerAnalyzer::analyze(&registry, "item::H");
        assert!(info.request_type.is_none());
    }

    #[test]
    fn test_scanning_continues_past_unrecognized_types() {
        let mut registry = registry_with_dto();
        registry.register_handler(
            "item::H",
            HandlerSignature {
                params: vec!["SomethingUnregistered".to_string(), "ExampleDto".to_string()],
                ret: None,
            },
        );

        let info = HandlerAnalyzer::analyze(&registry, "item::H");
        assert_eq!(info.request_type, Some("item::dto::ExampleDto".to_string()));
    }

    #[test]
    fn test_no_parameters_yields_no_request_type() {
        let mut registry = registry_with_dto();
        registry.register_handler(
            "item::H",
            HandlerSignature {
                params: vec![],
                ret: Some("ExampleDto".to_string()),
            },
        );

        let info = HandlerAnalyzer::analyze(&registry, "item::H");
        assert!(info.request_type.is_none());
        assert_eq!(info.response_type, Some("item::dto::ExampleDto".to_string()));
    }
}
