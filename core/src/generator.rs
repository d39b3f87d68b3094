#![deny(missing_docs)]

//! # Document Generator
//!
//! Assembles route descriptors into an [`OpenApi`] document.
//!
//! Each call collects a fresh component table from all routes, resolves every
//! parameter, request and response schema against it, and places one
//! operation per route under `paths[path][method]`.

use crate::collector::{collect_components, ComponentTable};
use crate::oas::document::{
    Components, Info, OAuthFlows, OpenApi, Operation, ParameterIn, PathItem, SecurityScheme,
    Server, Tag, OPENAPI_VERSION,
};
use crate::resolver::{resolve_parameter, resolve_request_body, resolve_response};
use crate::route::{HttpMethod, RouteDescriptor};
use std::collections::BTreeMap;

/// Well-known path of the served document. Never documented.
pub const SWAGGER_PATH: &str = "/swagger.json";

/// Default path the document is served from.
pub const DEFAULT_DOCUMENT_PATH: &str = "/openapi.json";

/// Generator-level configuration plus the assembly entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    info: Info,
    servers: Vec<Server>,
    security_schemes: BTreeMap<String, SecurityScheme>,
    tags: Vec<Tag>,
    document_path: String,
}

impl Generator {
    /// Creates a generator for the given info block.
    pub fn new(info: Info) -> Self {
        Self {
            info,
            servers: Vec::new(),
            security_schemes: BTreeMap::new(),
            tags: Vec::new(),
            document_path: DEFAULT_DOCUMENT_PATH.to_string(),
        }
    }

    /// Adds a server.
    pub fn with_server(mut self, url: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        self.servers.push(Server {
            url: url.into(),
            description: (!description.is_empty()).then_some(description),
        });
        self
    }

    /// Adds (or replaces) a named security scheme.
    pub fn with_security_scheme(mut self, name: impl Into<String>, scheme: SecurityScheme) -> Self {
        self.security_schemes.insert(name.into(), scheme);
        self
    }

    /// Adds HTTP basic authentication under `name`.
    pub fn with_basic_auth(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.with_security_scheme(name, described(SecurityScheme::basic(), description))
    }

    /// Adds HTTP bearer (JWT) authentication under `name`.
    pub fn with_bearer_auth(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.with_security_scheme(name, described(SecurityScheme::bearer(), description))
    }

    /// Adds an API key carried in `location` as `key_name`.
    pub fn with_api_key(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        location: ParameterIn,
        key_name: impl Into<String>,
    ) -> Self {
        self.with_security_scheme(
            name,
            described(SecurityScheme::api_key(location, key_name), description),
        )
    }

    /// Adds OAuth 2 with the given flows.
    pub fn with_oauth2(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        flows: OAuthFlows,
    ) -> Self {
        self.with_security_scheme(name, described(SecurityScheme::oauth2(flows), description))
    }

    /// Adds a tag description.
    pub fn with_tag(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        self.tags.push(Tag {
            name: name.into(),
            description: (!description.is_empty()).then_some(description),
        });
        self
    }

    /// Sets the path the document is served from. It is left out of `paths`.
    pub fn with_document_path(mut self, path: impl Into<String>) -> Self {
        self.document_path = path.into();
        self
    }

    /// The info block.
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// The path the document is served from.
    pub fn document_path(&self) -> &str {
        &self.document_path
    }

    /// Builds the document for `routes`.
    ///
    /// Routes sharing a path share a path item. A later route with the same
    /// method and path replaces the earlier one. Routes with a method that has
    /// no slot are skipped.
    pub fn generate(&self, routes: &[RouteDescriptor]) -> OpenApi {
        let components = collect_components(routes);
        let mut paths: BTreeMap<String, PathItem> = BTreeMap::new();

        for route in routes {
            let method = match route.method.parse::<HttpMethod>() {
                Ok(method) => method,
                Err(_) => {
                    tracing::warn!(method = %route.method, path = %route.path, "skipping route with unsupported method");
                    continue;
                }
            };

            let operation = build_operation(route, &components);
            let slot = paths.entry(route.path.clone()).or_default().slot_mut(method);
            if slot.is_some() {
                tracing::debug!(method = %method, path = %route.path, "route overrides an earlier registration");
            }
            *slot = Some(operation);
        }

        for excluded in [SWAGGER_PATH, self.document_path.as_str()] {
            paths.remove(excluded);
        }

        tracing::debug!(
            paths = paths.len(),
            schemas = components.len(),
            "generated document"
        );

        OpenApi {
            openapi: OPENAPI_VERSION.to_string(),
            info: self.info.clone(),
            servers: self.servers.clone(),
            paths,
            components: Some(Components {
                schemas: components,
                security_schemes: self.security_schemes.clone(),
            }),
            tags: self.tags.clone(),
        }
    }
}

fn described(scheme: SecurityScheme, description: impl Into<String>) -> SecurityScheme {
    let description = description.into();
    if description.is_empty() {
        scheme
    } else {
        scheme.with_description(description)
    }
}

fn build_operation(route: &RouteDescriptor, components: &ComponentTable) -> Operation {
    Operation {
        operation_id: route.operation_id.clone(),
        summary: route.summary.clone(),
        description: route.description.clone(),
        tags: route.tags.clone(),
        parameters: route
            .parameters
            .iter()
            .cloned()
            .map(|parameter| resolve_parameter(parameter, components))
            .collect(),
        request_body: route
            .request_body
            .clone()
            .map(|body| resolve_request_body(body, components)),
        responses: route
            .responses
            .iter()
            .map(|(status, response)| {
                (status.clone(), resolve_response(response.clone(), components))
            })
            .collect(),
        security: route.security.clone(),
        deprecated: route.deprecated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDescriptor, PrimitiveKind, RecordDescriptor, TypeDescriptor};
    use crate::registry::TypeRegistry;
    use crate::route::{self, with_json_request_body, with_json_response, with_summary};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn todo() -> TypeDescriptor {
        RecordDescriptor::new("app", "Todo")
            .field(
                FieldDescriptor::new(
                    "title",
                    TypeDescriptor::primitive(PrimitiveKind::String, "String"),
                )
                .required(),
            )
            .into()
    }

    fn documented(
        registry: &TypeRegistry,
        method: &str,
        path: &str,
        options: Vec<route::RouteOption>,
    ) -> RouteDescriptor {
        let mut descriptor = RouteDescriptor::new(method, path);
        descriptor.apply(options, registry);
        descriptor
    }

    #[test]
    fn test_generate_resolves_references() {
        let registry = TypeRegistry::new();
        let routes = vec![
            documented(
                &registry,
                "GET",
                "/todos",
                vec![with_json_response(200, "OK", TypeDescriptor::sequence(todo()))],
            ),
            documented(
                &registry,
                "POST",
                "/todos",
                vec![
                    with_json_request_body(todo(), true, ""),
                    with_json_response(201, "Created", todo()),
                ],
            ),
        ];

        let doc = Generator::new(Info::new("Todo API", "1.0.0")).generate(&routes);
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["openapi"], json!("3.0.0"));
        assert_eq!(
            value["paths"]["/todos"]["get"]["responses"]["200"]["content"]["application/json"]["schema"],
            json!({"type": "array", "items": {"$ref": "#/components/schemas/Todo"}})
        );
        assert_eq!(
            value["paths"]["/todos"]["post"]["requestBody"]["content"]["application/json"]["schema"],
            json!({"$ref": "#/components/schemas/Todo"})
        );
        assert_eq!(
            value["components"]["schemas"]["Todo"]["required"],
            json!(["title"])
        );
    }

    #[test]
    fn test_document_paths_are_excluded() {
        let registry = TypeRegistry::new();
        let routes = vec![
            documented(&registry, "GET", "/swagger.json", vec![with_summary("spec")]),
            documented(&registry, "GET", "/docs/spec.json", vec![with_summary("spec")]),
            documented(&registry, "GET", "/openapi.json", vec![]),
            documented(&registry, "GET", "/health", vec![]),
        ];

        let doc = Generator::new(Info::new("API", "1.0.0"))
            .with_document_path("/docs/spec.json")
            .generate(&routes);

        assert!(!doc.paths.contains_key("/swagger.json"));
        assert!(!doc.paths.contains_key("/docs/spec.json"));
        assert!(doc.paths.contains_key("/openapi.json"));
        assert!(doc.paths.contains_key("/health"));

        let empty = Generator::new(Info::new("API", "1.0.0")).generate(&[]);
        assert!(empty.paths.is_empty());
    }

    #[test]
    fn test_same_slot_last_writer_wins() {
        let registry = TypeRegistry::new();
        let routes = vec![
            documented(&registry, "GET", "/items", vec![with_summary("first")]),
            documented(&registry, "get", "/items", vec![with_summary("second")]),
            documented(&registry, "DELETE", "/items", vec![with_summary("remove")]),
            documented(&registry, "CONNECT", "/items", vec![with_summary("tunnel")]),
        ];

        let doc = Generator::new(Info::new("API", "1.0.0")).generate(&routes);
        let item = &doc.paths["/items"];
        assert_eq!(
            item.operation(HttpMethod::Get).and_then(|op| op.summary.as_deref()),
            Some("second")
        );
        assert_eq!(
            item.operation(HttpMethod::Delete).and_then(|op| op.summary.as_deref()),
            Some("remove")
        );
        assert!(item.operation(HttpMethod::Post).is_none());
    }

    #[test]
    fn test_generator_configuration() {
        let doc = Generator::new(Info::new("API", "2.0.0").with_description("Docs"))
            .with_server("https://api.example.com", "Production")
            .with_server("http://localhost:8080", "")
            .with_bearer_auth("bearerAuth", "JWT access token")
            .with_api_key("apiKey", "", ParameterIn::Header, "X-API-Key")
            .with_tag("todos", "Todo operations")
            .generate(&[]);

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value["servers"],
            json!([
                {"url": "https://api.example.com", "description": "Production"},
                {"url": "http://localhost:8080"}
            ])
        );
        assert_eq!(
            value["components"]["securitySchemes"],
            json!({
                "apiKey": {"type": "apiKey", "name": "X-API-Key", "in": "header"},
                "bearerAuth": {
                    "type": "http",
                    "scheme": "bearer",
                    "bearerFormat": "JWT",
                    "description": "JWT access token"
                }
            })
        );
        assert_eq!(value["tags"], json!([{"name": "todos", "description": "Todo operations"}]));
        assert_eq!(value["info"]["description"], json!("Docs"));
    }
}
