//! # Route Manifest
//!
//! Declarative route documentation, read from YAML or JSON and turned into
//! [`RouteDescriptor`]s through the ordinary route options.
//!
//! ```yaml
//! namespace: todos
//! routes:
//!   - method: GET
//!     path: /todos/{id}
//!     summary: Get a todo
//!     parameters:
//!       - name: id
//!         in: path
//!         type: integer
//!         required: true
//!     responses:
//!       "200": { description: OK, type: Todo }
//!       "404": { description: Not found }
//!     security:
//!       - bearerAuth: []
//! ```

use crate::catalog::RouteCatalog;
use crate::config::is_json;
use crate::descriptor::TypeDescriptor;
use crate::error::{AppError, AppResult};
use crate::oas::document::{ParameterIn, SecurityRequirement};
use crate::oas::schema::{Example, SchemaType};
use crate::parser::ModelCatalog;
use crate::registry::TypeRegistry;
use crate::route::{self, RouteDescriptor, RouteOption, APPLICATION_JSON};
use crate::status::status_code_from_string;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A set of documented routes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteManifest {
    /// Namespace type names are looked up in first. Empty searches all namespaces.
    pub namespace: String,
    /// Routes in registration order.
    pub routes: Vec<ManifestRoute>,
}

/// One documented route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRoute {
    /// HTTP method.
    pub method: String,
    /// Route path.
    pub path: String,
    /// Operation id.
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Deprecation message. Present (even empty) marks the route deprecated.
    #[serde(default)]
    pub deprecated: Option<String>,
    /// Parameters.
    #[serde(default)]
    pub parameters: Vec<ManifestParameter>,
    /// Request body.
    #[serde(default)]
    pub request_body: Option<ManifestBody>,
    /// Responses keyed by status code.
    #[serde(default)]
    pub responses: BTreeMap<String, ManifestResponse>,
    /// Security requirements.
    #[serde(default)]
    pub security: Vec<SecurityRequirement>,
}

/// A scalar parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestParameter {
    /// Parameter name.
    pub name: String,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParameterIn,
    /// Scalar type. Defaults to `string`.
    #[serde(rename = "type", default = "default_parameter_type")]
    pub schema_type: SchemaType,
    /// Required flag.
    #[serde(default)]
    pub required: bool,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Example value.
    #[serde(default)]
    pub example: Option<Example>,
}

fn default_parameter_type() -> SchemaType {
    SchemaType::String
}

/// A request body typed by a Rust type string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestBody {
    /// Rust type, e.g. `CreateTodo` or `Vec<Todo>`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Required flag.
    #[serde(default)]
    pub required: bool,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Content type. Defaults to JSON.
    #[serde(default)]
    pub content_type: Option<String>,
}

/// A response, optionally typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestResponse {
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Rust type of the body. No type means no content.
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
    /// Content type. Defaults to JSON.
    #[serde(default)]
    pub content_type: Option<String>,
}

impl RouteManifest {
    /// Loads a manifest. `.json` files are read as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::General(format!("Failed to read manifest {}: {}", path.display(), e))
        })?;

        let manifest: Self = if is_json(path) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        tracing::debug!(path = %path.display(), routes = manifest.routes.len(), "loaded manifest");
        Ok(manifest)
    }

    /// Registers every route into `catalog`, resolving types through `models`.
    pub fn register(&self, models: &ModelCatalog, catalog: &mut RouteCatalog<'_>) -> AppResult<()> {
        for entry in &self.routes {
            let options = self.options(entry, models)?;
            catalog.route(&entry.method, &entry.path, options);
        }
        Ok(())
    }

    /// Builds the route descriptors of this manifest.
    pub fn into_routes(
        &self,
        models: &ModelCatalog,
        registry: &TypeRegistry,
    ) -> AppResult<Vec<RouteDescriptor>> {
        let mut catalog = RouteCatalog::new(registry);
        self.register(models, &mut catalog)?;
        Ok(catalog.into_routes())
    }

    fn options(&self, entry: &ManifestRoute, models: &ModelCatalog) -> AppResult<Vec<RouteOption>> {
        let mut options = Vec::new();

        if let Some(operation_id) = &entry.operation_id {
            options.push(route::with_operation_id(operation_id.as_str()));
        }
        if let Some(summary) = &entry.summary {
            options.push(route::with_summary(summary.as_str()));
        }
        if let Some(description) = &entry.description {
            options.push(route::with_description(description.as_str()));
        }
        if !entry.tags.is_empty() {
            options.push(route::with_tags(entry.tags.clone()));
        }
        if let Some(message) = &entry.deprecated {
            options.push(route::with_deprecated(message.as_str()));
        }

        for parameter in &entry.parameters {
            options.push(route::with_parameter(
                parameter.name.as_str(),
                parameter.location,
                parameter.schema_type,
                parameter.required,
                parameter.description.as_str(),
                parameter.example.clone(),
            ));
        }

        if let Some(body) = &entry.request_body {
            let ty = self.resolve(models, &body.ty)?;
            options.push(route::with_typed_request_body(
                content_type_or_json(body.content_type.as_deref()),
                ty,
                body.required,
                body.description.as_str(),
            ));
        }

        for (key, response) in &entry.responses {
            let status = status_code_from_string(key)?;
            let option = match &response.ty {
                Some(ty) => route::with_typed_response(
                    status,
                    response.description.as_str(),
                    content_type_or_json(response.content_type.as_deref()),
                    self.resolve(models, ty)?,
                ),
                None => route::with_response(status, response.description.as_str()),
            };
            options.push(option);
        }

        if !entry.security.is_empty() {
            options.push(route::with_security(entry.security.clone()));
        }

        Ok(options)
    }

    fn resolve(&self, models: &ModelCatalog, rust_type: &str) -> AppResult<TypeDescriptor> {
        if !models.is_resolvable(&self.namespace, rust_type) {
            tracing::warn!(ty = rust_type, namespace = %self.namespace, "type not fully known, documenting as generic object");
        }
        models.resolve_type(&self.namespace, rust_type)
    }
}

fn content_type_or_json(content_type: Option<&str>) -> String {
    content_type.unwrap_or(APPLICATION_JSON).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    const MODELS: &str = r#"
        pub struct Todo {
            #[validate(required)]
            pub title: String,
            pub done: bool,
        }
    "#;

    const MANIFEST: &str = r#"
namespace: todos
routes:
  - method: GET
    path: /todos/{id}
    operation_id: getTodo
    tags: [todos]
    parameters:
      - name: id
        in: path
        type: integer
        required: true
        example: 7
    responses:
      "200":
        description: OK
        type: Todo
      "404":
        description: Not found
    security:
      - bearerAuth: []
  - method: POST
    path: /todos
    deprecated: use /v2/todos
    request_body:
      type: Todo
      required: true
    responses:
      "201":
        description: Created
        type: Vec<Todo>
"#;

    fn models() -> ModelCatalog {
        let mut models = ModelCatalog::new();
        models.add_source("todos", MODELS).unwrap();
        models
    }

    #[test]
    fn test_into_routes() {
        let manifest: RouteManifest = serde_yaml::from_str(MANIFEST).unwrap();
        let registry = TypeRegistry::new();
        let routes = manifest.into_routes(&models(), &registry).unwrap();
        assert_eq!(routes.len(), 2);

        let get = &routes[0];
        assert_eq!(get.operation_id.as_deref(), Some("getTodo"));
        assert_eq!(get.tags, vec!["todos"]);
        assert_eq!(get.security.len(), 1);
        assert_eq!(
            serde_json::to_value(&get.parameters[0]).unwrap(),
            json!({"name": "id", "in": "path", "required": true, "schema": {"type": "integer", "example": 7}})
        );
        assert!(get.responses["404"].content.is_empty());
        let ok = &get.responses["200"].content["application/json"].schema;
        assert_eq!(
            serde_json::to_value(ok).unwrap()["required"],
            json!(["title"])
        );

        let post = &routes[1];
        assert!(post.deprecated);
        assert_eq!(post.description.as_deref(), Some("DEPRECATED: use /v2/todos"));
        assert!(post.request_body.as_ref().unwrap().required);
        let created = &post.responses["201"].content["application/json"].schema;
        assert!(created.as_inline().unwrap().is_array());
    }

    #[test]
    fn test_invalid_status_key() {
        let manifest = RouteManifest {
            namespace: String::new(),
            routes: vec![ManifestRoute {
                method: "GET".into(),
                path: "/".into(),
                operation_id: None,
                summary: None,
                description: None,
                tags: vec![],
                deprecated: None,
                parameters: vec![],
                request_body: None,
                responses: BTreeMap::from([(
                    "ok".to_string(),
                    ManifestResponse {
                        description: "OK".into(),
                        ty: None,
                        content_type: None,
                    },
                )]),
                security: vec![],
            }],
        };

        let err = manifest
            .into_routes(&ModelCatalog::new(), &TypeRegistry::new())
            .unwrap_err();
        assert!(matches!(err, AppError::StatusCode(_)));
    }

    #[test]
    fn test_custom_content_type_and_unknown_type() {
        let manifest: RouteManifest = serde_json::from_value(json!({
            "routes": [{
                "method": "PUT",
                "path": "/raw",
                "request_body": {"type": "Blob", "content_type": "application/octet-stream"},
                "responses": {"204": {"description": "Stored"}}
            }]
        }))
        .unwrap();

        let routes = manifest
            .into_routes(&ModelCatalog::new(), &TypeRegistry::new())
            .unwrap();
        let body = routes[0].request_body.as_ref().unwrap();
        assert_eq!(
            serde_json::to_value(&body.content["application/octet-stream"].schema).unwrap(),
            json!({"type": "object"})
        );
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"routes": [{{"method": "GET", "path": "/health", "responses": {{"200": {{"description": "OK"}}}}}}]}}"#
        )
        .unwrap();

        let manifest = RouteManifest::load(file.path()).unwrap();
        assert_eq!(manifest.routes[0].path, "/health");
        assert!(RouteManifest::load("/missing/routes.yaml").is_err());
    }
}
