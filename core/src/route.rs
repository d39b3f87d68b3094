#![deny(missing_docs)]

//! # Route Descriptors
//!
//! The documentation record of one HTTP operation and the one-shot options
//! that fill it in at registration time.
//!
//! ```
//! use routedoc_core::route::{self, RouteDescriptor};
//! use routedoc_core::TypeRegistry;
//!
//! let registry = TypeRegistry::new();
//! let mut descriptor = RouteDescriptor::new("GET", "/todos");
//! descriptor.apply(
//!     vec![route::with_summary("List todos"), route::with_json_response_of::<Vec<String>>(200, "OK")],
//!     &registry,
//! );
//! assert!(descriptor.responses.contains_key("200"));
//! ```

use crate::describe::Describe;
use crate::descriptor::TypeDescriptor;
use crate::error::{AppError, AppResult};
use crate::oas::document::{
    MediaType, Parameter, ParameterIn, RequestBody, Response, SecurityRequirement,
};
use crate::oas::schema::{Example, RefOr, SchemaNode, SchemaType};
use crate::registry::TypeRegistry;
use crate::schema_builder::schema_for;
use crate::status::status_code_to_string;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Content type of JSON bodies.
pub const APPLICATION_JSON: &str = "application/json";

/// Content type of multipart uploads.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// The methods a path item has a slot for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "PUT" => Ok(HttpMethod::Put),
            "POST" => Ok(HttpMethod::Post),
            "DELETE" => Ok(HttpMethod::Delete),
            "OPTIONS" => Ok(HttpMethod::Options),
            "HEAD" => Ok(HttpMethod::Head),
            "PATCH" => Ok(HttpMethod::Patch),
            "TRACE" => Ok(HttpMethod::Trace),
            _ => Err(AppError::General(format!("Unsupported HTTP method: {}", s))),
        }
    }
}

/// Documentation of a single route.
///
/// `method` is kept verbatim; the generator decides which slot it fills.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteDescriptor {
    /// HTTP method as registered.
    pub method: String,
    /// Path pattern.
    pub path: String,
    /// `operationId`
    pub operation_id: Option<String>,
    /// Summary.
    pub summary: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Parameters.
    pub parameters: Vec<Parameter>,
    /// Request body.
    pub request_body: Option<RequestBody>,
    /// Status code string -> response.
    pub responses: BTreeMap<String, Response>,
    /// Security requirements, in order.
    pub security: Vec<SecurityRequirement>,
    /// Deprecated flag.
    pub deprecated: bool,
}

impl RouteDescriptor {
    /// An undocumented route.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Applies `options` in order.
    pub fn apply(&mut self, options: impl IntoIterator<Item = RouteOption>, registry: &TypeRegistry) {
        for option in options {
            option.apply(self, registry);
        }
    }
}

type OptionFn = dyn FnOnce(&mut RouteDescriptor, &TypeRegistry) + Send;

/// A one-shot modification of a [`RouteDescriptor`].
pub struct RouteOption(Box<OptionFn>);

impl RouteOption {
    /// Wraps a closure.
    pub fn new<F>(apply: F) -> Self
    where
        F: FnOnce(&mut RouteDescriptor, &TypeRegistry) + Send + 'static,
    {
        Self(Box::new(apply))
    }

    /// Runs the option against `route`.
    pub fn apply(self, route: &mut RouteDescriptor, registry: &TypeRegistry) {
        (self.0)(route, registry)
    }
}

impl fmt::Debug for RouteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RouteOption(..)")
    }
}

/// Sets the `operationId`.
pub fn with_operation_id(operation_id: impl Into<String>) -> RouteOption {
    let operation_id = operation_id.into();
    RouteOption::new(move |route, _| route.operation_id = Some(operation_id))
}

/// Sets the summary.
pub fn with_summary(summary: impl Into<String>) -> RouteOption {
    let summary = summary.into();
    RouteOption::new(move |route, _| route.summary = Some(summary))
}

/// Sets the description.
pub fn with_description(description: impl Into<String>) -> RouteOption {
    let description = description.into();
    RouteOption::new(move |route, _| route.description = Some(description))
}

/// Appends tags.
pub fn with_tags<I, S>(tags: I) -> RouteOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
    RouteOption::new(move |route, _| route.tags.extend(tags))
}

/// Appends a parameter whose schema is a bare `schema_type`.
pub fn with_parameter(
    name: impl Into<String>,
    location: ParameterIn,
    schema_type: SchemaType,
    required: bool,
    description: impl Into<String>,
    example: Option<Example>,
) -> RouteOption {
    let name = name.into();
    let description = non_empty(description.into());
    RouteOption::new(move |route, _| {
        route.parameters.push(Parameter {
            name,
            location,
            required,
            description,
            schema: RefOr::T(SchemaNode {
                example,
                ..SchemaNode::of_type(schema_type)
            }),
            example: None,
        })
    })
}

/// Appends a query parameter.
pub fn with_query_param(
    name: impl Into<String>,
    schema_type: SchemaType,
    required: bool,
    description: impl Into<String>,
    example: Option<Example>,
) -> RouteOption {
    with_parameter(name, ParameterIn::Query, schema_type, required, description, example)
}

/// Appends a path parameter.
pub fn with_path_param(
    name: impl Into<String>,
    schema_type: SchemaType,
    required: bool,
    description: impl Into<String>,
    example: Option<Example>,
) -> RouteOption {
    with_parameter(name, ParameterIn::Path, schema_type, required, description, example)
}

/// Appends a string header parameter.
pub fn with_header_param(
    name: impl Into<String>,
    required: bool,
    description: impl Into<String>,
    example: Option<Example>,
) -> RouteOption {
    with_parameter(name, ParameterIn::Header, SchemaType::String, required, description, example)
}

/// Sets a request body with a single content entry.
pub fn with_request_body(
    content_type: impl Into<String>,
    schema: impl Into<RefOr<SchemaNode>>,
    required: bool,
    description: impl Into<String>,
) -> RouteOption {
    let content_type = content_type.into();
    let schema = schema.into();
    let description = non_empty(description.into());
    RouteOption::new(move |route, _| {
        route.request_body = Some(RequestBody {
            description,
            required,
            content: IndexMap::from([(content_type, MediaType::new(schema))]),
        })
    })
}

/// Sets a request body of `content_type` whose schema is built from `ty`.
pub fn with_typed_request_body(
    content_type: impl Into<String>,
    ty: TypeDescriptor,
    required: bool,
    description: impl Into<String>,
) -> RouteOption {
    let content_type = content_type.into();
    let description = non_empty(description.into());
    RouteOption::new(move |route, registry| {
        route.request_body = Some(RequestBody {
            description,
            required,
            content: IndexMap::from([(content_type, MediaType::new(schema_for(registry, &ty)))]),
        })
    })
}

/// Sets a JSON request body built from `ty`.
pub fn with_json_request_body(
    ty: TypeDescriptor,
    required: bool,
    description: impl Into<String>,
) -> RouteOption {
    with_typed_request_body(APPLICATION_JSON, ty, required, description)
}

/// Sets a JSON request body built from `T`.
pub fn with_json_request_body_of<T: Describe + ?Sized>(
    required: bool,
    description: impl Into<String>,
) -> RouteOption {
    with_json_request_body(T::describe(), required, description)
}

/// Sets a `multipart/form-data` body of binary fields.
///
/// `fields` maps field names to descriptions. A name ending in `[]` becomes
/// an array of binary strings under the name without the suffix. Every field
/// is required.
pub fn with_multipart_form_data<I, K, V>(
    required: bool,
    description: impl Into<String>,
    fields: I,
) -> RouteOption
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut schema = SchemaNode::of_type(SchemaType::Object);
    for (name, field_description) in fields {
        let name: String = name.into();
        let field_description: String = field_description.into();
        let mut binary = SchemaNode::of_type(SchemaType::String).with_format("binary");
        if !field_description.is_empty() {
            binary = binary.with_description(field_description);
        }

        let (name, property) = match name.strip_suffix("[]") {
            Some(base) => (base.to_string(), SchemaNode::array(binary)),
            None => (name, binary),
        };
        schema.required.push(name.clone());
        schema.properties.insert(name, RefOr::T(property));
    }

    with_request_body(MULTIPART_FORM_DATA, schema, required, description)
}

/// Adds a response without content.
pub fn with_response(status: u16, description: impl Into<String>) -> RouteOption {
    let description = description.into();
    RouteOption::new(move |route, _| {
        route.responses.insert(
            status_code_to_string(status),
            Response {
                description,
                ..Response::default()
            },
        );
    })
}

/// Adds a response of `content_type` whose schema is built from `ty`.
pub fn with_typed_response(
    status: u16,
    description: impl Into<String>,
    content_type: impl Into<String>,
    ty: TypeDescriptor,
) -> RouteOption {
    let description = description.into();
    let content_type = content_type.into();
    RouteOption::new(move |route, registry| {
        route.responses.insert(
            status_code_to_string(status),
            Response {
                description,
                content: IndexMap::from([(content_type, MediaType::new(schema_for(registry, &ty)))]),
                ..Response::default()
            },
        );
    })
}

/// Adds a JSON response built from `ty`.
pub fn with_json_response(
    status: u16,
    description: impl Into<String>,
    ty: TypeDescriptor,
) -> RouteOption {
    with_typed_response(status, description, APPLICATION_JSON, ty)
}

/// Adds a JSON response built from `T`.
pub fn with_json_response_of<T: Describe + ?Sized>(
    status: u16,
    description: impl Into<String>,
) -> RouteOption {
    with_json_response(status, description, T::describe())
}

/// Marks the route deprecated and appends `DEPRECATED: <message>` to the description.
pub fn with_deprecated(message: impl Into<String>) -> RouteOption {
    let message = message.into();
    RouteOption::new(move |route, _| {
        route.deprecated = true;
        if message.is_empty() {
            return;
        }
        let description = route.description.get_or_insert_with(String::new);
        if !description.is_empty() {
            description.push_str("\n\n");
        }
        description.push_str("DEPRECATED: ");
        description.push_str(&message);
    })
}

/// Appends security requirements.
pub fn with_security<I>(requirements: I) -> RouteOption
where
    I: IntoIterator<Item = SecurityRequirement>,
{
    let requirements: Vec<SecurityRequirement> = requirements.into_iter().collect();
    RouteOption::new(move |route, _| route.security.extend(requirements))
}

/// Requires the `basicAuth` scheme.
pub fn with_basic_auth() -> RouteOption {
    with_security([requirement("basicAuth", Vec::new())])
}

/// Requires the `bearerAuth` scheme.
pub fn with_bearer_auth() -> RouteOption {
    with_security([requirement("bearerAuth", Vec::new())])
}

/// Requires the `apiKey` scheme.
pub fn with_api_key() -> RouteOption {
    with_security([requirement("apiKey", Vec::new())])
}

/// Requires the `oauth2` scheme with `scopes`.
pub fn with_oauth2_scopes<I, S>(scopes: I) -> RouteOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    with_security([requirement(
        "oauth2",
        scopes.into_iter().map(Into::into).collect(),
    )])
}

/// A single-scheme security requirement.
pub fn requirement(scheme: impl Into<String>, scopes: Vec<String>) -> SecurityRequirement {
    BTreeMap::from([(scheme.into(), scopes)])
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}
