#![deny(missing_docs)]

//! # OpenAPI Model
//!
//! - **schema**: schema nodes, references and example values.
//! - **document**: the assembled document and its parts.

pub mod document;
pub mod schema;

pub use document::{
    Components, Contact, Header, Info, License, MediaType, OAuthFlow, OAuthFlows, OpenApi,
    Operation, Parameter, ParameterIn, PathItem, RequestBody, Response, SecurityRequirement,
    SecurityScheme, SecuritySchemeType, Server, Tag, OPENAPI_VERSION,
};
pub use schema::{Example, RefOr, Reference, SchemaNode, SchemaType, COMPONENT_REF_PREFIX};
