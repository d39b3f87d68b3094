#![deny(missing_docs)]

//! # Routedoc Core
//!
//! Core library for documenting HTTP routes as an OpenAPI 3 document.
//!
//! Routes are described at registration time with [`RouteOption`]s. Types are
//! described with [`TypeDescriptor`]s, either through [`Describe`] impls or by
//! parsing Rust source into a [`ModelCatalog`]. The [`Generator`] then collects
//! the named object schemas into components and swaps inline duplicates for
//! references.

/// Shared error types.
pub mod error;

/// Process-wide type naming.
pub mod registry;

/// Type shape descriptors.
pub mod descriptor;

/// Descriptors for standard Rust types.
pub mod describe;

/// OpenAPI (OAS) document model.
pub mod oas;

/// Schema and example generation.
pub mod schema_builder;

/// Component collection.
pub mod collector;

/// Inline schema to reference resolution.
pub mod resolver;

/// Document assembly.
pub mod generator;

/// Route descriptors and options.
pub mod route;

/// Route registration.
pub mod catalog;

/// Status code keys.
pub mod status;

/// Generator configuration files.
pub mod config;

/// AST Parsing logic.
pub mod parser;

/// Declarative route manifests.
pub mod manifest;

pub use catalog::RouteCatalog;
pub use collector::{collect_components, generate_schema_name, ComponentTable};
pub use config::DocConfig;
pub use describe::Describe;
pub use descriptor::{FieldDescriptor, FieldRules, PrimitiveKind, RecordDescriptor, TypeDescriptor};
pub use error::{AppError, AppResult};
pub use generator::Generator;
pub use manifest::RouteManifest;
pub use oas::{Info, OpenApi, RefOr, SchemaNode};
pub use parser::{extract_models, extract_struct, ModelCatalog, ParsedField, ParsedStruct};
pub use registry::{TypeIdentity, TypeRegistry};
pub use resolver::resolve_schema;
pub use route::{HttpMethod, RouteDescriptor, RouteOption};
pub use schema_builder::{example_for, schema_for, schema_of, SchemaBuilder};
pub use status::{status_code_from_string, status_code_to_string};
