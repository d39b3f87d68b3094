#![deny(missing_docs)]

//! # Parser Module
//!
//! Handles parsing of Rust source code using the rust-analyzer syntax library.
//! Extracts structs, fields, documentation, serde attributes and validation
//! rules, and maps Rust type strings onto descriptors.

pub mod attributes;
pub mod catalog;
pub mod extractors;
pub mod models;
pub mod types;

pub use catalog::ModelCatalog;
pub use extractors::{extract_models, extract_struct, extract_struct_names};
pub use models::{ParsedField, ParsedStruct, RenameRule};
pub use types::{parse_type, TypeExpr};
