#![deny(missing_docs)]

//! # Schema Command
//!
//! Prints the schema node and example of one Rust struct.

use routedoc_core::error::{AppError, AppResult};
use routedoc_core::schema_builder::SchemaBuilder;
use routedoc_core::{ModelCatalog, TypeDescriptor, TypeRegistry};
use serde_json::json;
use std::fs;
use std::path::PathBuf;

/// Arguments for the schema command.
#[derive(clap::Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Path to the Rust source file containing the model.
    #[clap(long)]
    pub source: PathBuf,

    /// Name of the struct to document.
    #[clap(long)]
    pub name: String,

    /// Namespace of the struct. Defaults to the file stem.
    #[clap(long)]
    pub namespace: Option<String>,
}

/// Executes the schema command.
pub fn execute(args: &SchemaArgs) -> AppResult<()> {
    let output = render(args)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Builds `{"schema": ..., "example": ...}` for the requested struct.
pub fn render(args: &SchemaArgs) -> AppResult<serde_json::Value> {
    if !args.source.exists() {
        return Err(AppError::General(format!(
            "Source file not found: {:?}",
            args.source
        )));
    }

    let content = fs::read_to_string(&args.source)
        .map_err(|e| AppError::General(format!("Failed to read source file: {}", e)))?;

    let namespace = match &args.namespace {
        Some(namespace) => namespace.clone(),
        None => args
            .source
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string(),
    };

    let mut models = ModelCatalog::new();
    models.add_source(&namespace, &content)?;
    let record = models.record(&namespace, &args.name).ok_or_else(|| {
        AppError::General(format!("Struct '{}' not found in {:?}", args.name, args.source))
    })?;

    let registry = TypeRegistry::new();
    let ty = TypeDescriptor::from(record);
    let mut builder = SchemaBuilder::new(&registry);
    let schema = builder.build(&ty);
    let example = builder.example(&ty);

    Ok(json!({
        "schema": serde_json::to_value(schema)?,
        "example": serde_json::to_value(example)?,
    }))
}
