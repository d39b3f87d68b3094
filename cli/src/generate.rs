#![deny(missing_docs)]

//! # Generate Command
//!
//! Builds the OpenAPI document from Rust model files and a route manifest.

use routedoc_core::error::{AppError, AppResult};
use routedoc_core::{DocConfig, ModelCatalog, OpenApi, RouteManifest, TypeRegistry};
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Rust source files with the models, as `path` or `path=namespace`.
    /// The namespace defaults to the file stem.
    #[clap(long = "models", value_name = "FILE[=NAMESPACE]")]
    pub models: Vec<String>,

    /// Route manifest (YAML, or JSON for `.json` files).
    #[clap(long)]
    pub routes: PathBuf,

    /// Generator config (YAML, or JSON for `.json` files).
    #[clap(long, env = "ROUTEDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output path. `.yaml`/`.yml` writes YAML, anything else JSON.
    /// If not provided, prints JSON to stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Executes the generate command.
pub fn execute(args: &GenerateArgs) -> AppResult<()> {
    let document = build_document(args)?;

    let rendered = match &args.output {
        Some(path) if is_yaml(path) => document.to_yaml()?,
        _ => document.to_json_pretty()?,
    };

    if let Some(out_path) = &args.output {
        if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::General(format!("Failed to create output directory: {}", e))
                })?;
            }
        }
        fs::write(out_path, rendered)
            .map_err(|e| AppError::General(format!("Failed to write output file: {}", e)))?;
        println!("Document generated at {:?}", out_path);
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

/// Loads every input and assembles the document.
pub fn build_document(args: &GenerateArgs) -> AppResult<OpenApi> {
    let mut models = ModelCatalog::new();
    for spec in &args.models {
        let (path, namespace) = parse_models_arg(spec)?;
        let code = fs::read_to_string(&path).map_err(|e| {
            AppError::General(format!("Failed to read models file {:?}: {}", path, e))
        })?;
        models.add_source(&namespace, &code)?;
    }

    let manifest = RouteManifest::load(&args.routes)?;
    let config = match &args.config {
        Some(path) => DocConfig::load(path)?,
        None => DocConfig::default(),
    };

    let registry = TypeRegistry::new();
    let routes = manifest.into_routes(&models, &registry)?;
    tracing::info!(
        models = models.len(),
        routes = routes.len(),
        "generating document"
    );

    Ok(config.into_generator().generate(&routes))
}

/// Splits `path=namespace`. Without `=`, the namespace is the file stem.
fn parse_models_arg(spec: &str) -> AppResult<(PathBuf, String)> {
    if let Some((path, namespace)) = spec.rsplit_once('=') {
        if !path.is_empty() && !namespace.is_empty() {
            return Ok((PathBuf::from(path), namespace.to_string()));
        }
    }

    let path = PathBuf::from(spec);
    let namespace = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::General(format!("Invalid models argument: '{}'", spec)))?;
    Ok((path, namespace))
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
