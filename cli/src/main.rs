#![deny(missing_docs)]

//! # Routedoc CLI
//!
//! Command Line Interface for the route documentation generator.
//!
//! Supported Commands:
//! - `generate`: Rust models + route manifest -> OpenAPI document.
//! - `schema`: Rust struct -> schema node and example.

use clap::{Parser, Subcommand};
use routedoc_core::AppResult;
use tracing_subscriber::EnvFilter;

mod generate;
mod schema_gen;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Route documentation to OpenAPI")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generates the OpenAPI document.
    Generate(generate::GenerateArgs),
    /// Prints the schema and example of one struct.
    Schema(schema_gen::SchemaArgs),
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        Commands::Schema(args) => schema_gen::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "routedoc",
            "generate",
            "--models",
            "src/models.rs",
            "--models",
            "src/billing.rs=billing",
            "--routes",
            "routes.yaml",
            "--verbose",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.models.len(), 2);
                assert!(args.output.is_none());
            }
            Commands::Schema(_) => panic!("expected generate"),
        }
    }
}
