//! Validate a JSON document against a data catalog taxonomy definition.
//!
//! Lets connector authors check canned responses without running the client
//! against a live connector.
//!
//! Usage:
//!   taxonomy-validate --file response.json
//!   taxonomy-validate --taxonomy 'resources/taxonomy/datacatalog.json#/definitions/CreateAssetResponse' < response.json

use anyhow::{Context, Result, bail};
use catalog_connector_client::{
    COMPONENT, FsSchemaStore, GET_ASSET_RESPONSE_TAXONOMY, LogContext, TaxonomyRef,
    ValidationError, find_taxonomy_root, init_logging, validate_response,
};
use clap::Parser;
use log::LevelFilter;
use serde_json::Value;
use std::fs::File;
use std::io::{Read, stdin};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "taxonomy-validate", version)]
#[command(about = "Validate JSON against a data catalog taxonomy definition")]
struct Cli {
    /// Taxonomy reference as <document>#<pointer>; defaults to GetAssetResponse.
    #[arg(long)]
    taxonomy: Option<String>,
    /// Optional input file; reads stdin when omitted.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Directory that taxonomy references are resolved against.
    #[arg(long = "taxonomy-root")]
    taxonomy_root: Option<PathBuf>,
}

fn read_input(file: Option<PathBuf>) -> Result<Value> {
    let mut buf = String::new();
    if let Some(path) = file {
        File::open(&path)
            .with_context(|| format!("opening input file {}", path.display()))?
            .read_to_string(&mut buf)
            .with_context(|| format!("reading input file {}", path.display()))?;
    } else {
        stdin()
            .read_to_string(&mut buf)
            .context("reading stdin for input JSON")?;
    }
    let value: Value = serde_json::from_str(&buf).context("parsing input JSON")?;
    Ok(value)
}

fn main() {
    if let Err(err) = init_logging(Some(LevelFilter::Warn)) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let reference = cli
        .taxonomy
        .map(TaxonomyRef::new)
        .unwrap_or(GET_ASSET_RESPONSE_TAXONOMY);
    let root = find_taxonomy_root(cli.taxonomy_root.as_deref())?;
    let input = read_input(cli.file)?;

    let store = FsSchemaStore::new(root);
    let log = LogContext::new(COMPONENT).scoped("taxonomy-validate");
    match validate_response(&input, &reference, &store, &log) {
        Ok(()) => {
            println!("{reference}: valid");
            Ok(())
        }
        Err(ValidationError::Conformance { violations }) => {
            for violation in &violations {
                println!("{violation}");
            }
            bail!(
                "document failed {reference} with {} violation(s)",
                violations.len()
            );
        }
        Err(err) => Err(err.into()),
    }
}
