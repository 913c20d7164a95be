//! Shared library for the data catalog connector conformance client.
//!
//! The crate sends one canned request (`get-asset` or `create-asset`) to a
//! catalog connector and checks the connector's JSON response against the data
//! catalog taxonomy. Public items here form the contract the binaries depend
//! on: operation dispatch, taxonomy validation, the connector client seam,
//! configuration defaults, and taxonomy root discovery.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod config;
pub mod connector;
pub mod dispatch;
pub mod logging;
pub mod model;
pub mod taxonomy;
pub mod validate;

pub use config::{ClientConfig, ConfigOverrides, read_request_payload};
pub use connector::{CatalogSession, ConnectorError, DataCatalog, HttpDataCatalog};
pub use dispatch::{DispatchError, Dispatcher, ErrorKind, Operation, OperationSpec, select};
pub use logging::{COMPONENT, LogContext, init_logging};
pub use model::{
    Connection, CreateAssetRequest, CreateAssetResponse, GetAssetRequest, GetAssetResponse,
    OperationType, ResourceColumn, ResourceDetails, ResourceMetadata,
};
pub use taxonomy::{
    CREATE_ASSET_RESPONSE_TAXONOMY, CompiledTaxonomy, FsSchemaStore,
    GET_ASSET_RESPONSE_TAXONOMY, SchemaResolveError, SchemaStore, TaxonomyRef,
};
pub use validate::{ValidationError, Violation, Violations, validate_response};

/// Directory (relative to the taxonomy root) holding the taxonomy documents.
pub const TAXONOMY_DIR: &str = "resources/taxonomy";
/// Environment variable consulted before any filesystem search.
pub const TAXONOMY_ROOT_ENV: &str = "CATALOG_CONNECTOR_TAXONOMY_ROOT";

/// Returns true when `candidate` holds the taxonomy directory.
fn is_taxonomy_root(candidate: &Path) -> bool {
    candidate.join(TAXONOMY_DIR).is_dir()
}

fn taxonomy_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !is_taxonomy_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

/// Locate the directory that taxonomy references are resolved against.
///
/// Search order: an explicit `--taxonomy-root`, then
/// `CATALOG_CONNECTOR_TAXONOMY_ROOT`, then the current directory, then the
/// build-time hint. An explicit root is trusted as given so a misconfigured
/// path surfaces later as a schema resolution failure naming the file.
pub fn find_taxonomy_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }

    if let Ok(env_root) = env::var(TAXONOMY_ROOT_ENV) {
        if let Some(root) = taxonomy_root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if is_taxonomy_root(&cwd) {
            return Ok(cwd);
        }
    }

    if let Some(hint) = option_env!("CATALOG_CONNECTOR_ROOT_HINT") {
        if let Some(root) = taxonomy_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate a taxonomy root containing {TAXONOMY_DIR}. Pass --taxonomy-root or set {TAXONOMY_ROOT_ENV}."
    );
}
