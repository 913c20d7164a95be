//! Taxonomy references and the schema store seam.
//!
//! A taxonomy reference names one definition inside a taxonomy document, as
//! `<document path>#<JSON pointer>`. References are fixed strings; the store
//! turns them into compiled validators. `FsSchemaStore` is the shipped store
//! and reads documents relative to a taxonomy root.

pub(crate) mod store;

pub use store::FsSchemaStore;

use jsonschema::JSONSchema;
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Definition every `get-asset` response must satisfy.
pub const GET_ASSET_RESPONSE_TAXONOMY: TaxonomyRef =
    TaxonomyRef::from_static("resources/taxonomy/datacatalog.json#/definitions/GetAssetResponse");
/// Definition every `create-asset` response must satisfy.
pub const CREATE_ASSET_RESPONSE_TAXONOMY: TaxonomyRef = TaxonomyRef::from_static(
    "resources/taxonomy/datacatalog.json#/definitions/CreateAssetResponse",
);

/// Stable `<document>#<pointer>` reference to a taxonomy definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaxonomyRef(Cow<'static, str>);

impl TaxonomyRef {
    pub const fn from_static(reference: &'static str) -> Self {
        TaxonomyRef(Cow::Borrowed(reference))
    }

    pub fn new(reference: impl Into<String>) -> Self {
        TaxonomyRef(Cow::Owned(reference.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Document part of the reference, relative to the taxonomy root.
    pub fn document(&self) -> &str {
        let raw = self.as_str();
        raw.split_once('#').map_or(raw, |(doc, _)| doc)
    }

    /// JSON pointer part of the reference; empty means the whole document.
    pub fn pointer(&self) -> &str {
        self.as_str()
            .split_once('#')
            .map_or("", |(_, pointer)| pointer)
    }
}

impl fmt::Display for TaxonomyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A taxonomy definition compiled into a validator.
pub struct CompiledTaxonomy {
    reference: TaxonomyRef,
    schema: JSONSchema,
}

impl CompiledTaxonomy {
    pub(crate) fn new(reference: TaxonomyRef, schema: JSONSchema) -> Self {
        Self { reference, schema }
    }

    pub fn reference(&self) -> &TaxonomyRef {
        &self.reference
    }

    pub(crate) fn schema(&self) -> &JSONSchema {
        &self.schema
    }
}

/// Resolves taxonomy references. Failures mean the harness is misconfigured,
/// never that a connector misbehaved.
pub trait SchemaStore {
    fn resolve(&self, reference: &TaxonomyRef) -> Result<CompiledTaxonomy, SchemaResolveError>;
}

/// Why a taxonomy reference could not be turned into a validator.
#[derive(Debug, Error)]
pub enum SchemaResolveError {
    #[error("reference '{0}' has an empty document path")]
    EmptyDocument(String),
    #[error("pointer '{pointer}' in '{reference}' must start with '/'")]
    InvalidPointer { reference: String, pointer: String },
    #[error("opening taxonomy {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing taxonomy {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("definition '{pointer}' not found in {}", .path.display())]
    MissingDefinition { path: PathBuf, pointer: String },
    #[error("taxonomy {} is not a JSON object", .path.display())]
    NotAnObject { path: PathBuf },
    #[error("compiling taxonomy definition '{reference}': {reason}")]
    Compile { reference: String, reason: String },
}
