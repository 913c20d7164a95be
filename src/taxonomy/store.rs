//! Filesystem-backed taxonomy store.
//!
//! Loads a taxonomy document relative to the taxonomy root, checks that the
//! referenced definition exists, and compiles a Draft 7 validator rooted at
//! that definition. The whole document stays in scope so local
//! `#/definitions/...` references inside the definition keep resolving.

use super::{CompiledTaxonomy, SchemaResolveError, SchemaStore, TaxonomyRef};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Resolves taxonomy references against files under `root`.
#[derive(Clone, Debug)]
pub struct FsSchemaStore {
    root: PathBuf,
}

impl FsSchemaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, reference: &TaxonomyRef) -> Result<PathBuf, SchemaResolveError> {
        let document = reference.document();
        if document.is_empty() {
            return Err(SchemaResolveError::EmptyDocument(reference.to_string()));
        }
        let path = Path::new(document);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.root.join(path))
        }
    }
}

impl SchemaStore for FsSchemaStore {
    fn resolve(&self, reference: &TaxonomyRef) -> Result<CompiledTaxonomy, SchemaResolveError> {
        let pointer = reference.pointer();
        if !pointer.is_empty() && !pointer.starts_with('/') {
            return Err(SchemaResolveError::InvalidPointer {
                reference: reference.to_string(),
                pointer: pointer.to_string(),
            });
        }

        let path = self.document_path(reference)?;
        let file = File::open(&path).map_err(|source| SchemaResolveError::Read {
            path: path.clone(),
            source,
        })?;
        let document: Value = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            SchemaResolveError::Parse {
                path: path.clone(),
                source,
            }
        })?;

        compile_definition(reference, &path, document)
    }
}

/// Compile the definition named by `reference` out of an already parsed
/// taxonomy document.
pub(crate) fn compile_definition(
    reference: &TaxonomyRef,
    path: &Path,
    mut document: Value,
) -> Result<CompiledTaxonomy, SchemaResolveError> {
    let pointer = reference.pointer();
    if !pointer.is_empty() {
        if document.pointer(pointer).is_none() {
            return Err(SchemaResolveError::MissingDefinition {
                path: path.to_path_buf(),
                pointer: pointer.to_string(),
            });
        }
        // A root-level $ref makes draft 7 ignore the sibling keywords, so the
        // document validates exactly as the pointed-to definition.
        let Value::Object(root) = &mut document else {
            return Err(SchemaResolveError::NotAnObject {
                path: path.to_path_buf(),
            });
        };
        root.insert("$ref".to_string(), Value::String(format!("#{pointer}")));
    }

    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&document)
        .map_err(|err| SchemaResolveError::Compile {
            reference: reference.to_string(),
            reason: err.to_string(),
        })?;

    Ok(CompiledTaxonomy::new(reference.clone(), compiled))
}
