//! Taxonomy validation of connector responses.
//!
//! A response is serialized to JSON, checked against a taxonomy definition,
//! and every failure is reported as a [`Violation`] addressed by a dotted field
//! path (`details.connection.name`, `resource_metadata.columns[1].name`).
//! Serialization and schema resolution failures are kept apart from
//! violations: the first two mean the harness is broken, the last means the
//! connector is non-conformant.

use crate::logging::LogContext;
use crate::taxonomy::{CompiledTaxonomy, SchemaResolveError, SchemaStore, TaxonomyRef};
use jsonschema::error::ValidationErrorKind;
use log::{debug, info};
use serde::Serialize;
use serde_json::Value;
use std::fmt::{self, Write};
use thiserror::Error;

/// A single taxonomy rule failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path to the offending field; empty for the response root.
    pub field: String,
    /// Schema keyword that failed (`required`, `type`, `enum`, ...).
    pub rule: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Ordered violations in schema traversal order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Returns the first violation addressed at `field`, if any.
    pub fn at(&self, field: &str) -> Option<&Violation> {
        self.0.iter().find(|violation| violation.field == field)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('[')?;
        for (idx, violation) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{violation}")?;
        }
        f.write_char(']')
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unable to serialize the response as JSON")]
    Serialize(#[source] serde_json::Error),
    #[error("unable to resolve taxonomy {reference}")]
    SchemaResolution {
        reference: TaxonomyRef,
        #[source]
        source: SchemaResolveError,
    },
    #[error("invalid response: {violations}")]
    Conformance { violations: Violations },
}

impl ValidationError {
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            ValidationError::Conformance { violations } => Some(violations),
            _ => None,
        }
    }
}

/// Check `response` against the taxonomy definition named by `reference`.
///
/// The serialized response is logged at info level before the check. An
/// empty violation list is success; otherwise the full list is returned in a
/// single [`ValidationError::Conformance`].
pub fn validate_response<T, S>(
    response: &T,
    reference: &TaxonomyRef,
    store: &S,
    log: &LogContext,
) -> Result<(), ValidationError>
where
    T: Serialize + ?Sized,
    S: SchemaStore + ?Sized,
{
    let response_json = serde_json::to_value(response).map_err(ValidationError::Serialize)?;
    info!(target: log.target(), "responseJSON: {response_json}");

    let taxonomy = store
        .resolve(reference)
        .map_err(|source| ValidationError::SchemaResolution {
            reference: reference.clone(),
            source,
        })?;

    let violations = check(&taxonomy, &response_json);
    if violations.is_empty() {
        debug!(target: log.target(), "response conforms to {reference}");
        return Ok(());
    }
    debug!(
        target: log.target(),
        "response has {} violation(s) against {reference}",
        violations.len()
    );
    Err(ValidationError::Conformance { violations })
}

/// Collect every violation of `instance` against a compiled taxonomy.
pub fn check(taxonomy: &CompiledTaxonomy, instance: &Value) -> Violations {
    match taxonomy.schema().validate(instance) {
        Ok(()) => Violations::default(),
        Err(errors) => Violations(
            errors
                .map(|err| {
                    let mut field =
                        field_path(instance, &pointer_segments(&err.instance_path.to_string()));
                    if let ValidationErrorKind::Required { property } = &err.kind {
                        if let Some(name) = property.as_str() {
                            push_key(&mut field, name);
                        }
                    }
                    Violation {
                        field,
                        rule: failed_rule(&err.schema_path.to_string()),
                        message: err.to_string(),
                    }
                })
                .collect(),
        ),
    }
}

/// Split a JSON pointer into unescaped reference tokens.
fn pointer_segments(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer
        .trim_start_matches('/')
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Render pointer tokens as a dotted path, using the instance to tell array
/// indexes apart from numeric object keys.
fn field_path(instance: &Value, segments: &[String]) -> String {
    let mut field = String::new();
    let mut node = Some(instance);
    for segment in segments {
        match node {
            Some(Value::Array(items)) => {
                let _ = write!(field, "[{segment}]");
                node = segment.parse::<usize>().ok().and_then(|idx| items.get(idx));
            }
            other => {
                push_key(&mut field, segment);
                node = other.and_then(|value| value.get(segment.as_str()));
            }
        }
    }
    field
}

fn push_key(field: &mut String, key: &str) {
    if !field.is_empty() {
        field.push('.');
    }
    field.push_str(key);
}

fn failed_rule(schema_path: &str) -> String {
    schema_path
        .rsplit('/')
        .next()
        .filter(|keyword| !keyword.is_empty())
        .unwrap_or("schema")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::store::compile_definition;
    use serde_json::json;
    use std::path::Path;

    fn compiled() -> CompiledTaxonomy {
        let document = json!({
            "definitions": {
                "Asset": {
                    "type": "object",
                    "required": ["name", "details"],
                    "properties": {
                        "name": {"type": "string"},
                        "format": {"type": "string", "enum": ["csv", "parquet"]},
                        "details": {
                            "type": "object",
                            "required": ["connection"],
                            "properties": {
                                "connection": {
                                    "type": "object",
                                    "required": ["name"],
                                    "properties": {"name": {"type": "string"}}
                                }
                            }
                        },
                        "columns": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["name"],
                                "properties": {"name": {"type": "string"}}
                            }
                        },
                        "tags": {"type": "object", "additionalProperties": {"type": "boolean"}}
                    }
                }
            }
        });
        compile_definition(
            &TaxonomyRef::new("inline.json#/definitions/Asset"),
            Path::new("inline.json"),
            document,
        )
        .expect("test taxonomy compiles")
    }

    #[test]
    fn conformant_instance_has_no_violations() {
        let instance = json!({
            "name": "paysim",
            "format": "csv",
            "details": {"connection": {"name": "s3"}},
            "columns": [{"name": "amount"}]
        });
        assert!(check(&compiled(), &instance).is_empty());
    }

    #[test]
    fn missing_required_field_is_addressed_by_name() {
        let instance = json!({"details": {"connection": {"name": "s3"}}});
        let violations = check(&compiled(), &instance);
        let violation = violations.at("name").expect("violation at name");
        assert_eq!(violation.rule, "required");
    }

    #[test]
    fn nested_and_indexed_paths_are_rendered() {
        let instance = json!({
            "name": 7,
            "format": "xml",
            "details": {"connection": {}},
            "columns": [{"name": "ok"}, {"name": false}]
        });
        let violations = check(&compiled(), &instance);
        assert_eq!(violations.at("name").map(|v| v.rule.as_str()), Some("type"));
        assert_eq!(violations.at("format").map(|v| v.rule.as_str()), Some("enum"));
        assert_eq!(
            violations
                .at("details.connection.name")
                .map(|v| v.rule.as_str()),
            Some("required")
        );
        assert_eq!(
            violations.at("columns[1].name").map(|v| v.rule.as_str()),
            Some("type")
        );
        assert_eq!(violations.len(), 4);
    }

    #[test]
    fn numeric_object_keys_stay_dotted() {
        let instance = json!({
            "name": "x",
            "details": {"connection": {"name": "s3"}},
            "tags": {"0": "yes"}
        });
        let violations = check(&compiled(), &instance);
        assert!(violations.at("tags.0").is_some(), "{violations}");
    }

    #[test]
    fn root_type_mismatch_uses_root_field() {
        let violations = check(&compiled(), &json!("not an object"));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations.0[0].field, "");
        assert!(violations.0[0].to_string().starts_with("(root): "));
    }

    #[test]
    fn checking_twice_yields_identical_violations() {
        let taxonomy = compiled();
        let instance = json!({"name": 1, "columns": [{}]});
        assert_eq!(check(&taxonomy, &instance), check(&taxonomy, &instance));
    }

    #[test]
    fn pointer_tokens_are_unescaped() {
        assert_eq!(
            pointer_segments("/a~1b/c~0d/0"),
            vec!["a/b".to_string(), "c~d".to_string(), "0".to_string()]
        );
        assert!(pointer_segments("").is_empty());
    }

    #[test]
    fn violations_display_as_bracketed_list() {
        let violations = Violations(vec![
            Violation {
                field: "name".to_string(),
                rule: "required".to_string(),
                message: "\"name\" is a required property".to_string(),
            },
            Violation {
                field: "details".to_string(),
                rule: "type".to_string(),
                message: "1 is not of type \"object\"".to_string(),
            },
        ]);
        assert_eq!(
            violations.to_string(),
            "[name: \"name\" is a required property, details: 1 is not of type \"object\"]"
        );
    }
}
