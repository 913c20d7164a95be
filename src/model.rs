//! Serializable types for the data catalog connector API.
//!
//! The structures mirror the definitions in
//! `resources/taxonomy/datacatalog.json`. Request types are strict: the client
//! builds them from canned payloads, so a payload that does not decode is a
//! harness problem. Response types wrap the connector's JSON as received, so a
//! non-conformant connector response always decodes and the taxonomy check
//! (not serde) reports what is wrong with it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Intended use of the asset the connector is asked about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    #[default]
    Read,
    Write,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Read => "read",
            OperationType::Write => "write",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Request for the metadata of a single asset.
pub struct GetAssetRequest {
    pub asset_id: String,
    #[serde(default)]
    pub operation_type: OperationType,
}

/// Connector answer to [`GetAssetRequest`].
///
/// Held as the raw JSON the connector sent. Typed views decode on demand, so
/// a reply that breaks the taxonomy at any depth still reaches validation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetAssetResponse(Value);

impl GetAssetResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn credentials(&self) -> Option<&str> {
        self.0.get("credentials").and_then(Value::as_str)
    }

    pub fn resource_metadata(&self) -> Result<Option<ResourceMetadata>, serde_json::Error> {
        typed_field(&self.0, "resource_metadata")
    }

    pub fn details(&self) -> Result<Option<ResourceDetails>, serde_json::Error> {
        typed_field(&self.0, "details")
    }
}

impl From<Value> for GetAssetResponse {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Request to register a new asset in the destination catalog.
///
/// `destination_asset_id` is a hint; connectors may pick their own id and
/// return it in [`CreateAssetResponse::asset_id`].
pub struct CreateAssetRequest {
    pub destination_catalog_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_asset_id: Option<String>,
    pub details: ResourceDetails,
    pub resource_metadata: ResourceMetadata,
    pub credentials: String,
}

/// Connector answer to [`CreateAssetRequest`], kept as raw JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreateAssetResponse(Value);

impl CreateAssetResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Id the connector assigned to the new asset.
    pub fn asset_id(&self) -> Option<&str> {
        self.0.get("asset_id").and_then(Value::as_str)
    }
}

impl From<Value> for CreateAssetResponse {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Descriptive metadata attached to an asset.
pub struct ResourceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ResourceColumn>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Column-level metadata.
pub struct ResourceColumn {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Where the asset lives and how it is encoded.
pub struct ResourceDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_format: Option<String>,
    pub connection: Connection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Named connection; the remaining keys are connection-type specific
/// (for example an `s3` object with `endpoint`, `bucket` and `object_key`).
pub struct Connection {
    pub name: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Decode `key` of a JSON object into `T`; absent or null keys are `None`.
fn typed_field<T: DeserializeOwned>(
    value: &Value,
    key: &str,
) -> Result<Option<T>, serde_json::Error> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(field) => T::deserialize(field).map(Some),
    }
}
