//! Operation table and the decode, invoke, validate pipeline.
//!
//! Operation names map onto a closed [`Operation`] enum; each operation has
//! one [`OperationSpec`] in a static table naming its request and response
//! types and response taxonomy. [`Dispatcher::run`] selects the operation,
//! decodes the request, calls the connector, and validates the response,
//! wrapping each failure with the phase that produced it.

use crate::connector::{CatalogSession, ConnectorError, DataCatalog};
use crate::logging::LogContext;
use crate::model::{CreateAssetRequest, GetAssetRequest};
use crate::taxonomy::{
    CREATE_ASSET_RESPONSE_TAXONOMY, GET_ASSET_RESPONSE_TAXONOMY, SchemaStore, TaxonomyRef,
};
use crate::validate::{ValidationError, Violations, validate_response};
use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    GetAsset,
    CreateAsset,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::GetAsset, Operation::CreateAsset];

    pub fn as_str(&self) -> &'static str {
        self.spec().name
    }

    pub fn spec(&self) -> &'static OperationSpec {
        match self {
            Operation::GetAsset => &GET_ASSET_SPEC,
            Operation::CreateAsset => &CREATE_ASSET_SPEC,
        }
    }

    pub fn response_taxonomy(&self) -> &'static TaxonomyRef {
        &self.spec().response_taxonomy
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Operation {
    type Error = DispatchError;

    fn try_from(value: &str) -> Result<Self, DispatchError> {
        select(value).map(|spec| spec.operation)
    }
}

/// Static description of one supported operation.
#[derive(Debug)]
pub struct OperationSpec {
    pub operation: Operation,
    pub name: &'static str,
    pub request_type: &'static str,
    pub response_type: &'static str,
    pub response_taxonomy: TaxonomyRef,
}

static GET_ASSET_SPEC: OperationSpec = OperationSpec {
    operation: Operation::GetAsset,
    name: "get-asset",
    request_type: "GetAssetRequest",
    response_type: "GetAssetResponse",
    response_taxonomy: GET_ASSET_RESPONSE_TAXONOMY,
};

static CREATE_ASSET_SPEC: OperationSpec = OperationSpec {
    operation: Operation::CreateAsset,
    name: "create-asset",
    request_type: "CreateAssetRequest",
    response_type: "CreateAssetResponse",
    response_taxonomy: CREATE_ASSET_RESPONSE_TAXONOMY,
};

/// Look up an operation by its command-line name.
pub fn select(name: &str) -> Result<&'static OperationSpec, DispatchError> {
    Operation::ALL
        .iter()
        .map(Operation::spec)
        .find(|spec| spec.name == name)
        .ok_or_else(|| DispatchError::UnsupportedOperation(name.to_string()))
}

/// Supported operation names joined for error messages, e.g. `a or b`.
fn expected_operation_names() -> String {
    Operation::ALL
        .iter()
        .map(Operation::as_str)
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Failure category of a [`DispatchError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedOperation,
    RequestDecode,
    ConnectorInvocation,
    ResponseSerialization,
    SchemaResolution,
    ResponseConformance,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unsupported operation '{0}' (expected {expected})", expected = expected_operation_names())]
    UnsupportedOperation(String),
    #[error("dataCatalog {operation} request unmarshal failed")]
    RequestDecode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to receive the catalog connector response")]
    ConnectorInvocation {
        operation: Operation,
        #[source]
        source: ConnectorError,
    },
    #[error("failed to validate the catalog connector response")]
    Validation {
        operation: Operation,
        #[source]
        source: ValidationError,
    },
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            DispatchError::RequestDecode { .. } => ErrorKind::RequestDecode,
            DispatchError::ConnectorInvocation { .. } => ErrorKind::ConnectorInvocation,
            DispatchError::Validation { source, .. } => match source {
                ValidationError::Serialize(_) => ErrorKind::ResponseSerialization,
                ValidationError::SchemaResolution { .. } => ErrorKind::SchemaResolution,
                ValidationError::Conformance { .. } => ErrorKind::ResponseConformance,
            },
        }
    }

    /// Operation that was active when the error happened, if one was selected.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            DispatchError::UnsupportedOperation(_) => None,
            DispatchError::RequestDecode { operation, .. }
            | DispatchError::ConnectorInvocation { operation, .. }
            | DispatchError::Validation { operation, .. } => Some(*operation),
        }
    }

    pub fn violations(&self) -> Option<&Violations> {
        match self {
            DispatchError::Validation { source, .. } => source.violations(),
            _ => None,
        }
    }
}

/// Runs one conformance exchange against a catalog connector.
pub struct Dispatcher<'a, S: SchemaStore + ?Sized> {
    store: &'a S,
    log: &'a LogContext,
}

impl<'a, S: SchemaStore + ?Sized> Dispatcher<'a, S> {
    pub fn new(store: &'a S, log: &'a LogContext) -> Self {
        Self { store, log }
    }

    /// Select, decode, invoke, validate, report.
    ///
    /// The catalog is owned for the duration of the call and closed exactly
    /// once on every exit path, including an unsupported operation name.
    pub fn run<C: DataCatalog>(
        &self,
        operation_name: &str,
        raw_request: &[u8],
        credential_locator: &str,
        catalog: C,
    ) -> Result<(), DispatchError> {
        let session = CatalogSession::new(catalog);
        let spec = select(operation_name)?;
        let log = self.log.scoped(spec.name);
        info!(
            target: log.target(),
            "sending {} to the catalog connector",
            spec.request_type
        );

        match spec.operation {
            Operation::GetAsset => {
                self.exchange(spec, raw_request, &log, |request: &GetAssetRequest| {
                    session.get_asset_info(request, credential_locator)
                })
            }
            Operation::CreateAsset => {
                self.exchange(spec, raw_request, &log, |request: &CreateAssetRequest| {
                    session.create_asset(request, credential_locator)
                })
            }
        }?;

        info!(target: log.target(), "RESPONSE VALIDATION PASS");
        Ok(())
    }

    fn exchange<Req, Resp, F>(
        &self,
        spec: &OperationSpec,
        raw_request: &[u8],
        log: &LogContext,
        invoke: F,
    ) -> Result<(), DispatchError>
    where
        Req: DeserializeOwned,
        Resp: Serialize,
        F: FnOnce(&Req) -> Result<Resp, ConnectorError>,
    {
        let request: Req =
            serde_json::from_slice(raw_request).map_err(|source| DispatchError::RequestDecode {
                operation: spec.operation,
                source,
            })?;

        let response = invoke(&request).map_err(|source| DispatchError::ConnectorInvocation {
            operation: spec.operation,
            source,
        })?;
        info!(
            target: log.target(),
            "received {} from the catalog connector",
            spec.response_type
        );

        validate_response(&response, &spec.response_taxonomy, self.store, log).map_err(
            |source| DispatchError::Validation {
                operation: spec.operation,
                source,
            },
        )
    }
}
