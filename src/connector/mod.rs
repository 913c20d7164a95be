//! Catalog connector client seam.
//!
//! The dispatcher only talks to [`DataCatalog`]; transport, authentication and
//! wire protocol belong to the implementation. [`CatalogSession`] scopes one
//! client to one invocation and closes it exactly once, whichever way the
//! invocation ends.

mod http;

pub use http::{CREATE_ASSET_CRED_HEADER, GET_ASSET_CRED_HEADER, HttpDataCatalog};

use crate::model::{CreateAssetRequest, CreateAssetResponse, GetAssetRequest, GetAssetResponse};
use std::ops::Deref;
use thiserror::Error;

/// Operations a catalog connector must provide.
pub trait DataCatalog {
    fn get_asset_info(
        &self,
        request: &GetAssetRequest,
        credential_locator: &str,
    ) -> Result<GetAssetResponse, ConnectorError>;

    fn create_asset(
        &self,
        request: &CreateAssetRequest,
        credential_locator: &str,
    ) -> Result<CreateAssetResponse, ConnectorError>;

    /// Release the connection. Called once per invocation.
    fn close(&mut self);
}

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("invalid catalog connector url '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("building the HTTP client")]
    Setup(#[source] reqwest::Error),
    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("unable to decode the response from {endpoint}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog connector client is closed")]
    Closed,
    /// Failure reported by a non-HTTP connector implementation.
    #[error("{0}")]
    Backend(String),
}

/// Owns a catalog client for the duration of one invocation.
pub struct CatalogSession<C: DataCatalog> {
    catalog: C,
}

impl<C: DataCatalog> CatalogSession<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }
}

impl<C: DataCatalog> Deref for CatalogSession<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.catalog
    }
}

impl<C: DataCatalog> Drop for CatalogSession<C> {
    fn drop(&mut self) {
        self.catalog.close();
    }
}
