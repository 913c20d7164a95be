//! HTTP/JSON catalog connector client.
//!
//! Connectors expose `POST /getAssetInfo` and `POST /createAsset`. The
//! credential locator travels untouched in an operation-specific header; the
//! connector decides what it means.

use super::{ConnectorError, DataCatalog};
use crate::model::{CreateAssetRequest, CreateAssetResponse, GetAssetRequest, GetAssetResponse};
use log::debug;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Header carrying the credential locator for read requests.
pub const GET_ASSET_CRED_HEADER: &str = "X-Request-Datacatalog-Cred";
/// Header carrying the credential locator for write requests.
pub const CREATE_ASSET_CRED_HEADER: &str = "X-Request-Datacatalog-Write-Cred";

const GET_ASSET_PATH: &str = "getAssetInfo";
const CREATE_ASSET_PATH: &str = "createAsset";
const LOG_TARGET: &str = "DataCatalogConnectorClient::http";

pub struct HttpDataCatalog {
    base_url: String,
    client: Option<Client>,
}

impl HttpDataCatalog {
    /// Build a client for the connector at `url` (http or https).
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ConnectorError> {
        let parsed = Url::parse(url).map_err(|err| ConnectorError::InvalidEndpoint {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConnectorError::InvalidEndpoint {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConnectorError::Setup)?;
        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client: Some(client),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }

    fn post_json<Req, Resp>(
        &self,
        path: &str,
        cred_header: &str,
        credential_locator: &str,
        request: &Req,
    ) -> Result<Resp, ConnectorError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let client = self.client.as_ref().ok_or(ConnectorError::Closed)?;
        let endpoint = format!("{}/{path}", self.base_url);
        debug!(target: LOG_TARGET, "POST {endpoint}");

        let response = client
            .post(&endpoint)
            .header(cred_header, credential_locator)
            .json(request)
            .send()
            .map_err(|source| ConnectorError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| ConnectorError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;
        if !status.is_success() {
            return Err(ConnectorError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ConnectorError::Decode { endpoint, source })
    }
}

impl DataCatalog for HttpDataCatalog {
    fn get_asset_info(
        &self,
        request: &GetAssetRequest,
        credential_locator: &str,
    ) -> Result<GetAssetResponse, ConnectorError> {
        self.post_json(
            GET_ASSET_PATH,
            GET_ASSET_CRED_HEADER,
            credential_locator,
            request,
        )
    }

    fn create_asset(
        &self,
        request: &CreateAssetRequest,
        credential_locator: &str,
    ) -> Result<CreateAssetResponse, ConnectorError> {
        self.post_json(
            CREATE_ASSET_PATH,
            CREATE_ASSET_CRED_HEADER,
            credential_locator,
            request,
        )
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            debug!(target: LOG_TARGET, "closed connection to {}", self.base_url);
        }
    }
}
