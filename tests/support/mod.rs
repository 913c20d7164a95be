#![allow(dead_code)]

use anyhow::{Context, Result};
use catalog_connector_client::{
    ConnectorError, CreateAssetRequest, CreateAssetResponse, DataCatalog, GetAssetRequest,
    GetAssetResponse, find_taxonomy_root,
};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::rc::Rc;

pub fn taxonomy_root() -> PathBuf {
    find_taxonomy_root(None).expect("tests require the shipped taxonomy")
}

pub fn client_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_catalog-connector-client"))
}

pub fn validate_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_taxonomy-validate"))
}

/// Run a command and capture its output without judging the exit status.
pub fn run_command(mut cmd: Command) -> Result<Output> {
    cmd.output()
        .with_context(|| format!("failed to run command: {:?}", cmd))
}

pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn resource(repo_root: &Path, name: &str) -> PathBuf {
    repo_root.join("resources").join(name)
}

/// A `GetAssetResponse` body that satisfies the shipped taxonomy.
pub fn conformant_get_asset_response() -> Value {
    json!({
        "name": "paysim-csv",
        "resource_metadata": {
            "name": "paysim-csv",
            "geography": "theshire",
            "tags": {"finance": true},
            "columns": [{"name": "nameOrig", "tags": {"PII": true}}]
        },
        "details": {
            "data_format": "csv",
            "connection": {
                "name": "s3",
                "s3": {"endpoint": "http://s3.local", "bucket": "demo", "object_key": "paysim.csv"}
            }
        },
        "credentials": "/v1/kubernetes-secrets/my-secret?namespace=default"
    })
}

/// What the recording catalog saw during one invocation.
#[derive(Debug, Default)]
pub struct CatalogCalls {
    pub get_asset: Vec<(GetAssetRequest, String)>,
    pub create_asset: Vec<(CreateAssetRequest, String)>,
    pub closes: usize,
}

impl CatalogCalls {
    pub fn invocations(&self) -> usize {
        self.get_asset.len() + self.create_asset.len()
    }
}

/// In-process catalog connector returning canned responses.
pub struct RecordingCatalog {
    calls: Rc<RefCell<CatalogCalls>>,
    get_asset: Result<GetAssetResponse, String>,
    create_asset: Result<CreateAssetResponse, String>,
}

impl RecordingCatalog {
    pub fn new() -> (Self, Rc<RefCell<CatalogCalls>>) {
        let calls = Rc::new(RefCell::new(CatalogCalls::default()));
        let catalog = Self {
            calls: Rc::clone(&calls),
            get_asset: Err("no get-asset response configured".to_string()),
            create_asset: Err("no create-asset response configured".to_string()),
        };
        (catalog, calls)
    }

    pub fn with_get_asset(mut self, response: Value) -> Self {
        self.get_asset = Ok(GetAssetResponse::new(response));
        self
    }

    pub fn with_create_asset(mut self, response: Value) -> Self {
        self.create_asset = Ok(CreateAssetResponse::new(response));
        self
    }

    pub fn failing(mut self, reason: &str) -> Self {
        self.get_asset = Err(reason.to_string());
        self.create_asset = Err(reason.to_string());
        self
    }
}

impl DataCatalog for RecordingCatalog {
    fn get_asset_info(
        &self,
        request: &GetAssetRequest,
        credential_locator: &str,
    ) -> Result<GetAssetResponse, ConnectorError> {
        self.calls
            .borrow_mut()
            .get_asset
            .push((request.clone(), credential_locator.to_string()));
        self.get_asset.clone().map_err(ConnectorError::Backend)
    }

    fn create_asset(
        &self,
        request: &CreateAssetRequest,
        credential_locator: &str,
    ) -> Result<CreateAssetResponse, ConnectorError> {
        self.calls
            .borrow_mut()
            .create_asset
            .push((request.clone(), credential_locator.to_string()));
        self.create_asset.clone().map_err(ConnectorError::Backend)
    }

    fn close(&mut self) {
        self.calls.borrow_mut().closes += 1;
    }
}
