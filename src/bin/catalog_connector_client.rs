//! Data catalog connector conformance client.
//!
//! Reads a canned request, sends it to the catalog connector at `--url`, and
//! validates the connector's response against the data catalog taxonomy. The
//! process exits 0 after logging `RESPONSE VALIDATION PASS` and 1 on any
//! failure, with the full error chain in the log.
//!
//! Usage:
//!   catalog-connector-client --operation-type get-asset \
//!     --request-payload resources/read-request.json \
//!     --creds /v1/kubernetes-secrets/my-secret?namespace=default \
//!     --url http://localhost:8080

use anyhow::{Context, Result};
use catalog_connector_client::config::ConfigOverrides;
use catalog_connector_client::{
    COMPONENT, Dispatcher, FsSchemaStore, HttpDataCatalog, LogContext, init_logging,
    read_request_payload,
};
use clap::Parser;
use log::{LevelFilter, debug, error};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog-connector-client", version)]
#[command(about = "Data catalog connector client")]
struct Cli {
    /// Json file containing the payload of the request [default: resources/read-request.json]
    #[arg(long = "request-payload")]
    request_payload: Option<PathBuf>,
    /// Request operation. valid options are get-asset or create-asset [default: get-asset]
    #[arg(long = "operation-type")]
    operation_type: Option<String>,
    /// Credential path [default: /v1/kubernetes-secrets/my-secret?namespace=default]
    #[arg(long)]
    creds: Option<String>,
    /// Catalog connector Url [default: http://localhost:8080]
    #[arg(long)]
    url: Option<String>,
    /// Directory that taxonomy references are resolved against.
    #[arg(long = "taxonomy-root")]
    taxonomy_root: Option<PathBuf>,
    /// Timeout for the connector call, in seconds [default: 30]
    #[arg(long = "timeout-secs")]
    timeout_secs: Option<u64>,
    /// Log level (error, warn, info, debug, trace); overrides RUST_LOG.
    #[arg(long = "log-level", value_parser = parse_level)]
    log_level: Option<LevelFilter>,
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse()
        .map_err(|_| format!("unknown log level '{raw}' (expected error|warn|info|debug|trace|off)"))
}

impl Cli {
    fn overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            request_payload: self.request_payload,
            operation: self.operation_type,
            credential_locator: self.creds,
            connector_url: self.url,
            taxonomy_root: self.taxonomy_root,
            timeout_secs: self.timeout_secs,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.log_level) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }

    let log = LogContext::new(COMPONENT);
    if let Err(err) = run(cli, &log) {
        error!(target: log.target(), "request failed: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, log: &LogContext) -> Result<()> {
    let config = cli.overrides().resolve()?;
    debug!(target: log.target(), "resolved configuration: {config:?}");

    let raw_request = read_request_payload(&config.request_payload, log)?;
    let catalog = HttpDataCatalog::new(&config.connector_url, config.timeout)
        .context("unable to create data catalog facade")?;
    let store = FsSchemaStore::new(&config.taxonomy_root);

    Dispatcher::new(&store, log).run(
        &config.operation,
        &raw_request,
        &config.credential_locator,
        catalog,
    )?;
    Ok(())
}
