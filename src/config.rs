//! Client configuration and request payload loading.
//!
//! Defaults match the published client: read the sample read request, ask
//! the connector on localhost for `get-asset`, and pass a Kubernetes secret
//! path as the credential locator.

use crate::logging::LogContext;
use anyhow::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_REQUEST_PAYLOAD: &str = "resources/read-request.json";
pub const DEFAULT_OPERATION: &str = "get-asset";
pub const DEFAULT_CREDENTIAL_LOCATOR: &str = "/v1/kubernetes-secrets/my-secret?namespace=default";
pub const DEFAULT_CONNECTOR_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Flags that must be given together: passing any of them requires all.
pub const REQUIRED_TOGETHER: [&str; 4] = ["request-payload", "operation-type", "creds", "url"];

/// Fully resolved settings for one client invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub operation: String,
    pub request_payload: PathBuf,
    pub credential_locator: String,
    pub connector_url: String,
    pub taxonomy_root: PathBuf,
    pub timeout: Duration,
}

/// Raw, possibly partial, invocation settings as given on the command line.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub request_payload: Option<PathBuf>,
    pub operation: Option<String>,
    pub credential_locator: Option<String>,
    pub connector_url: Option<String>,
    pub taxonomy_root: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Enforce the required-together group, then fill in defaults.
    pub fn resolve(self) -> Result<ClientConfig> {
        let given = [
            self.request_payload.is_some(),
            self.operation.is_some(),
            self.credential_locator.is_some(),
            self.connector_url.is_some(),
        ];
        if given.iter().any(|set| *set) && !given.iter().all(|set| *set) {
            let missing = REQUIRED_TOGETHER
                .iter()
                .zip(given)
                .filter(|(_, set)| !set)
                .map(|(flag, _)| format!("--{flag}"))
                .collect::<Vec<_>>()
                .join(" ");
            bail!(
                "if any flags in the group [--{}] are set they must all be set; missing [{missing}]",
                REQUIRED_TOGETHER.join(" --")
            );
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("--timeout-secs must be greater than zero");
        }

        let taxonomy_root = crate::find_taxonomy_root(self.taxonomy_root.as_deref())?;

        Ok(ClientConfig {
            operation: self
                .operation
                .unwrap_or_else(|| DEFAULT_OPERATION.to_string()),
            request_payload: self
                .request_payload
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REQUEST_PAYLOAD)),
            credential_locator: self
                .credential_locator
                .unwrap_or_else(|| DEFAULT_CREDENTIAL_LOCATOR.to_string()),
            connector_url: self
                .connector_url
                .unwrap_or_else(|| DEFAULT_CONNECTOR_URL.to_string()),
            taxonomy_root,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Read the request document the client will send.
pub fn read_request_payload(path: &Path, log: &LogContext) -> Result<Vec<u8>> {
    if !path.is_file() {
        bail!("error opening {}: not a file", path.display());
    }
    let bytes = fs::read(path).with_context(|| format!("error opening {}", path.display()))?;
    info!(target: log.target(), "Successfully Opened {}", path.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_overrides_use_defaults() {
        let config = ConfigOverrides {
            taxonomy_root: Some(PathBuf::from("/srv/taxonomy")),
            ..Default::default()
        }
        .resolve()
        .expect("defaults resolve");
        assert_eq!(config.operation, DEFAULT_OPERATION);
        assert_eq!(config.request_payload, PathBuf::from(DEFAULT_REQUEST_PAYLOAD));
        assert_eq!(config.credential_locator, DEFAULT_CREDENTIAL_LOCATOR);
        assert_eq!(config.connector_url, DEFAULT_CONNECTOR_URL);
        assert_eq!(config.taxonomy_root, PathBuf::from("/srv/taxonomy"));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn partial_group_is_rejected() {
        let err = ConfigOverrides {
            operation: Some("create-asset".to_string()),
            connector_url: Some("http://catalog:8080".to_string()),
            taxonomy_root: Some(PathBuf::from("/srv/taxonomy")),
            ..Default::default()
        }
        .resolve()
        .expect_err("partial group rejected");
        let message = err.to_string();
        assert!(message.contains("--request-payload"), "{message}");
        assert!(message.contains("--creds"), "{message}");
        assert!(!message.contains("missing [--operation-type"), "{message}");
    }

    #[test]
    fn full_group_is_accepted() {
        let config = ConfigOverrides {
            request_payload: Some(PathBuf::from("write.json")),
            operation: Some("create-asset".to_string()),
            credential_locator: Some("vault://secret".to_string()),
            connector_url: Some("http://catalog:8080".to_string()),
            taxonomy_root: Some(PathBuf::from("/srv/taxonomy")),
            timeout_secs: Some(5),
        }
        .resolve()
        .expect("full group resolves");
        assert_eq!(config.operation, "create-asset");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = ConfigOverrides {
            taxonomy_root: Some(PathBuf::from("/srv/taxonomy")),
            timeout_secs: Some(0),
            ..Default::default()
        }
        .resolve();
        assert!(result.is_err());
    }

    #[test]
    fn payload_is_read_verbatim() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(br#"{"asset_id":"abc"}"#).expect("write");
        let bytes = read_request_payload(file.path(), &LogContext::default()).expect("read");
        assert_eq!(bytes, br#"{"asset_id":"abc"}"#.to_vec());
    }

    #[test]
    fn missing_payload_names_the_file() {
        let err = read_request_payload(Path::new("/nonexistent/req.json"), &LogContext::default())
            .expect_err("missing file");
        assert!(err.to_string().contains("/nonexistent/req.json"));
    }
}
