//! HTTPS/JSON client for the telemetry store.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Certificate, Url};
use tracing::debug;

use super::wire::parse_notifications;
use super::{DatasetStore, Notification, PathQuery, Query, QueryRange};
use crate::error::StoreError;

/// REST prefix under which datasets are exposed.
const REST_PREFIX: [&str; 3] = ["api", "v1", "rest"];

/// Request timeout; history reads of large fleets can be slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Dataset store reached over HTTPS with a bearer token.
pub struct RestStore {
    client: Client,
    base_url: Url,
    token: String,
    endpoint: String,
}

impl RestStore {
    /// Connect to `server:port`, reading the bearer token and optional CA
    /// certificate from disk.
    pub fn connect(
        server: &str,
        port: u16,
        token_file: &Path,
        ca_file: Option<&Path>,
    ) -> Result<Self, StoreError> {
        let token = read_token(token_file)?;

        let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(path) = ca_file {
            let pem = fs::read(path).map_err(|source| StoreError::CaFile {
                path: path.to_path_buf(),
                source,
            })?;
            let cert = Certificate::from_pem(&pem).map_err(|source| {
                StoreError::InvalidCertificate {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder.build().map_err(StoreError::Client)?;

        let endpoint = format!("{}:{}", server, port);
        let base_url = Url::parse(&format!("https://{}/", endpoint))
            .map_err(|e| StoreError::InvalidUrl(format!("{}: {}", endpoint, e)))?;

        Ok(Self {
            client,
            base_url,
            token,
            endpoint,
        })
    }

    /// Build the URL for one path of a query.
    fn path_url(&self, dataset: &str, path: &PathQuery, range: &QueryRange) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(REST_PREFIX)
            .push(dataset)
            .extend(&path.path_elements);

        {
            let mut pairs = url.query_pairs_mut();
            // The REST endpoint takes nanoseconds.
            if let Some(start) = range.start {
                pairs.append_pair("start", &(start * 1_000_000).to_string());
            }
            if let Some(end) = range.end {
                pairs.append_pair("end", &(end * 1_000_000).to_string());
            }
            if let Some(versions) = range.versions {
                pairs.append_pair("versions", &versions.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(url)
    }

    fn fetch(&self, url: Url, path: &PathQuery) -> Result<Vec<Notification>, StoreError> {
        let url_str = url.to_string();
        debug!("GET {}", url_str);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|source| StoreError::Request {
                url: url_str.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(StoreError::Status {
                url: url_str,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().map_err(|source| StoreError::Request {
            url: url_str.clone(),
            source,
        })?;

        parse_notifications(&body, path).map_err(|source| StoreError::Payload {
            url: url_str,
            source,
        })
    }
}

impl DatasetStore for RestStore {
    fn get(&self, query: &Query, range: &QueryRange) -> Result<Vec<Notification>, StoreError> {
        let mut notifications = Vec::new();
        for path in &query.paths {
            let url = self.path_url(&query.dataset, path, range)?;
            notifications.extend(self.fetch(url, path)?);
        }
        Ok(notifications)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Read a bearer token, ignoring surrounding whitespace.
fn read_token(path: &Path) -> Result<String, StoreError> {
    let token = fs::read_to_string(path).map_err(|source| StoreError::TokenFile {
        path: path.to_path_buf(),
        source,
    })?;

    let token = token.trim();
    if token.is_empty() {
        return Err(StoreError::EmptyToken(path.to_path_buf()));
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn token_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    fn store() -> (RestStore, NamedTempFile) {
        let token = token_file("secret-token\n");
        let store = RestStore::connect("cvp.example.com", 443, token.path(), None).unwrap();
        (store, token)
    }

    #[test]
    fn token_is_trimmed() {
        let file = token_file("  abc.def.ghi \n");
        assert_eq!(read_token(file.path()).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn empty_token_is_rejected() {
        let file = token_file("\n");
        assert!(matches!(read_token(file.path()), Err(StoreError::EmptyToken(_))));
    }

    #[test]
    fn missing_token_file_fails_on_connect() {
        let result = RestStore::connect("cvp", 443, Path::new("/nonexistent/token"), None);
        assert!(matches!(result, Err(StoreError::TokenFile { .. })));
    }

    #[test]
    fn missing_ca_file_fails_on_connect() {
        let token = token_file("t");
        let result = RestStore::connect("cvp", 443, token.path(), Some(Path::new("/nonexistent/ca.pem")));
        assert!(matches!(result, Err(StoreError::CaFile { .. })));
    }

    #[test]
    fn endpoint_includes_port() {
        let (store, _token) = store();
        assert_eq!(store.endpoint(), "cvp.example.com:443");
    }

    #[test]
    fn point_url_has_no_query() {
        let (store, _token) = store();
        let url = store
            .path_url("analytics", &PathQuery::new(["DatasetInfo", "Devices"]), &QueryRange::latest())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://cvp.example.com/api/v1/rest/analytics/DatasetInfo/Devices"
        );
    }

    #[test]
    fn range_url_encodes_slashes_in_elements() {
        let (store, _token) = store();
        let url = store
            .path_url(
                "JPE123",
                &PathQuery::new(["Sysdb", "all", "Ethernet1/1"]),
                &QueryRange::versions(100),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://cvp.example.com/api/v1/rest/JPE123/Sysdb/all/Ethernet1%2F1?versions=100"
        );
    }

    #[test]
    fn range_bounds_are_sent_in_nanoseconds() {
        let (store, _token) = store();
        let range = QueryRange {
            start: Some(1),
            end: Some(2),
            versions: None,
        };
        let url = store.path_url("d", &PathQuery::new(["p"]), &range).unwrap();
        assert_eq!(url.query(), Some("start=1000000&end=2000000"));
    }
}
