//! Error types for each stage of an inventory run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while validating the run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("server name must not be empty")]
    EmptyServer,

    #[error("port must be between 1 and 65535, got {0}")]
    InvalidPort(u16),

    #[error("version cap must be greater than zero")]
    InvalidVersions,

    #[error("output CSV path must not be empty")]
    EmptyCsvPath,
}

/// Errors raised by a dataset store. All of them are fatal for a run.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read token file {path:?}: {source}")]
    TokenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("token file {0:?} is empty")]
    EmptyToken(PathBuf),

    #[error("failed to read CA file {path:?}: {source}")]
    CaFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid CA certificate in {path:?}: {source}")]
    InvalidCertificate {
        path: PathBuf,
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid store URL: {0}")]
    InvalidUrl(String),

    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {source}")]
    Payload {
        url: String,
        source: serde_json::Error,
    },

    #[error("invalid notification timestamp: {0}")]
    Timestamp(String),
}

/// Errors raised while decoding one device's transceiver history.
///
/// Any of these marks the whole device as failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{interface} @ {timestamp}: eeprom contents are not a map")]
    MalformedEeprom { interface: String, timestamp: i64 },

    #[error("{interface} @ {timestamp}: missing field '{field}'")]
    MissingField {
        interface: String,
        timestamp: i64,
        field: &'static str,
    },

    #[error("{interface} @ {timestamp}: field '{field}' is not a string")]
    InvalidField {
        interface: String,
        timestamp: i64,
        field: &'static str,
    },
}

/// Errors raised while writing or reading the CSV report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read report {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid report line {line}: expected 5 fields, got {fields}")]
    InvalidLine { line: usize, fields: usize },

    #[error("invalid report header: {0}")]
    InvalidHeader(String),
}
