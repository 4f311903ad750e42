use std::path::PathBuf;

use crate::error::ConfigError;
use crate::inventory::DEFAULT_VERSION_CAP;

pub const DEFAULT_CSV_FILE: &str = "transceivers.csv";
pub const DEFAULT_PORT: u16 = 443;

/// Settings for one inventory run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: String,
    pub port: u16,
    pub token_file: PathBuf,
    pub ca_file: Option<PathBuf>,
    pub csv_file: PathBuf,
    pub version_cap: u32,
    /// Number of `-v` flags given.
    pub verbosity: u8,
}

impl Config {
    /// Config with defaults for everything but the server and token.
    pub fn new(server: impl Into<String>, token_file: impl Into<PathBuf>) -> Self {
        Self {
            server: server.into(),
            port: DEFAULT_PORT,
            token_file: token_file.into(),
            ca_file: None,
            csv_file: PathBuf::from(DEFAULT_CSV_FILE),
            version_cap: DEFAULT_VERSION_CAP,
            verbosity: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.trim().is_empty() {
            return Err(ConfigError::EmptyServer);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }
        if self.version_cap == 0 {
            return Err(ConfigError::InvalidVersions);
        }
        if self.csv_file.as_os_str().is_empty() {
            return Err(ConfigError::EmptyCsvPath);
        }
        Ok(())
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn tracing_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
