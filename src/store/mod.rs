//! Telemetry dataset store abstraction.
//!
//! This module defines the `DatasetStore` trait and provides an HTTPS
//! client and an in-memory implementation. The rest of the crate only
//! depends on the trait, so runs can be tested without a live store.

mod memory_store;
mod rest_store;
mod wire;

pub use memory_store::MemoryStore;
pub use rest_store::RestStore;

use serde_json::{Map, Value};

use crate::error::StoreError;

/// One path to read, optionally limited to a set of keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    pub path_elements: Vec<String>,
    /// Keys to return; empty means all keys.
    pub keys: Vec<String>,
}

impl PathQuery {
    pub fn new<I, S>(path_elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path_elements: path_elements.into_iter().map(Into::into).collect(),
            keys: Vec::new(),
        }
    }

    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Whether an update key passes this query's key filter.
    pub fn accepts(&self, key: &str) -> bool {
        self.keys.is_empty() || self.keys.iter().any(|k| k == key)
    }
}

/// A query against a single dataset covering one or more paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub dataset: String,
    pub paths: Vec<PathQuery>,
}

impl Query {
    pub fn new(dataset: impl Into<String>, paths: Vec<PathQuery>) -> Self {
        Self {
            dataset: dataset.into(),
            paths,
        }
    }
}

/// Time bounds for a query. All fields empty means a point read of the
/// latest state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryRange {
    /// Inclusive lower bound in milliseconds since epoch.
    pub start: Option<i64>,
    /// Inclusive upper bound in milliseconds since epoch.
    pub end: Option<i64>,
    /// Maximum number of historical versions per path.
    pub versions: Option<u32>,
}

impl QueryRange {
    /// Latest state only.
    pub fn latest() -> Self {
        Self::default()
    }

    /// Up to `versions` historical states.
    pub fn versions(versions: u32) -> Self {
        Self {
            versions: Some(versions),
            ..Self::default()
        }
    }

    /// Whether multiple versions per path are expected back.
    pub fn is_range(&self) -> bool {
        self.start.is_some() || self.end.is_some() || self.versions.is_some()
    }
}

/// A batch of updates for one path at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub path_elements: Vec<String>,
    /// Milliseconds since epoch.
    pub timestamp: i64,
    pub updates: Map<String, Value>,
}

/// Trait for telemetry dataset stores.
///
/// Implementations answer point and range reads and return the
/// notifications in the order the store produced them.
pub trait DatasetStore {
    /// Run a query and return every notification it produced.
    fn get(&self, query: &Query, range: &QueryRange) -> Result<Vec<Notification>, StoreError>;

    /// Human-readable name of the store endpoint, for logging.
    fn endpoint(&self) -> &str;
}
