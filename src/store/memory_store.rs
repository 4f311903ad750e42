//! In-memory dataset store.
//!
//! Holds notifications per dataset and answers queries the way the
//! remote store does. Used for tests and offline replays.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{DatasetStore, Notification, Query, QueryRange};
use crate::error::StoreError;

/// Dataset store backed by a map of recorded notifications.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    datasets: BTreeMap<String, Vec<Notification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notification for `dataset`.
    pub fn insert<I, S>(&mut self, dataset: &str, path_elements: I, timestamp: i64, updates: Map<String, Value>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datasets
            .entry(dataset.to_string())
            .or_default()
            .push(Notification {
                path_elements: path_elements.into_iter().map(Into::into).collect(),
                timestamp,
                updates,
            });
    }

    /// Builder-style `insert`.
    pub fn with<I, S>(mut self, dataset: &str, path_elements: I, timestamp: i64, updates: Map<String, Value>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(dataset, path_elements, timestamp, updates);
        self
    }
}

impl DatasetStore for MemoryStore {
    fn get(&self, query: &Query, range: &QueryRange) -> Result<Vec<Notification>, StoreError> {
        let Some(recorded) = self.datasets.get(&query.dataset) else {
            return Ok(Vec::new());
        };

        let mut result = Vec::new();
        for path in &query.paths {
            let mut matching: Vec<Notification> = recorded
                .iter()
                .filter(|n| n.path_elements == path.path_elements)
                .filter(|n| range.start.map_or(true, |s| n.timestamp >= s))
                .filter(|n| range.end.map_or(true, |e| n.timestamp <= e))
                .map(|n| Notification {
                    path_elements: n.path_elements.clone(),
                    timestamp: n.timestamp,
                    updates: n
                        .updates
                        .iter()
                        .filter(|(key, _)| path.accepts(key))
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                })
                // A key filter that matches nothing means the path did not
                // change at that timestamp.
                .filter(|n| path.keys.is_empty() || !n.updates.is_empty())
                .collect();
            matching.sort_by_key(|n| n.timestamp);

            // Point reads see the latest state; range reads keep the newest
            // `versions` entries.
            let keep = if range.is_range() {
                range.versions.map_or(matching.len(), |v| v as usize)
            } else {
                matching.len()
            };
            let skip = matching.len().saturating_sub(keep);

            result.extend(matching.into_iter().skip(skip));
        }

        Ok(result)
    }

    fn endpoint(&self) -> &str {
        "memory"
    }
}
