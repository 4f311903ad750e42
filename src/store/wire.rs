//! JSON payloads returned by the store's REST endpoint.
//!
//! A response body is one or more concatenated JSON documents, each of
//! the form `{"notifications": [...]}`.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Notification, PathQuery};
use crate::error::StoreError;

#[derive(Debug, Deserialize)]
struct Batch {
    #[serde(default)]
    notifications: Vec<WireNotification>,
}

#[derive(Debug, Deserialize)]
struct WireNotification {
    timestamp: WireTimestamp,
    #[serde(default)]
    path_elements: Option<Vec<String>>,
    #[serde(default)]
    updates: Map<String, Value>,
    /// Keys removed at this timestamp.
    #[serde(default)]
    deletes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    /// Nanoseconds since epoch.
    Nanos(i64),
    Rfc3339(String),
    Parts {
        seconds: i64,
        #[serde(default)]
        nanos: i64,
    },
}

impl WireTimestamp {
    fn to_millis(&self) -> Result<i64, StoreError> {
        match self {
            WireTimestamp::Nanos(ns) => Ok(ns.div_euclid(1_000_000)),
            WireTimestamp::Rfc3339(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.timestamp_millis())
                .map_err(|e| StoreError::Timestamp(format!("{}: {}", s, e))),
            WireTimestamp::Parts { seconds, nanos } => seconds
                .checked_mul(1000)
                .and_then(|ms| ms.checked_add(nanos.div_euclid(1_000_000)))
                .ok_or_else(|| {
                    StoreError::Timestamp(format!("{}s {}ns is out of range", seconds, nanos))
                }),
        }
    }
}

/// Parse a response body for `path`, applying the path's key filter.
///
/// Notifications without path elements are attributed to `path`. Deleted
/// keys come back as `null`. When the path has a key filter, notifications
/// with nothing left after filtering are dropped.
pub(super) fn parse_notifications(
    body: &str,
    path: &PathQuery,
) -> Result<Vec<Notification>, serde_json::Error> {
    let mut notifications = Vec::new();

    for batch in serde_json::Deserializer::from_str(body).into_iter::<Batch>() {
        for wire in batch?.notifications {
            let timestamp = match wire.timestamp.to_millis() {
                Ok(ts) => ts,
                Err(e) => {
                    tracing::warn!("Skipping notification: {}", e);
                    continue;
                }
            };

            let mut updates: Map<String, Value> = wire
                .updates
                .into_iter()
                .filter(|(key, _)| path.accepts(key))
                .map(|(key, value)| (key, unwrap_update(value)))
                .collect();
            for key in wire.deletes.into_iter().filter(|key| path.accepts(key)) {
                updates.insert(key, Value::Null);
            }

            if updates.is_empty() && !path.keys.is_empty() {
                continue;
            }

            notifications.push(Notification {
                path_elements: wire
                    .path_elements
                    .unwrap_or_else(|| path.path_elements.clone()),
                timestamp,
                updates,
            });
        }
    }

    Ok(notifications)
}

/// Updates may arrive as `{"key": k, "value": v}`; keep only `v`.
fn unwrap_update(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 2 && map.contains_key("key") => {
            map.remove("value").unwrap_or(Value::Null)
        }
        other => other,
    }
}
