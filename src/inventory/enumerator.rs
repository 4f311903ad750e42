//! Queries that list devices, interfaces and transceiver history.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use super::{interface_status_path, ANALYTICS_DATASET, DEFAULT_VERSION_CAP, DEVICES_PATH, XCVR_STATUS_PATH};
use crate::domain::{DeviceInfo, InterfaceHistory, Snapshot, EEPROM_CONTENTS_KEY};
use crate::error::StoreError;
use crate::store::{DatasetStore, PathQuery, Query, QueryRange};

/// Runs the inventory queries against a dataset store.
pub struct Enumerator<S> {
    store: S,
    version_cap: u32,
}

impl<S: DatasetStore> Enumerator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            version_cap: DEFAULT_VERSION_CAP,
        }
    }

    /// Set the maximum number of versions fetched per interface.
    pub fn with_version_cap(mut self, version_cap: u32) -> Self {
        self.version_cap = version_cap;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// List devices keyed by serial number.
    pub fn list_devices(&self) -> Result<BTreeMap<String, DeviceInfo>, StoreError> {
        let query = Query::new(ANALYTICS_DATASET, vec![PathQuery::new(DEVICES_PATH)]);
        let latest = self.get_latest(&query)?;

        Ok(latest
            .into_iter()
            .map(|(serial, value)| (serial, DeviceInfo::from_value(&value)))
            .collect())
    }

    /// List the transceiver status entries of a device, keyed by interface.
    pub fn list_interfaces(&self, device: &str) -> Result<BTreeMap<String, Value>, StoreError> {
        let query = Query::new(device, vec![PathQuery::new(XCVR_STATUS_PATH)]);
        Ok(self.get_latest(&query)?.into_iter().collect())
    }

    /// Fetch the eeprom history of every given interface in one query.
    ///
    /// Results are keyed by interface name. Updates sharing a timestamp on
    /// the same interface are merged into one snapshot.
    pub fn fetch_transceiver_history(
        &self,
        device: &str,
        interfaces: &[String],
    ) -> Result<BTreeMap<String, InterfaceHistory>, StoreError> {
        if interfaces.is_empty() {
            return Ok(BTreeMap::new());
        }

        let paths = interfaces
            .iter()
            .map(|i| PathQuery::new(interface_status_path(i)).with_keys([EEPROM_CONTENTS_KEY]))
            .collect();
        let query = Query::new(device, paths);

        let notifications = self
            .store
            .get(&query, &QueryRange::versions(self.version_cap))?;
        debug!(
            "{}: {} history notifications for {} interfaces",
            device,
            notifications.len(),
            interfaces.len()
        );

        let mut history: BTreeMap<String, InterfaceHistory> = BTreeMap::new();
        for notification in notifications {
            let Some(interface) = notification.path_elements.last() else {
                continue;
            };
            history
                .entry(interface.clone())
                .or_default()
                .entry(notification.timestamp)
                .or_insert_with(Snapshot::default)
                .merge(notification.updates);
        }

        Ok(history)
    }

    /// Point read merging every returned update; later updates win.
    fn get_latest(&self, query: &Query) -> Result<Map<String, Value>, StoreError> {
        let mut result = Map::new();
        for notification in self.store.get(query, &QueryRange::latest())? {
            result.extend(notification.updates);
        }
        Ok(result)
    }
}
