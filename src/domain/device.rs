//! Devices and the fleet-wide decoding results.

use std::collections::BTreeMap;

use serde_json::Value;

use super::events::TransceiverEvent;
use super::snapshot::Snapshot;

/// One interface's observed history, keyed by timestamp in milliseconds.
pub type InterfaceHistory = BTreeMap<i64, Snapshot>;

/// Event lists keyed by transceiver serial number.
pub type SerialEvents = BTreeMap<String, Vec<TransceiverEvent>>;

/// Per-serial events keyed by interface name.
pub type DeviceTransceivers = BTreeMap<String, SerialEvents>;

/// Device metadata as listed by the analytics dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceInfo {
    pub hostname: Option<String>,
}

impl DeviceInfo {
    /// Build device info from the value stored under the device's serial.
    ///
    /// Only the hostname is kept; other listing attributes are ignored.
    pub fn from_value(value: &Value) -> Self {
        Self {
            hostname: value
                .get("hostname")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

/// Result of decoding one device's transceiver history.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    Decoded(DeviceTransceivers),
    Failed(String),
}

impl DecodeOutcome {
    /// Decoded transceivers, or nothing if decoding failed.
    pub fn transceivers(&self) -> Option<&DeviceTransceivers> {
        match self {
            DecodeOutcome::Decoded(t) => Some(t),
            DecodeOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            DecodeOutcome::Decoded(_) => None,
            DecodeOutcome::Failed(reason) => Some(reason.as_str()),
        }
    }

    /// Total number of events across all interfaces and serials.
    pub fn event_count(&self) -> usize {
        self.transceivers()
            .map(|t| t.values().flat_map(|s| s.values()).map(Vec::len).sum::<usize>())
            .unwrap_or(0)
    }
}

/// A device with its decoded transceiver history.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub serial: String,
    pub hostname: Option<String>,
    pub outcome: DecodeOutcome,
}

/// A device whose history could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceWarning {
    pub serial: String,
    pub hostname: Option<String>,
    pub reason: String,
}

/// Every device seen in a run, keyed by serial.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fleet {
    devices: BTreeMap<String, Device>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, device: Device) {
        self.devices.insert(device.serial.clone(), device);
    }

    pub fn get(&self, serial: &str) -> Option<&Device> {
        self.devices.get(serial)
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Devices whose decoding failed, in serial order.
    pub fn warnings(&self) -> Vec<DeviceWarning> {
        self.devices
            .values()
            .filter_map(|d| {
                d.outcome.failure().map(|reason| DeviceWarning {
                    serial: d.serial.clone(),
                    hostname: d.hostname.clone(),
                    reason: reason.to_string(),
                })
            })
            .collect()
    }
}
