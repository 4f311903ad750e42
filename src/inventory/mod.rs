//! Device and interface enumeration against the telemetry store.
//!
//! Knows the fixed dataset layout: where devices are listed and where
//! transceiver status lives on each device.

mod enumerator;

pub use enumerator::Enumerator;

/// Dataset holding fleet-wide analytics.
pub const ANALYTICS_DATASET: &str = "analytics";

/// Path listing every device known to the store, keyed by serial.
pub const DEVICES_PATH: [&str; 2] = ["DatasetInfo", "Devices"];

/// Path listing transceiver status per interface on a device.
pub const XCVR_STATUS_PATH: [&str; 6] = ["Sysdb", "hardware", "archer", "xcvr", "status", "all"];

/// Default cap on historical versions fetched per interface.
pub const DEFAULT_VERSION_CAP: u32 = 100_000;

/// Status path for one interface.
pub fn interface_status_path(interface: &str) -> Vec<String> {
    XCVR_STATUS_PATH
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::once(interface.to_string()))
        .collect()
}
