//! Reporting of decoded transceiver events.
//!
//! This module defines the `Reporter` trait and the flat row shape shared
//! by every report format.

mod csv_reporter;

pub use csv_reporter::{read_report, CsvReporter, CSV_HEADER};

use std::path::PathBuf;

use crate::domain::Fleet;
use crate::error::ReportError;

/// One report line: a single event of one transceiver on one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub device_serial: String,
    pub device_hostname: Option<String>,
    pub interface: String,
    pub transceiver_serial: String,
    pub sku: Option<String>,
}

/// What a reporter produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

/// Trait for writing a fleet's events somewhere.
pub trait Reporter {
    /// Write the whole fleet. Failed devices contribute no rows.
    fn write(&self, fleet: &Fleet) -> Result<ReportSummary, ReportError>;
}

/// Flatten a fleet into one row per event, in device, interface, serial
/// and event order.
pub fn flatten(fleet: &Fleet) -> Vec<ReportRow> {
    let mut rows = Vec::new();

    for device in fleet.devices() {
        let Some(transceivers) = device.outcome.transceivers() else {
            continue;
        };
        for (interface, serials) in transceivers {
            for (serial, events) in serials {
                for event in events {
                    rows.push(ReportRow {
                        device_serial: device.serial.clone(),
                        device_hostname: device.hostname.clone(),
                        interface: interface.clone(),
                        transceiver_serial: serial.clone(),
                        sku: event.sku.clone(),
                    });
                }
            }
        }
    }

    rows
}
