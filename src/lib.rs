//! Optical transceiver inventory.
//!
//! Lists devices from a telemetry store, decodes each interface's
//! transceiver insert/remove history and writes a flat CSV report.

pub mod config;
pub mod decoder;
pub mod domain;
pub mod error;
pub mod inventory;
pub mod reporter;
pub mod store;
pub mod utils;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::decoder::TransceiverDecoder;
use crate::domain::{DecodeOutcome, Device, DeviceWarning, Fleet};
use crate::error::StoreError;
use crate::inventory::Enumerator;
use crate::reporter::{CsvReporter, ReportSummary, Reporter};
use crate::store::{DatasetStore, RestStore};
use crate::utils::format_timestamp;

/// Outcome of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub devices: usize,
    pub report: ReportSummary,
    pub warnings: Vec<DeviceWarning>,
}

/// Enumerate every device, fetch its transceiver history and decode it.
///
/// Store failures abort the whole run. Decoding failures are kept on the
/// device as `DecodeOutcome::Failed`.
pub fn collect_fleet<S: DatasetStore>(
    enumerator: &Enumerator<S>,
    decoder: &TransceiverDecoder,
) -> Result<Fleet, StoreError> {
    let devices = enumerator.list_devices()?;
    info!(
        "Found {} devices on {}",
        devices.len(),
        enumerator.store().endpoint()
    );

    let mut fleet = Fleet::new();
    for (serial, info) in devices {
        let interfaces: Vec<String> = enumerator.list_interfaces(&serial)?.into_keys().collect();
        let history = enumerator.fetch_transceiver_history(&serial, &interfaces)?;
        let outcome = decoder.decode(&history);

        match &outcome {
            DecodeOutcome::Decoded(transceivers) => {
                info!(
                    "{} ({}): {} interfaces, {} events",
                    serial,
                    info.hostname.as_deref().unwrap_or("-"),
                    interfaces.len(),
                    outcome.event_count()
                );
                for (interface, serials) in transceivers {
                    for event in serials.values().flatten() {
                        debug!(
                            "{} {} {} {} {}",
                            format_timestamp(event.timestamp),
                            interface,
                            event.action,
                            event.sku.as_deref().unwrap_or("-"),
                            event.serial.as_deref().unwrap_or("-")
                        );
                    }
                }
            }
            DecodeOutcome::Failed(reason) => {
                warn!("{}: transceiver history not decoded: {}", serial, reason);
            }
        }

        fleet.insert(Device {
            serial,
            hostname: info.hostname,
            outcome,
        });
    }

    Ok(fleet)
}

/// Collect the fleet from `store` and write it with `reporter`.
pub fn run_with<S: DatasetStore, R: Reporter>(
    store: S,
    reporter: &R,
    version_cap: u32,
) -> Result<RunSummary> {
    let enumerator = Enumerator::new(store).with_version_cap(version_cap);
    let fleet = collect_fleet(&enumerator, &TransceiverDecoder::new())
        .context("Failed to query telemetry store")?;

    let report = reporter.write(&fleet).context("Failed to write report")?;

    Ok(RunSummary {
        devices: fleet.len(),
        report,
        warnings: fleet.warnings(),
    })
}

/// Run against the remote store described by `config`.
pub fn run(config: &Config) -> Result<RunSummary> {
    config.validate().context("Invalid configuration")?;

    let store = RestStore::connect(
        &config.server,
        config.port,
        &config.token_file,
        config.ca_file.as_deref(),
    )
    .with_context(|| format!("Failed to connect to {}:{}", config.server, config.port))?;

    run_with(store, &CsvReporter::new(&config.csv_file), config.version_cap)
}
