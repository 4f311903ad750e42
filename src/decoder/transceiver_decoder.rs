//! Insert/remove event decoding from transceiver snapshots.

use std::collections::BTreeMap;

use crate::domain::{
    DecodeOutcome, DeviceTransceivers, InterfaceHistory, SerialEvents, TransceiverEvent,
    TransceiverState,
};
use crate::error::DecodeError;

/// Turns raw snapshot histories into per-serial lifecycle events.
///
/// A snapshot with a vendor part number is an insert; anything else is a
/// removal of whatever was seen last. Consecutive snapshots that resolve to
/// the same state produce a single event.
#[derive(Debug, Clone, Default)]
pub struct TransceiverDecoder;

/// Accumulator for the fold over one interface's history.
#[derive(Debug, Default)]
struct DecodeState {
    last: Option<TransceiverState>,
    transitions: Vec<TransceiverEvent>,
}

impl DecodeState {
    fn observe(mut self, candidate: TransceiverState, timestamp: i64) -> Self {
        if self.last.as_ref() == Some(&candidate) {
            return self;
        }

        self.transitions
            .push(TransceiverEvent::new(candidate.clone(), timestamp));
        self.last = Some(candidate);
        self
    }
}

impl TransceiverDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Every state change on one interface, in timestamp order.
    ///
    /// Includes changes whose serial is blank; each entry differs from the
    /// one before it.
    pub fn transitions(
        &self,
        interface: &str,
        history: &InterfaceHistory,
    ) -> Result<Vec<TransceiverEvent>, DecodeError> {
        let state = history.iter().try_fold(
            DecodeState::default(),
            |acc, (&timestamp, snapshot)| -> Result<DecodeState, DecodeError> {
                let candidate = match snapshot.identity(interface, timestamp)? {
                    Some(identity) => TransceiverState::inserted(identity.sku, identity.serial),
                    None => TransceiverState::removed_after(acc.last.as_ref()),
                };
                Ok(acc.observe(candidate, timestamp))
            },
        )?;

        Ok(state.transitions)
    }

    /// Decode one interface's history into events keyed by serial.
    ///
    /// Transitions with a blank serial are dropped.
    pub fn decode_interface(
        &self,
        interface: &str,
        history: &InterfaceHistory,
    ) -> Result<SerialEvents, DecodeError> {
        let mut events = SerialEvents::new();
        for event in self.transitions(interface, history)? {
            if let Some(serial) = event.serial.as_deref().filter(|s| !s.is_empty()) {
                events.entry(serial.to_string()).or_default().push(event);
            }
        }
        Ok(events)
    }

    /// Decode every interface of a device. The first failure aborts the device.
    pub fn decode_device(
        &self,
        histories: &BTreeMap<String, InterfaceHistory>,
    ) -> Result<DeviceTransceivers, DecodeError> {
        histories
            .iter()
            .map(|(interface, history)| {
                self.decode_interface(interface, history)
                    .map(|events| (interface.clone(), events))
            })
            .collect()
    }

    /// Decode a device into an outcome, keeping the failure reason.
    pub fn decode(&self, histories: &BTreeMap<String, InterfaceHistory>) -> DecodeOutcome {
        match self.decode_device(histories) {
            Ok(transceivers) => DecodeOutcome::Decoded(transceivers),
            Err(e) => DecodeOutcome::Failed(e.to_string()),
        }
    }
}
