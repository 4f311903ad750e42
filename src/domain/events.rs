//! Transceiver lifecycle events.

use std::fmt;

/// What happened to the transceiver in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Inserted,
    Removed,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Inserted => write!(f, "Inserted"),
            Action::Removed => write!(f, "Removed"),
        }
    }
}

/// The part of an event that decides whether anything changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransceiverState {
    pub action: Action,
    pub sku: Option<String>,
    pub serial: Option<String>,
}

impl TransceiverState {
    /// State for a transceiver read from the eeprom.
    pub fn inserted(sku: impl Into<String>, serial: impl Into<String>) -> Self {
        Self {
            action: Action::Inserted,
            sku: Some(sku.into()),
            serial: Some(serial.into()),
        }
    }

    /// State for an empty slot, carrying forward the identity of `last`.
    pub fn removed_after(last: Option<&TransceiverState>) -> Self {
        Self {
            action: Action::Removed,
            sku: last.and_then(|s| s.sku.clone()),
            serial: last.and_then(|s| s.serial.clone()),
        }
    }

    /// Serial number, if it is present and non-empty.
    pub fn resolved_serial(&self) -> Option<&str> {
        self.serial.as_deref().filter(|s| !s.is_empty())
    }
}

/// A state change observed at a given time (milliseconds since epoch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransceiverEvent {
    pub action: Action,
    pub sku: Option<String>,
    pub serial: Option<String>,
    pub timestamp: i64,
}

impl TransceiverEvent {
    pub fn new(state: TransceiverState, timestamp: i64) -> Self {
        Self {
            action: state.action,
            sku: state.sku,
            serial: state.serial,
            timestamp,
        }
    }

    /// The event without its timestamp.
    pub fn state(&self) -> TransceiverState {
        TransceiverState {
            action: self.action,
            sku: self.sku.clone(),
            serial: self.serial.clone(),
        }
    }
}
