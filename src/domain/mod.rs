//! Domain models for transceiver inventory.
//!
//! These types carry no knowledge of the store or the report format.

mod device;
mod events;
mod snapshot;

pub use device::{
    DecodeOutcome, Device, DeviceInfo, DeviceTransceivers, DeviceWarning, Fleet,
    InterfaceHistory, SerialEvents,
};
pub use events::{Action, TransceiverEvent, TransceiverState};
pub use snapshot::{
    Identity, Snapshot, EEPROM_CONTENTS_KEY, VENDOR_PART_NUM_KEY, VENDOR_SERIAL_NUM_KEY,
};
