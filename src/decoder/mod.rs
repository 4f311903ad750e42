//! Transceiver event decoding.
//!
//! Turns snapshot histories into insert/remove events. Knows nothing about
//! where the snapshots came from or how events are reported.

mod transceiver_decoder;

pub use transceiver_decoder::TransceiverDecoder;
