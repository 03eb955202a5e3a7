//! Cayenne Low Power Payload (LPP) decoding.
//!
//! This crate turns the compact binary uplinks sent by constrained LoRaWAN
//! sensors into structured readings. A payload is a sequence of
//! `channel, type, body` entries; the body width, signedness and decimal
//! scaling are implied by the type through a static registry. Decoding is
//! pure and side-effect free: no I/O, no shared mutable state, so it can run
//! concurrently from any number of threads.
//!
//! Invariants:
//! - A payload decodes only if whole entries consume it exactly.
//! - Malformed input (truncation, unknown type) aborts the whole payload.
//! - Readings keep first-seen channel order; a repeated channel keeps the
//!   last reading.
//!
//! On top of the codec, `telemetry` flattens readings into application
//! fields and `uplink` handles LoRaWAN uplink events end to end.
//!
//! # Examples
//! ```
//! use cayenne_lpp_core::{Number, ReadingValue, decode};
//!
//! let readings = decode(&[0x03, 0x67, 0x01, 0x10, 0x05, 0x65, 0x01, 0xF4])?;
//! assert_eq!(readings.len(), 2);
//! assert_eq!(
//!     readings.get(5).map(|r| &r.value),
//!     Some(&ReadingValue::Scalar(Number::Integer(500)))
//! );
//! println!("{}", serde_json::to_string(&readings)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod payload;
mod reading;
mod telemetry;
mod uplink;

pub use codec::{LppError, TypeDescriptor, decode, decode_units, lookup};
pub use payload::PayloadError;
pub use reading::{Number, Reading, ReadingSet, ReadingValue};
pub use telemetry::{Axes, Location, Telemetry};
pub use uplink::{
    GatewayMetadata, LoRaWanMetadata, UplinkError, UplinkEvent, UplinkRecord, WirelessMetadata,
    process_uplink,
};
