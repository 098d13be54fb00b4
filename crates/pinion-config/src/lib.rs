//! Persisted configuration stream decoder for the Pinion firmware.
//!
//! The configuration lives in non-volatile storage as a compact ASCII
//! byte stream: one entry per device, numeric fields separated by `.`,
//! each entry terminated by `:`, the whole stream terminated by a zero
//! type tag. The decoder runs in two passes so the device arena can be
//! sized exactly before anything is registered:
//!
//! 1. [`count_devices`] — lenient sizing pass, tallies instances per
//!    kind without touching the name buffer.
//! 2. [`decode`] — strict populate pass, emits fully-defaulted
//!    [`DeviceEntry`] records and copies names into the shared
//!    [`NameBuffer`](pinion_core::NameBuffer).
//!
//! Decoding is single-pass and never seeks backward. Any malformed
//! byte fails closed: entries decoded before the failure stay
//! registered, nothing after it is looked at.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod decoder;
pub mod entry;
pub mod error;

pub use decoder::{count_devices, decode, tags};
pub use entry::{DeviceEntry, KindCounts};
pub use error::ConfigError;
