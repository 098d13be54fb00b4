//! Bounded device-memory arena for the Pinion firmware core.
//!
//! On the target boards device storage is a single fixed byte budget;
//! nothing is freed individually and there is no compaction.
//! [`DeviceMemory`] carves that budget with a checked reserve: it
//! advances a monotonic watermark and
//! hands out typed [`Reservation`]s, and a failed reservation is a
//! normal, expected outcome that leaves the remaining budget intact so
//! other device kinds can still be brought up.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod budget;
pub mod error;

pub use budget::{DeviceMemory, Reservation};
pub use error::ArenaError;
