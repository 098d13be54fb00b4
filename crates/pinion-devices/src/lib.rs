//! Device registries and concrete device kinds.
//!
//! Every device kind implements the [`Device`] contract and lives in a
//! fixed-capacity [`Registry`] carved from the device arena. The
//! [`DeviceSet`] aggregate owns one registry per compiled-in kind and
//! is the single entry point for configuration rebuilds, the per-pass
//! update poll, and system-wide broadcasts.
//!
//! Optional kinds are Cargo features (all on by default); a board
//! target selects its capability set at build configuration time
//! rather than at runtime.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod device;
pub mod kinds;
pub mod registry;
pub mod set;

pub use device::{Device, PollContext};
pub use registry::{AddOutcome, Registry};
pub use set::DeviceSet;
