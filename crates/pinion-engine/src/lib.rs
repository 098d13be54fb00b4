//! The Pinion control loop.
//!
//! [`Controller`] owns the arena, the name buffer, the device set, and
//! the power-saving clock, and exposes the three entry points the
//! board support layer drives: configuration loading, host command
//! handling, and the per-pass poll. The optional [`handoff`] module
//! carries user-defined device traffic to a second core over a
//! bounded channel.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod controller;
#[cfg(feature = "custom-device")]
pub mod handoff;
pub mod power;
mod router;

pub use controller::Controller;
#[cfg(feature = "custom-device")]
pub use handoff::{handoff_channel, CoreMessage, HandoffWorker, DEFAULT_DEPTH};
pub use power::PowerState;
