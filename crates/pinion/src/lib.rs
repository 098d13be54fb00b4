//! Pinion: the firmware core for configurable I/O controller boards.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Pinion sub-crates. A board support layer usually depends
//! on `pinion` alone, implements [`BoardIo`](prelude::BoardIo) for its
//! pins, and drives one [`Controller`](prelude::Controller) from the
//! main loop.
//!
//! # Quick start
//!
//! ```rust
//! use pinion::prelude::*;
//!
//! // A board double: pins read idle, writes vanish.
//! struct Bench;
//! impl BoardIo for Bench {
//!     fn read_digital(&mut self, _pin: u8) -> bool { true }
//!     fn read_analog(&mut self, _pin: u8) -> u16 { 0 }
//!     fn write_digital(&mut self, _pin: u8, _high: bool) {}
//!     fn write_pwm(&mut self, _pin: u8, _value: u8) {}
//! }
//!
//! let mut io = Bench;
//! let mut status = NullStatusSink;
//! let mut reports = NullReportSink;
//!
//! // Button named "Gear" on pin 3, plain output on pin 7.
//! let mut controller = Controller::new(BoardLimits::new());
//! controller.load_config(b"1.3.Gear:2.7:0", &mut io, &mut status).unwrap();
//! assert_eq!(controller.devices().buttons.len(), 1);
//! assert_eq!(controller.devices().outputs.len(), 1);
//!
//! // Host sets output 0 to full brightness; the loop polls inputs.
//! let mut args = ArgList::new(vec![Arg::Int(0), Arg::Int(255)]);
//! controller.on_command(CommandId::SetPin.raw(), &mut args, &mut io, 0, &mut reports, &mut status);
//! controller.poll(&mut io, 10, &mut reports);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `pinion-core` | IDs, the board seam, sinks, names, commands |
//! | [`arena`] | `pinion-arena` | The bounded device-memory budget |
//! | [`config`] | `pinion-config` | The persisted-stream decoder |
//! | [`devices`] | `pinion-devices` | Device kinds and registries |
//! | [`engine`] | `pinion-engine` | Controller, routing, power, handoff |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// The bounded device-memory budget (`pinion-arena`).
pub use pinion_arena as arena;

/// The persisted configuration stream decoder (`pinion-config`).
pub use pinion_config as config;

/// IDs, the board I/O seam, sinks, and host commands (`pinion-core`).
pub use pinion_core as types;

/// Device kinds, registries, and the device set (`pinion-devices`).
pub use pinion_devices as devices;

/// The control loop: controller, router, power, handoff
/// (`pinion-engine`).
pub use pinion_engine as engine;

/// The types most board support layers need.
pub mod prelude {
    pub use pinion_arena::{ArenaError, DeviceMemory, Reservation};
    pub use pinion_config::{count_devices, decode, ConfigError, DeviceEntry, KindCounts};
    pub use pinion_core::{
        Arg, ArgList, ArgSource, BoardIo, BoardLimits, CommandId, InputReport, KindId, MessageId,
        NameBuffer, NameRef, NullReportSink, NullStatusSink, ReportSink, StatusEvent, StatusSink,
    };
    pub use pinion_devices::{AddOutcome, Device, DeviceSet, PollContext, Registry};
    pub use pinion_engine::{Controller, PowerState};

    #[cfg(feature = "custom-device")]
    pub use pinion_engine::{handoff_channel, CoreMessage, HandoffWorker};
}
