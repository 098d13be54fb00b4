//! Core types and traits for the Pinion I/O controller firmware.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Pinion workspace:
//! device-kind and message identifiers, the decoded host-command
//! surface, status/report sinks, the board I/O seam, and the shared
//! device name buffer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod board;
pub mod command;
pub mod ids;
pub mod names;
pub mod report;
pub mod status;

pub use board::{BoardIo, BoardLimits};
pub use command::{Arg, ArgList, ArgSource, CommandId};
pub use ids::{KindId, MessageId};
pub use names::{NameBuffer, NameOverflow, NameRef};
pub use report::{InputReport, NullReportSink, ReportSink};
pub use status::{NullStatusSink, StatusEvent, StatusSink};
