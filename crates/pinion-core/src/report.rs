//! Input-change reports emitted toward the host protocol layer.

/// A state change observed on an input-style device.
///
/// Produced during registry `update` passes and on an explicit trigger
/// broadcast. The name is borrowed from the shared
/// [`NameBuffer`](crate::NameBuffer) and is empty for unnamed devices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputReport<'a> {
    /// A button changed state.
    Button {
        /// Configured device name.
        name: &'a str,
        /// `true` when the button is pressed.
        pressed: bool,
    },
    /// An encoder moved by one or more detents.
    Encoder {
        /// Configured device name.
        name: &'a str,
        /// Signed step count since the last report.
        delta: i8,
    },
    /// An averaged analog value moved past its sensitivity threshold.
    Analog {
        /// Configured device name.
        name: &'a str,
        /// The new averaged reading.
        value: u16,
    },
    /// One channel of an input shift-register bank changed.
    InputShifter {
        /// Configured device name.
        name: &'a str,
        /// Bit index within the bank.
        channel: u8,
        /// `true` when the channel reads active.
        pressed: bool,
    },
    /// One channel of a multiplexed input bank changed.
    DigInMux {
        /// Configured device name.
        name: &'a str,
        /// Channel index within the mux.
        channel: u8,
        /// `true` when the channel reads active.
        pressed: bool,
    },
}

/// Receives input reports from the device registries.
///
/// Implemented by the host protocol adapter. Must not block; a report
/// is delivered at most once per observed change.
pub trait ReportSink {
    /// Deliver one input report.
    fn report(&mut self, report: InputReport<'_>);
}

/// A sink that discards every report.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReportSink;

impl ReportSink for NullReportSink {
    fn report(&mut self, _report: InputReport<'_>) {}
}
