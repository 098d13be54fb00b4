//! Shared test doubles for the Pinion workspace.
//!
//! Kept out of the published surface; every crate pulls these in as a
//! dev-dependency so device and engine tests script board state the
//! same way.

#![forbid(unsafe_code)]
#![allow(missing_docs)]

use std::collections::HashMap;

use pinion_core::{BoardIo, InputReport, ReportSink, StatusEvent, StatusSink};

/// Scriptable in-memory board.
///
/// Digital pins idle high (pull-up convention) until scripted; analog
/// pins idle at zero. Every write is logged in order and the latest
/// value per pin is queryable.
#[derive(Debug, Default)]
pub struct FakeBoard {
    digital_in: HashMap<u8, bool>,
    analog_in: HashMap<u8, u16>,
    /// Every digital write, in call order.
    pub digital_writes: Vec<(u8, bool)>,
    /// Every PWM write, in call order.
    pub pwm_writes: Vec<(u8, u8)>,
}

impl FakeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a digital input level.
    pub fn set_digital(&mut self, pin: u8, high: bool) {
        self.digital_in.insert(pin, high);
    }

    /// Pull a pin low, the active level for buttons and switches.
    pub fn press(&mut self, pin: u8) {
        self.set_digital(pin, false);
    }

    /// Let a pin float back to its pulled-up idle level.
    pub fn release(&mut self, pin: u8) {
        self.set_digital(pin, true);
    }

    /// Script an analog input reading.
    pub fn set_analog(&mut self, pin: u8, value: u16) {
        self.analog_in.insert(pin, value);
    }

    /// Latest digital level written to `pin`, if any.
    pub fn digital_out(&self, pin: u8) -> Option<bool> {
        self.digital_writes
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, high)| *high)
    }

    /// Latest PWM duty written to `pin`, if any.
    pub fn pwm_out(&self, pin: u8) -> Option<u8> {
        self.pwm_writes
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, v)| *v)
    }
}

impl BoardIo for FakeBoard {
    fn read_digital(&mut self, pin: u8) -> bool {
        self.digital_in.get(&pin).copied().unwrap_or(true)
    }

    fn read_analog(&mut self, pin: u8) -> u16 {
        self.analog_in.get(&pin).copied().unwrap_or(0)
    }

    fn write_digital(&mut self, pin: u8, high: bool) {
        self.digital_writes.push((pin, high));
    }

    fn write_pwm(&mut self, pin: u8, value: u8) {
        self.pwm_writes.push((pin, value));
    }
}

/// An [`InputReport`] with the borrowed name copied out, so tests can
/// hold reports past the update pass that produced them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OwnedReport {
    Button { name: String, pressed: bool },
    Encoder { name: String, delta: i8 },
    Analog { name: String, value: u16 },
    InputShifter { name: String, channel: u8, pressed: bool },
    DigInMux { name: String, channel: u8, pressed: bool },
}

impl From<InputReport<'_>> for OwnedReport {
    fn from(report: InputReport<'_>) -> Self {
        match report {
            InputReport::Button { name, pressed } => OwnedReport::Button {
                name: name.to_string(),
                pressed,
            },
            InputReport::Encoder { name, delta } => OwnedReport::Encoder {
                name: name.to_string(),
                delta,
            },
            InputReport::Analog { name, value } => OwnedReport::Analog {
                name: name.to_string(),
                value,
            },
            InputReport::InputShifter {
                name,
                channel,
                pressed,
            } => OwnedReport::InputShifter {
                name: name.to_string(),
                channel,
                pressed,
            },
            InputReport::DigInMux {
                name,
                channel,
                pressed,
            } => OwnedReport::DigInMux {
                name: name.to_string(),
                channel,
                pressed,
            },
        }
    }
}

/// Records every input report.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub reports: Vec<OwnedReport>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for RecordingSink {
    fn report(&mut self, report: InputReport<'_>) {
        self.reports.push(report.into());
    }
}

/// Records every status event.
#[derive(Debug, Default)]
pub struct RecordingStatus {
    pub events: Vec<StatusEvent>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusSink for RecordingStatus {
    fn status(&mut self, event: StatusEvent) {
        self.events.push(event);
    }
}
