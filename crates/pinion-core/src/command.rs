//! The decoded host-command surface.
//!
//! The wire protocol (framing, escaping, serial transport) lives
//! outside this workspace. By the time a command reaches the engine it
//! has been reduced to a raw command id plus an ordered sequence of
//! typed argument reads, exposed here as [`ArgSource`]. [`ArgList`] is
//! a ready-made source used by tests and by host adapters that decode
//! a full frame before dispatching.

use std::fmt;

/// Commands the dispatch router recognizes.
///
/// The raw ids form the host-facing command table and must stay stable
/// across firmware releases; [`CommandId::from_raw`] returns `None` for
/// anything outside the table, which the router reports as an unknown
/// command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandId {
    /// Write a display value to a seven-segment module group.
    SetModule,
    /// Set a digital/PWM output pin value.
    SetPin,
    /// Move a stepper to an absolute position.
    SetStepper,
    /// Set a servo target value.
    SetServo,
    /// Set the brightness of a seven-segment module group.
    SetModuleBrightness,
    /// Write a line of text to an LCD.
    SetLcdText,
    /// Set a list of output-shifter bits to a value.
    SetShiftRegisterPins,
    /// Forward a message to a user-defined device.
    SetCustomDevice,
    /// Re-home a stepper (seek toward its home switch).
    ResetStepper,
    /// Declare the current stepper position to be zero.
    SetZeroStepper,
    /// Update a stepper's speed and acceleration limits.
    SetStepperSpeedAccel,
    /// Ask every input kind to re-report its current state.
    Trigger,
    /// Force power-saving mode on or off.
    SetPowerSavingMode,
}

impl CommandId {
    /// Decode a raw command id from the host protocol layer.
    pub fn from_raw(raw: u8) -> Option<CommandId> {
        match raw {
            1 => Some(CommandId::SetModule),
            2 => Some(CommandId::SetPin),
            3 => Some(CommandId::SetStepper),
            4 => Some(CommandId::SetServo),
            5 => Some(CommandId::SetModuleBrightness),
            6 => Some(CommandId::SetLcdText),
            7 => Some(CommandId::SetShiftRegisterPins),
            8 => Some(CommandId::SetCustomDevice),
            9 => Some(CommandId::ResetStepper),
            10 => Some(CommandId::SetZeroStepper),
            11 => Some(CommandId::SetStepperSpeedAccel),
            12 => Some(CommandId::Trigger),
            13 => Some(CommandId::SetPowerSavingMode),
            _ => None,
        }
    }

    /// The wire id for this command.
    pub fn raw(self) -> u8 {
        match self {
            CommandId::SetModule => 1,
            CommandId::SetPin => 2,
            CommandId::SetStepper => 3,
            CommandId::SetServo => 4,
            CommandId::SetModuleBrightness => 5,
            CommandId::SetLcdText => 6,
            CommandId::SetShiftRegisterPins => 7,
            CommandId::SetCustomDevice => 8,
            CommandId::ResetStepper => 9,
            CommandId::SetZeroStepper => 10,
            CommandId::SetStepperSpeedAccel => 11,
            CommandId::Trigger => 12,
            CommandId::SetPowerSavingMode => 13,
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Ordered, typed argument reads for one decoded command.
///
/// Each `next_*` call consumes one argument. A `None` return means the
/// argument is missing or has the wrong type; the router treats either
/// as an invalid command and drops it without side effects.
pub trait ArgSource {
    /// Read the next argument as a signed 16-bit integer.
    fn next_i16(&mut self) -> Option<i16>;

    /// Read the next argument as a signed 32-bit integer.
    fn next_i32(&mut self) -> Option<i32>;

    /// Read the next argument as a boolean (any non-zero integer).
    fn next_bool(&mut self) -> Option<bool>;

    /// Read the next argument as an already-unescaped string.
    fn next_str(&mut self) -> Option<&str>;
}

/// One decoded command argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    /// An integer argument of any width up to 32 bits.
    Int(i32),
    /// A raw string argument, escape-decoding already applied.
    Text(String),
}

/// An [`ArgSource`] over a pre-decoded argument vector.
///
/// # Examples
///
/// ```
/// use pinion_core::{Arg, ArgList, ArgSource};
///
/// let mut args = ArgList::new(vec![Arg::Int(3), Arg::Text("on".into())]);
/// assert_eq!(args.next_i16(), Some(3));
/// assert_eq!(args.next_str(), Some("on"));
/// assert_eq!(args.next_i16(), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ArgList {
    args: Vec<Arg>,
    pos: usize,
}

impl ArgList {
    /// Create a source over the given arguments.
    pub fn new(args: Vec<Arg>) -> Self {
        Self { args, pos: 0 }
    }

    /// Number of arguments not yet consumed.
    pub fn remaining(&self) -> usize {
        self.args.len() - self.pos
    }

    fn next_int(&mut self) -> Option<i32> {
        match self.args.get(self.pos) {
            Some(Arg::Int(v)) => {
                let v = *v;
                self.pos += 1;
                Some(v)
            }
            _ => None,
        }
    }
}

impl ArgSource for ArgList {
    fn next_i16(&mut self) -> Option<i16> {
        self.next_int().map(|v| v as i16)
    }

    fn next_i32(&mut self) -> Option<i32> {
        self.next_int()
    }

    fn next_bool(&mut self) -> Option<bool> {
        self.next_int().map(|v| v != 0)
    }

    fn next_str(&mut self) -> Option<&str> {
        let i = self.pos;
        match self.args.get(i) {
            Some(Arg::Text(_)) => self.pos = i + 1,
            _ => return None,
        }
        match &self.args[i] {
            Arg::Text(s) => Some(s),
            Arg::Int(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_ids_round_trip() {
        for raw in 0..=u8::MAX {
            if let Some(id) = CommandId::from_raw(raw) {
                assert_eq!(id.raw(), raw);
            }
        }
        assert_eq!(CommandId::from_raw(2), Some(CommandId::SetPin));
        assert_eq!(CommandId::from_raw(0), None);
        assert_eq!(CommandId::from_raw(200), None);
    }

    #[test]
    fn arg_list_reads_in_order() {
        let mut args = ArgList::new(vec![Arg::Int(1), Arg::Int(-40000), Arg::Int(1)]);
        assert_eq!(args.next_i16(), Some(1));
        assert_eq!(args.next_i32(), Some(-40000));
        assert_eq!(args.next_bool(), Some(true));
        assert_eq!(args.remaining(), 0);
    }

    #[test]
    fn type_mismatch_is_none_and_does_not_consume() {
        let mut args = ArgList::new(vec![Arg::Text("x".into())]);
        assert_eq!(args.next_i16(), None);
        assert_eq!(args.next_str(), Some("x"));
    }

    #[test]
    fn exhausted_source_returns_none() {
        let mut args = ArgList::new(vec![]);
        assert_eq!(args.next_i16(), None);
        assert_eq!(args.next_str(), None);
        assert_eq!(args.next_bool(), None);
    }
}
