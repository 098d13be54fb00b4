//! Strongly-typed identifiers for device kinds and device messages.

use std::fmt;

/// Identifies a category of configurable hardware device.
///
/// Kinds are fixed at build time; the persisted configuration stream
/// selects how many instances of each kind exist on a given board.
/// `KindId` is used for sizing (one arena reservation per kind), for
/// status tokens, and for routing decoded commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KindId {
    /// Momentary or latching push button on a digital input pin.
    Button,
    /// Single digital/PWM output pin.
    Output,
    /// Quadrature rotary encoder on two digital input pins.
    Encoder,
    /// Four-wire stepper motor with optional home button.
    Stepper,
    /// RC servo on a PWM-capable pin.
    Servo,
    /// Averaged analog input with a report sensitivity threshold.
    AnalogInput,
    /// Parallel-in/serial-out shift register bank (digital inputs).
    InputShifter,
    /// Serial-in/parallel-out shift register bank (digital outputs).
    OutputShifter,
    /// Daisy-chained seven-segment LED display modules.
    LedSegment,
    /// Character LCD on an I2C address.
    LcdDisplay,
    /// Multiplexed digital input bank behind selector pins.
    DigInMux,
    /// User-defined device driven through opaque config references.
    CustomDevice,
}

impl KindId {
    /// Number of device kinds.
    pub const COUNT: usize = 12;

    /// All kinds, in stable index order.
    pub const ALL: [KindId; KindId::COUNT] = [
        KindId::Button,
        KindId::Output,
        KindId::Encoder,
        KindId::Stepper,
        KindId::Servo,
        KindId::AnalogInput,
        KindId::InputShifter,
        KindId::OutputShifter,
        KindId::LedSegment,
        KindId::LcdDisplay,
        KindId::DigInMux,
        KindId::CustomDevice,
    ];

    /// Stable dense index, for per-kind count and limit tables.
    pub fn index(self) -> usize {
        match self {
            KindId::Button => 0,
            KindId::Output => 1,
            KindId::Encoder => 2,
            KindId::Stepper => 3,
            KindId::Servo => 4,
            KindId::AnalogInput => 5,
            KindId::InputShifter => 6,
            KindId::OutputShifter => 7,
            KindId::LedSegment => 8,
            KindId::LcdDisplay => 9,
            KindId::DigInMux => 10,
            KindId::CustomDevice => 11,
        }
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KindId::Button => "Button",
            KindId::Output => "Output",
            KindId::Encoder => "Encoder",
            KindId::Stepper => "Stepper",
            KindId::Servo => "Servo",
            KindId::AnalogInput => "AnalogInput",
            KindId::InputShifter => "InputShifter",
            KindId::OutputShifter => "OutputShifter",
            KindId::LedSegment => "LedSegment",
            KindId::LcdDisplay => "LcdDisplay",
            KindId::DigInMux => "DigInMux",
            KindId::CustomDevice => "CustomDevice",
        };
        f.write_str(name)
    }
}

/// Identifies a value slot within one device instance.
///
/// Output-capable devices receive `set(message_id, payload)` calls;
/// the message id tells the driver which of its values changed, so the
/// host never has to resend the full device state. Negative ids are
/// reserved for system messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub i16);

impl MessageId {
    /// Reserved id: gate (pause/resume) device updates on the second
    /// execution core while the configuration is being rebuilt.
    pub const UPDATE_HOLD: MessageId = MessageId(-1);

    /// Reserved id: power-saving transition, payload `"1"` or `"0"`.
    pub const POWER_SAVE: MessageId = MessageId(-2);

    /// Whether this id is in the reserved (negative) system range.
    pub fn is_reserved(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i16> for MessageId {
    fn from(v: i16) -> Self {
        Self(v)
    }
}
