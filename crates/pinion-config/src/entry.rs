//! Decoded configuration records and per-kind instance counts.

use pinion_core::{KindId, NameRef};

/// One fully-decoded, fully-defaulted device registration.
///
/// Legacy tags are resolved during decoding: an entry decoded from a
/// deprecated tag is indistinguishable here from one decoded from the
/// current tag with the same effective parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceEntry {
    /// A push button on one digital input pin.
    Button {
        /// Input pin.
        pin: u8,
        /// Name in the shared name buffer.
        name: NameRef,
    },
    /// A single digital/PWM output pin.
    Output {
        /// Output pin.
        pin: u8,
    },
    /// A quadrature encoder on two input pins.
    Encoder {
        /// First quadrature pin.
        pin_a: u8,
        /// Second quadrature pin.
        pin_b: u8,
        /// Detent profile selector; legacy entries default to 0.
        encoder_type: u8,
        /// Name in the shared name buffer.
        name: NameRef,
    },
    /// A four-wire stepper with optional home button.
    Stepper {
        /// Coil pins in firing order.
        pins: [u8; 4],
        /// Home-switch input pin (0 = none).
        button_pin: u8,
        /// Drive profile selector; legacy entries default to 0.
        mode: u8,
        /// Backlash compensation in steps; legacy entries default to 0.
        backlash: u16,
        /// Whether to release the coils once the target is reached;
        /// legacy entries default to keeping them energized.
        deactivate_output: bool,
    },
    /// An RC servo on one PWM pin.
    Servo {
        /// Output pin.
        pin: u8,
    },
    /// An averaged analog input.
    AnalogInput {
        /// Analog input pin.
        pin: u8,
        /// Minimum averaged change that produces a report.
        sensitivity: u8,
        /// Name in the shared name buffer.
        name: NameRef,
    },
    /// A parallel-in shift-register input bank.
    InputShifter {
        /// Latch pin.
        latch_pin: u8,
        /// Clock pin.
        clock_pin: u8,
        /// Serial data pin.
        data_pin: u8,
        /// Number of daisy-chained 8-bit registers.
        module_count: u8,
        /// Name in the shared name buffer.
        name: NameRef,
    },
    /// A serial-in shift-register output bank.
    OutputShifter {
        /// Latch pin.
        latch_pin: u8,
        /// Clock pin.
        clock_pin: u8,
        /// Serial data pin.
        data_pin: u8,
        /// Number of daisy-chained 8-bit registers.
        module_count: u8,
    },
    /// A chain of seven-segment display modules.
    LedSegment {
        /// Serial data pin.
        data_pin: u8,
        /// Chip-select pin.
        cs_pin: u8,
        /// Clock pin.
        clock_pin: u8,
        /// Number of chained modules.
        module_count: u8,
        /// Initial brightness, 0..=15.
        brightness: u8,
    },
    /// A character LCD on an I2C address.
    LcdDisplay {
        /// I2C address.
        address: u8,
        /// Character columns.
        cols: u8,
        /// Character rows.
        rows: u8,
    },
    /// A multiplexed digital input bank.
    DigInMux {
        /// Shared data pin.
        data_pin: u8,
        /// Mux selector pins.
        select_pins: [u8; 4],
        /// Number of 8-channel registers behind the mux.
        register_count: u8,
        /// Name in the shared name buffer.
        name: NameRef,
    },
    /// A user-defined device. The three references are opaque offsets
    /// into storage, resolved by the out-of-scope custom driver.
    CustomDevice {
        /// Reference to the driver's pin description.
        pin_ref: u16,
        /// Reference to the driver's type description.
        type_ref: u16,
        /// Reference to the driver's private configuration.
        config_ref: u16,
    },
}

impl DeviceEntry {
    /// The device kind this entry registers.
    pub fn kind(&self) -> KindId {
        match self {
            DeviceEntry::Button { .. } => KindId::Button,
            DeviceEntry::Output { .. } => KindId::Output,
            DeviceEntry::Encoder { .. } => KindId::Encoder,
            DeviceEntry::Stepper { .. } => KindId::Stepper,
            DeviceEntry::Servo { .. } => KindId::Servo,
            DeviceEntry::AnalogInput { .. } => KindId::AnalogInput,
            DeviceEntry::InputShifter { .. } => KindId::InputShifter,
            DeviceEntry::OutputShifter { .. } => KindId::OutputShifter,
            DeviceEntry::LedSegment { .. } => KindId::LedSegment,
            DeviceEntry::LcdDisplay { .. } => KindId::LcdDisplay,
            DeviceEntry::DigInMux { .. } => KindId::DigInMux,
            DeviceEntry::CustomDevice { .. } => KindId::CustomDevice,
        }
    }
}

/// Per-kind instance counts from the sizing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindCounts {
    counts: [u16; KindId::COUNT],
}

impl KindCounts {
    /// All-zero counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances counted for one kind.
    pub fn get(&self, kind: KindId) -> usize {
        self.counts[kind.index()] as usize
    }

    /// Record one more instance of a kind.
    pub fn bump(&mut self, kind: KindId) {
        let slot = &mut self.counts[kind.index()];
        *slot = slot.saturating_add(1);
    }

    /// Total instances across all kinds.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let entry = DeviceEntry::Output { pin: 7 };
        assert_eq!(entry.kind(), KindId::Output);
        let entry = DeviceEntry::CustomDevice {
            pin_ref: 0,
            type_ref: 0,
            config_ref: 0,
        };
        assert_eq!(entry.kind(), KindId::CustomDevice);
    }

    #[test]
    fn counts_accumulate_per_kind() {
        let mut counts = KindCounts::new();
        counts.bump(KindId::Button);
        counts.bump(KindId::Button);
        counts.bump(KindId::Servo);
        assert_eq!(counts.get(KindId::Button), 2);
        assert_eq!(counts.get(KindId::Servo), 1);
        assert_eq!(counts.get(KindId::Stepper), 0);
        assert_eq!(counts.total(), 3);
    }
}
