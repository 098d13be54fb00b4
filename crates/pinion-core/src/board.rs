//! The board I/O seam and build-time capacity constants.

use crate::ids::KindId;

/// Pin-level access to the board.
///
/// Every device kind drives its hardware exclusively through this
/// trait; the concrete impl (real pins, or a test double) is supplied
/// by the board support layer. Calls must be non-blocking — a read
/// returns the latest sampled value, a write latches the new state.
pub trait BoardIo {
    /// Read a digital input pin. `true` means the pin reads active.
    fn read_digital(&mut self, pin: u8) -> bool;

    /// Read an analog input pin (10-bit range, 0..=1023).
    fn read_analog(&mut self, pin: u8) -> u16;

    /// Drive a digital output pin.
    fn write_digital(&mut self, pin: u8, high: bool);

    /// Drive a PWM-capable output pin with an 8-bit duty value.
    fn write_pwm(&mut self, pin: u8, value: u8);
}

/// Build-time capacity constants for one board target.
///
/// Supplied by the board support layer, never discovered at runtime.
/// The defaults match the smallest supported board (1KB of persistent
/// storage, 2KB of RAM).
#[derive(Clone, Debug)]
pub struct BoardLimits {
    /// Total bytes available for device-instance storage.
    pub device_memory_bytes: usize,
    /// Total bytes available for device names.
    pub name_buffer_bytes: usize,
    /// Maximum instance count per device kind, indexed by
    /// [`KindId::index`].
    pub max_per_kind: [u8; KindId::COUNT],
    /// Idle duration after the last received command before the main
    /// loop broadcasts power-saving mode.
    pub power_save_timeout_ms: u32,
}

impl BoardLimits {
    /// Default device-instance arena size in bytes.
    pub const DEFAULT_DEVICE_MEMORY: usize = 420;

    /// Default name-buffer size in bytes.
    pub const DEFAULT_NAME_BUFFER: usize = 220;

    /// Default per-kind instance cap.
    pub const DEFAULT_MAX_PER_KIND: u8 = 16;

    /// Default power-saving idle timeout: 15 minutes.
    pub const DEFAULT_POWER_SAVE_TIMEOUT_MS: u32 = 15 * 60 * 1000;

    /// Limits for the default (smallest) board target.
    pub fn new() -> Self {
        Self {
            device_memory_bytes: Self::DEFAULT_DEVICE_MEMORY,
            name_buffer_bytes: Self::DEFAULT_NAME_BUFFER,
            max_per_kind: [Self::DEFAULT_MAX_PER_KIND; KindId::COUNT],
            power_save_timeout_ms: Self::DEFAULT_POWER_SAVE_TIMEOUT_MS,
        }
    }

    /// The instance cap for one kind.
    pub fn max_for(&self, kind: KindId) -> usize {
        self.max_per_kind[kind.index()] as usize
    }

    /// Override the instance cap for one kind.
    pub fn set_max(&mut self, kind: KindId, max: u8) {
        self.max_per_kind[kind.index()] = max;
    }
}

impl Default for BoardLimits {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_smallest_board() {
        let limits = BoardLimits::new();
        assert_eq!(limits.device_memory_bytes, 420);
        assert_eq!(limits.name_buffer_bytes, 220);
        assert_eq!(limits.max_for(KindId::Button), 16);
    }

    #[test]
    fn per_kind_cap_is_independent() {
        let mut limits = BoardLimits::new();
        limits.set_max(KindId::Stepper, 2);
        assert_eq!(limits.max_for(KindId::Stepper), 2);
        assert_eq!(limits.max_for(KindId::Servo), 16);
    }
}
