//! Single digital/PWM output pins.

use pinion_core::BoardIo;

use crate::device::{Device, PollContext};

/// One host-driven output pin.
///
/// The last commanded value is retained across power-saving mode so
/// the pin is restored, not reset, when the board wakes.
#[derive(Debug)]
pub struct Output {
    pin: u8,
    value: u8,
}

impl Output {
    /// Attach an output pin, driven low until the host sets it.
    pub fn new(io: &mut dyn BoardIo, pin: u8) -> Self {
        io.write_pwm(pin, 0);
        Self { pin, value: 0 }
    }

    /// Set the output to an 8-bit duty value.
    pub fn set_value(&mut self, io: &mut dyn BoardIo, value: u8) {
        self.value = value;
        io.write_pwm(self.pin, value);
    }

    /// The pin this output drives.
    pub fn pin(&self) -> u8 {
        self.pin
    }
}

impl Device for Output {
    fn detach(&mut self, io: &mut dyn BoardIo) {
        io.write_pwm(self.pin, 0);
    }

    fn update(&mut self, _ctx: &mut PollContext<'_>) {}

    fn power_save(&mut self, io: &mut dyn BoardIo, enabled: bool) {
        if enabled {
            io.write_pwm(self.pin, 0);
        } else {
            io.write_pwm(self.pin, self.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinion_test_utils::FakeBoard;

    #[test]
    fn set_drives_the_pin() {
        let mut board = FakeBoard::new();
        let mut output = Output::new(&mut board, 7);
        output.set_value(&mut board, 180);
        assert_eq!(board.pwm_out(7), Some(180));
    }

    #[test]
    fn power_save_blanks_then_restores() {
        let mut board = FakeBoard::new();
        let mut output = Output::new(&mut board, 7);
        output.set_value(&mut board, 255);
        output.power_save(&mut board, true);
        assert_eq!(board.pwm_out(7), Some(0));
        output.power_save(&mut board, false);
        assert_eq!(board.pwm_out(7), Some(255));
    }

    #[test]
    fn detach_drives_the_pin_low() {
        let mut board = FakeBoard::new();
        let mut output = Output::new(&mut board, 9);
        output.set_value(&mut board, 40);
        output.detach(&mut board);
        assert_eq!(board.pwm_out(9), Some(0));
    }
}
