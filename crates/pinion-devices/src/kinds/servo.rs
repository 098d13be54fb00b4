//! RC servos on PWM pins.

use pinion_core::BoardIo;

use crate::device::{Device, PollContext};

/// Duty change applied per update pass while slewing to a target.
const SLEW_PER_PASS: u8 = 5;

/// An RC servo that glides toward its commanded position.
///
/// Host commands set a target; the update pass moves the output a
/// bounded amount toward it so large jumps do not slam the horn.
#[derive(Debug)]
pub struct Servo {
    pin: u8,
    current: u8,
    target: u8,
}

impl Servo {
    /// Attach a servo at its zero position.
    pub fn new(io: &mut dyn BoardIo, pin: u8) -> Self {
        io.write_pwm(pin, 0);
        Self {
            pin,
            current: 0,
            target: 0,
        }
    }

    /// Set the target position as an 8-bit duty value.
    pub fn set_value(&mut self, value: u8) {
        self.target = value;
    }
}

impl Device for Servo {
    fn detach(&mut self, io: &mut dyn BoardIo) {
        io.write_pwm(self.pin, 0);
    }

    fn update(&mut self, ctx: &mut PollContext<'_>) {
        if self.current == self.target {
            return;
        }
        let distance = self.current.abs_diff(self.target).min(SLEW_PER_PASS);
        if self.target > self.current {
            self.current += distance;
        } else {
            self.current -= distance;
        }
        ctx.io.write_pwm(self.pin, self.current);
    }
}
