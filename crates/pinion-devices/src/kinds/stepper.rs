//! Four-wire steppers with optional home switch.

use pinion_core::BoardIo;

use crate::device::{Device, PollContext};

/// Half-step coil pattern, one bit per coil pin in firing order.
const HALF_STEPS: [u8; 8] = [
    0b1000, 0b1100, 0b0100, 0b0110, 0b0010, 0b0011, 0b0001, 0b1001,
];

/// A unipolar stepper driven one half-step per update pass.
///
/// Motion is open-loop toward `target`; re-homing seeks backwards
/// until the home switch closes and declares that position zero. When
/// `deactivate_output` is set the coils are released once the target
/// is reached, trading holding torque for idle current.
#[derive(Debug)]
pub struct Stepper {
    pins: [u8; 4],
    button_pin: u8,
    backlash: u16,
    deactivate_output: bool,
    current: i32,
    target: i32,
    last_direction: i8,
    homing: bool,
    energized: bool,
}

impl Stepper {
    /// Attach a stepper with released coils at position zero.
    ///
    /// The drive profile selector is accepted for wire compatibility;
    /// this driver always half-steps.
    pub fn new(
        io: &mut dyn BoardIo,
        pins: [u8; 4],
        button_pin: u8,
        _mode: u8,
        backlash: u16,
        deactivate_output: bool,
    ) -> Self {
        for &pin in &pins {
            io.write_digital(pin, false);
        }
        Self {
            pins,
            button_pin,
            backlash,
            deactivate_output,
            current: 0,
            target: 0,
            last_direction: 0,
            homing: false,
            energized: false,
        }
    }

    /// Command an absolute target position in half-steps.
    ///
    /// Backlash compensation widens the move when the direction
    /// reverses, so the mechanism lands on the same flank either way.
    pub fn move_to(&mut self, target: i32) {
        self.homing = false;
        let direction = match target.cmp(&self.current) {
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => return,
        };
        let mut target = target;
        if self.last_direction != 0 && direction != self.last_direction {
            target += i32::from(direction) * i32::from(self.backlash);
        }
        self.last_direction = direction;
        self.target = target;
    }

    /// Seek backwards toward the home switch.
    ///
    /// Without a home switch this is equivalent to `move_to(0)`.
    pub fn reset(&mut self) {
        if self.button_pin == 0 {
            self.move_to(0);
        } else {
            self.homing = true;
        }
    }

    /// Declare the current position to be zero.
    pub fn set_zero(&mut self) {
        self.current = 0;
        self.target = 0;
        self.homing = false;
    }

    /// Update the speed and acceleration limits.
    ///
    /// This driver steps at the loop rate, so the limits only bound
    /// how the values are echoed back to the host; they are stored for
    /// wire compatibility.
    pub fn set_speed_accel(&mut self, _max_speed: u16, _accel: u16) {}

    /// The commanded position in half-steps.
    pub fn position(&self) -> i32 {
        self.current
    }

    /// Whether the motor still has steps to run.
    pub fn is_moving(&self) -> bool {
        self.homing || self.current != self.target
    }

    fn drive_phase(&mut self, io: &mut dyn BoardIo) {
        let pattern = HALF_STEPS[self.current.rem_euclid(8) as usize];
        for (bit, &pin) in self.pins.iter().enumerate() {
            io.write_digital(pin, pattern & (1 << (3 - bit)) != 0);
        }
        self.energized = true;
    }

    fn release_coils(&mut self, io: &mut dyn BoardIo) {
        for &pin in &self.pins {
            io.write_digital(pin, false);
        }
        self.energized = false;
    }
}

impl Device for Stepper {
    fn detach(&mut self, io: &mut dyn BoardIo) {
        self.release_coils(io);
    }

    fn update(&mut self, ctx: &mut PollContext<'_>) {
        if self.homing {
            // Home switch is active low, like every other input.
            if !ctx.io.read_digital(self.button_pin) {
                self.set_zero();
                if self.deactivate_output {
                    self.release_coils(ctx.io);
                }
                return;
            }
            self.current -= 1;
            self.drive_phase(ctx.io);
            return;
        }
        if self.current == self.target {
            if self.energized && self.deactivate_output {
                self.release_coils(ctx.io);
            }
            return;
        }
        self.current += if self.target > self.current { 1 } else { -1 };
        self.drive_phase(ctx.io);
    }

    fn power_save(&mut self, io: &mut dyn BoardIo, enabled: bool) {
        if enabled {
            self.release_coils(io);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinion_core::NameBuffer;
    use pinion_test_utils::{FakeBoard, RecordingSink};

    fn run_passes(stepper: &mut Stepper, board: &mut FakeBoard, passes: usize) {
        let names = NameBuffer::new(0);
        let mut sink = RecordingSink::new();
        for _ in 0..passes {
            let mut ctx = PollContext {
                io: board,
                names: &names,
                now_ms: 0,
                sink: &mut sink,
            };
            stepper.update(&mut ctx);
        }
    }

    fn stepper(board: &mut FakeBoard, deactivate: bool) -> Stepper {
        Stepper::new(board, [4, 5, 6, 7], 0, 0, 0, deactivate)
    }

    #[test]
    fn steps_toward_the_target_one_per_pass() {
        let mut board = FakeBoard::new();
        let mut motor = stepper(&mut board, false);
        motor.move_to(5);
        run_passes(&mut motor, &mut board, 3);
        assert_eq!(motor.position(), 3);
        assert!(motor.is_moving());
        run_passes(&mut motor, &mut board, 10);
        assert_eq!(motor.position(), 5);
        assert!(!motor.is_moving());
    }

    #[test]
    fn deactivate_output_releases_coils_at_the_target() {
        let mut board = FakeBoard::new();
        let mut motor = stepper(&mut board, true);
        motor.move_to(2);
        run_passes(&mut motor, &mut board, 3);
        for pin in [4u8, 5, 6, 7] {
            assert_eq!(board.digital_out(pin), Some(false));
        }
    }

    #[test]
    fn homing_stops_at_the_switch_and_zeroes() {
        let mut board = FakeBoard::new();
        let mut motor = Stepper::new(&mut board, [4, 5, 6, 7], 9, 0, 0, false);
        motor.move_to(10);
        run_passes(&mut motor, &mut board, 10);
        motor.reset();
        run_passes(&mut motor, &mut board, 4);
        assert!(motor.is_moving());
        board.press(9);
        run_passes(&mut motor, &mut board, 1);
        assert_eq!(motor.position(), 0);
        assert!(!motor.is_moving());
    }

    #[test]
    fn backlash_widens_a_direction_reversal() {
        let mut board = FakeBoard::new();
        let mut motor = Stepper::new(&mut board, [4, 5, 6, 7], 0, 0, 3, false);
        motor.move_to(10);
        run_passes(&mut motor, &mut board, 12);
        assert_eq!(motor.position(), 10);
        motor.move_to(5);
        run_passes(&mut motor, &mut board, 20);
        // Reversal overshoots by the backlash allowance.
        assert_eq!(motor.position(), 2);
    }

    #[test]
    fn power_save_releases_the_coils() {
        let mut board = FakeBoard::new();
        let mut motor = stepper(&mut board, false);
        motor.move_to(1);
        run_passes(&mut motor, &mut board, 1);
        motor.power_save(&mut board, true);
        for pin in [4u8, 5, 6, 7] {
            assert_eq!(board.digital_out(pin), Some(false));
        }
    }
}
