//! Chained seven-segment display modules (MAX7219 style).

use pinion_core::BoardIo;

use crate::device::{Device, PollContext};

const REG_INTENSITY: u8 = 0x0A;
const REG_SCAN_LIMIT: u8 = 0x0B;
const REG_SHUTDOWN: u8 = 0x0C;
const DIGITS_PER_MODULE: usize = 8;

/// Segment patterns for the characters the host may send. Unknown
/// characters render blank.
fn segments_for(ch: u8) -> u8 {
    match ch {
        b'0' => 0b0111_1110,
        b'1' => 0b0011_0000,
        b'2' => 0b0110_1101,
        b'3' => 0b0111_1001,
        b'4' => 0b0011_0011,
        b'5' => 0b0101_1011,
        b'6' => 0b0101_1111,
        b'7' => 0b0111_0000,
        b'8' => 0b0111_1111,
        b'9' => 0b0111_1011,
        b'-' => 0b0000_0001,
        b'E' => 0b0100_1111,
        _ => 0,
    }
}

/// A chain of eight-digit seven-segment modules behind one serial bus.
///
/// Digit text, decimal points, and a digit mask arrive per module; the
/// driver bit-bangs the controller protocol over the three bus pins.
/// Power-saving mode uses the controller's shutdown register, so the
/// displayed value survives a wake.
#[derive(Debug)]
pub struct LedSegment {
    data_pin: u8,
    cs_pin: u8,
    clock_pin: u8,
    module_count: u8,
    brightness: u8,
}

impl LedSegment {
    /// Attach a module chain, wake it, and apply the configured
    /// brightness.
    pub fn new(
        io: &mut dyn BoardIo,
        data_pin: u8,
        cs_pin: u8,
        clock_pin: u8,
        module_count: u8,
        brightness: u8,
    ) -> Self {
        let mut display = Self {
            data_pin,
            cs_pin,
            clock_pin,
            module_count,
            brightness: brightness.min(15),
        };
        for module in 0..module_count {
            display.send(io, module, REG_SHUTDOWN, 1);
            display.send(io, module, REG_SCAN_LIMIT, (DIGITS_PER_MODULE - 1) as u8);
        }
        let brightness = display.brightness;
        display.set_brightness(io, brightness);
        display
    }

    /// Show `text` on one module, right aligned.
    ///
    /// `points` carries one decimal-point bit per digit; `mask`
    /// selects which digits to rewrite, so two host values can share a
    /// module.
    pub fn set_text(&mut self, io: &mut dyn BoardIo, module: u8, text: &str, points: u8, mask: u8) {
        if module >= self.module_count {
            return;
        }
        let bytes = text.as_bytes();
        for digit in 0..DIGITS_PER_MODULE {
            if mask & (1 << digit) == 0 {
                continue;
            }
            // Digit 0 is the rightmost glass position and maps to the
            // last character of the text.
            let ch = bytes
                .len()
                .checked_sub(digit + 1)
                .map_or(b' ', |i| bytes[i]);
            let mut pattern = segments_for(ch);
            if points & (1 << digit) != 0 {
                pattern |= 0b1000_0000;
            }
            self.send(io, module, digit as u8 + 1, pattern);
        }
    }

    /// Set the brightness of every module in the chain, 0..=15.
    pub fn set_brightness(&mut self, io: &mut dyn BoardIo, brightness: u8) {
        self.brightness = brightness.min(15);
        for module in 0..self.module_count {
            self.send(io, module, REG_INTENSITY, self.brightness);
        }
    }

    /// Write one register on one module.
    ///
    /// The chain shifts through every module, so the addressed packet
    /// is padded with no-ops for the others and latched once.
    fn send(&self, io: &mut dyn BoardIo, module: u8, register: u8, value: u8) {
        io.write_digital(self.cs_pin, false);
        for target in (0..self.module_count).rev() {
            let (reg, val) = if target == module {
                (register, value)
            } else {
                (0, 0)
            };
            self.shift_byte(io, reg);
            self.shift_byte(io, val);
        }
        io.write_digital(self.cs_pin, true);
    }

    fn shift_byte(&self, io: &mut dyn BoardIo, byte: u8) {
        for bit in (0..8).rev() {
            io.write_digital(self.data_pin, byte & (1 << bit) != 0);
            io.write_digital(self.clock_pin, true);
            io.write_digital(self.clock_pin, false);
        }
    }

    fn set_shutdown(&self, io: &mut dyn BoardIo, off: bool) {
        for module in 0..self.module_count {
            self.send(io, module, REG_SHUTDOWN, u8::from(!off));
        }
    }
}

impl Device for LedSegment {
    fn detach(&mut self, io: &mut dyn BoardIo) {
        self.set_shutdown(io, true);
    }

    fn update(&mut self, _ctx: &mut PollContext<'_>) {}

    fn power_save(&mut self, io: &mut dyn BoardIo, enabled: bool) {
        self.set_shutdown(io, enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinion_test_utils::FakeBoard;

    /// Decode every latched packet into (module, register, value).
    fn packets(board: &FakeBoard, data_pin: u8, clock_pin: u8, cs_pin: u8) -> Vec<(u8, u8, u8)> {
        let mut out = Vec::new();
        let mut bits: Vec<bool> = Vec::new();
        let mut pending = None;
        for &(pin, high) in &board.digital_writes {
            if pin == data_pin {
                pending = Some(high);
            } else if pin == clock_pin && high {
                bits.push(pending.unwrap_or(false));
            } else if pin == cs_pin && high {
                let modules = bits.len() / 16;
                for (slot, chunk) in bits.chunks(16).enumerate() {
                    let byte = |range: &[bool]| range.iter().fold(0u8, |a, &b| (a << 1) | u8::from(b));
                    let reg = byte(&chunk[..8]);
                    let val = byte(&chunk[8..]);
                    if reg != 0 {
                        out.push(((modules - 1 - slot) as u8, reg, val));
                    }
                }
                bits.clear();
            }
        }
        out
    }

    #[test]
    fn attach_wakes_and_sets_brightness() {
        let mut board = FakeBoard::new();
        let _display = LedSegment::new(&mut board, 4, 5, 6, 2, 9);
        let sent = packets(&board, 4, 6, 5);
        assert!(sent.contains(&(0, REG_SHUTDOWN, 1)));
        assert!(sent.contains(&(1, REG_SHUTDOWN, 1)));
        assert!(sent.contains(&(0, REG_INTENSITY, 9)));
        assert!(sent.contains(&(1, REG_INTENSITY, 9)));
    }

    #[test]
    fn text_is_right_aligned_with_points() {
        let mut board = FakeBoard::new();
        let mut display = LedSegment::new(&mut board, 4, 5, 6, 1, 15);
        board.digital_writes.clear();
        display.set_text(&mut board, 0, "12", 0b01, 0b11);
        let sent = packets(&board, 4, 6, 5);
        // Digit 1 shows '1'; digit 0 shows '2' with its point lit.
        assert!(sent.contains(&(0, 2, segments_for(b'1'))));
        assert!(sent.contains(&(0, 1, segments_for(b'2') | 0b1000_0000)));
    }

    #[test]
    fn mask_leaves_unaddressed_digits_alone() {
        let mut board = FakeBoard::new();
        let mut display = LedSegment::new(&mut board, 4, 5, 6, 1, 15);
        board.digital_writes.clear();
        display.set_text(&mut board, 0, "7", 0, 0b0000_0001);
        let sent = packets(&board, 4, 6, 5);
        assert_eq!(sent, vec![(0, 1, segments_for(b'7'))]);
    }

    #[test]
    fn out_of_range_module_is_ignored() {
        let mut board = FakeBoard::new();
        let mut display = LedSegment::new(&mut board, 4, 5, 6, 1, 15);
        board.digital_writes.clear();
        display.set_text(&mut board, 3, "8", 0, 0xFF);
        assert!(board.digital_writes.is_empty());
    }

    #[test]
    fn power_save_uses_the_shutdown_register() {
        let mut board = FakeBoard::new();
        let mut display = LedSegment::new(&mut board, 4, 5, 6, 1, 15);
        board.digital_writes.clear();
        display.power_save(&mut board, true);
        let sent = packets(&board, 4, 6, 5);
        assert_eq!(sent, vec![(0, REG_SHUTDOWN, 0)]);
        board.digital_writes.clear();
        display.power_save(&mut board, false);
        let sent = packets(&board, 4, 6, 5);
        assert_eq!(sent, vec![(0, REG_SHUTDOWN, 1)]);
    }
}
