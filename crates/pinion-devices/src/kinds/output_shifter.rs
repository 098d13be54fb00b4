//! Serial-in shift-register output banks (74HC595 style).

use pinion_core::BoardIo;
use smallvec::SmallVec;

use crate::device::{Device, PollContext};

/// A daisy chain of 8-bit serial-load shift registers.
///
/// The full bank state is kept in memory and reflushed after every
/// change; power-saving mode shifts out zeros without touching the
/// stored state, so leaving it restores the display exactly.
#[derive(Debug)]
pub struct OutputShifter {
    latch_pin: u8,
    clock_pin: u8,
    data_pin: u8,
    state: SmallVec<[u8; 4]>,
}

impl OutputShifter {
    /// Attach a shifter bank with every output cleared.
    pub fn new(
        io: &mut dyn BoardIo,
        latch_pin: u8,
        clock_pin: u8,
        data_pin: u8,
        module_count: u8,
    ) -> Self {
        let mut shifter = Self {
            latch_pin,
            clock_pin,
            data_pin,
            state: SmallVec::from_elem(0, module_count as usize),
        };
        shifter.flush(io);
        shifter
    }

    /// Set the listed output bits and reflush the chain.
    ///
    /// `pin_list` names bits as decimal indices, comma separated, with
    /// `a-b` ranges allowed (`"0,3-5"`). Out-of-range and malformed
    /// items are skipped.
    pub fn set_pins(&mut self, io: &mut dyn BoardIo, pin_list: &str, high: bool) {
        let limit = self.state.len() * 8;
        for bit in parse_pin_list(pin_list) {
            let bit = bit as usize;
            if bit >= limit {
                continue;
            }
            let byte = &mut self.state[bit / 8];
            if high {
                *byte |= 1 << (bit % 8);
            } else {
                *byte &= !(1 << (bit % 8));
            }
        }
        self.flush(io);
    }

    fn shift_out(&self, io: &mut dyn BoardIo, bytes: &[u8]) {
        io.write_digital(self.latch_pin, false);
        // Furthest register first so byte 0 ends up nearest the pin.
        for &byte in bytes.iter().rev() {
            for bit in (0..8).rev() {
                io.write_digital(self.data_pin, byte & (1 << bit) != 0);
                io.write_digital(self.clock_pin, true);
                io.write_digital(self.clock_pin, false);
            }
        }
        io.write_digital(self.latch_pin, true);
    }

    fn flush(&mut self, io: &mut dyn BoardIo) {
        let state = std::mem::take(&mut self.state);
        self.shift_out(io, &state);
        self.state = state;
    }

    fn blank(&mut self, io: &mut dyn BoardIo) {
        let zeros = SmallVec::<[u8; 4]>::from_elem(0, self.state.len());
        self.shift_out(io, &zeros);
    }
}

impl Device for OutputShifter {
    fn detach(&mut self, io: &mut dyn BoardIo) {
        self.blank(io);
    }

    fn update(&mut self, _ctx: &mut PollContext<'_>) {}

    fn power_save(&mut self, io: &mut dyn BoardIo, enabled: bool) {
        if enabled {
            self.blank(io);
        } else {
            self.flush(io);
        }
    }
}

/// Parse a host pin list (`"0,3-5,9"`) into bit indices.
///
/// Malformed items and descending ranges are skipped rather than
/// failing the whole list.
fn parse_pin_list(list: &str) -> SmallVec<[u8; 16]> {
    let mut bits = SmallVec::new();
    for item in list.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        if let Some((start, end)) = item.split_once('-') {
            let (Ok(start), Ok(end)) = (start.trim().parse::<u8>(), end.trim().parse::<u8>())
            else {
                continue;
            };
            for bit in start..=end {
                bits.push(bit);
            }
        } else if let Ok(bit) = item.parse::<u8>() {
            bits.push(bit);
        }
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinion_test_utils::FakeBoard;

    /// Reconstruct the bank state from the last full shift-out.
    fn last_shifted(board: &FakeBoard, data_pin: u8, clock_pin: u8, modules: usize) -> Vec<u8> {
        let mut levels = Vec::new();
        let mut pending = None;
        for &(pin, high) in &board.digital_writes {
            if pin == data_pin {
                pending = Some(high);
            } else if pin == clock_pin && high {
                levels.push(pending.take().unwrap_or(false));
            }
        }
        let bits = &levels[levels.len() - modules * 8..];
        let mut bytes = vec![0u8; modules];
        for (i, chunk) in bits.chunks(8).enumerate() {
            // Bytes leave the pin furthest-first, MSB-first.
            let byte = chunk
                .iter()
                .fold(0u8, |acc, &b| (acc << 1) | u8::from(b));
            bytes[modules - 1 - i] = byte;
        }
        bytes
    }

    #[test]
    fn set_pins_updates_the_addressed_bits() {
        let mut board = FakeBoard::new();
        let mut shifter = OutputShifter::new(&mut board, 2, 3, 4, 2);
        shifter.set_pins(&mut board, "0,3-5,9", true);
        assert_eq!(last_shifted(&board, 4, 3, 2), vec![0b0011_1001, 0b0000_0010]);

        shifter.set_pins(&mut board, "4", false);
        assert_eq!(last_shifted(&board, 4, 3, 2), vec![0b0010_1001, 0b0000_0010]);
    }

    #[test]
    fn out_of_range_bits_are_skipped() {
        let mut board = FakeBoard::new();
        let mut shifter = OutputShifter::new(&mut board, 2, 3, 4, 1);
        shifter.set_pins(&mut board, "6,15,200", true);
        assert_eq!(last_shifted(&board, 4, 3, 1), vec![0b0100_0000]);
    }

    #[test]
    fn power_save_blanks_without_losing_state() {
        let mut board = FakeBoard::new();
        let mut shifter = OutputShifter::new(&mut board, 2, 3, 4, 1);
        shifter.set_pins(&mut board, "0-7", true);
        shifter.power_save(&mut board, true);
        assert_eq!(last_shifted(&board, 4, 3, 1), vec![0]);
        shifter.power_save(&mut board, false);
        assert_eq!(last_shifted(&board, 4, 3, 1), vec![0xFF]);
    }

    #[test]
    fn pin_list_parsing_skips_garbage() {
        let bits = parse_pin_list("1, 3-5,x,7-,,9");
        assert_eq!(bits.as_slice(), &[1, 3, 4, 5, 9]);
    }
}
