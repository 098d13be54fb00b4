//! Parallel-in shift-register input banks (74HC165 style).

use pinion_core::{BoardIo, InputReport, NameRef};
use smallvec::SmallVec;

use crate::device::{Device, PollContext};

/// A daisy chain of 8-bit parallel-load shift registers.
///
/// Every update pass latches the parallel inputs and clocks the whole
/// chain in, then reports each channel whose state changed since the
/// previous pass. Channels are active low, numbered from the register
/// nearest the data pin.
#[derive(Debug)]
pub struct InputShifter {
    latch_pin: u8,
    clock_pin: u8,
    data_pin: u8,
    name: NameRef,
    state: SmallVec<[u8; 4]>,
}

impl InputShifter {
    /// Attach a shifter bank and take its initial reading as the
    /// baseline, so held switches do not fire at configuration time.
    pub fn new(
        io: &mut dyn BoardIo,
        latch_pin: u8,
        clock_pin: u8,
        data_pin: u8,
        module_count: u8,
        name: NameRef,
    ) -> Self {
        let mut shifter = Self {
            latch_pin,
            clock_pin,
            data_pin,
            name,
            state: SmallVec::from_elem(0xFF, module_count as usize),
        };
        shifter.state = shifter.read_chain(io);
        shifter
    }

    /// Number of channels in the chain.
    pub fn channel_count(&self) -> usize {
        self.state.len() * 8
    }

    fn read_chain(&self, io: &mut dyn BoardIo) -> SmallVec<[u8; 4]> {
        // Pulse the latch low to capture the parallel inputs.
        io.write_digital(self.latch_pin, false);
        io.write_digital(self.latch_pin, true);

        let mut chain = SmallVec::with_capacity(self.state.len());
        for _ in 0..self.state.len() {
            let mut byte = 0u8;
            for bit in (0..8).rev() {
                if io.read_digital(self.data_pin) {
                    byte |= 1 << bit;
                }
                io.write_digital(self.clock_pin, true);
                io.write_digital(self.clock_pin, false);
            }
            chain.push(byte);
        }
        chain
    }

    fn report_channel(ctx: &mut PollContext<'_>, name: NameRef, channel: u8, level: bool) {
        ctx.sink.report(InputReport::InputShifter {
            name: ctx.names.get(name),
            channel,
            // Active low, matching the pulled-up direct inputs.
            pressed: !level,
        });
    }
}

impl Device for InputShifter {
    fn detach(&mut self, _io: &mut dyn BoardIo) {}

    fn update(&mut self, ctx: &mut PollContext<'_>) {
        let fresh = self.read_chain(ctx.io);
        for (module, (&new_byte, &old_byte)) in fresh.iter().zip(self.state.iter()).enumerate() {
            let changed = new_byte ^ old_byte;
            if changed == 0 {
                continue;
            }
            for bit in 0..8u8 {
                if changed & (1 << bit) != 0 {
                    let channel = module as u8 * 8 + bit;
                    let level = new_byte & (1 << bit) != 0;
                    Self::report_channel(ctx, self.name, channel, level);
                }
            }
        }
        self.state = fresh;
    }

    fn retrigger(&mut self, ctx: &mut PollContext<'_>) {
        self.state = self.read_chain(ctx.io);
        for (module, &byte) in self.state.iter().enumerate() {
            for bit in 0..8u8 {
                let channel = module as u8 * 8 + bit;
                let level = byte & (1 << bit) != 0;
                Self::report_channel(ctx, self.name, channel, level);
            }
        }
    }
}
