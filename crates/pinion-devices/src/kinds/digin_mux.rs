//! Multiplexed digital input banks.

use pinion_core::{BoardIo, InputReport, NameRef};

use crate::device::{Device, PollContext};

const MAX_CHANNELS: u16 = 16;

/// A bank of digital inputs read through an analog multiplexer.
///
/// Each update pass walks every channel: the selector pins address the
/// channel and the shared data pin is sampled. Channels are active low
/// and changes report like direct buttons, with the channel index
/// attached.
#[derive(Debug)]
pub struct DigInMux {
    data_pin: u8,
    select_pins: [u8; 4],
    name: NameRef,
    channels: u8,
    state: u16,
}

impl DigInMux {
    /// Attach a mux bank and take its initial scan as the baseline.
    pub fn new(
        io: &mut dyn BoardIo,
        data_pin: u8,
        select_pins: [u8; 4],
        register_count: u8,
        name: NameRef,
    ) -> Self {
        let channels = (u16::from(register_count) * 8).min(MAX_CHANNELS) as u8;
        let mut mux = Self {
            data_pin,
            select_pins,
            name,
            channels,
            state: 0,
        };
        mux.state = mux.scan(io);
        mux
    }

    /// Number of scanned channels.
    pub fn channel_count(&self) -> u8 {
        self.channels
    }

    fn scan(&self, io: &mut dyn BoardIo) -> u16 {
        let mut levels = 0u16;
        for channel in 0..self.channels {
            for (bit, &pin) in self.select_pins.iter().enumerate() {
                io.write_digital(pin, channel & (1 << bit) != 0);
            }
            if io.read_digital(self.data_pin) {
                levels |= 1 << channel;
            }
        }
        levels
    }

    fn report_channel(ctx: &mut PollContext<'_>, name: NameRef, channel: u8, level: bool) {
        ctx.sink.report(InputReport::DigInMux {
            name: ctx.names.get(name),
            channel,
            pressed: !level,
        });
    }
}

impl Device for DigInMux {
    fn detach(&mut self, _io: &mut dyn BoardIo) {}

    fn update(&mut self, ctx: &mut PollContext<'_>) {
        let fresh = self.scan(ctx.io);
        let changed = fresh ^ self.state;
        self.state = fresh;
        if changed == 0 {
            return;
        }
        for channel in 0..self.channels {
            if changed & (1 << channel) != 0 {
                let level = fresh & (1 << channel) != 0;
                Self::report_channel(ctx, self.name, channel, level);
            }
        }
    }

    fn retrigger(&mut self, ctx: &mut PollContext<'_>) {
        self.state = self.scan(ctx.io);
        for channel in 0..self.channels {
            let level = self.state & (1 << channel) != 0;
            Self::report_channel(ctx, self.name, channel, level);
        }
    }
}
