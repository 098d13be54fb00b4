//! Averaged analog inputs.

use pinion_core::{BoardIo, InputReport, NameRef};

use crate::device::{Device, PollContext};

const SAMPLE_COUNT: usize = 8;
const SAMPLE_INTERVAL_MS: u32 = 10;

/// An analog axis smoothed over a rolling sample window.
///
/// One raw reading is taken at most every 10ms; the reported value is
/// the average of the last eight readings. A report is emitted only
/// when the average moves at least `sensitivity` counts away from the
/// last reported value, which keeps a noisy idle axis silent.
#[derive(Debug)]
pub struct AnalogInput {
    pin: u8,
    sensitivity: u8,
    name: NameRef,
    samples: [u16; SAMPLE_COUNT],
    next_slot: usize,
    last_sample_ms: u32,
    last_reported: u16,
}

impl AnalogInput {
    /// Attach an analog input, seeding the window with one reading.
    pub fn new(io: &mut dyn BoardIo, pin: u8, sensitivity: u8, name: NameRef) -> Self {
        let initial = io.read_analog(pin);
        Self {
            pin,
            sensitivity,
            name,
            samples: [initial; SAMPLE_COUNT],
            next_slot: 0,
            last_sample_ms: 0,
            last_reported: initial,
        }
    }

    fn average(&self) -> u16 {
        let sum: u32 = self.samples.iter().map(|&s| u32::from(s)).sum();
        (sum / SAMPLE_COUNT as u32) as u16
    }
}

impl Device for AnalogInput {
    fn detach(&mut self, _io: &mut dyn BoardIo) {}

    fn update(&mut self, ctx: &mut PollContext<'_>) {
        if ctx.now_ms.wrapping_sub(self.last_sample_ms) < SAMPLE_INTERVAL_MS {
            return;
        }
        self.last_sample_ms = ctx.now_ms;
        self.samples[self.next_slot] = ctx.io.read_analog(self.pin);
        self.next_slot = (self.next_slot + 1) % SAMPLE_COUNT;

        let average = self.average();
        let moved = average.abs_diff(self.last_reported);
        if moved >= u16::from(self.sensitivity.max(1)) {
            self.last_reported = average;
            ctx.sink.report(InputReport::Analog {
                name: ctx.names.get(self.name),
                value: average,
            });
        }
    }

    fn retrigger(&mut self, ctx: &mut PollContext<'_>) {
        let average = self.average();
        self.last_reported = average;
        ctx.sink.report(InputReport::Analog {
            name: ctx.names.get(self.name),
            value: average,
        });
    }
}
