//! Quadrature rotary encoders.

use pinion_core::{BoardIo, InputReport, NameRef};

use crate::device::{Device, PollContext};

/// Signed movement per valid quadrature transition, indexed by
/// `(previous_state << 2) | current_state`. Invalid transitions
/// (bounce, skipped states) contribute zero.
const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// Quadrature transitions per mechanical detent, by detent profile.
fn transitions_per_detent(encoder_type: u8) -> i16 {
    match encoder_type {
        0 => 4,
        1 => 2,
        _ => 1,
    }
}

/// A two-pin quadrature encoder.
///
/// Transitions are accumulated until a full detent is reached, then
/// reported as a single signed step. The detent profile selects how
/// many quadrature transitions one detent spans.
#[derive(Debug)]
pub struct Encoder {
    pin_a: u8,
    pin_b: u8,
    name: NameRef,
    per_detent: i16,
    state: u8,
    accum: i16,
}

impl Encoder {
    /// Attach an encoder and latch its current quadrature state.
    pub fn new(io: &mut dyn BoardIo, pin_a: u8, pin_b: u8, encoder_type: u8, name: NameRef) -> Self {
        let state = Self::sample(io, pin_a, pin_b);
        Self {
            pin_a,
            pin_b,
            name,
            per_detent: transitions_per_detent(encoder_type),
            state,
            accum: 0,
        }
    }

    fn sample(io: &mut dyn BoardIo, pin_a: u8, pin_b: u8) -> u8 {
        (u8::from(io.read_digital(pin_a)) << 1) | u8::from(io.read_digital(pin_b))
    }
}

impl Device for Encoder {
    fn detach(&mut self, _io: &mut dyn BoardIo) {}

    fn update(&mut self, ctx: &mut PollContext<'_>) {
        let current = Self::sample(ctx.io, self.pin_a, self.pin_b);
        let index = ((self.state << 2) | current) as usize;
        self.state = current;
        self.accum += i16::from(TRANSITIONS[index]);
        if self.accum.abs() >= self.per_detent {
            let delta = if self.accum > 0 { 1i8 } else { -1i8 };
            self.accum = 0;
            ctx.sink.report(InputReport::Encoder {
                name: ctx.names.get(self.name),
                delta,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinion_core::NameBuffer;
    use pinion_test_utils::{FakeBoard, OwnedReport, RecordingSink};

    /// Gray-code sequence for one clockwise detent from state 0b11.
    const CLOCKWISE: [(bool, bool); 4] = [(false, true), (false, false), (true, false), (true, true)];

    /// The same detent walked in the opposite direction.
    const COUNTER_CLOCKWISE: [(bool, bool); 4] =
        [(true, false), (false, false), (false, true), (true, true)];

    fn step(
        encoder: &mut Encoder,
        board: &mut FakeBoard,
        names: &NameBuffer,
        sink: &mut RecordingSink,
        a: bool,
        b: bool,
    ) {
        board.set_digital(encoder.pin_a, a);
        board.set_digital(encoder.pin_b, b);
        let mut ctx = PollContext {
            io: board,
            names,
            now_ms: 0,
            sink,
        };
        encoder.update(&mut ctx);
    }

    #[test]
    fn full_detent_reports_one_step() {
        let mut board = FakeBoard::new();
        let mut names = NameBuffer::new(16);
        let name = names.push(b"HDG").unwrap();
        let mut encoder = Encoder::new(&mut board, 2, 3, 0, name);
        let mut sink = RecordingSink::new();

        for (a, b) in CLOCKWISE {
            step(&mut encoder, &mut board, &names, &mut sink, a, b);
        }
        assert_eq!(
            sink.reports,
            vec![OwnedReport::Encoder {
                name: "HDG".into(),
                delta: 1,
            }]
        );
    }

    #[test]
    fn reverse_rotation_reports_negative() {
        let mut board = FakeBoard::new();
        let names = NameBuffer::new(0);
        let mut encoder = Encoder::new(&mut board, 2, 3, 0, NameRef::EMPTY);
        let mut sink = RecordingSink::new();

        for (a, b) in COUNTER_CLOCKWISE {
            step(&mut encoder, &mut board, &names, &mut sink, a, b);
        }
        assert_eq!(sink.reports.len(), 1);
        assert_eq!(
            sink.reports[0],
            OwnedReport::Encoder {
                name: String::new(),
                delta: -1,
            }
        );
    }

    #[test]
    fn half_detent_profile_reports_twice_per_cycle() {
        let mut board = FakeBoard::new();
        let names = NameBuffer::new(0);
        let mut encoder = Encoder::new(&mut board, 2, 3, 1, NameRef::EMPTY);
        let mut sink = RecordingSink::new();

        for (a, b) in CLOCKWISE {
            step(&mut encoder, &mut board, &names, &mut sink, a, b);
        }
        assert_eq!(sink.reports.len(), 2);
    }

    #[test]
    fn bounce_on_one_pin_nets_nothing() {
        let mut board = FakeBoard::new();
        let names = NameBuffer::new(0);
        let mut encoder = Encoder::new(&mut board, 2, 3, 2, NameRef::EMPTY);
        let mut sink = RecordingSink::new();

        // A dips and returns: +1 then -1 at the finest profile.
        step(&mut encoder, &mut board, &names, &mut sink, false, true);
        step(&mut encoder, &mut board, &names, &mut sink, true, true);
        let total: i32 = sink
            .reports
            .iter()
            .map(|r| match r {
                OwnedReport::Encoder { delta, .. } => i32::from(*delta),
                _ => 0,
            })
            .sum();
        assert_eq!(total, 0);
    }
}
