//! Push buttons on single digital input pins.

use pinion_core::{BoardIo, InputReport, NameRef};

use crate::device::{Device, PollContext};

/// A debounced-by-polling push button.
///
/// The input is active low (pulled-up pin, switch to ground). A report
/// is emitted only when the observed state differs from the last
/// reported state, so a held button produces exactly one press report.
#[derive(Debug)]
pub struct Button {
    pin: u8,
    name: NameRef,
    last_pressed: bool,
}

impl Button {
    /// Attach a button and take its initial reading as the baseline.
    pub fn new(io: &mut dyn BoardIo, pin: u8, name: NameRef) -> Self {
        let last_pressed = !io.read_digital(pin);
        Self {
            pin,
            name,
            last_pressed,
        }
    }

    /// The input pin this button watches.
    pub fn pin(&self) -> u8 {
        self.pin
    }

    fn read(&self, io: &mut dyn BoardIo) -> bool {
        !io.read_digital(self.pin)
    }
}

impl Device for Button {
    fn detach(&mut self, _io: &mut dyn BoardIo) {}

    fn update(&mut self, ctx: &mut PollContext<'_>) {
        let pressed = self.read(ctx.io);
        if pressed != self.last_pressed {
            self.last_pressed = pressed;
            ctx.sink.report(InputReport::Button {
                name: ctx.names.get(self.name),
                pressed,
            });
        }
    }

    fn retrigger(&mut self, ctx: &mut PollContext<'_>) {
        let pressed = self.read(ctx.io);
        self.last_pressed = pressed;
        ctx.sink.report(InputReport::Button {
            name: ctx.names.get(self.name),
            pressed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinion_core::NameBuffer;
    use pinion_test_utils::{FakeBoard, OwnedReport, RecordingSink};

    fn ctx<'a>(
        board: &'a mut FakeBoard,
        names: &'a NameBuffer,
        sink: &'a mut RecordingSink,
    ) -> PollContext<'a> {
        PollContext {
            io: board,
            names,
            now_ms: 0,
            sink,
        }
    }

    #[test]
    fn reports_once_per_edge() {
        let mut board = FakeBoard::new();
        let mut names = NameBuffer::new(16);
        let name = names.push(b"GEAR").unwrap();
        let mut button = Button::new(&mut board, 3, name);
        let mut sink = RecordingSink::new();

        button.update(&mut ctx(&mut board, &names, &mut sink));
        assert!(sink.reports.is_empty());

        board.press(3);
        button.update(&mut ctx(&mut board, &names, &mut sink));
        button.update(&mut ctx(&mut board, &names, &mut sink));
        assert_eq!(
            sink.reports,
            vec![OwnedReport::Button {
                name: "GEAR".into(),
                pressed: true,
            }]
        );

        board.release(3);
        button.update(&mut ctx(&mut board, &names, &mut sink));
        assert_eq!(sink.reports.len(), 2);
        assert_eq!(
            sink.reports[1],
            OwnedReport::Button {
                name: "GEAR".into(),
                pressed: false,
            }
        );
    }

    #[test]
    fn retrigger_reports_unconditionally() {
        let mut board = FakeBoard::new();
        let names = NameBuffer::new(0);
        let mut button = Button::new(&mut board, 5, NameRef::EMPTY);
        let mut sink = RecordingSink::new();

        button.retrigger(&mut ctx(&mut board, &names, &mut sink));
        assert_eq!(
            sink.reports,
            vec![OwnedReport::Button {
                name: String::new(),
                pressed: false,
            }]
        );
    }

    #[test]
    fn press_at_attach_time_is_the_baseline() {
        let mut board = FakeBoard::new();
        board.press(2);
        let names = NameBuffer::new(0);
        let mut button = Button::new(&mut board, 2, NameRef::EMPTY);
        let mut sink = RecordingSink::new();

        // Already pressed at attach; no edge, no report.
        button.update(&mut ctx(&mut board, &names, &mut sink));
        assert!(sink.reports.is_empty());
    }
}
