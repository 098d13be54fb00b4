//! Character LCDs on the I2C bus.

use pinion_core::BoardIo;

use crate::device::{Device, PollContext};

/// A character LCD addressed over I2C.
///
/// The pin seam carries no bus transactions; the board support layer
/// owns the I2C peripheral and renders from [`LcdDisplay::lines`]
/// after each command. The device tracks the framed text and the
/// backlight state so a wake after power saving redraws exactly what
/// the host last sent.
#[derive(Debug)]
pub struct LcdDisplay {
    address: u8,
    cols: u8,
    rows: u8,
    lines: Vec<String>,
    lit: bool,
}

impl LcdDisplay {
    /// Attach an LCD, blank and lit.
    pub fn new(address: u8, cols: u8, rows: u8) -> Self {
        Self {
            address,
            cols,
            rows,
            lines: vec![String::new(); rows as usize],
            lit: true,
        }
    }

    /// Replace the framed text.
    ///
    /// The host sends all rows as one string; it is cut into
    /// `cols`-sized rows here and excess text is dropped.
    pub fn set_text(&mut self, text: &str) {
        let cols = self.cols as usize;
        let mut chars = text.chars();
        for line in &mut self.lines {
            line.clear();
            line.extend(chars.by_ref().take(cols));
        }
    }

    /// The I2C address of the controller.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// The framed rows, each at most `cols` characters.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether the backlight is on.
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl Device for LcdDisplay {
    fn detach(&mut self, _io: &mut dyn BoardIo) {
        self.lit = false;
        for line in &mut self.lines {
            line.clear();
        }
    }

    fn update(&mut self, _ctx: &mut PollContext<'_>) {}

    fn power_save(&mut self, _io: &mut dyn BoardIo, enabled: bool) {
        self.lit = !enabled;
    }
}
