//! Concrete device kinds.
//!
//! Button, output, and encoder are part of every build; the remaining
//! kinds are compiled in by Cargo feature so a small board target pays
//! only for what it wires up.

pub mod button;
pub mod encoder;
pub mod output;

#[cfg(feature = "analog")]
pub mod analog;
#[cfg(feature = "custom-device")]
pub mod custom;
#[cfg(feature = "digin-mux")]
pub mod digin_mux;
#[cfg(feature = "input-shifter")]
pub mod input_shifter;
#[cfg(feature = "lcd")]
pub mod lcd;
#[cfg(feature = "segment")]
pub mod led_segment;
#[cfg(feature = "output-shifter")]
pub mod output_shifter;
#[cfg(feature = "servo")]
pub mod servo;
#[cfg(feature = "stepper")]
pub mod stepper;

pub use button::Button;
pub use encoder::Encoder;
pub use output::Output;

#[cfg(feature = "analog")]
pub use analog::AnalogInput;
#[cfg(feature = "custom-device")]
pub use custom::CustomDevice;
#[cfg(feature = "digin-mux")]
pub use digin_mux::DigInMux;
#[cfg(feature = "input-shifter")]
pub use input_shifter::InputShifter;
#[cfg(feature = "lcd")]
pub use lcd::LcdDisplay;
#[cfg(feature = "segment")]
pub use led_segment::LedSegment;
#[cfg(feature = "output-shifter")]
pub use output_shifter::OutputShifter;
#[cfg(feature = "servo")]
pub use servo::Servo;
#[cfg(feature = "stepper")]
pub use stepper::Stepper;
