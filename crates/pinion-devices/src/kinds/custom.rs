//! User-defined devices behind opaque configuration references.

use pinion_core::{BoardIo, MessageId};

use crate::device::{Device, PollContext};

/// A device whose driver lives outside this workspace.
///
/// The firmware only routes: host messages are handed over verbatim
/// (directly, or through the cross-core channel when a second core is
/// attached) and power-saving transitions are rewritten as the
/// reserved [`POWER_SAVE`](MessageId::POWER_SAVE) message. The three
/// references are opaque offsets into persistent storage that only the
/// external driver can interpret.
#[derive(Debug)]
pub struct CustomDevice {
    pin_ref: u16,
    type_ref: u16,
    config_ref: u16,
    last_message: Option<(MessageId, String)>,
}

impl CustomDevice {
    /// Register a custom device by its storage references.
    pub fn new(pin_ref: u16, type_ref: u16, config_ref: u16) -> Self {
        Self {
            pin_ref,
            type_ref,
            config_ref,
            last_message: None,
        }
    }

    /// The opaque storage references, in declaration order.
    pub fn refs(&self) -> (u16, u16, u16) {
        (self.pin_ref, self.type_ref, self.config_ref)
    }

    /// The most recent message delivered to this device.
    pub fn last_message(&self) -> Option<(MessageId, &str)> {
        self.last_message.as_ref().map(|(id, p)| (*id, p.as_str()))
    }
}

impl Device for CustomDevice {
    fn detach(&mut self, _io: &mut dyn BoardIo) {
        self.last_message = None;
    }

    fn update(&mut self, _ctx: &mut PollContext<'_>) {}

    fn set(&mut self, _io: &mut dyn BoardIo, message_id: MessageId, payload: &str) {
        self.last_message = Some((message_id, payload.to_string()));
    }

    fn power_save(&mut self, io: &mut dyn BoardIo, enabled: bool) {
        let payload = if enabled { "1" } else { "0" };
        self.set(io, MessageId::POWER_SAVE, payload);
    }
}
