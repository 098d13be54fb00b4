//! The bounded handoff channel toward the custom-device core.
//!
//! User-defined devices may run on a second core so a slow driver
//! cannot stall the polling loop. The control side sends typed
//! [`CoreMessage`]s over a bounded channel; the worker side drains
//! them between its own update passes. A full channel blocks the
//! sender rather than dropping a message.

use crossbeam_channel::{bounded, Receiver, Sender};
use pinion_core::{BoardIo, MessageId};
use pinion_devices::kinds::CustomDevice;
use pinion_devices::Registry;

/// Default channel depth, enough to ride out one config rebuild.
pub const DEFAULT_DEPTH: usize = 16;

/// One message to the custom-device worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreMessage {
    /// Deliver a host value to one custom device.
    Dispatch {
        /// Registry index of the target device.
        device: u8,
        /// Driver-defined message id.
        message_id: MessageId,
        /// Driver-defined payload, already unescaped.
        payload: String,
    },
    /// Enter or leave power-saving mode.
    PowerSave(bool),
    /// Hold device updates; queued while storage is rewritten.
    Stop,
    /// Resume device updates after a hold.
    Resume,
}

impl CoreMessage {
    /// Build the message for one host dispatch, folding the reserved
    /// message ids into their control variants.
    pub fn from_dispatch(device: u8, message_id: MessageId, payload: &str) -> CoreMessage {
        match message_id {
            MessageId::UPDATE_HOLD => {
                if payload == "0" {
                    CoreMessage::Resume
                } else {
                    CoreMessage::Stop
                }
            }
            MessageId::POWER_SAVE => CoreMessage::PowerSave(payload != "0"),
            _ => CoreMessage::Dispatch {
                device,
                message_id,
                payload: payload.to_string(),
            },
        }
    }
}

/// Create the handoff channel with the given depth.
pub fn handoff_channel(depth: usize) -> (Sender<CoreMessage>, Receiver<CoreMessage>) {
    bounded(depth)
}

/// The receiving half of the handoff, run by the second core.
///
/// Holds the custom-device registry for that core and applies queued
/// messages between update passes. While held (after a [`Stop`]),
/// dispatches and power transitions are dropped; the sender rebuilds
/// the registry before it resumes, so stale messages must not land on
/// fresh devices.
///
/// [`Stop`]: CoreMessage::Stop
#[derive(Debug)]
pub struct HandoffWorker {
    receiver: Receiver<CoreMessage>,
    held: bool,
}

impl HandoffWorker {
    /// Wrap the receiving half of the channel.
    pub fn new(receiver: Receiver<CoreMessage>) -> Self {
        Self {
            receiver,
            held: false,
        }
    }

    /// Whether updates are currently held.
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Drain every queued message into the registry.
    ///
    /// Non-blocking; returns the number of messages applied (holds and
    /// resumes included). Call once per worker loop pass, then run the
    /// registry update if not held.
    pub fn service(&mut self, customs: &mut Registry<CustomDevice>, io: &mut dyn BoardIo) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.receiver.try_recv() {
            applied += 1;
            match message {
                CoreMessage::Stop => self.held = true,
                CoreMessage::Resume => self.held = false,
                CoreMessage::PowerSave(enabled) => {
                    if !self.held {
                        customs.power_save(io, enabled);
                    }
                }
                CoreMessage::Dispatch {
                    device,
                    message_id,
                    payload,
                } => {
                    if !self.held {
                        customs.set(io, device as usize, message_id, &payload);
                    }
                }
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinion_arena::DeviceMemory;
    use pinion_test_utils::FakeBoard;

    fn registry_with_one() -> Registry<CustomDevice> {
        let mut memory = DeviceMemory::new(1024);
        let mut registry =
            Registry::with_reservation(memory.reserve::<CustomDevice>(2).unwrap());
        let _ = registry.add(CustomDevice::new(1, 2, 3));
        registry
    }

    #[test]
    fn dispatch_reaches_the_addressed_device() {
        let (tx, rx) = handoff_channel(4);
        let mut worker = HandoffWorker::new(rx);
        let mut customs = registry_with_one();
        let mut board = FakeBoard::new();

        tx.send(CoreMessage::from_dispatch(0, MessageId(7), "330"))
            .unwrap();
        assert_eq!(worker.service(&mut customs, &mut board), 1);
        assert_eq!(
            customs.get(0).unwrap().last_message(),
            Some((MessageId(7), "330"))
        );
    }

    #[test]
    fn reserved_ids_fold_into_control_variants() {
        assert_eq!(
            CoreMessage::from_dispatch(0, MessageId::UPDATE_HOLD, "1"),
            CoreMessage::Stop
        );
        assert_eq!(
            CoreMessage::from_dispatch(0, MessageId::UPDATE_HOLD, "0"),
            CoreMessage::Resume
        );
        assert_eq!(
            CoreMessage::from_dispatch(0, MessageId::POWER_SAVE, "1"),
            CoreMessage::PowerSave(true)
        );
    }

    #[test]
    fn held_worker_drops_dispatches_until_resume() {
        let (tx, rx) = handoff_channel(8);
        let mut worker = HandoffWorker::new(rx);
        let mut customs = registry_with_one();
        let mut board = FakeBoard::new();

        tx.send(CoreMessage::Stop).unwrap();
        tx.send(CoreMessage::Dispatch {
            device: 0,
            message_id: MessageId(1),
            payload: "dropped".into(),
        })
        .unwrap();
        tx.send(CoreMessage::Resume).unwrap();
        tx.send(CoreMessage::Dispatch {
            device: 0,
            message_id: MessageId(2),
            payload: "applied".into(),
        })
        .unwrap();

        worker.service(&mut customs, &mut board);
        assert_eq!(
            customs.get(0).unwrap().last_message(),
            Some((MessageId(2), "applied"))
        );
    }

    #[test]
    fn messages_cross_threads_in_order() {
        let (tx, rx) = handoff_channel(2);
        let producer = std::thread::spawn(move || {
            for i in 0..20i16 {
                tx.send(CoreMessage::Dispatch {
                    device: 0,
                    message_id: MessageId(i),
                    payload: i.to_string(),
                })
                .unwrap();
            }
        });

        let mut worker = HandoffWorker::new(rx);
        let mut customs = registry_with_one();
        let mut board = FakeBoard::new();
        let mut applied = 0;
        while applied < 20 {
            applied += worker.service(&mut customs, &mut board);
        }
        producer.join().unwrap();
        assert_eq!(
            customs.get(0).unwrap().last_message(),
            Some((MessageId(19), "19"))
        );
    }

    #[test]
    fn out_of_range_dispatch_is_dropped() {
        let (tx, rx) = handoff_channel(2);
        let mut worker = HandoffWorker::new(rx);
        let mut customs = registry_with_one();
        let mut board = FakeBoard::new();
        tx.send(CoreMessage::Dispatch {
            device: 9,
            message_id: MessageId(1),
            payload: "x".into(),
        })
        .unwrap();
        worker.service(&mut customs, &mut board);
        assert_eq!(customs.get(0).unwrap().last_message(), None);
    }
}
