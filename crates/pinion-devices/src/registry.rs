//! The generic fixed-capacity device registry.

use pinion_arena::Reservation;
use pinion_core::{BoardIo, MessageId};

use crate::device::{Device, PollContext};

/// Result of a registry [`add`](Registry::add).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum AddOutcome {
    /// The device occupies the next free slot.
    Added,
    /// The registry is at capacity; the device was dropped. This is a
    /// normal outcome, not an error — the stream may describe more
    /// instances than this board allows.
    Ignored,
}

/// The live instances of one device kind.
///
/// Capacity comes from an arena [`Reservation`] made during the config
/// sizing pass and never changes afterwards. `count` only grows via
/// [`add`](Registry::add) and only returns to zero via
/// [`clear`](Registry::clear); there is no per-instance removal.
#[derive(Debug)]
pub struct Registry<D> {
    slots: Vec<D>,
    capacity: usize,
}

impl<D> Registry<D> {
    /// A registry with capacity 0.
    ///
    /// Used when the arena could not fit this kind: every `add` is
    /// ignored and the kind stays inactive for this configuration.
    pub fn empty() -> Self {
        Self {
            slots: Vec::new(),
            capacity: 0,
        }
    }

    /// Build a registry over a granted arena region.
    pub fn with_reservation(reservation: Reservation<D>) -> Self {
        let capacity = reservation.capacity();
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no instances are registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum instance count for this configuration.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The instance at `index`, if registered.
    pub fn get(&self, index: usize) -> Option<&D> {
        self.slots.get(index)
    }

    /// Mutable access to the instance at `index`, if registered.
    ///
    /// Out-of-range indices yield `None`; command handlers rely on
    /// this to turn bad host indices into no-ops.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut D> {
        self.slots.get_mut(index)
    }

    /// Iterate over the registered instances.
    pub fn iter(&self) -> impl Iterator<Item = &D> {
        self.slots.iter()
    }
}

impl<D: Device> Registry<D> {
    /// Register a device in the next free slot.
    pub fn add(&mut self, device: D) -> AddOutcome {
        if self.slots.len() == self.capacity {
            return AddOutcome::Ignored;
        }
        self.slots.push(device);
        AddOutcome::Added
    }

    /// Detach every instance and reset the count to zero.
    ///
    /// Idempotent; safe to call on an empty registry.
    pub fn clear(&mut self, io: &mut dyn BoardIo) {
        for device in &mut self.slots {
            device.detach(io);
        }
        self.slots.clear();
    }

    /// Run one polling step on every instance. O(count), non-blocking.
    pub fn update(&mut self, ctx: &mut PollContext<'_>) {
        for device in &mut self.slots {
            device.update(ctx);
        }
    }

    /// Deliver a host value to the instance at `index`.
    ///
    /// A no-op when `index` is out of range.
    pub fn set(&mut self, io: &mut dyn BoardIo, index: usize, message_id: MessageId, payload: &str) {
        if let Some(device) = self.slots.get_mut(index) {
            device.set(io, message_id, payload);
        }
    }

    /// Broadcast a power-saving transition to every instance.
    pub fn power_save(&mut self, io: &mut dyn BoardIo, enabled: bool) {
        for device in &mut self.slots {
            device.power_save(io, enabled);
        }
    }

    /// Ask every instance to re-report its current state.
    pub fn retrigger(&mut self, ctx: &mut PollContext<'_>) {
        for device in &mut self.slots {
            device.retrigger(ctx);
        }
    }
}

impl<D> Default for Registry<D> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinion_arena::DeviceMemory;
    use pinion_core::NameBuffer;
    use pinion_test_utils::{FakeBoard, RecordingSink};

    /// Minimal device that counts its lifecycle calls.
    #[derive(Debug, Default)]
    struct Probe {
        detached: u32,
        updated: u32,
        set_calls: Vec<(i16, String)>,
    }

    impl Device for Probe {
        fn detach(&mut self, _io: &mut dyn BoardIo) {
            self.detached += 1;
        }

        fn update(&mut self, _ctx: &mut PollContext<'_>) {
            self.updated += 1;
        }

        fn set(&mut self, _io: &mut dyn BoardIo, message_id: MessageId, payload: &str) {
            self.set_calls.push((message_id.0, payload.to_string()));
        }
    }

    fn registry_of(capacity: usize) -> Registry<Probe> {
        let mut memory = DeviceMemory::new(4096);
        Registry::with_reservation(memory.reserve::<Probe>(capacity).unwrap())
    }

    #[test]
    fn count_never_exceeds_capacity() {
        let mut registry = registry_of(2);
        assert_eq!(registry.add(Probe::default()), AddOutcome::Added);
        assert_eq!(registry.add(Probe::default()), AddOutcome::Added);
        assert_eq!(registry.add(Probe::default()), AddOutcome::Ignored);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn add_beyond_capacity_does_not_corrupt_existing_entries() {
        let mut registry = registry_of(1);
        let _ = registry.add(Probe::default());
        let mut board = FakeBoard::new();
        registry.set(&mut board, 0, MessageId(1), "a");
        let _ = registry.add(Probe::default());
        registry.set(&mut board, 0, MessageId(2), "b");
        let calls = &registry.get(0).unwrap().set_calls;
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn clear_detaches_each_instance_and_is_idempotent() {
        let mut registry = registry_of(3);
        let _ = registry.add(Probe::default());
        let _ = registry.add(Probe::default());
        let mut board = FakeBoard::new();
        registry.clear(&mut board);
        assert_eq!(registry.len(), 0);
        registry.clear(&mut board);
        assert_eq!(registry.len(), 0);
        // Capacity survives a clear; the registry can be refilled.
        assert_eq!(registry.add(Probe::default()), AddOutcome::Added);
    }

    #[test]
    fn out_of_range_set_is_a_noop() {
        let mut registry = registry_of(1);
        let _ = registry.add(Probe::default());
        let mut board = FakeBoard::new();
        registry.set(&mut board, 1, MessageId(0), "x");
        registry.set(&mut board, usize::MAX, MessageId(0), "x");
        assert!(registry.get(0).unwrap().set_calls.is_empty());
    }

    #[test]
    fn update_touches_every_instance() {
        let mut registry = registry_of(4);
        for _ in 0..3 {
            let _ = registry.add(Probe::default());
        }
        let mut board = FakeBoard::new();
        let names = NameBuffer::new(0);
        let mut sink = RecordingSink::new();
        let mut ctx = PollContext {
            io: &mut board,
            names: &names,
            now_ms: 0,
            sink: &mut sink,
        };
        registry.update(&mut ctx);
        assert!(registry.iter().all(|p| p.updated == 1));
    }

    #[test]
    fn zero_capacity_registry_ignores_everything() {
        let mut registry: Registry<Probe> = Registry::empty();
        assert_eq!(registry.add(Probe::default()), AddOutcome::Ignored);
        assert_eq!(registry.capacity(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn len_is_min_of_adds_and_capacity(capacity in 0usize..16, adds in 0usize..48) {
                let mut registry = registry_of(capacity);
                for _ in 0..adds {
                    let _ = registry.add(Probe::default());
                }
                prop_assert_eq!(registry.len(), adds.min(capacity));
                prop_assert!(registry.len() <= registry.capacity());
            }
        }
    }
}
