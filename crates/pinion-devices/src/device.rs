//! The uniform device contract.

use pinion_core::{BoardIo, MessageId, NameBuffer, ReportSink};

/// Shared state threaded through one update pass.
///
/// Bundles the board I/O seam, the shared name buffer (read-only while
/// devices run), the loop timestamp, and the report sink, so every
/// [`Device::update`] sees one coherent view without devices holding
/// references of their own.
pub struct PollContext<'a> {
    /// Pin-level board access.
    pub io: &'a mut dyn BoardIo,
    /// The shared name buffer; devices resolve their [`NameRef`]s here.
    ///
    /// [`NameRef`]: pinion_core::NameRef
    pub names: &'a NameBuffer,
    /// Milliseconds since boot at the start of this pass.
    pub now_ms: u32,
    /// Destination for input-change reports.
    pub sink: &'a mut dyn ReportSink,
}

/// One live device instance.
///
/// Attach is construction: a device configures its pins in `new` and
/// is live from the moment its registry accepts it. All methods must
/// be non-blocking; `update` is called every control-loop pass and
/// must do a bounded amount of work.
pub trait Device {
    /// Release the device's hardware resources.
    ///
    /// Called exactly once per instance, when the owning registry is
    /// cleared for a configuration rebuild.
    fn detach(&mut self, io: &mut dyn BoardIo);

    /// One polling step: debounce, average, animate, or step.
    fn update(&mut self, ctx: &mut PollContext<'_>);

    /// Deliver a host value to an output-capable device.
    ///
    /// Input-only kinds keep the default no-op.
    fn set(&mut self, io: &mut dyn BoardIo, message_id: MessageId, payload: &str) {
        let _ = (io, message_id, payload);
    }

    /// Enter or leave power-saving mode.
    ///
    /// Kinds with no power-saving behavior keep the default no-op.
    fn power_save(&mut self, io: &mut dyn BoardIo, enabled: bool) {
        let _ = (io, enabled);
    }

    /// Re-evaluate and report the current state unconditionally.
    ///
    /// Input kinds override this so the host learns the physical state
    /// right after a fresh configuration upload. Output kinds keep the
    /// default no-op.
    fn retrigger(&mut self, ctx: &mut PollContext<'_>) {
        let _ = ctx;
    }
}
