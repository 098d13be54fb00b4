//! Power-saving state tracking.

/// Idle clock behind the power-saving broadcast.
///
/// Every received host command touches the clock; once the configured
/// timeout passes without a touch the next [`tick`](PowerState::tick)
/// reports an enter transition, and the first touch afterwards makes
/// the next tick report a leave. All arithmetic is wrapping, so the
/// clock survives the 32-bit millisecond counter rolling over.
#[derive(Clone, Debug)]
pub struct PowerState {
    timeout_ms: u32,
    last_command_ms: u32,
    saving: bool,
}

impl PowerState {
    /// A fresh clock, counting from time zero.
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            last_command_ms: 0,
            saving: false,
        }
    }

    /// Record host activity.
    pub fn touch(&mut self, now_ms: u32) {
        self.last_command_ms = now_ms;
    }

    /// Force the idle clock into or out of the expired state.
    ///
    /// Forcing on backdates the last activity a full timeout, so the
    /// next tick enters power saving without waiting; forcing off
    /// counts as fresh activity. Transitions still flow through
    /// [`tick`](PowerState::tick) so the broadcast happens exactly
    /// once, in the control loop.
    pub fn force(&mut self, enabled: bool, now_ms: u32) {
        self.last_command_ms = if enabled {
            now_ms.wrapping_sub(self.timeout_ms)
        } else {
            now_ms
        };
    }

    /// Advance the clock; `Some` is a transition to broadcast.
    pub fn tick(&mut self, now_ms: u32) -> Option<bool> {
        let idle = now_ms.wrapping_sub(self.last_command_ms) >= self.timeout_ms;
        if idle == self.saving {
            return None;
        }
        self.saving = idle;
        Some(idle)
    }

    /// Whether the last tick left the system in power-saving mode.
    pub fn is_saving(&self) -> bool {
        self.saving
    }
}
