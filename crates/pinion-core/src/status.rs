//! Status tokens emitted toward the host protocol layer.
//!
//! The core never writes to the transport itself; it pushes typed
//! [`StatusEvent`]s into a caller-supplied [`StatusSink`]. The
//! `Display` impl produces the short human-readable tokens the host
//! expects on its status channel.

use std::fmt;

use crate::ids::KindId;

/// A status notification for the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusEvent {
    /// A received command id was not in the command table.
    UnknownCommand,
    /// Decoding the persisted configuration stream stopped early;
    /// entries decoded before the failure remain registered.
    ConfigReadFailure,
    /// The arena could not reserve storage for this kind; the kind is
    /// inactive for this configuration.
    AllocationFailed(KindId),
    /// A device instance of this kind was registered.
    DeviceAdded(KindId),
    /// Every instance of this kind was detached and released.
    KindCleared(KindId),
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand => f.write_str("n/a"),
            Self::ConfigReadFailure => f.write_str("failure on reading config"),
            Self::AllocationFailed(kind) => {
                write!(f, "{kind} does not fit in memory")
            }
            Self::DeviceAdded(kind) => write!(f, "added {kind}"),
            Self::KindCleared(kind) => write!(f, "cleared {kind}"),
        }
    }
}

/// Receives status events from the core.
///
/// Implemented by the host protocol adapter; tests use a recording
/// sink. Sinks must not block.
pub trait StatusSink {
    /// Deliver one status event.
    fn status(&mut self, event: StatusEvent);
}

/// A sink that discards every event.
///
/// Useful for hosts that do not consume the status channel, and as a
/// default in tests that only care about side effects.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
    fn status(&mut self, _event: StatusEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_match_host_protocol() {
        assert_eq!(StatusEvent::UnknownCommand.to_string(), "n/a");
        assert_eq!(
            StatusEvent::ConfigReadFailure.to_string(),
            "failure on reading config"
        );
        assert_eq!(
            StatusEvent::AllocationFailed(KindId::Stepper).to_string(),
            "Stepper does not fit in memory"
        );
        assert_eq!(
            StatusEvent::DeviceAdded(KindId::Button).to_string(),
            "added Button"
        );
    }
}
