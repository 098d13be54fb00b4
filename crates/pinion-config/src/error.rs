//! Config-decoding error types.

use std::error::Error;
use std::fmt;

/// Errors from the strict decode pass.
///
/// Either way, entries emitted before the failure remain registered;
/// the decoder never unwinds work it has already handed out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The stream contains an unexpected byte, a truncated entry, or
    /// an unrecognized type tag. Decoding stops at this byte.
    Malformed {
        /// Byte offset of the offending position within the stream.
        offset: usize,
    },
    /// The shared name buffer ran out of space. The in-progress entry
    /// was registered with its name truncated; decoding stops here.
    NameBufferFull {
        /// Byte offset of the entry whose name overflowed.
        offset: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { offset } => {
                write!(f, "malformed config entry at byte {offset}")
            }
            Self::NameBufferFull { offset } => {
                write!(f, "name buffer exhausted at byte {offset}")
            }
        }
    }
}

impl Error for ConfigError {}
