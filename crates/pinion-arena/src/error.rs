//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors from device-memory reservation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The requested region does not fit in the remaining budget.
    ///
    /// Not fatal: the caller skips that device kind and continues
    /// initializing the others against the untouched remainder.
    OutOfMemory {
        /// Bytes the reservation needed, including alignment padding.
        requested: usize,
        /// Bytes still free at the time of the request.
        remaining: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested,
                remaining,
            } => write!(
                f,
                "out of device memory: requested {requested} bytes, {remaining} remaining"
            ),
        }
    }
}

impl Error for ArenaError {}
