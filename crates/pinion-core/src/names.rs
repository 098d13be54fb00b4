//! The shared device name buffer.
//!
//! Every device name from the persisted configuration stream is copied
//! sequentially into one fixed-capacity [`NameBuffer`] during decode.
//! Devices keep a copyable [`NameRef`] (offset + length) instead of an
//! owned string, so a registry slot stays small and the total name
//! footprint is bounded at build time.

use std::error::Error;
use std::fmt;

/// Location of one name within the [`NameBuffer`].
///
/// Refs are only meaningful against the buffer that issued them; a
/// full configuration reload invalidates all outstanding refs, which
/// is safe because registries are cleared before the buffer is reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct NameRef {
    offset: u16,
    len: u16,
}

impl NameRef {
    /// The empty name.
    pub const EMPTY: NameRef = NameRef { offset: 0, len: 0 };

    /// Length of the name in bytes.
    pub fn len(self) -> usize {
        self.len as usize
    }

    /// Whether this is the empty name.
    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// The name buffer is full.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameOverflow {
    /// Bytes the rejected name needed.
    pub requested: usize,
    /// Bytes still free in the buffer.
    pub remaining: usize,
}

impl fmt::Display for NameOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name buffer full: requested {} bytes, {} remaining",
            self.requested, self.remaining
        )
    }
}

impl Error for NameOverflow {}

/// Fixed-capacity byte region holding every configured device name.
///
/// # Examples
///
/// ```
/// use pinion_core::NameBuffer;
///
/// let mut names = NameBuffer::new(16);
/// let r = names.push(b"FLAPS").unwrap();
/// assert_eq!(names.get(r), "FLAPS");
/// assert_eq!(names.used(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct NameBuffer {
    data: Vec<u8>,
    capacity: usize,
}

impl NameBuffer {
    /// Create an empty buffer with the given byte capacity.
    ///
    /// Capacity is capped at `u16::MAX` bytes so every position stays
    /// addressable by a [`NameRef`].
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(usize::from(u16::MAX));
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Copy a name into the buffer.
    ///
    /// Fails without writing anything if the name does not fit in the
    /// remaining space.
    pub fn push(&mut self, name: &[u8]) -> Result<NameRef, NameOverflow> {
        let remaining = self.capacity - self.data.len();
        if name.len() > remaining {
            return Err(NameOverflow {
                requested: name.len(),
                remaining,
            });
        }
        Ok(self.append(name))
    }

    /// Copy a name, truncating it to the remaining space if needed.
    ///
    /// Returns the (possibly shortened) ref and whether truncation
    /// occurred. Used by the config decoder, which must keep the
    /// in-progress entry but abort further decoding on overflow.
    pub fn push_lossy(&mut self, name: &[u8]) -> (NameRef, bool) {
        let remaining = self.capacity - self.data.len();
        if name.len() <= remaining {
            (self.append(name), false)
        } else {
            (self.append(&name[..remaining]), true)
        }
    }

    fn append(&mut self, bytes: &[u8]) -> NameRef {
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        NameRef {
            offset: offset as u16,
            len: bytes.len() as u16,
        }
    }

    /// Resolve a ref to its name.
    ///
    /// Names are ASCII by protocol; any non-UTF8 bytes resolve to the
    /// empty string rather than panicking.
    pub fn get(&self, name: NameRef) -> &str {
        let start = name.offset as usize;
        let end = start + name.len as usize;
        self.data
            .get(start..end)
            .and_then(|b| std::str::from_utf8(b).ok())
            .unwrap_or("")
    }

    /// Discard all names. Outstanding refs become dangling and must
    /// not be resolved; the controller clears every registry first.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Bytes currently in use.
    pub fn used(&self) -> usize {
        self.data.len()
    }

    /// Total byte capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
