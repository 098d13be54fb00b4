//! The fixed device-memory budget and typed reservations.

use std::marker::PhantomData;

use crate::error::ArenaError;

/// A fixed byte budget for device-instance storage.
///
/// Reservations advance a monotonic watermark; individual entries are
/// never freed. The only way space comes back is [`reset`], which the
/// controller runs before rebuilding the configuration from scratch.
///
/// # Examples
///
/// ```
/// use pinion_arena::DeviceMemory;
///
/// let mut memory = DeviceMemory::new(64);
/// let buttons = memory.reserve::<[u8; 4]>(8).unwrap();
/// assert_eq!(buttons.capacity(), 8);
/// assert_eq!(memory.remaining(), 32);
///
/// // Too big: a normal failure, the 32 free bytes stay available.
/// assert!(memory.reserve::<[u8; 4]>(16).is_err());
/// assert_eq!(memory.remaining(), 32);
/// ```
///
/// [`reset`]: DeviceMemory::reset
#[derive(Debug)]
pub struct DeviceMemory {
    capacity: usize,
    watermark: usize,
}

impl DeviceMemory {
    /// Create a budget of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            watermark: 0,
        }
    }

    /// Reserve storage for `count` elements of type `T`.
    ///
    /// Sizing uses `T`'s real stride and alignment, so the budget
    /// accounts for exactly what a packed array of `count` instances
    /// occupies. Fails with [`ArenaError::OutOfMemory`] if the region
    /// does not fit; the watermark is unchanged on failure.
    pub fn reserve<T>(&mut self, count: usize) -> Result<Reservation<T>, ArenaError> {
        let offset = self.reserve_raw(std::mem::size_of::<T>(), std::mem::align_of::<T>(), count)?;
        Ok(Reservation {
            offset,
            capacity: count,
            _marker: PhantomData,
        })
    }

    /// Reserve a raw region of `count` elements of `stride` bytes.
    ///
    /// Returns the byte offset of the region within the budget. The
    /// offset is aligned up to `align` (which must be a power of two);
    /// successive reservations never overlap.
    pub fn reserve_raw(
        &mut self,
        stride: usize,
        align: usize,
        count: usize,
    ) -> Result<usize, ArenaError> {
        debug_assert!(align.is_power_of_two(), "align must be a power of two");
        let aligned = (self.watermark + align - 1) & !(align - 1);
        let padding = aligned - self.watermark;
        let bytes = stride
            .checked_mul(count)
            .and_then(|b| b.checked_add(padding))
            .ok_or(ArenaError::OutOfMemory {
                requested: usize::MAX,
                remaining: self.remaining(),
            })?;
        if bytes > self.remaining() {
            return Err(ArenaError::OutOfMemory {
                requested: bytes,
                remaining: self.remaining(),
            });
        }
        self.watermark += bytes;
        Ok(aligned)
    }

    /// Rewind the watermark to zero.
    ///
    /// Only valid once every registry built from earlier reservations
    /// has been cleared; the controller enforces that ordering.
    pub fn reset(&mut self) {
        self.watermark = 0;
    }

    /// Bytes consumed so far.
    pub fn used(&self) -> usize {
        self.watermark
    }

    /// Bytes still free.
    pub fn remaining(&self) -> usize {
        self.capacity - self.watermark
    }

    /// Total budget in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A granted region for `capacity` elements of `T`.
///
/// The reservation is a capacity token, consumed when the owning
/// registry is built. It does not borrow the budget; the disjointness
/// of regions is guaranteed by the watermark accounting.
#[derive(Debug)]
#[must_use]
pub struct Reservation<T> {
    offset: usize,
    capacity: usize,
    _marker: PhantomData<T>,
}

impl<T> Reservation<T> {
    /// A reservation for zero elements, used for kinds whose
    /// allocation failed so the registry degrades to capacity 0.
    pub fn empty() -> Self {
        Self {
            offset: 0,
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Element capacity of the region.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Byte offset of the region within the budget.
    pub fn offset(&self) -> usize {
        self.offset
    }
}
