//! The bump allocator.

use bytemuck::Pod;

use crate::error::ArenaError;

/// A bump allocator over one borrowed memory block.
///
/// Each allocation splits the requested number of bytes off the front of
/// the remaining block and hands out a mutable borrow that lives as long
/// as the block itself. Allocations are never freed individually.
///
/// # Example
///
/// ```
/// use rampart_arena::Arena;
///
/// let mut block = vec![0u8; 256];
/// let mut arena = Arena::new(&mut block);
/// let scratch = arena.allocate(64).unwrap();
/// let counts: &mut [u64] = arena.allocate_slice(8).unwrap();
/// assert_eq!(scratch.len(), 64);
/// assert_eq!(counts.len(), 8);
/// ```
pub struct Arena<'m> {
    /// Unallocated tail of the block.
    remaining: &'m mut [u8],
    /// Length of the block at construction.
    capacity: usize,
}

impl<'m> Arena<'m> {
    /// Create an arena over `block`. Nothing is allocated yet.
    pub fn new(block: &'m mut [u8]) -> Self {
        let capacity = block.len();
        Self {
            remaining: block,
            capacity,
        }
    }

    /// Bump-allocate `size` bytes.
    ///
    /// The returned region is zero-filled and disjoint from every other
    /// region handed out by this arena. Returns
    /// [`ArenaError::OutOfMemory`] if fewer than `size` bytes remain.
    pub fn allocate(&mut self, size: usize) -> Result<&'m mut [u8], ArenaError> {
        let region = self.take(size)?;
        region.fill(0);
        Ok(region)
    }

    /// Bump-allocate a zeroed slice of `count` elements of `T`.
    ///
    /// Padding is inserted in front of the region so that it is aligned
    /// for `T`; the padding counts against the arena's capacity.
    pub fn allocate_slice<T: Pod>(&mut self, count: usize) -> Result<&'m mut [T], ArenaError> {
        let align = std::mem::align_of::<T>();
        let padding = self.remaining.as_ptr().align_offset(align);
        if padding == usize::MAX {
            return Err(ArenaError::Misaligned { align });
        }
        let bytes = std::mem::size_of::<T>()
            .checked_mul(count)
            .and_then(|b| b.checked_add(padding))
            .ok_or(ArenaError::OutOfMemory {
                requested: usize::MAX,
                remaining: self.remaining.len(),
            })?;

        let region = self.take(bytes)?;
        let (_, aligned) = region.split_at_mut(padding);
        aligned.fill(0);
        bytemuck::try_cast_slice_mut(aligned).map_err(|_| ArenaError::Misaligned { align })
    }

    /// Total size of the block in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes handed out so far, alignment padding included.
    pub fn used(&self) -> usize {
        self.capacity - self.remaining.len()
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    fn take(&mut self, size: usize) -> Result<&'m mut [u8], ArenaError> {
        if size > self.remaining.len() {
            return Err(ArenaError::OutOfMemory {
                requested: size,
                remaining: self.remaining.len(),
            });
        }
        let block = std::mem::take(&mut self.remaining);
        let (head, tail) = block.split_at_mut(size);
        self.remaining = tail;
        tracing::trace!(size, used = self.used(), "arena allocation");
        Ok(head)
    }
}

impl std::fmt::Debug for Arena<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("used", &self.used())
            .finish()
    }
}
