//! Circular queue of variable-length payloads.
//!
//! Each write claims one slot and the next run of bytes in a circular
//! storage buffer. Payload bytes may wrap past the end of the storage
//! buffer; readers get them back contiguous.
//!
//! The queue never overwrites unread data. When either the slots or the
//! storage bytes run out, the write is refused and the producer has to
//! back off until the consumer catches up.

use crate::error::QueueError;

/// A fixed-capacity ring of variable-length payloads.
///
/// `write_index` and `read_index` only ever increase; the slot for an
/// index is `index % slot_count`. The number of pending payloads is
/// `write_index - read_index` and never exceeds `slot_count`, and their
/// combined size never exceeds the storage length.
pub struct SlotRing<'a> {
    storage: &'a mut [u8],
    offsets: &'a mut [usize],
    sizes: &'a mut [usize],
    write_index: u64,
    read_index: u64,
    /// Storage offset where the next payload starts.
    write_offset: usize,
    pending_bytes: usize,
}

impl<'a> SlotRing<'a> {
    /// Create an empty ring.
    ///
    /// `offsets` and `sizes` are the per-slot bookkeeping arrays; their
    /// length is the slot count.
    ///
    /// # Panics
    ///
    /// Panics if there are no slots or if `offsets` and `sizes` differ in
    /// length.
    pub fn new(storage: &'a mut [u8], offsets: &'a mut [usize], sizes: &'a mut [usize]) -> Self {
        assert!(!offsets.is_empty(), "SlotRing needs at least one slot");
        assert_eq!(
            offsets.len(),
            sizes.len(),
            "SlotRing offset and size arrays differ in length"
        );
        Self {
            storage,
            offsets,
            sizes,
            write_index: 0,
            read_index: 0,
            write_offset: 0,
            pending_bytes: 0,
        }
    }

    /// Enqueue a copy of `payload` in the next slot.
    ///
    /// The ring is unchanged when this fails.
    pub fn write(&mut self, payload: &[u8]) -> Result<(), QueueError> {
        let len = payload.len();
        if len > self.storage.len() {
            return Err(QueueError::FrameTooLarge {
                size: len,
                limit: self.storage.len(),
            });
        }
        if self.pending_count() == self.slot_count() {
            return Err(QueueError::SlotsExhausted {
                slot_count: self.slot_count(),
            });
        }
        let available = self.storage.len() - self.pending_bytes;
        if len > available {
            return Err(QueueError::StorageExhausted {
                requested: len,
                available,
            });
        }

        let offset = self.write_offset;
        copy_into_ring(self.storage, offset, payload);

        let slot = self.slot_of(self.write_index);
        self.offsets[slot] = offset;
        self.sizes[slot] = len;
        self.write_offset = self.wrap(offset + len);
        self.write_index += 1;
        self.pending_bytes += len;
        Ok(())
    }

    /// Dequeue the oldest payload into `out`.
    ///
    /// Returns the payload length, or `None` if nothing is pending. If `out`
    /// is too small the payload stays queued and
    /// [`QueueError::OutputTooSmall`] is returned.
    pub fn read(&mut self, out: &mut [u8]) -> Result<Option<usize>, QueueError> {
        let Some(len) = self.peek_len() else {
            return Ok(None);
        };
        if out.len() < len {
            return Err(QueueError::OutputTooSmall {
                needed: len,
                provided: out.len(),
            });
        }

        let offset = self.offsets[self.slot_of(self.read_index)];
        copy_from_ring(self.storage, offset, &mut out[..len]);
        self.read_index += 1;
        self.pending_bytes -= len;
        Ok(Some(len))
    }

    /// Length of the oldest pending payload, without consuming it.
    pub fn peek_len(&self) -> Option<usize> {
        if self.pending_count() == 0 {
            return None;
        }
        Some(self.sizes[self.slot_of(self.read_index)])
    }

    /// Payloads written but not yet read.
    pub fn pending_count(&self) -> usize {
        (self.write_index - self.read_index) as usize
    }

    /// Combined size of the pending payloads.
    pub fn pending_bytes(&self) -> usize {
        self.pending_bytes
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.write_index == self.read_index
    }

    /// Maximum number of pending payloads.
    pub fn slot_count(&self) -> usize {
        self.offsets.len()
    }

    /// Size of the circular byte storage.
    pub fn storage_len(&self) -> usize {
        self.storage.len()
    }

    /// Total payloads ever written.
    pub fn write_index(&self) -> u64 {
        self.write_index
    }

    /// Total payloads ever read.
    pub fn read_index(&self) -> u64 {
        self.read_index
    }

    fn slot_of(&self, index: u64) -> usize {
        (index % self.offsets.len() as u64) as usize
    }

    fn wrap(&self, offset: usize) -> usize {
        if offset >= self.storage.len() {
            offset - self.storage.len()
        } else {
            offset
        }
    }
}

impl std::fmt::Debug for SlotRing<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotRing")
            .field("slot_count", &self.slot_count())
            .field("storage_len", &self.storage.len())
            .field("write_index", &self.write_index)
            .field("read_index", &self.read_index)
            .field("pending_bytes", &self.pending_bytes)
            .finish()
    }
}

/// Copy `src` into `ring` starting at `offset`, continuing at the front
/// once the end is reached. `src` must fit in `ring`.
fn copy_into_ring(ring: &mut [u8], offset: usize, src: &[u8]) {
    let head = src.len().min(ring.len() - offset);
    let (first, rest) = src.split_at(head);
    ring[offset..offset + head].copy_from_slice(first);
    ring[..rest.len()].copy_from_slice(rest);
}

fn copy_from_ring(ring: &[u8], offset: usize, dst: &mut [u8]) {
    let head = dst.len().min(ring.len() - offset);
    let (first, rest) = dst.split_at_mut(head);
    first.copy_from_slice(&ring[offset..offset + head]);
    let tail = rest.len();
    rest.copy_from_slice(&ring[..tail]);
}
