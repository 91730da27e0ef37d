//! Single-pass append-only frame buffer.

use rampart_core::frame::{encoded_len, Frame, FrameHeader, FRAME_HEADER_SIZE};

use crate::error::QueueError;

/// An append-only sequence of frames over a borrowed byte buffer.
///
/// Frames are written back to back as `header ‖ payload` and read back in
/// the same order. Reading does not free space: the producer and consumer
/// share one pass, after which the owner calls [`reset`](Self::reset).
///
/// Invariant: `0 <= read_cursor <= write_cursor <= capacity`.
pub struct AppendQueue<'a> {
    buffer: &'a mut [u8],
    read_cursor: usize,
    write_cursor: usize,
}

impl<'a> AppendQueue<'a> {
    /// Create an empty queue over `buffer`.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            read_cursor: 0,
            write_cursor: 0,
        }
    }

    /// Append a frame holding a copy of `payload`.
    ///
    /// Fails with [`QueueError::Overflow`] if the encoded frame does not fit
    /// in the space left; the queue is unchanged on failure.
    pub fn write(&mut self, tag: u16, payload: &[u8]) -> Result<(), QueueError> {
        self.allocate(tag, payload.len())?.copy_from_slice(payload);
        Ok(())
    }

    /// Reserve a frame with a `len`-byte payload and return the payload
    /// region for the caller to fill in place.
    ///
    /// The region is zero-filled. The frame is visible to [`read`](Self::read)
    /// as soon as this returns.
    pub fn allocate(&mut self, tag: u16, len: usize) -> Result<&mut [u8], QueueError> {
        let length = u32::try_from(len).map_err(|_| QueueError::FrameTooLarge {
            size: len,
            limit: u32::MAX as usize,
        })?;
        let available = self.buffer.len() - self.write_cursor;
        let requested = FRAME_HEADER_SIZE.saturating_add(len);
        if requested > available {
            return Err(QueueError::Overflow {
                requested,
                available,
            });
        }

        let start = self.write_cursor;
        let payload_start = start + FRAME_HEADER_SIZE;
        let end = start + encoded_len(len);
        self.buffer[start..payload_start]
            .copy_from_slice(bytemuck::bytes_of(&FrameHeader::new(tag, length)));
        self.write_cursor = end;

        let payload = &mut self.buffer[payload_start..end];
        payload.fill(0);
        Ok(payload)
    }

    /// Read the next unread frame, or `None` once every written frame has
    /// been read.
    pub fn read(&mut self) -> Option<Frame<'_>> {
        if self.read_cursor >= self.write_cursor {
            return None;
        }
        let start = self.read_cursor;
        let payload_start = start + FRAME_HEADER_SIZE;
        let header: FrameHeader =
            bytemuck::pod_read_unaligned(self.buffer.get(start..payload_start)?);
        let end = payload_start.checked_add(header.length as usize)?;
        if end > self.write_cursor {
            return None;
        }
        self.read_cursor = end;
        Some(Frame::new(header.tag, &self.buffer[payload_start..end]))
    }

    /// Discard every frame, read or not, and rewind both cursors.
    pub fn reset(&mut self) {
        self.read_cursor = 0;
        self.write_cursor = 0;
    }

    /// Bytes written but not yet read, headers included.
    pub fn pending_bytes(&self) -> usize {
        self.write_cursor - self.read_cursor
    }

    /// Whether every written frame has been read.
    pub fn is_empty(&self) -> bool {
        self.read_cursor == self.write_cursor
    }

    /// Size of the backing buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Byte offset of the next frame to read.
    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    /// Byte offset at which the next frame will be written.
    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }
}

impl std::fmt::Debug for AppendQueue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppendQueue")
            .field("capacity", &self.buffer.len())
            .field("read_cursor", &self.read_cursor)
            .field("write_cursor", &self.write_cursor)
            .finish()
    }
}
