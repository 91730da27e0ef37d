//! The tagged, length-delimited frame shared by every queue.
//!
//! A frame is stored as a [`FrameHeader`] followed immediately by
//! `header.length` payload bytes. The header is plain-old-data and is
//! read back with `bytemuck::pod_read_unaligned`, so frames may start at
//! any byte offset.

use bytemuck::{Pod, Zeroable};

/// Size of [`FrameHeader`] in bytes.
pub const FRAME_HEADER_SIZE: usize = std::mem::size_of::<FrameHeader>();

/// On-buffer header preceding every frame payload.
///
/// Total size: 8 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct FrameHeader {
    /// Exact payload size in bytes.
    pub length: u32,
    /// Stream-specific type tag.
    pub tag: u16,
    /// Always zero.
    pub reserved: u16,
}

impl FrameHeader {
    /// Create a header for a payload of `length` bytes.
    pub const fn new(tag: u16, length: u32) -> Self {
        Self {
            length,
            tag,
            reserved: 0,
        }
    }
}

/// A borrowed view of one complete frame.
///
/// A zero-length payload is a valid frame; emptiness of a queue is
/// signalled by `None`, never by an empty frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Stream-specific type tag.
    pub tag: u16,
    /// The payload bytes, exactly as written.
    pub payload: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Create a frame view.
    pub const fn new(tag: u16, payload: &'a [u8]) -> Self {
        Self { tag, payload }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Bytes this frame occupies in a buffer, header included.
    pub fn encoded_len(&self) -> usize {
        encoded_len(self.payload.len())
    }
}

/// Bytes a frame with a `payload_len`-byte payload occupies, header included.
pub const fn encoded_len(payload_len: usize) -> usize {
    FRAME_HEADER_SIZE + payload_len
}
