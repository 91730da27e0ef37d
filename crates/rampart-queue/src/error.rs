//! Queue error types.

use thiserror::Error;

/// Errors reported by the queues in this crate.
///
/// Every variant except [`QueueError::OutputTooSmall`] is a capacity
/// exhaustion: the queue was sized too small for the load it received.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QueueError {
    /// An append queue write would run past the end of its buffer.
    #[error("append queue overflow: frame needs {requested} bytes, {available} available")]
    Overflow {
        /// Encoded frame size, header included.
        requested: usize,
        /// Bytes left between the write cursor and the end of the buffer.
        available: usize,
    },
    /// Every slot of a ring holds an unread payload.
    #[error("all {slot_count} ring slots are pending")]
    SlotsExhausted {
        /// Number of slots in the ring.
        slot_count: usize,
    },
    /// A ring write would overwrite unread payload bytes.
    #[error("ring storage exhausted: payload needs {requested} bytes, {available} free")]
    StorageExhausted {
        /// Payload size.
        requested: usize,
        /// Storage bytes not occupied by pending payloads.
        available: usize,
    },
    /// A payload can never fit, whatever the queue's state.
    #[error("frame of {size} bytes exceeds the limit of {limit} bytes")]
    FrameTooLarge {
        /// Payload size.
        size: usize,
        /// Largest payload the queue accepts.
        limit: usize,
    },
    /// The caller's output buffer is smaller than the next payload. The
    /// payload stays queued.
    #[error("output buffer of {provided} bytes cannot hold a {needed}-byte payload")]
    OutputTooSmall {
        /// Size of the next payload.
        needed: usize,
        /// Size of the caller's buffer.
        provided: usize,
    },
}
