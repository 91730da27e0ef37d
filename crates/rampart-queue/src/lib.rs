//! Bounded frame queues that decouple the three clocks of the client.
//!
//! Network events arrive at transport cadence, the simulation ticks at a
//! fixed 100 ms, and the renderer pulls at frame rate. The queues in this
//! crate sit between those clocks:
//!
//! - [`AppendQueue`]: a single-pass command buffer. Frames are appended
//!   during one game-loop pass, consumed by a downstream collaborator, and
//!   the queue is then [`reset`](AppendQueue::reset).
//! - [`SlotRing`]: a long-lived circular queue of variable-length payloads
//!   (one lockstep order list per slot). Producers and the consumer run at
//!   independent cadences; it is never reset.
//! - [`SampleWindow`]: a fixed-capacity rolling window of integer samples
//!   for diagnostics.
//!
//! All three are single-producer/single-consumer and borrow their storage
//! from the caller, so nothing here allocates after construction. Capacity
//! exhaustion is reported as a [`QueueError`]; nothing is ever silently
//! overwritten or dropped.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod append;
pub mod error;
pub mod slotted;
pub mod window;

pub use append::AppendQueue;
pub use error::QueueError;
pub use slotted::SlotRing;
pub use window::SampleWindow;
