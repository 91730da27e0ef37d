//! Bump allocation over a single caller-supplied memory block.
//!
//! Every fixed-capacity component of the client runtime (order ring,
//! diagnostics window, serialization scratch) carves its storage out of one
//! block handed to the game at initialization. There is no deallocation:
//! the block is released when the caller drops it.
//!
//! # Safety
//!
//! Regions are split off the front of the remaining block with
//! `split_at_mut`, so disjointness is enforced by the borrow checker and no
//! `unsafe` is needed. Typed regions are produced with `bytemuck` casts,
//! restricted to `Pod` element types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod error;

pub use arena::Arena;
pub use error::ArenaError;
