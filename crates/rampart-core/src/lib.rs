//! Core types for the Rampart client runtime.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! strongly-typed handles shared by every other crate (players, units,
//! ticks), the grid coordinate, the match-wide capacity limits, and the
//! frame header that every queue in the pipeline stores in front of its
//! payloads.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod frame;
pub mod id;
pub mod limits;

pub use frame::{Frame, FrameHeader, FRAME_HEADER_SIZE};
pub use id::{Coord, Micros, PlayerId, TickId, UnitId};
pub use limits::{PLAYER_MAX, TICK_DURATION_US, UNIT_MAX};
