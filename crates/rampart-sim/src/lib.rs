//! Deterministic lockstep simulation for Rampart.
//!
//! [`Simulation`] is a pure function of `(state, orders) -> next state`:
//! integer arithmetic only, fixed iteration order, no clocks and no
//! randomness. Two clients that apply the same order lists from the same
//! start produce bit-identical states, which [`state_hash`] makes cheap to
//! compare.
//!
//! [`Interpolation`] sits between the 10 Hz simulation and the renderer.
//! It only reads the simulation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod hash;
pub mod interpolation;
pub mod order;
pub mod simulation;

pub use error::{InterpolationError, SimulationError};
pub use hash::state_hash;
pub use interpolation::Interpolation;
pub use order::{Order, ORDER_SIZE};
pub use simulation::{Player, SimState, Simulation, Unit, UNIT_SPEED};
