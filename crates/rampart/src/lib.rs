//! Rampart: the client runtime core of a lockstep real-time-strategy game.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Rampart sub-crates. For most users, adding `rampart` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use rampart::prelude::*;
//! use rampart::engine::wire;
//!
//! let config = GameConfig::default();
//! let mut memory = vec![0u8; config.required_memory().unwrap()];
//! let mut game = Game::init(config, &mut memory).unwrap();
//!
//! // The platform owns the three frame queues.
//! let mut event_buf = vec![0u8; 1024];
//! let mut command_buf = vec![0u8; 1024];
//! let mut render_buf = vec![0u8; 4096];
//! let mut events = AppendQueue::new(&mut event_buf);
//! let mut commands = AppendQueue::new(&mut command_buf);
//! let mut render = AppendQueue::new(&mut render_buf);
//!
//! // The server starts a two-player match.
//! let start = Message::Start(StartMessage { player_count: 2, local_player_index: 0 });
//! let region = events
//!     .allocate(NetEventKind::Message.tag(), start.encoded_len())
//!     .unwrap();
//! wire::encode_message(&start, region).unwrap();
//!
//! let report = game
//!     .update(UpdateInput::at(0), &mut events, &mut commands, &mut render)
//!     .unwrap();
//! assert!(report.running);
//! assert_eq!(game.state(), GameState::Running);
//! assert_eq!(report.render_commands, 8);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `rampart-core` | Ids, coordinates, frame header, limits |
//! | [`arena`] | `rampart-arena` | Bump allocator over a borrowed block |
//! | [`queue`] | `rampart-queue` | Append queue, slot ring, sample window |
//! | [`sim`] | `rampart-sim` | Deterministic simulation and interpolation |
//! | [`engine`] | `rampart-engine` | Game loop, configuration, wire layouts |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Ids, coordinates, frames and limits (`rampart-core`).
pub use rampart_core as types;

/// Bump allocation over a caller-provided block (`rampart-arena`).
pub use rampart_arena as arena;

/// Bounded frame queues (`rampart-queue`).
///
/// [`queue::AppendQueue`] for single-pass command streams,
/// [`queue::SlotRing`] for long-lived order buffering, and
/// [`queue::SampleWindow`] for rolling diagnostics.
pub use rampart_queue as queue;

/// Deterministic simulation and render interpolation (`rampart-sim`).
pub use rampart_sim as sim;

/// The game loop (`rampart-engine`).
///
/// [`engine::Game`] is the entry point; [`engine::wire`] defines the frame
/// layouts shared with the platform layer.
pub use rampart_engine as engine;

/// Common imports for typical Rampart usage.
///
/// ```rust
/// use rampart::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use rampart_core::{Coord, Frame, Micros, PlayerId, TickId, UnitId};

    // Storage
    pub use rampart_arena::{Arena, ArenaError};
    pub use rampart_queue::{AppendQueue, QueueError, SampleWindow, SlotRing};

    // Simulation
    pub use rampart_sim::{
        state_hash, Interpolation, InterpolationError, Order, Simulation, SimulationError, Unit,
    };

    // Engine
    pub use rampart_engine::{
        ConfigError, DrawSquare, Game, GameConfig, GameError, GameMetrics, GameState, InputState,
        Message, MessageKind, NetCommandKind, NetEventKind, RenderCommandKind, StartMessage,
        TickPolicy, UpdateInput, UpdateReport, WireError,
    };
}
