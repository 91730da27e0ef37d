//! Game loop orchestrating the Rampart client runtime.
//!
//! [`Game`] ties the pieces together: it consumes network events, feeds
//! order lists through a [`SlotRing`](rampart_queue::SlotRing) into the
//! deterministic [`Simulation`](rampart_sim::Simulation) at a fixed tick
//! rate, and produces render commands from the
//! [`Interpolation`](rampart_sim::Interpolation) layer.
//!
//! The platform side owns the clock, the transport and the renderer; they
//! talk to the game only through frames in [`AppendQueue`](rampart_queue::AppendQueue)s,
//! with the layouts in [`wire`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod game;
pub mod metrics;
pub mod wire;

pub use config::{ConfigError, GameConfig, TickPolicy};
pub use game::{
    player_color, Game, GameError, GameState, InputState, UpdateInput, UpdateReport,
    PLAYER_COLORS, UNOWNED_COLOR,
};
pub use metrics::GameMetrics;
pub use wire::{
    DrawSquare, Message, MessageKind, NetCommandKind, NetEventKind, RenderCommandKind,
    StartMessage, WireError,
};
