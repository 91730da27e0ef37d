//! Test utilities for Rampart development.
//!
//! [`PlatformQueues`] stands in for the platform layer: it owns the
//! buffers behind the three append queues a [`Game`] talks through. The
//! [`fixtures`] module builds network event frames and decodes the
//! game's output streams.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::*;

use rampart_engine::{Game, GameConfig, GameError, UpdateInput, UpdateReport};
use rampart_queue::AppendQueue;

/// Default size of each platform queue buffer.
pub const QUEUE_BYTES: usize = 16 * 1024;

/// A zeroed memory block of exactly `config.required_memory()` bytes.
///
/// # Panics
///
/// Panics if the configuration's memory size overflows.
pub fn memory_for(config: &GameConfig) -> Vec<u8> {
    vec![0u8; config.required_memory().expect("config sizes overflow")]
}

/// Backing buffers for the network event, network command and render
/// command queues.
pub struct PlatformQueues {
    events: Vec<u8>,
    commands: Vec<u8>,
    render: Vec<u8>,
}

impl PlatformQueues {
    /// Three buffers of `bytes` bytes each.
    pub fn new(bytes: usize) -> Self {
        Self {
            events: vec![0; bytes],
            commands: vec![0; bytes],
            render: vec![0; bytes],
        }
    }

    /// Borrow the buffers as queues.
    pub fn queues(&mut self) -> Queues<'_> {
        Queues {
            events: AppendQueue::new(&mut self.events),
            commands: AppendQueue::new(&mut self.commands),
            render: AppendQueue::new(&mut self.render),
        }
    }
}

impl Default for PlatformQueues {
    fn default() -> Self {
        Self::new(QUEUE_BYTES)
    }
}

/// The three queues of one platform frame.
pub struct Queues<'a> {
    pub events: AppendQueue<'a>,
    pub commands: AppendQueue<'a>,
    pub render: AppendQueue<'a>,
}

impl Queues<'_> {
    /// Run one `update` against these queues.
    pub fn update(
        &mut self,
        game: &mut Game<'_>,
        input: UpdateInput,
    ) -> Result<UpdateReport, GameError> {
        game.update(input, &mut self.events, &mut self.commands, &mut self.render)
    }

    /// Reset all three queues, as the platform does between frames.
    pub fn reset(&mut self) {
        self.events.reset();
        self.commands.reset();
        self.render.reset();
    }

    /// Total bytes written to the two output queues.
    pub fn output_bytes(&self) -> usize {
        self.commands.write_cursor() + self.render.write_cursor()
    }
}
