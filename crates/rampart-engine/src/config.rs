//! Game configuration, validation, and error types.
//!
//! [`GameConfig`] fixes every capacity the game loop uses. All of them are
//! carved out of the caller's memory block once, in
//! [`Game::init`](crate::Game::init); [`required_memory`](GameConfig::required_memory)
//! tells the caller how large that block must be.

use rampart_core::{Coord, PLAYER_MAX, TICK_DURATION_US, UNIT_MAX};
use rampart_sim::{Order, Unit, ORDER_SIZE};
use thiserror::Error;

use crate::wire::{MAX_CONTROL_MESSAGE_LEN, ORDER_LIST_HEADER_SIZE};

// ── TickPolicy ─────────────────────────────────────────────────────

/// When a due tick actually runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TickPolicy {
    /// Tick only when an order list is pending. With no input the
    /// simulation clock stalls and `next_tick_time` is left alone, which
    /// keeps every client on the same turn in lockstep.
    #[default]
    AwaitOrders,
    /// Tick on schedule, with an empty order list if none is pending.
    FixedRate,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`GameConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `tick_duration_us` is zero.
    #[error("tick_duration_us must be at least 1")]
    ZeroTickDuration,
    /// `order_ring_slots` is zero.
    #[error("order_ring_slots must be at least 1")]
    ZeroOrderSlots,
    /// `max_ticks_per_update` is zero, so the game could never tick.
    #[error("max_ticks_per_update must be at least 1")]
    ZeroTicksPerUpdate,
    /// `sample_window_secs` is zero.
    #[error("sample_window_secs must be at least 1")]
    ZeroSampleWindow,
    /// An order ring slot cannot hold a single order.
    #[error("order_slot_bytes {configured} is below the minimum of {minimum}")]
    OrderSlotTooSmall {
        /// The configured slot size.
        configured: usize,
        /// Smallest slot that holds a one-order list.
        minimum: usize,
    },
    /// The command buffer cannot hold a control message.
    #[error("command_buffer_bytes {configured} is below the minimum of {minimum}")]
    CommandBufferTooSmall {
        /// The configured buffer size.
        configured: usize,
        /// Size of the largest control message.
        minimum: usize,
    },
    /// A full match would spawn more than `UNIT_MAX` units.
    #[error("units_per_player {configured} exceeds the maximum of {maximum}")]
    TooManyUnitsPerPlayer {
        /// The configured value.
        configured: usize,
        /// Largest value that keeps `PLAYER_MAX` players within `UNIT_MAX`.
        maximum: usize,
    },
    /// A capacity overflows `usize` when sizing memory.
    #[error("configured capacities overflow the address space")]
    CapacityOverflow,
}

// ── GameConfig ─────────────────────────────────────────────────────

/// Complete configuration for [`Game::init`](crate::Game::init).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Simulation tick interval in microseconds. Default: 100 000 (100 ms).
    pub tick_duration_us: u64,
    /// When a due tick runs. Default: [`TickPolicy::AwaitOrders`].
    pub tick_policy: TickPolicy,
    /// Most ticks run by one `update` call when the game is behind.
    /// Default: 1.
    pub max_ticks_per_update: u32,
    /// Order lists the ring holds before refusing more. Default: 100.
    pub order_ring_slots: usize,
    /// Largest encoded order list, in bytes. The ring's byte storage is
    /// `order_ring_slots * order_slot_bytes`. Default: 1024.
    pub order_slot_bytes: usize,
    /// Span of backlog history kept for diagnostics, in seconds of ticks.
    /// Default: 2.
    pub sample_window_secs: u64,
    /// Scratch space for encoding outgoing messages. Default: 256.
    pub command_buffer_bytes: usize,
    /// Units spawned per player at match start. Default: 4.
    pub units_per_player: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_duration_us: TICK_DURATION_US,
            tick_policy: TickPolicy::AwaitOrders,
            max_ticks_per_update: 1,
            order_ring_slots: 100,
            order_slot_bytes: 1024,
            sample_window_secs: 2,
            command_buffer_bytes: 256,
            units_per_player: 4,
        }
    }
}

impl GameConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_duration_us == 0 {
            return Err(ConfigError::ZeroTickDuration);
        }
        if self.order_ring_slots == 0 {
            return Err(ConfigError::ZeroOrderSlots);
        }
        if self.max_ticks_per_update == 0 {
            return Err(ConfigError::ZeroTicksPerUpdate);
        }
        if self.sample_window_secs == 0 {
            return Err(ConfigError::ZeroSampleWindow);
        }
        let minimum = ORDER_LIST_HEADER_SIZE + ORDER_SIZE;
        if self.order_slot_bytes < minimum {
            return Err(ConfigError::OrderSlotTooSmall {
                configured: self.order_slot_bytes,
                minimum,
            });
        }
        if self.command_buffer_bytes < MAX_CONTROL_MESSAGE_LEN {
            return Err(ConfigError::CommandBufferTooSmall {
                configured: self.command_buffer_bytes,
                minimum: MAX_CONTROL_MESSAGE_LEN,
            });
        }
        let maximum = UNIT_MAX / PLAYER_MAX;
        if self.units_per_player > maximum {
            return Err(ConfigError::TooManyUnitsPerPlayer {
                configured: self.units_per_player,
                maximum,
            });
        }
        self.required_memory()?;
        Ok(())
    }

    /// Most orders a single order list may carry.
    pub fn max_orders_per_tick(&self) -> usize {
        self.order_slot_bytes.saturating_sub(ORDER_LIST_HEADER_SIZE) / ORDER_SIZE
    }

    /// Capacity of the backlog sample window: ticks per second times
    /// `sample_window_secs`, at least one.
    pub fn sample_window_len(&self) -> usize {
        let ticks_per_sec = 1_000_000 / self.tick_duration_us.max(1);
        (ticks_per_sec.saturating_mul(self.sample_window_secs)).max(1) as usize
    }

    /// Units a full match spawns: `units_per_player` for each of the
    /// `PLAYER_MAX` players.
    pub fn unit_capacity(&self) -> usize {
        self.units_per_player.saturating_mul(PLAYER_MAX)
    }

    /// Bytes of memory [`Game::init`](crate::Game::init) carves from the
    /// caller's block, worst-case alignment padding included.
    pub fn required_memory(&self) -> Result<usize, ConfigError> {
        let slots = self.order_ring_slots;
        let units = self.unit_capacity();
        let regions = [
            // Simulation units.
            typed_bytes::<Unit>(units),
            // Interpolation previous, current and rendered positions.
            units.checked_mul(3).and_then(typed_bytes::<Coord>),
            // Ring byte storage.
            self.order_ring_slots.checked_mul(self.order_slot_bytes),
            // Ring offsets and sizes.
            typed_bytes::<usize>(slots),
            typed_bytes::<usize>(slots),
            // Slot read buffer.
            Some(self.order_slot_bytes),
            // Decoded order scratch.
            typed_bytes::<Order>(self.max_orders_per_tick()),
            // Backlog samples.
            typed_bytes::<u64>(self.sample_window_len()),
            // Outgoing message scratch.
            Some(self.command_buffer_bytes),
        ];
        regions
            .into_iter()
            .try_fold(0usize, |total, region| total.checked_add(region?))
            .ok_or(ConfigError::CapacityOverflow)
    }
}

/// Bytes for `count` values of `T` plus worst-case alignment padding.
fn typed_bytes<T>(count: usize) -> Option<usize> {
    std::mem::size_of::<T>()
        .checked_mul(count)?
        .checked_add(std::mem::align_of::<T>() - 1)
}
