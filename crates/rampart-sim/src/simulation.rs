//! The deterministic fixed-tick simulation.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──init()──▶ Active ──init()──▶ Active (fresh match)
//! ```
//!
//! A match is set up by `init()` followed by one `create_player()` per
//! player. Each player spawns with a fixed formation of units, so the unit
//! set has its final shape before the first tick.
//!
//! # Tick rule
//!
//! `tick(orders)` validates the whole order list before touching any
//! state, applies the orders in list order (each one overwrites the
//! movement target of its unit range), then moves every unit at most
//! [`UNIT_SPEED`] cells per axis toward its target, in unit-index order.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use rampart_core::{Coord, PlayerId, TickId, UnitId, PLAYER_MAX, UNIT_MAX};

use crate::error::SimulationError;
use crate::order::Order;

/// Cells a unit moves per axis per tick.
pub const UNIT_SPEED: u16 = 2;

/// Top-left corner of player 0's formation.
const FORMATION_ORIGIN: u16 = 32;
/// Distance between neighbouring formation anchors.
const FORMATION_SPACING: u16 = 128;
/// Anchors per formation row.
const FORMATION_COLUMNS: u16 = 4;
/// Units per row within one formation.
const FORMATION_WIDTH: usize = 8;
/// Gap between units within a formation.
const FORMATION_GAP: u16 = 2;

/// Simulation lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimState {
    /// Constructed but not yet initialized; every operation but `init`
    /// fails with [`SimulationError::NotActive`].
    Uninitialized,
    /// A match is in progress.
    Active,
}

/// A player slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Player {
    /// The player's id, equal to its slot index.
    pub id: PlayerId,
    /// First unit spawned for this player.
    pub first_unit: UnitId,
    /// Number of units spawned for this player.
    pub unit_count: u16,
}

impl Player {
    const EMPTY: Player = Player {
        id: PlayerId::UNDEFINED,
        first_unit: UnitId(0),
        unit_count: 0,
    };
}

/// A unit on the map.
///
/// Plain-old-data: unit arrays are carved from the caller's arena.
///
/// Size: 10 bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Unit {
    /// Current cell.
    pub position: Coord,
    /// Cell the unit is moving toward.
    pub target: Coord,
    /// Owning player.
    pub player: PlayerId,
    reserved: u8,
}

impl Unit {
    /// An unoccupied unit slot.
    pub const EMPTY: Unit = Unit {
        position: Coord::new(0, 0),
        target: Coord::new(0, 0),
        player: PlayerId::UNDEFINED,
        reserved: 0,
    };

    fn advance(&mut self) {
        self.position.x = step_toward(self.position.x, self.target.x);
        self.position.y = step_toward(self.position.y, self.target.y);
    }
}

fn step_toward(from: u16, to: u16) -> u16 {
    if from < to {
        from + (to - from).min(UNIT_SPEED)
    } else {
        from - (from - to).min(UNIT_SPEED)
    }
}

/// Formation cell of the `slot`-th unit of `player`.
fn formation_cell(player: PlayerId, slot: usize) -> Coord {
    let p = player.0 as u16;
    let anchor_x = FORMATION_ORIGIN + (p % FORMATION_COLUMNS) * FORMATION_SPACING;
    let anchor_y = FORMATION_ORIGIN + (p / FORMATION_COLUMNS) * FORMATION_SPACING;
    let col = (slot % FORMATION_WIDTH) as u16;
    let row = (slot / FORMATION_WIDTH) as u16;
    Coord::new(
        anchor_x + col * FORMATION_GAP,
        anchor_y + row * FORMATION_GAP,
    )
}

/// Players, units and the tick counter of one match.
///
/// Unit storage is borrowed from the caller, normally an arena region
/// carved in `Game::init`; nothing allocates afterwards. At most
/// `UNIT_MAX` units of the slice are used.
pub struct Simulation<'m> {
    state: SimState,
    units_per_player: usize,
    players: [Player; PLAYER_MAX],
    player_count: usize,
    units: &'m mut [Unit],
    unit_capacity: usize,
    unit_count: usize,
    tick: TickId,
}

impl<'m> Simulation<'m> {
    /// Create an uninitialized simulation over `units`, whose players
    /// each spawn `units_per_player` units.
    pub fn new(units_per_player: usize, units: &'m mut [Unit]) -> Self {
        let unit_capacity = units.len().min(UNIT_MAX);
        Self {
            state: SimState::Uninitialized,
            units_per_player,
            players: [Player::EMPTY; PLAYER_MAX],
            player_count: 0,
            units,
            unit_capacity,
            unit_count: 0,
            tick: TickId(0),
        }
    }

    /// Start a fresh match: no players, no units, tick zero.
    pub fn init(&mut self) {
        self.players = [Player::EMPTY; PLAYER_MAX];
        self.units[..self.unit_count].fill(Unit::EMPTY);
        self.player_count = 0;
        self.unit_count = 0;
        self.tick = TickId(0);
        self.state = SimState::Active;
    }

    /// Add the next player and spawn its formation.
    ///
    /// Ids are assigned densely from 0.
    pub fn create_player(&mut self) -> Result<PlayerId, SimulationError> {
        self.ensure_active()?;
        if self.player_count == PLAYER_MAX {
            return Err(SimulationError::PlayerLimit { limit: PLAYER_MAX });
        }
        let first = self.unit_count;
        let end = first + self.units_per_player;
        if end > self.unit_capacity {
            return Err(SimulationError::UnitLimit {
                limit: self.unit_capacity,
            });
        }

        let id = PlayerId(self.player_count as u8);
        for (slot, unit) in self.units[first..end].iter_mut().enumerate() {
            let cell = formation_cell(id, slot);
            *unit = Unit {
                position: cell,
                target: cell,
                player: id,
                reserved: 0,
            };
        }
        self.players[self.player_count] = Player {
            id,
            first_unit: UnitId(first as u16),
            unit_count: self.units_per_player as u16,
        };
        self.player_count += 1;
        self.unit_count = end;

        tracing::debug!(player = %id, units = self.units_per_player, "player created");
        Ok(id)
    }

    /// Advance one tick with the given order list.
    ///
    /// On error nothing has changed, the tick counter included.
    pub fn tick(&mut self, orders: &[Order]) -> Result<TickId, SimulationError> {
        self.ensure_active()?;
        for order in orders {
            self.validate(order)?;
        }

        for order in orders {
            let target = order.target();
            for unit in &mut self.units[order.units()] {
                unit.target = target;
            }
        }
        for unit in &mut self.units[..self.unit_count] {
            unit.advance();
        }
        self.tick = self.tick.next();

        tracing::trace!(tick = %self.tick, orders = orders.len(), "simulation tick");
        Ok(self.tick)
    }

    fn validate(&self, order: &Order) -> Result<(), SimulationError> {
        let player = order.player();
        if player.index() >= self.player_count {
            return Err(SimulationError::UndefinedPlayer { player });
        }
        let range = order.units();
        if range.end > self.unit_count {
            return Err(SimulationError::UnitOutOfRange {
                first: order.first_unit(),
                count: order.unit_count(),
                unit_count: self.unit_count,
            });
        }
        for (index, unit) in self.units[range.clone()].iter().enumerate() {
            if unit.player != player {
                return Err(SimulationError::NotOwned {
                    unit: UnitId((range.start + index) as u16),
                    player,
                });
            }
        }
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), SimulationError> {
        match self.state {
            SimState::Active => Ok(()),
            SimState::Uninitialized => Err(SimulationError::NotActive),
        }
    }

    /// Lifecycle state.
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Whether `init` has been called.
    pub fn is_active(&self) -> bool {
        self.state == SimState::Active
    }

    /// Ticks executed since `init`.
    pub fn tick_id(&self) -> TickId {
        self.tick
    }

    /// Live players, in id order.
    pub fn players(&self) -> &[Player] {
        &self.players[..self.player_count]
    }

    /// Number of live players.
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Look up a live player.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players().get(id.index())
    }

    /// Live units, in id order.
    pub fn units(&self) -> &[Unit] {
        &self.units[..self.unit_count]
    }

    /// Number of live units.
    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    /// Units spawned per player.
    pub fn units_per_player(&self) -> usize {
        self.units_per_player
    }

    /// Most units this simulation can hold.
    pub fn unit_capacity(&self) -> usize {
        self.unit_capacity
    }
}

impl PartialEq for Simulation<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
            && self.units_per_player == other.units_per_player
            && self.tick == other.tick
            && self.players() == other.players()
            && self.units() == other.units()
    }
}

impl Eq for Simulation<'_> {}

impl fmt::Debug for Simulation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("state", &self.state)
            .field("tick", &self.tick)
            .field("player_count", &self.player_count)
            .field("unit_count", &self.unit_count)
            .finish()
    }
}
